//! Filter engine shared by the course and assignment list endpoints.
//!
//! Every criterion is optional. An unset criterion imposes no constraint and
//! all set criteria must hold for a record to be kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;
use thiserror::Error;

/// A set of optional predicates over records of type `E`.
pub trait Criteria<E> {
    /// Returns true if `entity` satisfies every criterion that is set.
    fn matches(&self, entity: &E) -> bool;
}

/// Keeps the records that satisfy all of the supplied criteria.
pub fn filter<E, C>(entities: impl IntoIterator<Item = E>, criteria: &C) -> Vec<E>
where
    C: Criteria<E>,
{
    entities
        .into_iter()
        .filter(|entity| criteria.matches(entity))
        .collect()
}

/// Case-insensitive substring check. A missing needle always matches.
pub fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// Exact equality check. A missing expected value always matches.
pub fn equals<T: PartialEq + ?Sized>(value: &T, expected: Option<&T>) -> bool {
    expected.map_or(true, |expected| value == expected)
}

/// Inclusive range check where either bound may be missing.
pub fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// A calendar date used as an inclusive bound on a timestamp field.
///
/// Accepts `YYYY-MM-DD`, or a full timestamp of which only the date part is
/// kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateBound(pub NaiveDate);

impl DateBound {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Error returned when a date bound cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid date `{0}`, expected YYYY-MM-DD")]
pub struct DateBoundError(String);

impl FromStr for DateBound {
    type Err = DateBoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(DateBound(date));
        }

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(DateBound(timestamp.date_naive()));
        }

        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(|timestamp| DateBound(timestamp.date()))
            .ok_or_else(|| DateBoundError(trimmed.to_string()))
    }
}

impl<'de> Deserialize<'de> for DateBound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
