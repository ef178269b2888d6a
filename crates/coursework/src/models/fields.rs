//! Serde helpers for request payloads.
//!
//! Patch fields are `Option<T>` where `None` means "not supplied". These
//! helpers keep an explicit JSON `null` from silently turning into "not
//! supplied" for fields that cannot hold null.

use serde::{de, Deserialize, Deserializer};

/// Deserializes a present, non-null value into `Some`.
///
/// Use together with `#[serde(default)]` so a missing field stays `None`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Deserializes a present, possibly null value into `Some`.
///
/// `Some(None)` means the caller asked for the field to be cleared.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserializes a boolean query parameter.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`, ignoring case.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(de::Error::custom(format!("invalid boolean `{raw}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "present")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
        #[serde(default, deserialize_with = "present")]
        points: Option<Decimal>,
    }

    #[derive(Debug, Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "flag")]
        group: Option<bool>,
    }

    #[test]
    fn test_absent_fields_stay_unset() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sample.flag, None);
        assert_eq!(sample.note, None);
        assert_eq!(sample.points, None);
    }

    #[test]
    fn test_falsy_values_are_present() {
        let sample: Sample =
            serde_json::from_value(json!({ "flag": false, "note": "", "points": 0 })).unwrap();
        assert_eq!(sample.flag, Some(false));
        assert_eq!(sample.note, Some(Some(String::new())));
        assert_eq!(sample.points, Some(Decimal::ZERO));
    }

    #[test]
    fn test_null_handling() {
        let sample: Sample = serde_json::from_value(json!({ "note": null })).unwrap();
        assert_eq!(sample.note, Some(None));

        assert!(serde_json::from_value::<Sample>(json!({ "flag": null })).is_err());
        assert!(serde_json::from_value::<Sample>(json!({ "points": null })).is_err());
    }

    #[test]
    fn test_points_accepts_numeric_strings() {
        let sample: Sample = serde_json::from_value(json!({ "points": "150.50" })).unwrap();
        assert_eq!(sample.points.map(|p| p.to_string()), Some("150.50".to_string()));

        assert!(serde_json::from_value::<Sample>(json!({ "points": "lots" })).is_err());
    }

    #[test]
    fn test_flag_spellings() {
        for (raw, expected) in [
            ("true", true),
            ("1", true),
            ("Yes", true),
            ("on", true),
            ("false", false),
            ("0", false),
            ("no", false),
            ("OFF", false),
        ] {
            let query: Query = serde_json::from_value(json!({ "group": raw })).unwrap();
            assert_eq!(query.group, Some(expected), "{raw}");
        }

        let query: Query = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.group, None);
        assert!(serde_json::from_value::<Query>(json!({ "group": "maybe" })).is_err());
    }
}
