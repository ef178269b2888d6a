//! Course schema, payloads and list criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields;
use crate::store::filter::{contains_ignore_case, equals, within, Criteria};
use crate::store::merge::{pick, Merge};
use crate::store::Entity;

/// A stored course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Number of credit hours (typically 1-6)
    pub credits: i64,
    /// Academic department offering the course
    pub department: String,
    /// Course level (1000, 2000, 3000, 4000)
    pub level: i64,
    /// Semester when the course is offered, e.g. "fall"
    pub semester: String,
    pub year: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or fully replacing a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub credits: i64,
    pub department: String,
    pub level: i64,
    pub semester: String,
    pub year: i64,
}

/// Partial update for a course; only supplied fields change.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CoursePatch {
    #[serde(default, deserialize_with = "fields::present")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "fields::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::present")]
    pub credits: Option<i64>,
    #[serde(default, deserialize_with = "fields::present")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "fields::present")]
    pub level: Option<i64>,
    #[serde(default, deserialize_with = "fields::present")]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "fields::present")]
    pub year: Option<i64>,
}

/// Query criteria for listing courses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CourseCriteria {
    /// Case-insensitive partial match on the title
    pub title: Option<String>,
    /// Case-insensitive partial match on the department
    pub department: Option<String>,
    pub level: Option<i64>,
    /// Exact, case-sensitive match
    pub semester: Option<String>,
    pub year: Option<i64>,
    pub min_credits: Option<i64>,
    pub max_credits: Option<i64>,
}

impl Entity for Course {
    type Draft = CourseDraft;
    type Patch = CoursePatch;
    type Criteria = CourseCriteria;

    const KIND: &'static str = "Course";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn requested_id(draft: &CourseDraft) -> Option<Uuid> {
        draft.id
    }

    fn from_draft(
        id: Uuid,
        draft: CourseDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Course {
            id,
            title: draft.title,
            description: draft.description,
            credits: draft.credits,
            department: draft.department,
            level: draft.level,
            semester: draft.semester,
            year: draft.year,
            created_at,
            updated_at,
        }
    }
}

impl Merge<Course> for CoursePatch {
    fn merge(&self, existing: &Course) -> Course {
        Course {
            title: pick(&self.title, &existing.title),
            description: pick(&self.description, &existing.description),
            credits: pick(&self.credits, &existing.credits),
            department: pick(&self.department, &existing.department),
            level: pick(&self.level, &existing.level),
            semester: pick(&self.semester, &existing.semester),
            year: pick(&self.year, &existing.year),
            ..existing.clone()
        }
    }
}

impl Criteria<Course> for CourseCriteria {
    fn matches(&self, course: &Course) -> bool {
        contains_ignore_case(&course.title, self.title.as_deref())
            && contains_ignore_case(&course.department, self.department.as_deref())
            && equals(&course.level, self.level.as_ref())
            && equals(course.semester.as_str(), self.semester.as_deref())
            && equals(&course.year, self.year.as_ref())
            && within(course.credits, self.min_credits, self.max_credits)
    }
}
