//! Assignment schema, payloads and list criteria.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fields;
use crate::store::filter::{contains_ignore_case, equals, within, Criteria, DateBound};
use crate::store::merge::{pick, Merge};
use crate::store::Entity;

fn default_true() -> bool {
    true
}

/// A stored assignment.
///
/// `course_id` is not checked against the course store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    /// Maximum points that can be earned, serialized as a decimal string
    pub points: Decimal,
    pub due_date: DateTime<Utc>,
    pub late_submission_allowed: bool,
    pub group_assignment: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or fully replacing an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub points: Decimal,
    pub due_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub late_submission_allowed: bool,
    #[serde(default)]
    pub group_assignment: bool,
}

/// Partial update for an assignment; only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssignmentPatch {
    #[serde(default, deserialize_with = "fields::present")]
    pub course_id: Option<Uuid>,
    #[serde(default, deserialize_with = "fields::present")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "fields::present")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "fields::present")]
    pub points: Option<Decimal>,
    #[serde(default, deserialize_with = "fields::present")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "fields::present")]
    pub late_submission_allowed: Option<bool>,
    #[serde(default, deserialize_with = "fields::present")]
    pub group_assignment: Option<bool>,
}

/// Query criteria for listing assignments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssignmentCriteria {
    pub id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    /// Case-insensitive partial match on the title
    pub title: Option<String>,
    /// Inclusive lower bound on the due date, ignoring time of day
    pub due_date_from: Option<DateBound>,
    /// Inclusive upper bound on the due date, ignoring time of day
    pub due_date_to: Option<DateBound>,
    pub min_points: Option<Decimal>,
    pub max_points: Option<Decimal>,
    #[serde(default, deserialize_with = "fields::flag")]
    pub group_assignment: Option<bool>,
    #[serde(default, deserialize_with = "fields::flag")]
    pub late_submission_allowed: Option<bool>,
}

impl Entity for Assignment {
    type Draft = AssignmentDraft;
    type Patch = AssignmentPatch;
    type Criteria = AssignmentCriteria;

    const KIND: &'static str = "Assignment";

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

    fn requested_id(draft: &AssignmentDraft) -> Option<Uuid> {
        draft.id
    }

    fn from_draft(
        id: Uuid,
        draft: AssignmentDraft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Assignment {
            id,
            course_id: draft.course_id,
            title: draft.title,
            description: draft.description,
            points: draft.points,
            due_date: draft.due_date,
            late_submission_allowed: draft.late_submission_allowed,
            group_assignment: draft.group_assignment,
            created_at,
            updated_at,
        }
    }
}

impl Merge<Assignment> for AssignmentPatch {
    fn merge(&self, existing: &Assignment) -> Assignment {
        Assignment {
            course_id: pick(&self.course_id, &existing.course_id),
            title: pick(&self.title, &existing.title),
            description: pick(&self.description, &existing.description),
            points: pick(&self.points, &existing.points),
            due_date: pick(&self.due_date, &existing.due_date),
            late_submission_allowed: pick(
                &self.late_submission_allowed,
                &existing.late_submission_allowed,
            ),
            group_assignment: pick(&self.group_assignment, &existing.group_assignment),
            ..existing.clone()
        }
    }
}

impl Criteria<Assignment> for AssignmentCriteria {
    fn matches(&self, assignment: &Assignment) -> bool {
        let due = DateBound(assignment.due_date.date_naive());

        equals(&assignment.id, self.id.as_ref())
            && equals(&assignment.course_id, self.course_id.as_ref())
            && contains_ignore_case(&assignment.title, self.title.as_deref())
            && within(due, self.due_date_from, self.due_date_to)
            && within(assignment.points, self.min_points, self.max_points)
            && equals(&assignment.group_assignment, self.group_assignment.as_ref())
            && equals(
                &assignment.late_submission_allowed,
                self.late_submission_allowed.as_ref(),
            )
    }
}
