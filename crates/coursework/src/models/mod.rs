/// Resource schemas, update payloads and list criteria
mod assignment;
mod course;
pub mod fields;

pub use assignment::{Assignment, AssignmentCriteria, AssignmentDraft, AssignmentPatch};
pub use course::{Course, CourseCriteria, CourseDraft, CoursePatch};
