//! In-memory resource stores.
//!
//! A [`Store`] exclusively owns the records of one resource type. Callers only
//! ever receive clones, so nothing outside the store can mutate its state.
//! Single-record operations run under the owning `DashMap` shard lock, which
//! serializes concurrent writes to the same id.

mod error;
pub mod filter;
pub mod merge;

pub use error::StoreError;
pub use filter::{Criteria, DateBound};
pub use merge::Merge;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use tracing::debug;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// A record type that can be kept in a [`Store`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Full payload used by create and replace.
    type Draft;
    /// Sparse payload used by partial updates.
    type Patch: Merge<Self>;
    /// Optional list criteria.
    type Criteria: Criteria<Self>;

    /// Human readable record kind, used in error messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn set_updated_at(&mut self, at: DateTime<Utc>);

    /// The id the caller asked for, if any.
    fn requested_id(draft: &Self::Draft) -> Option<Uuid>;

    /// Builds a stored record from a draft. Any id inside the draft is ignored
    /// in favour of `id`.
    fn from_draft(
        id: Uuid,
        draft: Self::Draft,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self;
}

/// Thread-safe in-memory store for one resource type.
pub struct Store<E: Entity> {
    records: DashMap<Uuid, E>,
    /// Ids of deleted records. These are never handed out again.
    ///
    /// Grows by one entry per delete for the lifetime of the store; a caller
    /// could otherwise ask for a deleted id back on create.
    retired: DashSet<Uuid>,
}

impl<E: Entity> Store<E> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            retired: DashSet::new(),
        }
    }

    /// Stores a new record and returns a copy of it.
    ///
    /// The caller-supplied id is honoured unless it belongs to a live or
    /// deleted record, in which case a fresh one is generated.
    pub fn insert(&self, draft: E::Draft) -> E {
        let mut id = E::requested_id(&draft)
            .filter(|id| !self.retired.contains(id))
            .unwrap_or_else(Uuid::new_v4);

        loop {
            match self.records.entry(id) {
                // Checked under the shard lock; `delete` retires before removing.
                Entry::Vacant(_) if self.retired.contains(&id) => {
                    debug!("{} id {} was retired, generating a new one", E::KIND, id);
                    id = Uuid::new_v4();
                }
                Entry::Vacant(slot) => {
                    let now = Utc::now();
                    let record = E::from_draft(id, draft, now, now);
                    slot.insert(record.clone());
                    debug!("Inserted {} {}", E::KIND, id);
                    return record;
                }
                Entry::Occupied(_) => {
                    debug!("{} id {} already taken, generating a new one", E::KIND, id);
                    id = Uuid::new_v4();
                }
            }
        }
    }

    /// Gets a copy of the record with the given id.
    pub fn get(&self, id: Uuid) -> StoreResult<E> {
        self.records
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::not_found(E::KIND, id))
    }

    /// Returns copies of every stored record, in no particular order.
    pub fn list_all(&self) -> Vec<E> {
        self.records
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns copies of the records matching every supplied criterion.
    pub fn list(&self, criteria: &E::Criteria) -> Vec<E> {
        filter::filter(self.list_all(), criteria)
    }

    /// Merges a partial update onto an existing record.
    pub fn merge_update(&self, id: Uuid, patch: &E::Patch) -> StoreResult<E> {
        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(E::KIND, id))?;

        let mut merged = patch.merge(entry.value());
        merged.set_updated_at(next_stamp(entry.updated_at()));
        *entry.value_mut() = merged.clone();

        debug!("Merged update into {} {}", E::KIND, id);
        Ok(merged)
    }

    /// Replaces every user-facing field of an existing record.
    ///
    /// The id and `created_at` of the stored record are kept.
    pub fn replace(&self, id: Uuid, draft: E::Draft) -> StoreResult<E> {
        let mut entry = self
            .records
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(E::KIND, id))?;

        let created_at = entry.created_at();
        let updated_at = next_stamp(entry.updated_at());
        let replaced = E::from_draft(id, draft, created_at, updated_at);
        *entry.value_mut() = replaced.clone();

        debug!("Replaced {} {}", E::KIND, id);
        Ok(replaced)
    }

    /// Removes a record. Its id is retired and never reused.
    pub fn delete(&self, id: Uuid) -> StoreResult<()> {
        let entry = match self.records.entry(id) {
            Entry::Occupied(entry) => entry,
            Entry::Vacant(_) => return Err(StoreError::not_found(E::KIND, id)),
        };
        self.retired.insert(id);
        entry.remove();

        debug!("Deleted {} {}", E::KIND, id);
        Ok(())
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<E: Entity> Default for Store<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time, bumped past `previous` if the clock has not moved on.
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Assignment, AssignmentDraft, Course, CourseCriteria, CourseDraft, CoursePatch,
    };
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};

    fn draft(title: &str) -> CourseDraft {
        CourseDraft {
            id: None,
            title: title.to_string(),
            description: Some("An introduction.".to_string()),
            credits: 3,
            department: "Computer Science".to_string(),
            level: 1000,
            semester: "fall".to_string(),
            year: 2024,
        }
    }

    #[test]
    fn test_insert_assigns_fresh_ids_and_stamps() {
        let store: Store<Course> = Store::new();
        let mut ids = HashSet::new();

        for i in 0..50 {
            let course = store.insert(draft(&format!("Course {i}")));
            assert_eq!(course.created_at, course.updated_at);
            assert!(ids.insert(course.id));
        }

        assert_eq!(store.len(), 50);
    }

    #[test]
    fn test_insert_honours_requested_id() {
        let store: Store<Course> = Store::new();
        let id = Uuid::new_v4();

        let course = store.insert(CourseDraft {
            id: Some(id),
            ..draft("Databases")
        });
        assert_eq!(course.id, id);

        // Taken ids are not overwritten
        let second = store.insert(CourseDraft {
            id: Some(id),
            ..draft("Networks")
        });
        assert_ne!(second.id, id);
        assert_eq!(store.get(id).unwrap().title, "Databases");
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let store: Store<Course> = Store::new();
        let course = store.insert(draft("Databases"));
        store.delete(course.id).unwrap();

        let again = store.insert(CourseDraft {
            id: Some(course.id),
            ..draft("Databases")
        });
        assert_ne!(again.id, course.id);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store: Store<Course> = Store::new();
        let id = Uuid::new_v4();

        assert_eq!(store.get(id), Err(StoreError::not_found("Course", id)));
    }

    #[test]
    fn test_merge_update_changes_only_supplied_fields() {
        let store: Store<Course> = Store::new();
        let before = store.insert(draft("Databases"));

        let patch = CoursePatch {
            credits: Some(0),
            ..CoursePatch::default()
        };
        let after = store.merge_update(before.id, &patch).unwrap();

        assert_eq!(after.credits, 0);
        assert_eq!(after.title, before.title);
        assert_eq!(after.description, before.description);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(store.get(before.id).unwrap(), after);
    }

    #[test]
    fn test_replace_keeps_id_and_created_at() {
        let store: Store<Course> = Store::new();
        let before = store.insert(draft("Databases"));

        let replacement = CourseDraft {
            id: Some(Uuid::new_v4()),
            description: None,
            credits: 4,
            ..draft("Advanced Databases")
        };
        let after = store.replace(before.id, replacement).unwrap();

        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.title, "Advanced Databases");
        assert_eq!(after.description, None);
        assert_eq!(after.credits, 4);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_mutations_on_missing_ids() {
        let store: Store<Course> = Store::new();
        let id = Uuid::new_v4();

        assert!(store
            .merge_update(id, &CoursePatch::default())
            .unwrap_err()
            .is_not_found());
        assert!(store.replace(id, draft("x")).unwrap_err().is_not_found());
        assert!(store.delete(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_removes_from_listing() {
        let store: Store<Course> = Store::new();
        let kept = store.insert(draft("Databases"));
        let gone = store.insert(draft("Networks"));

        store.delete(gone.id).unwrap();

        assert!(store.get(gone.id).is_err());
        let listed = store.list(&CourseCriteria::default());
        assert_eq!(listed, vec![kept]);
    }

    #[test]
    fn test_list_is_repeatable() {
        let store: Store<Course> = Store::new();
        for i in 0..10 {
            store.insert(draft(&format!("Course {i}")));
        }

        let sorted = |mut courses: Vec<Course>| {
            courses.sort_by_key(|c| c.id);
            courses
        };
        assert_eq!(sorted(store.list_all()), sorted(store.list_all()));
    }

    #[test]
    fn test_concurrent_updates_do_not_lose_records() {
        let store: Arc<Store<Course>> = Arc::new(Store::new());
        let course = store.insert(draft("Databases"));
        let course_id = course.id;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let patch = CoursePatch {
                            credits: Some(i),
                            ..CoursePatch::default()
                        };
                        store.merge_update(course_id, &patch).unwrap();
                        store.insert(draft("Filler"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 1 + 8 * 100);
        let stored = store.get(course_id).unwrap();
        assert!((0..8).contains(&stored.credits));
        assert_eq!(stored.created_at, course.created_at);
    }

    #[test]
    fn test_delete_racing_insert_never_reuses_id() {
        let store: Arc<Store<Course>> = Arc::new(Store::new());

        for _ in 0..200 {
            let id = store.insert(draft("Databases")).id;
            let barrier = Arc::new(Barrier::new(2));

            let inserter = {
                let store = store.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    (0..20)
                        .map(|_| {
                            store
                                .insert(CourseDraft {
                                    id: Some(id),
                                    ..draft("Networks")
                                })
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            };

            barrier.wait();
            store.delete(id).unwrap();

            let handed_out = inserter.join().unwrap();
            assert!(!handed_out.contains(&id));
            assert!(store.get(id).unwrap_err().is_not_found());
        }
    }

    #[test]
    fn test_assignment_replace_and_delete() {
        let store: Store<Assignment> = Store::new();
        let payload = json!({
            "course_id": Uuid::new_v4(),
            "title": "Essay",
            "description": "Write about series.",
            "points": "100.0",
            "due_date": "2024-04-01T23:59:59Z",
            "late_submission_allowed": false
        });
        let before = store.insert(serde_json::from_value(payload.clone()).unwrap());
        assert!(!before.late_submission_allowed);

        let mut replacement = payload;
        replacement.as_object_mut().unwrap().remove("late_submission_allowed");
        replacement["title"] = json!("Long Essay");
        let replacement: AssignmentDraft = serde_json::from_value(replacement).unwrap();

        let after = store.replace(before.id, replacement).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.title, "Long Essay");
        assert!(after.late_submission_allowed);

        store.delete(before.id).unwrap();
        assert!(store.get(before.id).unwrap_err().is_not_found());
        assert!(store.list_all().is_empty());
    }
}
