/// Partial update merging

/// A sparse update payload that can be merged onto an existing record.
///
/// Implementations copy every field that is present in the payload and keep
/// every other field of `existing`. Identity and timestamps are never touched
/// here; the store restamps `updated_at` after merging.
pub trait Merge<E> {
    fn merge(&self, existing: &E) -> E;
}

/// Picks the patch value if it was supplied, otherwise the existing one.
pub fn pick<T: Clone>(patch: &Option<T>, existing: &T) -> T {
    match patch {
        Some(value) => value.clone(),
        None => existing.clone(),
    }
}
