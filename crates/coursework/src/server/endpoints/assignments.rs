//! CRUD endpoints for assignments.
//!
//! An assignment's `course_id` is stored as given; it is not checked against
//! the course store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AssignmentCriteria, AssignmentDraft, AssignmentPatch};
use crate::server::types::ApiErrorType;
use crate::store::StoreError;
use crate::types::AppState;

fn not_found(err: StoreError) -> Response {
    warn!("{}", err);
    ApiErrorType::from(err).into_response()
}

/// POST /assignments
pub async fn post_assignment(
    State(s): State<Arc<AppState>>,
    Json(draft): Json<AssignmentDraft>,
) -> Response {
    info!("POST /assignments (course {})", draft.course_id);

    let assignment = s.assignments.insert(draft);
    info!("Created assignment {}", assignment.id);
    (StatusCode::CREATED, Json(assignment)).into_response()
}

/// GET /assignments
///
/// Lists assignments matching every supplied query criterion. Due date bounds
/// are calendar dates and include the whole day.
pub async fn get_assignments(
    State(s): State<Arc<AppState>>,
    Query(criteria): Query<AssignmentCriteria>,
) -> Response {
    info!("GET /assignments - {:?}", criteria);

    (StatusCode::OK, Json(s.assignments.list(&criteria))).into_response()
}

/// GET /assignments/:assignment_id
pub async fn get_assignment(
    Path(assignment_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /assignments/{}", assignment_id);

    match s.assignments.get(assignment_id) {
        Ok(assignment) => (StatusCode::OK, Json(assignment)).into_response(),
        Err(e) => not_found(e),
    }
}

/// PATCH /assignments/:assignment_id
pub async fn patch_assignment(
    Path(assignment_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
    Json(patch): Json<AssignmentPatch>,
) -> Response {
    info!("PATCH /assignments/{}", assignment_id);

    match s.assignments.merge_update(assignment_id, &patch) {
        Ok(assignment) => (StatusCode::OK, Json(assignment)).into_response(),
        Err(e) => not_found(e),
    }
}

/// PUT /assignments/:assignment_id
///
/// Fields left out of the body fall back to their defaults.
pub async fn put_assignment(
    Path(assignment_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
    Json(draft): Json<AssignmentDraft>,
) -> Response {
    info!("PUT /assignments/{}", assignment_id);

    match s.assignments.replace(assignment_id, draft) {
        Ok(assignment) => (StatusCode::OK, Json(assignment)).into_response(),
        Err(e) => not_found(e),
    }
}

/// DELETE /assignments/:assignment_id
pub async fn delete_assignment(
    Path(assignment_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("DELETE /assignments/{}", assignment_id);

    match s.assignments.delete(assignment_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => not_found(e),
    }
}
