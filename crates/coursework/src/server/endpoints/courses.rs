//! CRUD endpoints for courses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{CourseCriteria, CourseDraft, CoursePatch};
use crate::server::types::ApiErrorType;
use crate::store::StoreError;
use crate::types::AppState;

fn not_found(err: StoreError) -> Response {
    warn!("{}", err);
    ApiErrorType::from(err).into_response()
}

/// POST /courses
pub async fn post_course(
    State(s): State<Arc<AppState>>,
    Json(draft): Json<CourseDraft>,
) -> Response {
    info!("POST /courses");

    let course = s.courses.insert(draft);
    info!("Created course {}", course.id);
    (StatusCode::CREATED, Json(course)).into_response()
}

/// GET /courses
///
/// Lists courses matching every supplied query criterion.
pub async fn get_courses(
    State(s): State<Arc<AppState>>,
    Query(criteria): Query<CourseCriteria>,
) -> Response {
    info!("GET /courses - {:?}", criteria);

    (StatusCode::OK, Json(s.courses.list(&criteria))).into_response()
}

/// GET /courses/:course_id
pub async fn get_course(
    Path(course_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /courses/{}", course_id);

    match s.courses.get(course_id) {
        Ok(course) => (StatusCode::OK, Json(course)).into_response(),
        Err(e) => not_found(e),
    }
}

/// PATCH /courses/:course_id
///
/// Updates only the fields present in the body.
pub async fn patch_course(
    Path(course_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
    Json(patch): Json<CoursePatch>,
) -> Response {
    info!("PATCH /courses/{}", course_id);

    match s.courses.merge_update(course_id, &patch) {
        Ok(course) => (StatusCode::OK, Json(course)).into_response(),
        Err(e) => not_found(e),
    }
}

/// PUT /courses/:course_id
///
/// Replaces the whole course. The path id always wins over any id in the body.
pub async fn put_course(
    Path(course_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
    Json(draft): Json<CourseDraft>,
) -> Response {
    info!("PUT /courses/{}", course_id);

    match s.courses.replace(course_id, draft) {
        Ok(course) => (StatusCode::OK, Json(course)).into_response(),
        Err(e) => not_found(e),
    }
}

/// DELETE /courses/:course_id
pub async fn delete_course(
    Path(course_id): Path<Uuid>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("DELETE /courses/{}", course_id);

    match s.courses.delete(course_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => not_found(e),
    }
}
