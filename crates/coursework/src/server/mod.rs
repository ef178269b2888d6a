use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::server::endpoints::{assignments, courses, status};
use crate::types::AppState;

mod endpoints;
pub mod types;

pub use endpoints::status::Health;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let course_router = Router::new()
        .route(
            "/courses",
            get(courses::get_courses).post(courses::post_course),
        )
        .route(
            "/courses/:course_id",
            get(courses::get_course)
                .patch(courses::patch_course)
                .put(courses::put_course)
                .delete(courses::delete_course),
        );

    let assignment_router = Router::new()
        .route(
            "/assignments",
            get(assignments::get_assignments).post(assignments::post_assignment),
        )
        .route(
            "/assignments/:assignment_id",
            get(assignments::get_assignment)
                .patch(assignments::patch_assignment)
                .put(assignments::put_assignment)
                .delete(assignments::delete_assignment),
        );

    Router::new()
        .route("/", get(status::get_root))
        .route("/health", get(status::get_health))
        .route("/health/:path_echo", get(status::get_health_with_path))
        .merge(course_router)
        .merge(assignment_router)
        .with_state(app_state)
}
