//! Route definition for the notification fan-out endpoint.

use axum::routing::post;
use axum::Router;

use crate::handlers::notify;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// POST   /notify   -> broadcast_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/notify", post(notify::broadcast_notification))
}
