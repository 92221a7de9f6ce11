use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_event, list_events};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_events))
        .route("/:event", get(get_event))
}
