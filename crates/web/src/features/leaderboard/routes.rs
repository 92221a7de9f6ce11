use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_class_leaderboard, get_event_leaderboard};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/:event/leaderboard", get(get_event_leaderboard))
        .route("/:event/leaderboard/:start_class", get(get_class_leaderboard))
}
