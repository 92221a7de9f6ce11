pub mod events;
pub mod leaderboard;
pub mod participants;
pub mod statistics;

use axum::Router;
use storage::Database;

use crate::middleware::auth::ApiKeys;

/// Everything served below `/api/events`.
pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    events::routes::routes()
        .merge(leaderboard::routes::routes())
        .merge(participants::routes::routes(api_keys.clone()))
        .merge(statistics::routes::routes(api_keys))
}
