use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    create_participant, delete_participant, get_participant, list_participants,
    register_participant, search_participants, update_boulder, update_route, verify_participant,
};
use crate::middleware::auth::{ApiKeys, require_auth};

/// Participant endpoints, mounted below the events router.
///
/// Result updates are authorized by the participant secret in the body, the
/// organizer endpoints by bearer key.
pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:event/participants", get(list_participants))
        .route("/:event/participants", post(create_participant))
        .route("/:event/participants/search", get(search_participants))
        .route("/:event/participants/:id", delete(delete_participant))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:event/participants/register", post(register_participant))
        .route("/:event/participants/verify", post(verify_participant))
        .route("/:event/participants/:id", get(get_participant))
        .route("/:event/participants/:id/boulders", put(update_boulder))
        .route("/:event/participants/:id/routes", put(update_route))
        .merge(protected)
}
