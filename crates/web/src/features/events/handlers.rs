use axum::{
    Json,
    extract::Path,
    response::{IntoResponse, Response},
};
use storage::models::EventConfig;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "List all configured events", body = Vec<EventConfig>)
    ),
    tag = "events"
)]
pub async fn list_events() -> Result<Response, WebError> {
    Ok(Json(services::list_events()).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event}",
    params(
        ("event" = String, Path, description = "Event identifier, e.g. kkfn-2025")
    ),
    responses(
        (status = 200, description = "Event configuration", body = EventConfig),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(Path(event): Path<String>) -> Result<Response, WebError> {
    let config = services::resolve_event(&event)?;

    Ok(Json(config).into_response())
}
