use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::leaderboard::{ClassLeaderboard, EventLeaderboard},
    models::StartClass,
};

use crate::error::WebError;
use crate::features::events::services::resolve_event;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{event}/leaderboard",
    params(
        ("event" = String, Path, description = "Event identifier")
    ),
    responses(
        (status = 200, description = "Ranked leaderboards of all start classes", body = EventLeaderboard),
        (status = 404, description = "Event not found")
    ),
    tag = "leaderboard"
)]
pub async fn get_event_leaderboard(
    State(db): State<Database>,
    Path(event): Path<String>,
) -> Result<Response, WebError> {
    let config = resolve_event(&event)?;

    let leaderboard = services::event_leaderboard(db.pool(), &config).await?;

    Ok(Json(leaderboard).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event}/leaderboard/{start_class}",
    params(
        ("event" = String, Path, description = "Event identifier"),
        ("start_class" = StartClass, Path, description = "Start class, e.g. Weiblich")
    ),
    responses(
        (status = 200, description = "Ranked leaderboard of one start class", body = ClassLeaderboard),
        (status = 400, description = "Unknown start class or not offered by the event"),
        (status = 404, description = "Event not found")
    ),
    tag = "leaderboard"
)]
pub async fn get_class_leaderboard(
    State(db): State<Database>,
    Path((event, start_class)): Path<(String, String)>,
) -> Result<Response, WebError> {
    let config = resolve_event(&event)?;
    let start_class: StartClass = start_class.parse()?;

    let leaderboard = services::class_leaderboard(db.pool(), &config, start_class).await?;

    Ok(Json(leaderboard).into_response())
}
