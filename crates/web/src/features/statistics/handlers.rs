use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{Database, dto::statistics::CompetitionStatistics};

use crate::error::WebError;
use crate::features::events::services::resolve_event;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{event}/statistics",
    params(
        ("event" = String, Path, description = "Event identifier")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Aggregated competition statistics", body = CompetitionStatistics),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "statistics"
)]
pub async fn get_statistics(
    State(db): State<Database>,
    Path(event): Path<String>,
) -> Result<Response, WebError> {
    let config = resolve_event(&event)?;

    let stats = services::competition_statistics(db.pool(), &config).await?;

    Ok(Json(stats).into_response())
}
