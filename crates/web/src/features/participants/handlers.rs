use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::participant::{
        CreateParticipantRequest, NameSearch, ParticipantFilter, ParticipantResponse,
        ParticipantWithSecret, RegisterParticipantRequest, UpdateBoulderRequest,
        UpdateRouteRequest, VerifyParticipantRequest, VerifyParticipantResponse,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::features::events::services::resolve_event;

use super::services;

fn ensure_name(name: &str) -> Result<(), WebError> {
    if name.trim().is_empty() {
        return Err(WebError::BadRequest("Name must not be blank".to_string()));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/events/{event}/participants",
    params(
        ("event" = String, Path, description = "Event identifier"),
        ParticipantFilter
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participants of the event including secrets", body = Vec<ParticipantWithSecret>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(db): State<Database>,
    Path(event): Path<String>,
    Query(filter): Query<ParticipantFilter>,
) -> Result<Response, WebError> {
    let config = resolve_event(&event)?;

    let participants = services::list_participants(db.pool(), &config, filter.start_class).await?;

    let response: Vec<ParticipantWithSecret> = participants
        .into_iter()
        .map(|p| ParticipantWithSecret::from_record(p, &config))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event}/participants/search",
    params(
        ("event" = String, Path, description = "Event identifier"),
        NameSearch
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Participants whose name contains the fragment", body = Vec<ParticipantWithSecret>),
        (status = 400, description = "Empty search"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    tag = "participants"
)]
pub async fn search_participants(
    State(db): State<Database>,
    Path(event): Path<String>,
    Query(search): Query<NameSearch>,
) -> Result<Response, WebError> {
    let config = resolve_event(&event)?;
    ensure_name(&search.name)?;

    let participants = services::search_participants(db.pool(), &config, &search.name).await?;

    let response: Vec<ParticipantWithSecret> = participants
        .into_iter()
        .map(|p| ParticipantWithSecret::from_record(p, &config))
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event}/participants/{id}",
    params(
        ("event" = String, Path, description = "Event identifier"),
        ("id" = Uuid, Path, description = "Participant id")
    ),
    responses(
        (status = 200, description = "Participant with progress", body = ParticipantResponse),
        (status = 404, description = "Event or participant not found")
    ),
    tag = "participants"
)]
pub async fn get_participant(
    State(db): State<Database>,
    Path((event, id)): Path<(String, Uuid)>,
) -> Result<Response, WebError> {
    let config = resolve_event(&event)?;

    let participant = services::get_participant(db.pool(), &config, id).await?;

    Ok(Json(ParticipantResponse::from_record(participant, &config)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{event}/participants/register",
    params(
        ("event" = String, Path, description = "Event identifier")
    ),
    request_body = RegisterParticipantRequest,
    responses(
        (status = 201, description = "Registered; the secret is only shown here", body = ParticipantWithSecret),
        (status = 400, description = "Validation error or start class not offered"),
        (status = 404, description = "Event not found")
    ),
    tag = "participants"
)]
pub async fn register_participant(
    State(db): State<Database>,
    Path(event): Path<String>,
    Json(req): Json<RegisterParticipantRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    ensure_name(&req.name)?;
    let config = resolve_event(&event)?;

    let participant = services::register_participant(db.pool(), &config, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ParticipantWithSecret::from_record(participant, &config)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{event}/participants",
    params(
        ("event" = String, Path, description = "Event identifier")
    ),
    request_body = CreateParticipantRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Participant created", body = ParticipantWithSecret),
        (status = 400, description = "Validation error or start class not offered"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Secret already in use")
    ),
    tag = "participants"
)]
pub async fn create_participant(
    State(db): State<Database>,
    Path(event): Path<String>,
    Json(req): Json<CreateParticipantRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    ensure_name(&req.name)?;
    let config = resolve_event(&event)?;

    let participant = services::create_participant(db.pool(), &config, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ParticipantWithSecret::from_record(participant, &config)),
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{event}/participants/verify",
    params(
        ("event" = String, Path, description = "Event identifier")
    ),
    request_body = VerifyParticipantRequest,
    responses(
        (status = 200, description = "Credentials valid", body = VerifyParticipantResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Name or secret wrong")
    ),
    tag = "participants"
)]
pub async fn verify_participant(
    State(db): State<Database>,
    Path(event): Path<String>,
    Json(req): Json<VerifyParticipantRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let config = resolve_event(&event)?;

    let participant = services::verify_participant(db.pool(), &config, &req.name, &req.secret)
        .await?
        .ok_or(WebError::Unauthorized)?;

    Ok(Json(VerifyParticipantResponse {
        participant_id: participant.id,
        name: participant.name,
        start_class: participant.start_class,
        message: "Verification successful".to_string(),
    })
    .into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{event}/participants/{id}/boulders",
    params(
        ("event" = String, Path, description = "Event identifier"),
        ("id" = Uuid, Path, description = "Participant id")
    ),
    request_body = UpdateBoulderRequest,
    responses(
        (status = 200, description = "Boulder toggled", body = ParticipantResponse),
        (status = 400, description = "Invalid index or not a boulder event"),
        (status = 403, description = "Invalid secret"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn update_boulder(
    State(db): State<Database>,
    Path((event, id)): Path<(String, Uuid)>,
    Json(req): Json<UpdateBoulderRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let config = resolve_event(&event)?;

    let participant =
        services::update_boulder(db.pool(), &config, id, &req, chrono::Utc::now()).await?;

    Ok(Json(ParticipantResponse::from_record(participant, &config)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{event}/participants/{id}/routes",
    params(
        ("event" = String, Path, description = "Event identifier"),
        ("id" = Uuid, Path, description = "Participant id")
    ),
    request_body = UpdateRouteRequest,
    responses(
        (status = 200, description = "Route result stored", body = ParticipantResponse),
        (status = 400, description = "Invalid route, zone or attempts, or not a route event"),
        (status = 403, description = "Invalid secret"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn update_route(
    State(db): State<Database>,
    Path((event, id)): Path<(String, Uuid)>,
    Json(req): Json<UpdateRouteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let config = resolve_event(&event)?;

    let participant = services::update_route(db.pool(), &config, id, &req).await?;

    Ok(Json(ParticipantResponse::from_record(participant, &config)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{event}/participants/{id}",
    params(
        ("event" = String, Path, description = "Event identifier"),
        ("id" = Uuid, Path, description = "Participant id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Participant deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Participant not found")
    ),
    tag = "participants"
)]
pub async fn delete_participant(
    State(db): State<Database>,
    Path((event, id)): Path<(String, Uuid)>,
) -> Result<Response, WebError> {
    let config = resolve_event(&event)?;

    services::delete_participant(db.pool(), &config, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
