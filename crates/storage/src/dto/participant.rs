use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{EventConfig, EventId, ParticipantRecord, ResultPayload, StartClass, ZONES};

/// Participant as shown to the public and to the participant. Never carries the secret.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub participant_id: Uuid,
    pub event: EventId,
    pub name: String,
    pub start_class: Option<StartClass>,
    pub registered_at: chrono::NaiveDateTime,
    #[schema(value_type = Object)]
    pub results: Option<ResultPayload>,
    pub score: i64,
    pub display_target: Option<u32>,
    pub required_for_finals: Option<u32>,
}

impl ParticipantResponse {
    pub fn from_record(record: ParticipantRecord, config: &EventConfig) -> Self {
        let score = config.scoring.strategy().score(&record);
        let target = record.start_class.and_then(|class| config.target_for(class));

        Self {
            participant_id: record.id,
            event: config.id,
            name: record.name,
            start_class: record.start_class,
            registered_at: record.registered_at,
            results: record.result,
            score,
            display_target: target.map(|t| t.display_target),
            required_for_finals: target.map(|t| t.required_for_finals),
        }
    }
}

/// Participant including the secret key. Returned once on registration and to organizers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantWithSecret {
    #[serde(flatten)]
    pub participant: ParticipantResponse,
    pub secret: String,
}

impl ParticipantWithSecret {
    pub fn from_record(record: ParticipantRecord, config: &EventConfig) -> Self {
        let secret = record.secret.clone();
        Self {
            participant: ParticipantResponse::from_record(record, config),
            secret,
        }
    }
}

/// Request payload for organizers creating a participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateParticipantRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub start_class: StartClass,

    /// Generated when omitted.
    #[validate(length(
        min = 6,
        max = 64,
        message = "Secret must be between 6 and 64 characters"
    ))]
    pub secret: Option<String>,
}

/// Request payload for participant self-registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterParticipantRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub start_class: StartClass,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VerifyParticipantRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "Secret is required"))]
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyParticipantResponse {
    pub participant_id: Uuid,
    pub name: String,
    pub start_class: Option<StartClass>,
    pub message: String,
}

/// Toggle of one boulder. The index upper bound depends on the event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBoulderRequest {
    pub boulder_index: usize,

    pub completed: bool,

    #[validate(length(min = 1, max = 64, message = "Secret is required"))]
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRouteRequest {
    #[validate(range(min = 1, max = 8, message = "Route number must be between 1 and 8"))]
    pub route_number: usize,

    #[validate(custom(function = "validate_zone"))]
    pub zone: i32,

    #[validate(range(min = 0, max = 1000, message = "Attempts must be between 0 and 1000"))]
    pub attempts: i32,

    #[validate(length(min = 1, max = 64, message = "Secret is required"))]
    pub secret: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ParticipantFilter {
    pub start_class: Option<StartClass>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameSearch {
    /// Case-insensitive substring of the participant name.
    pub name: String,
}

fn validate_zone(zone: i32) -> Result<(), validator::ValidationError> {
    if ZONES.contains(&zone) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_zone"))
    }
}
