use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    dto::participant::{
        CreateParticipantRequest, RegisterParticipantRequest, UpdateBoulderRequest,
        UpdateRouteRequest,
    },
    error::{Result, StorageError},
    models::{
        EventConfig, ParticipantRecord, ParticipantRow, ResultPayload, ScoringKind, StartClass,
        generate_secret,
    },
    repository::participant::ParticipantRepository,
};
use uuid::Uuid;

fn decode(rows: Vec<ParticipantRow>, config: &EventConfig) -> Vec<ParticipantRecord> {
    rows.into_iter()
        .map(|row| ParticipantRecord::from_row(row, config))
        .collect()
}

fn ensure_start_class(config: &EventConfig, start_class: StartClass) -> Result<()> {
    if config.has_start_class(start_class) {
        Ok(())
    } else {
        Err(StorageError::InvalidInput(format!(
            "Start class {} is not part of {}",
            start_class, config.name
        )))
    }
}

fn ensure_scoring(config: &EventConfig, expected: ScoringKind) -> Result<()> {
    if config.scoring == expected {
        Ok(())
    } else {
        Err(StorageError::InvalidInput(format!(
            "{} does not record {:?} results",
            config.name, expected
        )))
    }
}

/// List participants of an event, optionally restricted to one start class
pub async fn list_participants(
    pool: &PgPool,
    config: &EventConfig,
    start_class: Option<StartClass>,
) -> Result<Vec<ParticipantRecord>> {
    let repo = ParticipantRepository::new(pool);
    let rows = match start_class {
        Some(start_class) => repo.list_by_start_class(config.id, start_class).await?,
        None => repo.list(config.id).await?,
    };

    Ok(decode(rows, config))
}

pub async fn search_participants(
    pool: &PgPool,
    config: &EventConfig,
    name: &str,
) -> Result<Vec<ParticipantRecord>> {
    let repo = ParticipantRepository::new(pool);
    let rows = repo.search_by_name(config.id, name).await?;

    Ok(decode(rows, config))
}

pub async fn get_participant(
    pool: &PgPool,
    config: &EventConfig,
    id: Uuid,
) -> Result<ParticipantRecord> {
    let repo = ParticipantRepository::new(pool);
    let row = repo.find_by_id(config.id, id).await?;

    Ok(ParticipantRecord::from_row(row, config))
}

async fn insert_participant(
    pool: &PgPool,
    config: &EventConfig,
    name: &str,
    start_class: StartClass,
    secret: &str,
) -> Result<ParticipantRecord> {
    ensure_start_class(config, start_class)?;

    let results = ResultPayload::empty(config).to_json()?;
    let repo = ParticipantRepository::new(pool);
    let row = repo
        .create(config.id, name, start_class, secret, &results)
        .await?;

    tracing::info!(
        event = %config.id,
        participant_id = %row.participant_id,
        start_class = %start_class,
        "Participant registered"
    );

    Ok(ParticipantRecord::from_row(row, config))
}

/// Self-registration. The secret is always generated.
pub async fn register_participant(
    pool: &PgPool,
    config: &EventConfig,
    request: &RegisterParticipantRequest,
) -> Result<ParticipantRecord> {
    let secret = generate_secret();
    insert_participant(pool, config, &request.name, request.start_class, &secret).await
}

/// Organizer creation. Uses the supplied secret or generates one.
pub async fn create_participant(
    pool: &PgPool,
    config: &EventConfig,
    request: &CreateParticipantRequest,
) -> Result<ParticipantRecord> {
    let secret = request.secret.clone().unwrap_or_else(generate_secret);
    insert_participant(pool, config, &request.name, request.start_class, &secret).await
}

/// Looks a participant up by name and secret. `None` when nothing matches.
pub async fn verify_participant(
    pool: &PgPool,
    config: &EventConfig,
    name: &str,
    secret: &str,
) -> Result<Option<ParticipantRecord>> {
    let repo = ParticipantRepository::new(pool);
    let row = repo.find_by_credentials(config.id, name, secret).await?;

    Ok(row.map(|row| ParticipantRecord::from_row(row, config)))
}

/// Checks the secret, strictly decodes the stored payload, applies `mutate`
/// and returns the payload to store.
///
/// A stored payload that cannot be read is an error; writing the mutated
/// empty payload would erase it.
pub fn apply_update<F>(
    row: &ParticipantRow,
    config: &EventConfig,
    secret: &str,
    mutate: F,
) -> Result<serde_json::Value>
where
    F: FnOnce(&mut ResultPayload) -> Result<()>,
{
    if !row.secret_matches(secret) {
        tracing::warn!(
            event = %config.id,
            participant_id = %row.participant_id,
            "Rejected result update with wrong secret"
        );
        return Err(StorageError::InvalidSecret);
    }

    let mut payload = ResultPayload::try_decode(row.results.as_ref().map(|json| &json.0), config)
        .inspect_err(|e| {
            tracing::warn!(
                event = %config.id,
                participant_id = %row.participant_id,
                error = %e,
                "Refusing to overwrite unreadable result payload"
            );
        })?;
    mutate(&mut payload)?;
    payload.to_json()
}

fn toggle_boulder(
    index: usize,
    completed: bool,
    now: DateTime<Utc>,
) -> impl FnOnce(&mut ResultPayload) -> Result<()> + Send {
    move |payload| match payload {
        ResultPayload::Boulder(result) => result.set_completion(index, completed, now),
        ResultPayload::Route(_) => Err(StorageError::InvalidInput(
            "Participant holds route results".to_string(),
        )),
    }
}

fn record_route(
    route_number: usize,
    zone: i32,
    attempts: i32,
) -> impl FnOnce(&mut ResultPayload) -> Result<()> + Send {
    move |payload| match payload {
        ResultPayload::Route(result) => result.set_route(route_number, zone, attempts),
        ResultPayload::Boulder(_) => Err(StorageError::InvalidInput(
            "Participant holds boulder results".to_string(),
        )),
    }
}

async fn update_payload<F>(
    pool: &PgPool,
    config: &EventConfig,
    id: Uuid,
    secret: &str,
    mutate: F,
) -> Result<ParticipantRecord>
where
    F: FnOnce(&mut ResultPayload) -> Result<()> + Send,
{
    let repo = ParticipantRepository::new(pool);
    let row = repo
        .update_results(config.id, id, |row| apply_update(row, config, secret, mutate))
        .await?;

    Ok(ParticipantRecord::from_row(row, config))
}

pub async fn update_boulder(
    pool: &PgPool,
    config: &EventConfig,
    id: Uuid,
    request: &UpdateBoulderRequest,
    now: DateTime<Utc>,
) -> Result<ParticipantRecord> {
    ensure_scoring(config, ScoringKind::Boulder)?;

    let mutate = toggle_boulder(request.boulder_index, request.completed, now);
    update_payload(pool, config, id, &request.secret, mutate).await
}

pub async fn update_route(
    pool: &PgPool,
    config: &EventConfig,
    id: Uuid,
    request: &UpdateRouteRequest,
) -> Result<ParticipantRecord> {
    ensure_scoring(config, ScoringKind::Route)?;

    let mutate = record_route(request.route_number, request.zone, request.attempts);
    update_payload(pool, config, id, &request.secret, mutate).await
}

pub async fn delete_participant(pool: &PgPool, config: &EventConfig, id: Uuid) -> Result<()> {
    let repo = ParticipantRepository::new(pool);
    repo.delete(config.id, id).await?;

    tracing::info!(event = %config.id, participant_id = %id, "Participant deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use storage::models::EventId;

    const SECRET: &str = "0f4c2a9d7e1b4c3aa5d6e7f809123456";

    fn row(config: &EventConfig, results: serde_json::Value) -> ParticipantRow {
        ParticipantRow {
            participant_id: Uuid::new_v4(),
            event: config.id.as_str().to_string(),
            name: "Alex".to_string(),
            start_class: config.start_classes[0].as_str().to_string(),
            secret: SECRET.to_string(),
            registered_at: chrono::NaiveDateTime::default(),
            results: Some(sqlx::types::Json(results)),
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_apply_update_rejects_wrong_or_empty_secret() {
        let config = EventId::Kkfn2025.config();
        let stored = row(&config, json!({ "boulders": [true], "lastUpdateTime": null }));

        for secret in ["wrong", "", " "] {
            let result = apply_update(&stored, &config, secret, toggle_boulder(0, true, noon()));
            assert!(matches!(result, Err(StorageError::InvalidSecret)), "{:?}", secret);
        }
    }

    #[test]
    fn test_apply_update_toggles_boulder() {
        let config = EventId::Kkfn2025.config();
        let stored = row(&config, json!({ "boulders": [true, false], "lastUpdateTime": null }));

        let value = apply_update(&stored, &config, SECRET, toggle_boulder(1, true, noon())).unwrap();

        let boulders = value["boulders"].as_array().unwrap();
        assert_eq!(boulders.len(), 35);
        assert_eq!(boulders[0], json!(true));
        assert_eq!(boulders[1], json!(true));
        assert_eq!(value["lastUpdateTime"], json!("2025-05-17T12:00:00.000Z"));
    }

    #[test]
    fn test_apply_update_rejects_mismatched_mutation() {
        let kkfn = EventId::Kkfn2025.config();
        let stored = row(&kkfn, json!({ "boulders": [], "lastUpdateTime": null }));
        assert!(matches!(
            apply_update(&stored, &kkfn, SECRET, record_route(1, 50, 0)),
            Err(StorageError::InvalidInput(_))
        ));

        let rocklands = EventId::RocklandsCup2025.config();
        let stored = row(&rocklands, json!({}));
        assert!(matches!(
            apply_update(&stored, &rocklands, SECRET, toggle_boulder(0, true, noon())),
            Err(StorageError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_apply_update_keeps_loosely_stored_routes() {
        let config = EventId::RocklandsCup2025.config();
        let stored = row(
            &config,
            json!({
                "Route1": { "zone": 50, "attempts": 0 },
                "Route2": { "zone": 30 },
                "judge": "A"
            }),
        );

        let value = apply_update(&stored, &config, SECRET, record_route(3, 20, 1)).unwrap();

        assert_eq!(value["Route1"], json!({ "zone": 50, "attempts": 0 }));
        assert_eq!(value["Route2"], json!({ "zone": 30, "attempts": 0 }));
        assert_eq!(value["Route3"], json!({ "zone": 20, "attempts": 1 }));
    }

    #[test]
    fn test_apply_update_refuses_to_overwrite_unreadable_payload() {
        let config = EventId::Kkfn2025.config();
        let stored = row(&config, json!({ "Route1": { "zone": 50, "attempts": 0 } }));

        assert!(matches!(
            apply_update(&stored, &config, SECRET, toggle_boulder(0, true, noon())),
            Err(StorageError::InvalidInput(_))
        ));

        let config = EventId::RocklandsCup2025.config();
        let stored = row(&config, json!({ "Route1": { "zone": "top" } }));
        assert!(apply_update(&stored, &config, SECRET, record_route(1, 10, 0)).is_err());
    }

    #[test]
    fn test_start_class_must_belong_to_event() {
        let kkfn = EventId::Kkfn2025.config();
        assert!(ensure_start_class(&kkfn, StartClass::Weiblich).is_ok());
        assert!(matches!(
            ensure_start_class(&kkfn, StartClass::WeiblichUe40),
            Err(StorageError::InvalidInput(_))
        ));

        let rocklands = EventId::RocklandsCup2025.config();
        assert!(ensure_start_class(&rocklands, StartClass::WeiblichUe40).is_ok());
    }

    #[test]
    fn test_scoring_must_match_event() {
        let kkfn = EventId::Kkfn2025.config();
        assert!(ensure_scoring(&kkfn, ScoringKind::Boulder).is_ok());
        assert!(matches!(
            ensure_scoring(&kkfn, ScoringKind::Route),
            Err(StorageError::InvalidInput(_))
        ));
    }
}
