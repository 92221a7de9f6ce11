use sqlx::PgPool;
use storage::{
    dto::leaderboard::{ClassLeaderboard, EventLeaderboard},
    error::{Result, StorageError},
    models::{EventConfig, StartClass},
    repository::participant::ParticipantRepository,
    services::ranking::{rank, rank_all},
};

/// Ranks every start class of the event on a fresh snapshot
pub async fn event_leaderboard(pool: &PgPool, config: &EventConfig) -> Result<EventLeaderboard> {
    let records = ParticipantRepository::new(pool).list_records(config).await?;

    let classes = rank_all(&records, config)
        .iter()
        .map(|(start_class, ranked)| ClassLeaderboard::from_ranked(*start_class, ranked, config))
        .collect();

    Ok(EventLeaderboard {
        event: config.id,
        name: config.name.clone(),
        scoring: config.scoring,
        classes,
    })
}

pub async fn class_leaderboard(
    pool: &PgPool,
    config: &EventConfig,
    start_class: StartClass,
) -> Result<ClassLeaderboard> {
    if !config.has_start_class(start_class) {
        return Err(StorageError::InvalidInput(format!(
            "Start class {} is not part of {}",
            start_class, config.name
        )));
    }

    let records = ParticipantRepository::new(pool).list_records(config).await?;
    let ranked = rank(&records, start_class, config.scoring.strategy());

    Ok(ClassLeaderboard::from_ranked(start_class, &ranked, config))
}
