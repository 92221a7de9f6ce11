use sqlx::PgPool;
use storage::{
    dto::statistics::CompetitionStatistics,
    error::Result,
    models::EventConfig,
    repository::participant::ParticipantRepository,
    services::statistics,
};

pub async fn competition_statistics(
    pool: &PgPool,
    config: &EventConfig,
) -> Result<CompetitionStatistics> {
    let records = ParticipantRepository::new(pool).list_records(config).await?;

    Ok(statistics::compute(&records, config))
}
