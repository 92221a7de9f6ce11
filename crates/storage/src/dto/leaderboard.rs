use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{EventConfig, EventId, ResultPayload, ScoringKind, StartClass};
use crate::services::ranking::RankedEntry;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub participant_id: Uuid,
    pub name: String,
    pub score: i64,
    /// Cosmetic denominator, rendered as `score/display_target`.
    pub display_target: u32,
    pub last_update_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassLeaderboard {
    pub start_class: StartClass,
    pub label: String,
    pub display_target: u32,
    pub entries: Vec<LeaderboardEntry>,
}

impl ClassLeaderboard {
    pub fn from_ranked(
        start_class: StartClass,
        ranked: &[RankedEntry<'_>],
        config: &EventConfig,
    ) -> Self {
        let display_target = config.display_target(start_class);
        let entries = ranked
            .iter()
            .map(|entry| LeaderboardEntry {
                rank: entry.rank,
                participant_id: entry.record.id,
                name: entry.record.name.clone(),
                score: entry.score,
                display_target,
                last_update_time: match &entry.record.result {
                    Some(ResultPayload::Boulder(result)) => result.last_update_time.clone(),
                    Some(ResultPayload::Route(_)) | None => None,
                },
            })
            .collect();

        Self {
            start_class,
            label: start_class.label().to_string(),
            display_target,
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventLeaderboard {
    pub event: EventId,
    pub name: String,
    pub scoring: ScoringKind,
    pub classes: Vec<ClassLeaderboard>,
}
