use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{EventId, StartClass};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompetitionStatistics {
    pub event: EventId,
    pub total_participants: usize,
    pub participants_by_class: Vec<ClassCount>,
    #[serde(flatten)]
    pub details: SchemeStatistics,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "scoring", rename_all = "lowercase")]
pub enum SchemeStatistics {
    Route(RouteStatistics),
    Boulder(BoulderStatistics),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassCount {
    pub start_class: StartClass,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RouteStatistics {
    pub routes: Vec<RouteSummary>,
    /// Completed routes per reached zone.
    pub zone_distribution: BTreeMap<i32, usize>,
    pub participants_with_all_routes: usize,
    pub top_performers: Vec<Performer>,
}

/// Per-route figures. Averages are taken over completions (zone > 0).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RouteSummary {
    pub route_number: usize,
    pub completions: usize,
    pub completions_by_class: Vec<ClassCount>,
    pub average_score: f64,
    pub average_attempts: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoulderStatistics {
    pub boulder_count: usize,
    pub tops_per_boulder: Vec<usize>,
    pub participants_with_all_tops: usize,
    pub top_performers: Vec<Performer>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Performer {
    pub participant_id: Uuid,
    pub name: String,
    pub start_class: Option<StartClass>,
    pub score: i64,
}
