use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StorageError;
use crate::models::results::{ROUTE_COUNT, ZONES};
use crate::models::start_class::StartClass;

/// Which result payload an event records and how it is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoringKind {
    /// Tops counted over a fixed set of boulders, ties broken by last update.
    Boulder,
    /// Zone minus attempts summed over eight lead routes.
    Route,
}

/// Static configuration of one competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EventConfig {
    pub id: EventId,
    pub name: String,
    pub scoring: ScoringKind,
    pub start_classes: Vec<StartClass>,
    /// Number of boulders for boulder events, 0 otherwise.
    pub boulder_count: usize,
    pub targets: Vec<ClassTarget>,
}

/// Per-class display denominator and the tops needed to reach the finals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClassTarget {
    pub start_class: StartClass,
    pub display_target: u32,
    pub required_for_finals: u32,
}

impl EventConfig {
    pub fn kkfn_2025() -> Self {
        let boulder_count = 35;
        Self {
            id: EventId::Kkfn2025,
            name: "KKFN 2025".to_string(),
            scoring: ScoringKind::Boulder,
            start_classes: vec![StartClass::Maennlich, StartClass::Weiblich],
            boulder_count,
            targets: vec![
                ClassTarget {
                    start_class: StartClass::Maennlich,
                    display_target: boulder_count as u32,
                    required_for_finals: boulder_count as u32,
                },
                ClassTarget {
                    start_class: StartClass::Weiblich,
                    display_target: 28,
                    required_for_finals: 30,
                },
            ],
        }
    }

    pub fn rocklands_cup_2025() -> Self {
        let max_points = (ROUTE_COUNT as u32) * (ZONES[ZONES.len() - 1] as u32);
        let start_classes = StartClass::all().to_vec();
        let targets = start_classes
            .iter()
            .map(|&start_class| ClassTarget {
                start_class,
                display_target: max_points,
                required_for_finals: max_points,
            })
            .collect();

        Self {
            id: EventId::RocklandsCup2025,
            name: "Rocklands Cup 2025".to_string(),
            scoring: ScoringKind::Route,
            start_classes,
            boulder_count: 0,
            targets,
        }
    }

    pub fn has_start_class(&self, start_class: StartClass) -> bool {
        self.start_classes.contains(&start_class)
    }

    pub fn target_for(&self, start_class: StartClass) -> Option<&ClassTarget> {
        self.targets.iter().find(|t| t.start_class == start_class)
    }

    /// Display denominator for a class; falls back to the boulder count.
    pub fn display_target(&self, start_class: StartClass) -> u32 {
        self.target_for(start_class)
            .map(|t| t.display_target)
            .unwrap_or(self.boulder_count as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EventId {
    #[serde(rename = "rocklands-cup-2025")]
    RocklandsCup2025,
    #[serde(rename = "kkfn-2025")]
    Kkfn2025,
}

impl EventId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RocklandsCup2025 => "rocklands-cup-2025",
            Self::Kkfn2025 => "kkfn-2025",
        }
    }

    pub fn all() -> &'static [EventId] {
        &[Self::RocklandsCup2025, Self::Kkfn2025]
    }

    pub fn config(&self) -> EventConfig {
        match self {
            Self::RocklandsCup2025 => EventConfig::rocklands_cup_2025(),
            Self::Kkfn2025 => EventConfig::kkfn_2025(),
        }
    }

    fn parse_str(s: &str) -> Result<Self, StorageError> {
        let normalized = s.to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "rocklands-cup-2025" | "rocklandscup2025" | "rocklands" => Ok(Self::RocklandsCup2025),
            "kkfn-2025" | "kkfn2025" | "kkfn" => Ok(Self::Kkfn2025),
            _ => Err(StorageError::InvalidInput(format!(
                "Unknown event: '{}'. Available: {}",
                s,
                Self::all()
                    .iter()
                    .map(|e| e.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl TryFrom<&str> for EventId {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse_str(value)
    }
}

impl std::str::FromStr for EventId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
