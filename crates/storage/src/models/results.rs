use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::event::{EventConfig, ScoringKind};

pub const ROUTE_COUNT: usize = 8;

/// Zones a route attempt can reach, in ascending order.
pub const ZONES: [i32; 6] = [0, 10, 20, 30, 40, 50];

/// Tops recorded for a boulder competition.
///
/// Decoding is lenient: only a literal `true` counts as a top, and a
/// `lastUpdateTime` that is not a string reads as missing. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoulderResult {
    #[serde(rename = "boulders", deserialize_with = "lenient_completions")]
    pub completions: Vec<bool>,
    #[serde(
        rename = "lastUpdateTime",
        default,
        deserialize_with = "lenient_timestamp"
    )]
    pub last_update_time: Option<String>,
}

fn lenient_completions<'de, D>(deserializer: D) -> std::result::Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .map(|entry| matches!(entry, serde_json::Value::Bool(true)))
        .collect())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(raw) => Ok(Some(raw)),
        _ => Ok(None),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BoulderResult {
    pub fn new(boulder_count: usize) -> Self {
        Self {
            completions: vec![false; boulder_count],
            last_update_time: None,
        }
    }

    pub fn tops(&self) -> usize {
        self.completions.iter().filter(|&&done| done).count()
    }

    /// Forces `completions` to `expected` entries. Short arrays are padded with
    /// `false`, long ones truncated. Returns whether a correction happened.
    pub fn normalize(&mut self, expected: usize) -> bool {
        let found = self.completions.len();
        if found == expected {
            return false;
        }

        if found > expected {
            let dropped = self.completions[expected..].iter().filter(|&&done| done).count();
            tracing::warn!(
                found,
                expected,
                dropped_tops = dropped,
                "Truncating boulder completions to configured boulder count"
            );
        } else {
            tracing::warn!(
                found,
                expected,
                "Padding boulder completions to configured boulder count"
            );
        }

        self.completions.resize(expected, false);
        true
    }

    /// `lastUpdateTime` as epoch milliseconds. Missing or unparsable values yield `None`.
    pub fn last_update_millis(&self) -> Option<i64> {
        let raw = self.last_update_time.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(time) => Some(time.timestamp_millis()),
            Err(e) => {
                tracing::debug!(value = raw, error = %e, "Ignoring unparsable lastUpdateTime");
                None
            }
        }
    }

    pub fn set_completion(&mut self, index: usize, completed: bool, now: DateTime<Utc>) -> Result<()> {
        let count = self.completions.len();
        let slot = self.completions.get_mut(index).ok_or_else(|| {
            StorageError::InvalidInput(format!(
                "Boulder index must be between 0 and {}",
                count.saturating_sub(1)
            ))
        })?;

        *slot = completed;
        self.last_update_time = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        Ok(())
    }
}

/// Best zone and attempts used on one route. Missing or null fields read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAttempt {
    #[serde(default, deserialize_with = "null_as_default")]
    pub zone: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attempts: i32,
}

impl RouteAttempt {
    /// `zone - attempts`, never below zero. Negative attempts count as zero.
    pub fn points(&self) -> i64 {
        let attempts = i64::from(self.attempts.max(0));
        (i64::from(self.zone) - attempts).max(0)
    }

    pub fn is_completed(&self) -> bool {
        self.zone > 0
    }
}

/// Results of a lead competition, one entry per route (1-based numbering).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RouteResultWire", into = "RouteResultWire")]
pub struct RouteResult {
    routes: [RouteAttempt; ROUTE_COUNT],
}

impl RouteResult {
    pub fn routes(&self) -> &[RouteAttempt; ROUTE_COUNT] {
        &self.routes
    }

    pub fn route(&self, route_number: usize) -> Option<&RouteAttempt> {
        route_number
            .checked_sub(1)
            .and_then(|index| self.routes.get(index))
    }

    pub fn total_points(&self) -> i64 {
        self.routes.iter().map(RouteAttempt::points).sum()
    }

    pub fn completed_routes(&self) -> usize {
        self.routes.iter().filter(|r| r.is_completed()).count()
    }

    pub fn set_route(&mut self, route_number: usize, zone: i32, attempts: i32) -> Result<()> {
        if !ZONES.contains(&zone) {
            return Err(StorageError::InvalidInput(format!(
                "Zone must be one of {:?}",
                ZONES
            )));
        }

        let slot = route_number
            .checked_sub(1)
            .and_then(|index| self.routes.get_mut(index))
            .ok_or_else(|| {
                StorageError::InvalidInput(format!(
                    "Route number must be between 1 and {}",
                    ROUTE_COUNT
                ))
            })?;

        *slot = RouteAttempt {
            zone,
            attempts: attempts.max(0),
        };
        Ok(())
    }
}

impl From<[RouteAttempt; ROUTE_COUNT]> for RouteResult {
    fn from(routes: [RouteAttempt; ROUTE_COUNT]) -> Self {
        Self { routes }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RouteResultWire {
    #[serde(rename = "Route1", default, deserialize_with = "null_as_default")]
    route1: RouteAttempt,
    #[serde(rename = "Route2", default, deserialize_with = "null_as_default")]
    route2: RouteAttempt,
    #[serde(rename = "Route3", default, deserialize_with = "null_as_default")]
    route3: RouteAttempt,
    #[serde(rename = "Route4", default, deserialize_with = "null_as_default")]
    route4: RouteAttempt,
    #[serde(rename = "Route5", default, deserialize_with = "null_as_default")]
    route5: RouteAttempt,
    #[serde(rename = "Route6", default, deserialize_with = "null_as_default")]
    route6: RouteAttempt,
    #[serde(rename = "Route7", default, deserialize_with = "null_as_default")]
    route7: RouteAttempt,
    #[serde(rename = "Route8", default, deserialize_with = "null_as_default")]
    route8: RouteAttempt,
}

impl From<RouteResultWire> for RouteResult {
    fn from(w: RouteResultWire) -> Self {
        Self {
            routes: [
                w.route1, w.route2, w.route3, w.route4, w.route5, w.route6, w.route7, w.route8,
            ],
        }
    }
}

impl From<RouteResult> for RouteResultWire {
    fn from(r: RouteResult) -> Self {
        let [route1, route2, route3, route4, route5, route6, route7, route8] = r.routes;
        Self {
            route1,
            route2,
            route3,
            route4,
            route5,
            route6,
            route7,
            route8,
        }
    }
}

/// An empty object counts as a route payload; any other object needs a `RouteN` key.
fn has_route_keys(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Object(map) => {
            map.is_empty() || map.keys().any(|key| key.starts_with("Route"))
        }
        _ => false,
    }
}

/// Result payload of a participant. Exactly one shape per competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Boulder(BoulderResult),
    Route(RouteResult),
}

impl ResultPayload {
    /// Zeroed payload written when a participant registers.
    pub fn empty(config: &EventConfig) -> Self {
        match config.scoring {
            ScoringKind::Boulder => Self::Boulder(BoulderResult::new(config.boulder_count)),
            ScoringKind::Route => Self::Route(RouteResult::default()),
        }
    }

    /// Strict decoding of a stored payload for the event's scoring scheme.
    ///
    /// Null or absent JSON yields the empty payload and boulder arrays are
    /// length-corrected. A value of the wrong shape is an error, so callers that
    /// write back never replace stored data they could not read.
    pub fn try_decode(value: Option<&serde_json::Value>, config: &EventConfig) -> Result<Self> {
        let value = match value {
            None | Some(serde_json::Value::Null) => return Ok(Self::empty(config)),
            Some(value) => value,
        };

        match config.scoring {
            ScoringKind::Boulder => {
                let mut result = BoulderResult::deserialize(value).map_err(|e| {
                    StorageError::InvalidInput(format!("Stored boulder result is malformed: {}", e))
                })?;
                result.normalize(config.boulder_count);
                Ok(Self::Boulder(result))
            }
            ScoringKind::Route => {
                if !has_route_keys(value) {
                    return Err(StorageError::InvalidInput(
                        "Stored route result has no RouteN entries".to_string(),
                    ));
                }
                let result = RouteResult::deserialize(value).map_err(|e| {
                    StorageError::InvalidInput(format!("Stored route result is malformed: {}", e))
                })?;
                Ok(Self::Route(result))
            }
        }
    }

    /// Decodes a stored payload for display and ranking. Never fails:
    /// unreadable payloads are logged and shown as empty.
    pub fn decode(
        participant_id: Uuid,
        value: Option<&serde_json::Value>,
        config: &EventConfig,
    ) -> Self {
        Self::try_decode(value, config).unwrap_or_else(|e| {
            tracing::warn!(
                %participant_id,
                error = %e,
                "Unreadable result payload, showing it as empty"
            );
            Self::empty(config)
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn as_boulder(&self) -> Option<&BoulderResult> {
        match self {
            Self::Boulder(result) => Some(result),
            Self::Route(_) => None,
        }
    }

    pub fn as_route(&self) -> Option<&RouteResult> {
        match self {
            Self::Route(result) => Some(result),
            Self::Boulder(_) => None,
        }
    }
}
