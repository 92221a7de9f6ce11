use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::EventConfig;
use crate::models::results::ResultPayload;
use crate::models::start_class::StartClass;

/// Row of the `participants` table as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParticipantRow {
    pub participant_id: Uuid,
    pub event: String,
    pub name: String,
    pub start_class: String,
    pub secret: String,
    pub registered_at: chrono::NaiveDateTime,
    pub results: Option<sqlx::types::Json<serde_json::Value>>,
}

impl ParticipantRow {
    /// Exact comparison; an empty candidate never matches.
    pub fn secret_matches(&self, secret: &str) -> bool {
        !secret.is_empty() && self.secret == secret
    }
}

/// A competitor with a decoded result payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRecord {
    pub id: Uuid,
    pub name: String,
    /// `None` when the stored class is outside the known enumeration.
    pub start_class: Option<StartClass>,
    pub secret: String,
    pub registered_at: chrono::NaiveDateTime,
    pub result: Option<ResultPayload>,
}

impl ParticipantRecord {
    pub fn from_row(row: ParticipantRow, config: &EventConfig) -> Self {
        let start_class = match row.start_class.parse::<StartClass>() {
            Ok(class) if config.has_start_class(class) => Some(class),
            Ok(class) => {
                tracing::warn!(
                    participant_id = %row.participant_id,
                    start_class = %class,
                    event = %config.id,
                    "Start class not configured for event"
                );
                None
            }
            Err(_) => {
                tracing::warn!(
                    participant_id = %row.participant_id,
                    start_class = %row.start_class,
                    "Unrecognized start class"
                );
                None
            }
        };

        let result = ResultPayload::decode(
            row.participant_id,
            row.results.as_ref().map(|json| &json.0),
            config,
        );

        Self {
            id: row.participant_id,
            name: row.name,
            start_class,
            secret: row.secret,
            registered_at: row.registered_at,
            result: Some(result),
        }
    }
}

/// Generates a participant key: a v4 UUID without dashes.
pub fn generate_secret() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventId;
    use serde_json::json;

    fn row(start_class: &str, results: Option<serde_json::Value>) -> ParticipantRow {
        ParticipantRow {
            participant_id: Uuid::new_v4(),
            event: EventId::Kkfn2025.as_str().to_string(),
            name: "Alex Honnold".to_string(),
            start_class: start_class.to_string(),
            secret: generate_secret(),
            registered_at: chrono::NaiveDateTime::default(),
            results: results.map(sqlx::types::Json),
        }
    }

    #[test]
    fn test_from_row_decodes_payload() {
        let config = EventId::Kkfn2025.config();
        let record = ParticipantRecord::from_row(
            row("Weiblich", Some(json!({ "boulders": vec![true; 35], "lastUpdateTime": null }))),
            &config,
        );

        assert_eq!(record.start_class, Some(StartClass::Weiblich));
        assert_eq!(record.result.unwrap().as_boulder().unwrap().tops(), 35);
    }

    #[test]
    fn test_from_row_unknown_class_is_none() {
        let config = EventId::Kkfn2025.config();

        let unknown = ParticipantRecord::from_row(row("Jugend", None), &config);
        assert_eq!(unknown.start_class, None);

        let not_configured = ParticipantRecord::from_row(row("Weiblich_Ue40", None), &config);
        assert_eq!(not_configured.start_class, None);
    }

    #[test]
    fn test_generate_secret_shape() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 32);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret());
    }

    #[test]
    fn test_secret_matches() {
        let row = row("Maennlich", None);

        assert!(row.secret_matches(&row.secret));
        assert!(!row.secret_matches(""));
        assert!(!row.secret_matches("wrong"));

        let blank = ParticipantRow {
            secret: String::new(),
            ..row
        };
        assert!(!blank.secret_matches(""));
    }
}
