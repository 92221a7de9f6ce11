use storage::models::{EventConfig, EventId};

use crate::error::WebError;

pub fn list_events() -> Vec<EventConfig> {
    EventId::all().iter().map(EventId::config).collect()
}

/// Resolves the `{event}` path segment to its configuration.
pub fn resolve_event(event: &str) -> Result<EventConfig, WebError> {
    event.parse::<EventId>().map(|id| id.config()).map_err(|e| {
        tracing::debug!(event, error = %e, "Unknown event requested");
        WebError::NotFound(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_events_contains_all_configured() {
        let events = list_events();
        assert_eq!(events.len(), EventId::all().len());
        assert!(events.iter().any(|e| e.id == EventId::Kkfn2025));
    }

    #[test]
    fn test_resolve_event() {
        assert_eq!(resolve_event("KKFN").unwrap().id, EventId::Kkfn2025);
        assert!(matches!(
            resolve_event("boulder-bash"),
            Err(WebError::NotFound(_))
        ));
    }
}
