//! Leaderboard computation over a snapshot of participant records.
//!
//! Pure and synchronous: callers fetch the snapshot, the engine only reads it.

use crate::models::{EventConfig, ParticipantRecord, ResultPayload, ScoringKind, StartClass};

/// Secondary ordering key. Smaller wins; `Never` sorts after every timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tiebreak {
    /// Epoch milliseconds of the last update.
    At(i64),
    Never,
}

impl From<Option<i64>> for Tiebreak {
    fn from(millis: Option<i64>) -> Self {
        millis.map_or(Self::Never, Self::At)
    }
}

pub trait ScoringStrategy: Send + Sync {
    fn score(&self, record: &ParticipantRecord) -> i64;

    /// Strategies without a tiebreak return a constant so ordering is score-only.
    fn tiebreak(&self, record: &ParticipantRecord) -> Tiebreak;
}

/// Counts tops; earlier last update wins ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoulderCompletionScoring;

impl ScoringStrategy for BoulderCompletionScoring {
    fn score(&self, record: &ParticipantRecord) -> i64 {
        match &record.result {
            Some(ResultPayload::Boulder(result)) => result.tops() as i64,
            Some(ResultPayload::Route(_)) | None => 0,
        }
    }

    fn tiebreak(&self, record: &ParticipantRecord) -> Tiebreak {
        match &record.result {
            Some(ResultPayload::Boulder(result)) => result.last_update_millis().into(),
            Some(ResultPayload::Route(_)) | None => Tiebreak::Never,
        }
    }
}

/// Sums `max(0, zone - attempts)` over all routes. No tiebreak.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteZoneScoring;

impl ScoringStrategy for RouteZoneScoring {
    fn score(&self, record: &ParticipantRecord) -> i64 {
        match &record.result {
            Some(ResultPayload::Route(result)) => result.total_points(),
            Some(ResultPayload::Boulder(_)) | None => 0,
        }
    }

    fn tiebreak(&self, _record: &ParticipantRecord) -> Tiebreak {
        Tiebreak::Never
    }
}

impl ScoringKind {
    pub fn strategy(&self) -> &'static dyn ScoringStrategy {
        match self {
            Self::Boulder => &BoulderCompletionScoring,
            Self::Route => &RouteZoneScoring,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry<'a> {
    pub record: &'a ParticipantRecord,
    pub score: i64,
    pub tiebreak: Tiebreak,
    pub rank: u32,
}

/// Ranks the records of one start class.
///
/// Sorted by score descending, then tiebreak ascending; the sort is stable so
/// full ties keep encounter order. An entry shares its predecessor's rank only
/// when both score and tiebreak are equal, otherwise its rank is its 1-based
/// position. Note this compares against the predecessor alone, so the entry
/// after a tied block still gets its own position (`[1, 1, 1, 4]`).
pub fn rank<'a>(
    records: &'a [ParticipantRecord],
    start_class: StartClass,
    strategy: &dyn ScoringStrategy,
) -> Vec<RankedEntry<'a>> {
    let mut scored: Vec<(&ParticipantRecord, i64, Tiebreak)> = records
        .iter()
        .filter(|record| record.start_class == Some(start_class))
        .map(|record| (record, strategy.score(record), strategy.tiebreak(record)))
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let mut entries: Vec<RankedEntry<'a>> = Vec::with_capacity(scored.len());
    for (position, (record, score, tiebreak)) in scored.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.score == score && prev.tiebreak == tiebreak => prev.rank,
            _ => position as u32 + 1,
        };
        entries.push(RankedEntry {
            record,
            score,
            tiebreak,
            rank,
        });
    }

    entries
}

/// Leaderboards for every start class of the event, in configuration order.
pub fn rank_all<'a>(
    records: &'a [ParticipantRecord],
    config: &EventConfig,
) -> Vec<(StartClass, Vec<RankedEntry<'a>>)> {
    let strategy = config.scoring.strategy();
    config
        .start_classes
        .iter()
        .map(|&start_class| (start_class, rank(records, start_class, strategy)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoulderResult, RouteResult};
    use uuid::Uuid;

    fn boulder(name: &str, class: StartClass, tops: usize, time: Option<&str>) -> ParticipantRecord {
        let mut completions = vec![true; tops];
        completions.resize(35, false);
        ParticipantRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_class: Some(class),
            secret: String::new(),
            registered_at: chrono::NaiveDateTime::default(),
            result: Some(ResultPayload::Boulder(BoulderResult {
                completions,
                last_update_time: time.map(str::to_string),
            })),
        }
    }

    fn route(name: &str, class: StartClass, results: &[(usize, i32, i32)]) -> ParticipantRecord {
        let mut payload = RouteResult::default();
        for &(number, zone, attempts) in results {
            payload.set_route(number, zone, attempts).unwrap();
        }
        ParticipantRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_class: Some(class),
            secret: String::new(),
            registered_at: chrono::NaiveDateTime::default(),
            result: Some(ResultPayload::Route(payload)),
        }
    }

    fn names(entries: &[RankedEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.record.name.clone()).collect()
    }

    fn ranks(entries: &[RankedEntry<'_>]) -> Vec<u32> {
        entries.iter().map(|e| e.rank).collect()
    }

    #[test]
    fn test_concrete_boulder_example() {
        let records = vec![
            boulder("A", StartClass::Weiblich, 20, Some("2025-05-17T10:00:00Z")),
            boulder("B", StartClass::Weiblich, 22, Some("2025-05-17T10:05:00Z")),
            boulder("C", StartClass::Weiblich, 20, Some("2025-05-17T09:50:00Z")),
        ];

        let ranked = rank(&records, StartClass::Weiblich, &BoulderCompletionScoring);

        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
        assert_eq!(ranks(&ranked), vec![1, 2, 3]);
        assert_eq!(
            ranked.iter().map(|e| e.score).collect::<Vec<_>>(),
            vec![22, 20, 20]
        );
    }

    #[test]
    fn test_equal_score_and_tiebreak_share_rank() {
        let time = Some("2025-05-17T10:00:00Z");
        let records = vec![
            boulder("A", StartClass::Maennlich, 30, time),
            boulder("B", StartClass::Maennlich, 35, time),
            boulder("C", StartClass::Maennlich, 35, time),
        ];

        let ranked = rank(&records, StartClass::Maennlich, &BoulderCompletionScoring);

        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
        assert_eq!(ranks(&ranked), vec![1, 1, 3]);
    }

    #[test]
    fn test_route_scores_fifty_fifty_thirty() {
        let records = vec![
            route("A", StartClass::Weiblich, &[(1, 50, 0)]),
            route("B", StartClass::Weiblich, &[(1, 30, 0)]),
            route("C", StartClass::Weiblich, &[(2, 50, 0)]),
        ];

        let ranked = rank(&records, StartClass::Weiblich, &RouteZoneScoring);

        assert_eq!(ranked.iter().map(|e| e.score).collect::<Vec<_>>(), vec![50, 50, 30]);
        assert_eq!(ranks(&ranked), vec![1, 1, 3]);
        assert_eq!(names(&ranked), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_three_way_tie_then_next_position() {
        let time = Some("2025-05-17T10:00:00Z");
        let records = vec![
            boulder("A", StartClass::Maennlich, 10, time),
            boulder("B", StartClass::Maennlich, 10, time),
            boulder("C", StartClass::Maennlich, 10, time),
            boulder("D", StartClass::Maennlich, 5, time),
        ];

        let ranked = rank(&records, StartClass::Maennlich, &BoulderCompletionScoring);

        assert_eq!(ranks(&ranked), vec![1, 1, 1, 4]);
    }

    #[test]
    fn test_earlier_update_wins_tie() {
        let records = vec![
            boulder("late", StartClass::Maennlich, 20, Some("2025-05-17T11:00:00Z")),
            boulder("early", StartClass::Maennlich, 20, Some("2025-05-17T09:00:00Z")),
        ];

        let ranked = rank(&records, StartClass::Maennlich, &BoulderCompletionScoring);

        assert_eq!(names(&ranked), vec!["early", "late"]);
        assert_eq!(ranks(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_missing_timestamp_ranks_last_among_ties() {
        let records = vec![
            boulder("none", StartClass::Weiblich, 12, None),
            boulder("second", StartClass::Weiblich, 12, Some("2025-05-17T10:30:00Z")),
            boulder("first", StartClass::Weiblich, 12, Some("2025-05-17T10:00:00Z")),
        ];

        let ranked = rank(&records, StartClass::Weiblich, &BoulderCompletionScoring);

        assert_eq!(names(&ranked), vec!["first", "second", "none"]);
        assert_eq!(ranked[2].tiebreak, Tiebreak::Never);
    }

    #[test]
    fn test_invalid_timestamp_treated_as_missing() {
        let records = vec![
            boulder("garbage", StartClass::Weiblich, 12, Some("10:00")),
            boulder("valid", StartClass::Weiblich, 12, Some("2025-05-17T10:00:00Z")),
            boulder("none", StartClass::Weiblich, 12, None),
        ];

        let ranked = rank(&records, StartClass::Weiblich, &BoulderCompletionScoring);

        assert_eq!(names(&ranked), vec!["valid", "garbage", "none"]);
        assert_eq!(ranks(&ranked), vec![1, 2, 2]);
    }

    #[test]
    fn test_category_isolation() {
        let records = vec![
            boulder("her", StartClass::Weiblich, 35, None),
            boulder("him", StartClass::Maennlich, 1, None),
        ];

        let ranked = rank(&records, StartClass::Maennlich, &BoulderCompletionScoring);

        assert_eq!(names(&ranked), vec!["him"]);
    }

    #[test]
    fn test_unknown_class_is_excluded_everywhere() {
        let mut stray = boulder("stray", StartClass::Maennlich, 35, None);
        stray.start_class = None;
        let records = vec![stray];

        for class in StartClass::all() {
            assert!(rank(&records, *class, &BoulderCompletionScoring).is_empty());
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], StartClass::Weiblich, &BoulderCompletionScoring).is_empty());
        assert!(rank(&[], StartClass::Weiblich, &RouteZoneScoring).is_empty());
    }

    #[test]
    fn test_missing_or_mismatched_payload_scores_zero() {
        let mut empty = boulder("empty", StartClass::Maennlich, 0, None);
        empty.result = None;
        let lead = route("lead", StartClass::Maennlich, &[(1, 50, 0)]);

        assert_eq!(BoulderCompletionScoring.score(&empty), 0);
        assert_eq!(BoulderCompletionScoring.tiebreak(&empty), Tiebreak::Never);
        assert_eq!(BoulderCompletionScoring.score(&lead), 0);
        assert_eq!(RouteZoneScoring.score(&empty), 0);
    }

    #[test]
    fn test_route_score_clamps_each_route() {
        let record = route(
            "clamped",
            StartClass::Maennlich,
            &[(1, 10, 15), (2, 40, 2), (3, 0, 3)],
        );

        assert_eq!(RouteZoneScoring.score(&record), 38);
    }

    #[test]
    fn test_route_ties_keep_encounter_order() {
        let records = vec![
            route("first", StartClass::MaennlichUe40, &[(1, 20, 0)]),
            route("second", StartClass::MaennlichUe40, &[(4, 20, 0)]),
            route("third", StartClass::MaennlichUe40, &[(8, 30, 10)]),
        ];

        let ranked = rank(&records, StartClass::MaennlichUe40, &RouteZoneScoring);

        assert_eq!(names(&ranked), vec!["first", "second", "third"]);
        assert_eq!(ranks(&ranked), vec![1, 1, 1]);
    }

    #[test]
    fn test_padded_record_scores_only_real_tops() {
        let mut result = BoulderResult {
            completions: vec![true; 30],
            last_update_time: None,
        };
        result.normalize(35);
        let record = ParticipantRecord {
            id: Uuid::new_v4(),
            name: "padded".to_string(),
            start_class: Some(StartClass::Maennlich),
            secret: String::new(),
            registered_at: chrono::NaiveDateTime::default(),
            result: Some(ResultPayload::Boulder(result)),
        };

        assert_eq!(BoulderCompletionScoring.score(&record), 30);
    }

    #[test]
    fn test_rank_all_follows_config_order() {
        let config = crate::models::EventId::Kkfn2025.config();
        let records = vec![
            boulder("her", StartClass::Weiblich, 3, None),
            boulder("him", StartClass::Maennlich, 4, None),
        ];

        let boards = rank_all(&records, &config);

        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].0, StartClass::Maennlich);
        assert_eq!(names(&boards[0].1), vec!["him"]);
        assert_eq!(boards[1].0, StartClass::Weiblich);
        assert_eq!(names(&boards[1].1), vec!["her"]);
    }

    #[test]
    fn test_strategy_dispatch() {
        let record = route("lead", StartClass::Maennlich, &[(1, 50, 1)]);
        assert_eq!(ScoringKind::Route.strategy().score(&record), 49);
        assert_eq!(ScoringKind::Boulder.strategy().score(&record), 0);
    }
}
