use std::collections::BTreeMap;

use crate::dto::statistics::{
    BoulderStatistics, ClassCount, CompetitionStatistics, Performer, RouteStatistics,
    RouteSummary, SchemeStatistics,
};
use crate::models::{
    EventConfig, ParticipantRecord, ROUTE_COUNT, ResultPayload, ScoringKind, StartClass,
};
use crate::services::ranking::{BoulderCompletionScoring, RouteZoneScoring, ScoringStrategy};

const TOP_PERFORMERS: usize = 5;

/// Aggregates over one event snapshot. Records outside the configured classes
/// count toward the total only.
pub fn compute(records: &[ParticipantRecord], config: &EventConfig) -> CompetitionStatistics {
    let classified: Vec<&ParticipantRecord> = records
        .iter()
        .filter(|r| r.start_class.is_some_and(|class| config.has_start_class(class)))
        .collect();

    let participants_by_class = config
        .start_classes
        .iter()
        .map(|&start_class| ClassCount {
            start_class,
            label: start_class.label().to_string(),
            count: records
                .iter()
                .filter(|r| r.start_class == Some(start_class))
                .count(),
        })
        .collect();

    let details = match config.scoring {
        ScoringKind::Route => SchemeStatistics::Route(route_statistics(&classified, config)),
        ScoringKind::Boulder => SchemeStatistics::Boulder(boulder_statistics(&classified, config)),
    };

    CompetitionStatistics {
        event: config.id,
        total_participants: records.len(),
        participants_by_class,
        details,
    }
}

fn route_statistics(records: &[&ParticipantRecord], config: &EventConfig) -> RouteStatistics {
    let mut completions = [0usize; ROUTE_COUNT];
    let mut completions_by_class: Vec<BTreeMap<StartClass, usize>> = (0..ROUTE_COUNT)
        .map(|_| {
            config
                .start_classes
                .iter()
                .map(|&class| (class, 0))
                .collect()
        })
        .collect();
    let mut score_sums = [0i64; ROUTE_COUNT];
    let mut attempt_sums = [0i64; ROUTE_COUNT];
    let mut zone_distribution: BTreeMap<i32, usize> = BTreeMap::new();
    let mut participants_with_all_routes = 0;

    for record in records {
        let Some(ResultPayload::Route(result)) = &record.result else {
            continue;
        };

        for (index, route) in result.routes().iter().enumerate() {
            if !route.is_completed() {
                continue;
            }
            completions[index] += 1;
            if let Some(class) = record.start_class
                && let Some(count) = completions_by_class[index].get_mut(&class)
            {
                *count += 1;
            }
            score_sums[index] += route.points();
            attempt_sums[index] += i64::from(route.attempts.max(0));
            *zone_distribution.entry(route.zone).or_insert(0) += 1;
        }

        if result.completed_routes() == ROUTE_COUNT {
            participants_with_all_routes += 1;
        }
    }

    let routes = (0..ROUTE_COUNT)
        .map(|index| {
            let done = completions[index];
            RouteSummary {
                route_number: index + 1,
                completions: done,
                completions_by_class: completions_by_class[index]
                    .iter()
                    .map(|(&start_class, &count)| ClassCount {
                        start_class,
                        label: start_class.label().to_string(),
                        count,
                    })
                    .collect(),
                average_score: average(score_sums[index], done),
                average_attempts: average(attempt_sums[index], done),
            }
        })
        .collect();

    RouteStatistics {
        routes,
        zone_distribution,
        participants_with_all_routes,
        top_performers: top_performers(records, &RouteZoneScoring),
    }
}

fn boulder_statistics(records: &[&ParticipantRecord], config: &EventConfig) -> BoulderStatistics {
    let mut tops_per_boulder = vec![0usize; config.boulder_count];
    let mut participants_with_all_tops = 0;

    for record in records {
        let Some(ResultPayload::Boulder(result)) = &record.result else {
            continue;
        };

        for (slot, &done) in tops_per_boulder.iter_mut().zip(&result.completions) {
            if done {
                *slot += 1;
            }
        }

        if config.boulder_count > 0 && result.tops() == config.boulder_count {
            participants_with_all_tops += 1;
        }
    }

    BoulderStatistics {
        boulder_count: config.boulder_count,
        tops_per_boulder,
        participants_with_all_tops,
        top_performers: top_performers(records, &BoulderCompletionScoring),
    }
}

/// Best scores across all classes. Equal scores keep encounter order.
fn top_performers(records: &[&ParticipantRecord], strategy: &dyn ScoringStrategy) -> Vec<Performer> {
    let mut performers: Vec<Performer> = records
        .iter()
        .map(|record| Performer {
            participant_id: record.id,
            name: record.name.clone(),
            start_class: record.start_class,
            score: strategy.score(record),
        })
        .collect();

    performers.sort_by(|a, b| b.score.cmp(&a.score));
    performers.truncate(TOP_PERFORMERS);
    performers
}

fn average(sum: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
