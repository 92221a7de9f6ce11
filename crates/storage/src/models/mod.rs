pub mod event;
pub mod participant;
pub mod results;
pub mod start_class;

pub use event::{ClassTarget, EventConfig, EventId, ScoringKind};
pub use participant::{ParticipantRecord, ParticipantRow, generate_secret};
pub use results::{BoulderResult, ROUTE_COUNT, ResultPayload, RouteAttempt, RouteResult, ZONES};
pub use start_class::StartClass;
