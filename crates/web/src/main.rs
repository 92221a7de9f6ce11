use std::time::Duration;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::events::handlers::list_events,
        features::events::handlers::get_event,
        features::leaderboard::handlers::get_event_leaderboard,
        features::leaderboard::handlers::get_class_leaderboard,
        features::participants::handlers::list_participants,
        features::participants::handlers::search_participants,
        features::participants::handlers::get_participant,
        features::participants::handlers::register_participant,
        features::participants::handlers::create_participant,
        features::participants::handlers::verify_participant,
        features::participants::handlers::update_boulder,
        features::participants::handlers::update_route,
        features::participants::handlers::delete_participant,
        features::statistics::handlers::get_statistics,
    ),
    components(
        schemas(
            storage::models::EventConfig,
            storage::models::ClassTarget,
            storage::models::EventId,
            storage::models::ScoringKind,
            storage::models::StartClass,
            storage::dto::participant::ParticipantResponse,
            storage::dto::participant::ParticipantWithSecret,
            storage::dto::participant::CreateParticipantRequest,
            storage::dto::participant::RegisterParticipantRequest,
            storage::dto::participant::VerifyParticipantRequest,
            storage::dto::participant::VerifyParticipantResponse,
            storage::dto::participant::UpdateBoulderRequest,
            storage::dto::participant::UpdateRouteRequest,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::ClassLeaderboard,
            storage::dto::leaderboard::EventLeaderboard,
            storage::dto::statistics::CompetitionStatistics,
            storage::dto::statistics::SchemeStatistics,
            storage::dto::statistics::ClassCount,
            storage::dto::statistics::RouteStatistics,
            storage::dto::statistics::RouteSummary,
            storage::dto::statistics::BoulderStatistics,
            storage::dto::statistics::Performer,
        )
    ),
    tags(
        (name = "events", description = "Configured competitions"),
        (name = "leaderboard", description = "Public live leaderboards"),
        (name = "participants", description = "Registration and result entry"),
        (name = "statistics", description = "Organizer statistics"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting climbing competition API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = config.organizer_keys();
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, organizer endpoints will reject every request");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let app = Router::new()
        .nest("/api/events", features::routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(db);

    let bind_address = config.bind_address();
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
