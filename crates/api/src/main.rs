use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::app::build_router;
use api::config::AppConfig;
use api::demo::{seed_store, DEMO_PERSON_ID};
use api::gql::build_schema;
use api::state::AppState;
use infra::sources::DataSources;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    let (sources, demo) = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(3))
                .idle_timeout(Some(std::time::Duration::from_secs(600))) // 10 minutes
                .max_lifetime(Some(std::time::Duration::from_secs(1800))) // 30 minutes
                .connect(&database.url)
                .await?;
            tracing::info!(
                "Connected to Postgres with max {} connections",
                database.max_connections
            );

            if config.skip_migrations {
                tracing::info!("Skipping database migrations (SKIP_MIGRATIONS=true)");
            } else {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("../../migrations").run(&pool).await?;
                tracing::info!("Database migrations completed successfully");
            }

            (DataSources::postgres(pool), false)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving in-memory demo data");
            (DataSources::memory(seed_store()), true)
        }
    };

    let port = config.port;
    let state = AppState::new(sources, config);

    if demo {
        let token = state
            .jwt_service()
            .create_token(DEMO_PERSON_ID, "member".into())?;
        tracing::info!(person_id = DEMO_PERSON_ID, %token, "Demo bearer token");
    }

    let schema = build_schema(state.clone());
    let app = build_router(state, schema);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
