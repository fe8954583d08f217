use axum::{Router, routing::get};
use axum_embed::ServeEmbed;
use clap::Parser;
use common::{AppState, Config};
use database::Database;
use rust_embed::RustEmbed;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;

#[derive(RustEmbed, Clone)]
#[folder = "public/"]
struct Assets;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize Logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Load Config from env/.env/CLI args
    dotenvy::dotenv().ok();
    let config = Config::parse();

    // 3. Initialize Database
    let db = Database::new(&config.database_url).await?;
    db.run_migrations().await?;

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // 4. Routing
    let serve_assets = ServeEmbed::<Assets>::new();

    let app = Router::<Arc<AppState>>::new()
        .route("/", get(handlers::dashboard::dashboard))
        .nest(
            "/transactions",
            transactions::handler::transactions_router(state.clone()),
        )
        .nest(
            "/categories",
            categories::handler::categories_router(state.clone()),
        )
        .nest(
            "/budgets",
            categories::handler::budgets_router(state.clone()),
        )
        .nest_service("/public", serve_assets)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // 5. Start Server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
