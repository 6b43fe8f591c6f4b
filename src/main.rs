use admin_panel::{build_app, config::Config, db, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("admin_panel=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting server on {}", config.bind_address());

    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connection established");

    db::migrations::run_migrations(&pool).await?;
    db::migrations::bootstrap_admin(&pool, &config.bootstrap).await?;

    let app = build_app(AppState::new(pool, &config.auth));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
