use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use career_copilot::config::{Config, LogFormat};
use career_copilot::handlers::create_router;
use career_copilot::services::LlmClient;
use career_copilot::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "career_copilot=debug,tower_http=debug,axum::rejection=trace".into());

    match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }

    let config = Config::from_env()?;

    tracing::info!("Starting AI Career Copilot");
    tracing::info!("Model: {} (temperature {})", config.llm.model, config.llm.temperature);
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);

    let client = LlmClient::new(config.llm.clone())?;

    // Railway-style PORT wins over SERVER_PORT.
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server_port);
    let addr = format!("{}:{}", config.server_host, port);

    let app = create_router(AppState::new(config, Arc::new(client)));

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
