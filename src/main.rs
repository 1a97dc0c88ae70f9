//! HCP interaction logger backend binary.
//!
//! Wires the adapters together: loads configuration, connects the MySQL
//! pool, ensures the schema, picks the text generator, and serves the
//! interaction routes.

use std::process;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use sqlx::mysql::MySqlPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hcp_interaction_logger::adapters::ai::{GroqConfig, GroqTextGenerator, ScriptedTextGenerator};
use hcp_interaction_logger::adapters::http::{interaction_routes, InteractionHandlers};
use hcp_interaction_logger::adapters::mysql::MySqlInteractionStore;
use hcp_interaction_logger::application::handlers::{
    ChatTurnHandler, CommitInteractionHandler, LogFormHandler,
};
use hcp_interaction_logger::config::{AiProvider, AppConfig};
use hcp_interaction_logger::domain::interaction::{DialoguePolicy, FieldExtractor};
use hcp_interaction_logger::ports::TextGenerator;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Fatal: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(
        environment = ?config.server.environment,
        "Starting HCP interaction logger backend"
    );

    let pool = MySqlPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;

    let store = Arc::new(MySqlInteractionStore::new(pool));
    store.ensure_schema().await?;

    let generator: Arc<dyn TextGenerator> =
        match (config.ai.provider, config.ai.groq_api_key.as_deref()) {
            (AiProvider::Groq, Some(key)) => {
                info!(model = %config.ai.model, "Using Groq text generator");
                let groq_config = GroqConfig::new(key)
                    .with_base_url(config.ai.base_url.clone())
                    .with_timeout(config.ai.timeout());
                Arc::new(GroqTextGenerator::new(groq_config))
            }
            _ => {
                info!("Using scripted text generator");
                Arc::new(ScriptedTextGenerator::new())
            }
        };

    let committer = Arc::new(CommitInteractionHandler::new(store.clone()));
    let chat_handler = Arc::new(ChatTurnHandler::new(
        FieldExtractor::new(),
        DialoguePolicy::default(),
        generator,
        committer,
        config.ai.model.clone(),
    ));
    let form_handler = Arc::new(LogFormHandler::new(store.clone()));
    let handlers = InteractionHandlers::new(chat_handler, form_handler);

    // Credentialed CORS cannot use wildcards; origins come from config and
    // methods/headers mirror the preflight request.
    let origins = config
        .server
        .cors_origins_list()
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let app = interaction_routes(handlers).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(cors),
    );

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HCP interaction logger backend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, draining connections");
}
