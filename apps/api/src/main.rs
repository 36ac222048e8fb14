mod assembly;
mod assistant;
mod catalog;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod store;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::{Assistant, ClaudeAssistant};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionController;
use crate::state::AppState;
use crate::store::PromptStore;

/// Build structured prompts from prompt-engineering frameworks.
#[derive(Parser)]
#[command(name = "promptkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Write every saved prompt to a JSON file
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Add the prompts from a JSON export file to the store
    Import {
        /// Source file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = create_pool(&config.database_url).await?;
    let store = PromptStore::new(db);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, store).await,
        // The store logs counts and skipped records
        Command::Export { path } => {
            store.export_to_file(&path).await?;
            Ok(())
        }
        Command::Import { path } => {
            store.import_from_file(&path).await?;
            Ok(())
        }
    }
}

async fn serve(config: Config, store: PromptStore) -> Result<()> {
    info!("Starting promptkit v{}", env!("CARGO_PKG_VERSION"));

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_file(path)
            .await
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin().context("Built-in catalog is invalid")?,
    };
    info!("Catalog loaded: {} frameworks", catalog.list().len());

    // AI features are enabled only with an API key
    let assistant: Option<Arc<dyn Assistant>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(ClaudeAssistant::new(llm)))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; AI features disabled");
            None
        }
    };

    let session = SessionController::new(
        Arc::new(catalog),
        store,
        assistant,
        config.default_language,
    );
    if let Err(e) = session.refresh_saved().await {
        warn!("Could not load saved prompts at startup: {e}");
    }

    let state = AppState {
        session: Arc::new(session),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
