//! Lockroom Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod infrastructure;
mod prompts;
mod use_cases;

use app::App;
use infrastructure::integrity::{StateKey, StateSigner};
use infrastructure::ollama::OllamaClient;
use lockroom_domain::WorldTemplate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (Taskfile runs the engine from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lockroom_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lockroom Engine");

    // Load configuration
    let ollama_url = std::env::var("OLLAMA_URL")
        .or_else(|_| std::env::var("OLLAMA_BASE_URL"))
        .unwrap_or_else(|_| "http://localhost:11434".into());
    let ollama_model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "gpt-oss:20b".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .unwrap_or(3000);

    // Pick and validate the scenario
    let scenario = std::env::var("LOCKROOM_SCENARIO").unwrap_or_else(|_| "curator_study".into());
    let template = match scenario.as_str() {
        "curator_study" => WorldTemplate::curator_study(),
        "writers_study" => WorldTemplate::writers_study(),
        other => anyhow::bail!(
            "Unknown LOCKROOM_SCENARIO '{other}' (expected 'curator_study' or 'writers_study')"
        ),
    };
    template.validate()?;
    tracing::info!(scenario = %scenario, items = template.catalog.len(), "Scenario loaded");

    let signer = build_signer_from_env()?;

    let llm = Arc::new(OllamaClient::new(&ollama_url, &ollama_model));
    tracing::info!("LLM client configured for {} ({})", ollama_url, ollama_model);

    // Create application
    let app = Arc::new(App::new(Arc::new(template), signer, llm));

    // Build router
    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

/// Build the state signer from `LOCKROOM_STATE_KEYS`.
///
/// The variable holds comma-separated hex keys; the first signs new tags and
/// the rest are still accepted on verification, which is the rotation path.
/// Without it the server runs on an ephemeral key and warns.
fn build_signer_from_env() -> anyhow::Result<StateSigner> {
    let raw = std::env::var("LOCKROOM_STATE_KEYS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let Some(raw) = raw else {
        tracing::warn!(
            "LOCKROOM_STATE_KEYS is not set; using an ephemeral key. \
             States signed before a restart will stop verifying."
        );
        return Ok(StateSigner::new(StateKey::generate()));
    };

    let mut keys = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        keys.push(StateKey::from_hex(part)?);
    }
    if keys.is_empty() {
        anyhow::bail!("LOCKROOM_STATE_KEYS is set but contains no keys");
    }

    let active = keys.remove(0);
    tracing::info!(previous_keys = keys.len(), "State signing keys loaded");
    Ok(StateSigner::new(active).with_previous(keys))
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let Some(allowed_origins) = allowed_origins else {
        return None;
    };

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // JSON request bodies trigger CORS preflights.
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
