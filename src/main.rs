use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use medsimplify_core::{constants::DEFAULT_SESSION_IDLE_TIMEOUT, SessionRegistry, TermDictionary};
use medsimplify_provider::{ProviderConfig, TermAcquirer};

/// Main entry point for the MedSimplify server
///
/// Resolves configuration from the environment once, then serves the REST API with
/// OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `MEDSIMPLIFY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDSIMPLIFY_PROVIDER_URL`: base URL of the remote term provider
/// - `MEDSIMPLIFY_PROVIDER_API_KEY`: provider API key; without it terms come from the dictionary
/// - `MEDSIMPLIFY_PROVIDER_TIMEOUT_SECS`: per-request provider timeout (default: 10)
/// - `MEDSIMPLIFY_DICTIONARY`: JSON term list replacing the built-in dictionary
/// - `MEDSIMPLIFY_SESSION_IDLE_SECS`: seconds before an unused session expires (default: 1800)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the provider configuration or dictionary file is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medsimplify=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("MEDSIMPLIFY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let provider_config = ProviderConfig::from_env_values(
        std::env::var("MEDSIMPLIFY_PROVIDER_URL").ok(),
        std::env::var("MEDSIMPLIFY_PROVIDER_API_KEY").ok(),
        std::env::var("MEDSIMPLIFY_PROVIDER_TIMEOUT_SECS").ok(),
    )?;

    let dictionary = match std::env::var("MEDSIMPLIFY_DICTIONARY") {
        Ok(path) if !path.trim().is_empty() => {
            let dictionary = TermDictionary::from_json_file(Path::new(path.trim()))?;
            tracing::info!("Loaded {} terms from {}", dictionary.len(), path.trim());
            dictionary
        }
        _ => TermDictionary::builtin(),
    };

    let acquirer = TermAcquirer::new(&provider_config, dictionary)?;
    tracing::info!(
        "Term provider: {} ({})",
        provider_config.base_url(),
        if acquirer.is_live() { "live" } else { "offline" }
    );

    let idle_timeout = match std::env::var("MEDSIMPLIFY_SESSION_IDLE_SECS") {
        Ok(secs) if !secs.trim().is_empty() => Duration::from_secs(secs.trim().parse()?),
        _ => DEFAULT_SESSION_IDLE_TIMEOUT,
    };
    let sessions = SessionRegistry::with_idle_timeout(idle_timeout);

    let app = api_rest::router(AppState::with_sessions(acquirer, sessions));

    tracing::info!("++ Starting MedSimplify REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
