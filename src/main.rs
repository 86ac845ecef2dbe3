use anyhow::{Context, Result};
use teachers_portal_i18n::config::Config;
use teachers_portal_i18n::i18n::{CatalogSet, Translator};
use teachers_portal_i18n::server::{self, AppState};
use teachers_portal_i18n::session::{self, SessionStore};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("teachers_portal_i18n=info".parse()?),
        )
        .init();

    info!("Starting Teachers Portal");

    // Load configuration from environment
    let config = Config::from_env()?;
    let registry = config.locale_registry()?;
    info!(
        "Locales: {} (default '{}')",
        registry
            .list_enabled()
            .iter()
            .map(|locale| locale.code())
            .collect::<Vec<_>>()
            .join(", "),
        registry.default_locale()
    );

    // Catalogs are loaded once; a corrupt file stops startup here
    let catalogs = CatalogSet::load(&registry, &config.translations_dir).with_context(|| {
        format!(
            "Failed to load catalogs from {}",
            config.translations_dir.display()
        )
    })?;
    let translator = Translator::new(registry, catalogs);

    let sessions = SessionStore::new(config.session_lifetime()?);
    session::spawn_purge_task(sessions.clone(), std::time::Duration::from_secs(300));

    let state = AppState::new(&config, translator, sessions);
    let app = server::router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}
