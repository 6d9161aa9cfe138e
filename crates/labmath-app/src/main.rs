use std::sync::Arc;

use labmath_app::app::api::routes;
use labmath_app::auth_handler::AuthProviderHandler;
use labmath_app::config::ConfigHandler;
use labmath_app::db_handler::DbProviderHandler;
use labmath_app::mirror_handler::MirrorClientHandler;
use labmath_core::config::load_config;
use labmath_db::db::connection::{create_pool, run_migrations};
use labmath_service::auth::{Authenticator, SessionStore, StaticCredentialAuthenticator};
use labmath_service::mirror::MirrorClient;
use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting LabMath admin server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    run_migrations(&config.database.url).await?;

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    let authenticator: Arc<dyn Authenticator> =
        Arc::new(StaticCredentialAuthenticator::from_config(&config.auth)?);
    let mirror = Arc::new(MirrorClient::new(config.remote.clone())?);

    tracing::info!(
        base_url = %config.remote.base_url,
        api_key_configured = mirror.api_key_configured(),
        "Public site mirror configured"
    );
    if !mirror.api_key_configured() {
        tracing::warn!("No remote API key configured, records will not be mirrored");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(DbProviderHandler { provider: pool })
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .hoop(MirrorClientHandler { client: mirror })
        .hoop(AuthProviderHandler {
            authenticator,
            sessions: Arc::new(SessionStore::new(config.auth.session_ttl())),
        })
        .push(routes());

    tracing::info!(origin = %config.server.origin(), "Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
