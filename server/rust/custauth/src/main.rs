use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use custauth_secretstore::{HttpSecretStore, SecretStoreConfig};
use custauth_server::adapter::handler::{self, AppState};
use custauth_server::domain::repository::CustomerRepository;
use custauth_server::infrastructure::config::Config;
use custauth_server::infrastructure::telemetry::init_tracing;
use custauth_server::infrastructure::{
    HttpCustomerRepository, SecretProvider, StaticSecretProvider, StoreSecretProvider,
    StubCustomerRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;

    // Telemetry
    init_tracing(&cfg.observability.log_level, &cfg.observability.log_format);

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting customer auth server"
    );

    // Signing secret source (Config::validate guarantees at least one)
    let fallback = cfg.secret.effective_fallback();
    if fallback.is_some() {
        tracing::warn!("local fallback signing secret is enabled");
    }
    let secrets: Arc<dyn SecretProvider> = match (&cfg.secret_store, fallback) {
        (Some(settings), fallback) => {
            info!(url = %settings.url, "using HTTP secret store");
            let store = HttpSecretStore::new(
                SecretStoreConfig::new(&settings.url)
                    .timeout(Duration::from_secs(settings.timeout_secs)),
            )?;
            let mut provider =
                StoreSecretProvider::new(Arc::new(store), cfg.secret.retry.to_retry_config());
            if let Some(fallback) = fallback {
                provider = provider.with_fallback(fallback);
            }
            Arc::new(provider)
        }
        (None, Some(fallback)) => {
            tracing::warn!("no secret store configured, signing with the local secret only");
            Arc::new(StaticSecretProvider::new(fallback))
        }
        (None, None) => anyhow::bail!("no signing secret source configured"),
    };

    // Customer repository (HTTP if configured, stub otherwise)
    let customers: Arc<dyn CustomerRepository> = if let Some(ref cs) = cfg.customer_service {
        info!(url = %cs.url, "using HTTP customer service");
        Arc::new(HttpCustomerRepository::new(cs)?)
    } else {
        tracing::warn!("no customer service configured, using stub customer repository");
        Arc::new(StubCustomerRepository::new())
    };

    let state = AppState::new(customers, secrets, cfg.secret.name.clone());
    let app = handler::router(state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
