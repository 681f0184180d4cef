use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use tracker_dashboard::session::Session;
use tracker_dashboard::{AppState, Config, load_session, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let restored = load_session(&config.session_path).await;
    if restored.is_some() {
        info!(path = %config.session_path.display(), "restored saved session");
    }
    let session = Session::new(Some(config.session_path.clone()), restored);

    let port = config.port;
    info!(backend = %config.api_base_url, "using tracking backend");
    let state = AppState::new(config, session)?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
