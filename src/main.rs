use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::time::interval;

use kirana_session::{
    app::{
        api::{create_api_router, AppContext},
        state::AppState,
    },
    config::GlobalConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Kirana session service");

    let config = GlobalConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    match state.sessions.load_session().await {
        Some(session) => tracing::info!("Restored session with status {:?}", session.status),
        None => tracing::info!("No stored session, waiting for login"),
    }

    let recheck_state = state.clone();
    let recheck_every = Duration::from_secs(config.session.recheck_interval_secs.max(1));

    tokio::spawn(async move {
        let mut interval = interval(recheck_every);

        loop {
            interval.tick().await;
            if let Err(e) = recheck_state.sessions.recheck().await {
                tracing::error!("Session recheck failed: {}", e);
            }
        }
    });

    let context = AppContext {
        state,
        config: config.clone(),
    };

    let app: Router = create_api_router(context);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Kirana session service running on http://{}", addr);
    tracing::info!(
        "Trial: {} days, premium: {} days",
        config.subscription.trial_days,
        config.subscription.premium_days
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
