use std::sync::Arc;

use planner::config::AppConfig;
use planner::db::{init_pool, run_migrations};
use planner::error::AppError;
use planner::routes::create_router;
use planner::services::{
    mailer::{spawn_invite_worker, InviteOutbox, LogMailer},
    store::SqliteTripStore,
};
use planner::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let db = init_pool(&config.database_url).await?;

    if let Err(err) = run_migrations(&db).await {
        error!("migration failed: {err:?}");
        return Err(err);
    }

    let store = Arc::new(SqliteTripStore::new(db.clone()));
    let (outbox, invites) = InviteOutbox::channel(config.web_base_url.clone());
    let mailer = Arc::new(LogMailer::new(config.invite_template.clone()));
    spawn_invite_worker(invites, mailer);

    let state = AppState::new(config.clone(), store, outbox);

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,planner=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
