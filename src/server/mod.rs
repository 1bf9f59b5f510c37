use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::data::repository::SnapshotRepository;
use crate::data::tables::{DirectorySource, TableSource};
use crate::ingest::{run_cycle, IngestError, ReloadOutcome};

pub mod api;
pub mod routes;

/// Shared handler state: the repository plus where reloads read from.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<SnapshotRepository>,
    pub source: Arc<dyn TableSource>,
}

impl AppState {
    pub fn new(repo: Arc<SnapshotRepository>, source: Arc<dyn TableSource>) -> Self {
        Self { repo, source }
    }

    /// Run one ingestion cycle on the blocking pool.
    pub async fn reload(&self) -> Result<Result<ReloadOutcome, IngestError>, JoinError> {
        let repo = Arc::clone(&self.repo);
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || run_cycle(&repo, source.as_ref())).await
    }
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let source: Arc<dyn TableSource> = Arc::new(DirectorySource::new(config.data_dir.clone()));
    let state = AppState::new(Arc::new(SnapshotRepository::new()), source);

    match state.reload().await {
        Ok(Ok(_)) => {}
        Ok(Err(_)) => warn!("initial ingestion failed; serving an empty snapshot until the next reload"),
        Err(err) => error!(error = %err, "initial ingestion task failed"),
    }

    if let Some(period) = config.reload_interval {
        spawn_reload_task(state.clone(), period);
    }

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "opdex server listening");
    axum::serve(listener, routes::router(state)).await
}

/// Periodic reload. The first tick fires immediately and is skipped since
/// startup already ran a cycle.
pub fn spawn_reload_task(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match state.reload().await {
                Ok(Ok(outcome)) => info!(generation = outcome.generation, "scheduled reload done"),
                // run_cycle already logged the failure
                Ok(Err(_)) => {}
                Err(err) => error!(error = %err, "scheduled reload task failed"),
            }
        }
    })
}
