use std::sync::Arc;
use tidemark::engine::cluster::local::LocalCluster;
use tidemark::engine::lifecycle::orchestrator::{LifecycleOrchestrator, OrchestratorSettings};
use tidemark::logging;
use tidemark::shared::clock::{Clock, SystemClock};
use tidemark::shared::config::CONFIG;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init()?;
    info!("Starting tidemark");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cluster = Arc::new(LocalCluster::new(
        Arc::clone(&clock),
        CONFIG.lifecycle.defaults(),
    ));
    let orchestrator = Arc::new(LifecycleOrchestrator::new(
        cluster,
        clock,
        OrchestratorSettings {
            poll_interval: CONFIG.lifecycle.poll_interval_duration(),
        },
    ));

    let loop_handle = tokio::spawn(Arc::clone(&orchestrator).run());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    loop_handle.abort();

    Ok(())
}
