use std::time::Instant;

use ifcib_common::config::Config;
use ifcib_core::discovery::DiscoveryService;
use ifcib_core::monitor::LinkWatch;
use ifcib_core::store::JsonCibStore;
use ifcib_core::system::SystemEnvironment;
use tracing::{info, warn};

use crate::commands::discover;

pub async fn watch(cfg: &Config) -> anyhow::Result<()> {
    let service = DiscoveryService::new(SystemEnvironment, JsonCibStore::new(&cfg.output_dir))
        .with_debounce(cfg.watch_debounce);

    let mut link_watch: LinkWatch = match LinkWatch::spawn() {
        Ok(link_watch) => link_watch,
        Err(e) => {
            warn!("{e}; falling back to a single discovery pass");
            let start_time = Instant::now();
            let report = service.run_once();
            discover::print_report(&report, start_time.elapsed(), cfg);
            return Ok(());
        }
    };

    info!("watching for link changes, press Ctrl-C to stop");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let passes: usize = service.watch(&mut link_watch.events, shutdown).await;
    link_watch.stop();

    info!(passes, "stopped watching");
    Ok(())
}
