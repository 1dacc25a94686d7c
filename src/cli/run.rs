//! Handler for the `run` command: loads configuration and the wallet, then drives the trade
//! coordinator until a shutdown signal arrives.

use std::path::Path;

use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use crate::app::{Config, Coordinator, Wallet};
use crate::cli::banner;
use crate::error::Result;

use super::RunArgs;

pub async fn execute(config_path: &Path, args: RunArgs) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    if !args.no_banner {
        banner::print_banner();
    }

    info!("snipelord starting");

    let wallet = Wallet::load(&config.wallet)?;
    let coordinator = Coordinator::new(config, wallet).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut run = tokio::spawn(coordinator.run_with_shutdown(shutdown_rx));

    tokio::select! {
        result = &mut run => {
            result??;
        }
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
            run.await??;
        }
    }

    info!("snipelord stopped");
    Ok(())
}
