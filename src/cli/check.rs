//! Handler for the `check` command: loads configuration, the wallet, and builds every trade
//! coordinator collaborator (endpoint pool, executor, filter engine, storages, list caches)
//! without starting the subscription layer, surfacing any configuration-invalid failure (§7)
//! before a live run would.

use std::path::Path;

use tracing::info;

use crate::app::{Config, Coordinator, Wallet};
use crate::error::Result;

pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    println!("config: ok ({})", config_path.display());

    let wallet = Wallet::load(&config.wallet)?;
    println!("wallet: ok ({})", wallet.pubkey());

    Coordinator::new(config, wallet).await?;
    println!("collaborators: ok (endpoint pool, executor, filters, storages, list caches)");

    info!("check passed");
    Ok(())
}
