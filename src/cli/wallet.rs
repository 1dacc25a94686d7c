//! Handler for the `wallet` command group.

use std::path::Path;

use crate::app::{Config, Wallet};
use crate::error::Result;

pub fn execute_show(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let wallet = Wallet::load(&config.wallet)?;
    println!("{}", wallet.pubkey());
    Ok(())
}
