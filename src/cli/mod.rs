//! Command-line interface: `run`, `check`, and `wallet show` (§6).
//!
//! Service-management, statistics, and interactive-prompt subcommands present in the lineage
//! this crate is adapted from are out of scope (§1) and are not carried forward.

pub mod banner;
mod check;
mod run;
mod wallet;

pub use check::execute as execute_check;
pub use run::execute as execute_run;
pub use wallet::execute_show as execute_wallet_show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// An automated Solana liquidity-pool sniping and auto-sell trading bot.
#[derive(Parser, Debug)]
#[command(name = "snipelord")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the trade coordinator in the foreground until interrupted.
    Run(RunArgs),

    /// Validate configuration and collaborator construction without starting any subscription.
    Check,

    /// Wallet-related commands.
    Wallet(WalletArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Skip the startup banner.
    #[arg(long)]
    pub no_banner: bool,
}

/// Arguments for the `wallet` subcommand.
#[derive(Parser, Debug)]
pub struct WalletArgs {
    #[command(subcommand)]
    pub command: WalletCommands,
}

#[derive(Subcommand, Debug)]
pub enum WalletCommands {
    /// Print the configured wallet's public key.
    Show,
}
