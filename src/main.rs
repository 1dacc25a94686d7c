use clap::Parser;
use tracing::error;

use snipelord::cli::{execute_check, execute_run, execute_wallet_show, Cli, Commands, WalletCommands};
use snipelord::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = dispatch(cli).await {
        error!(error = %err, "fatal error");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => execute_run(&cli.config, args).await,
        Commands::Check => execute_check(&cli.config).await,
        Commands::Wallet(wallet_args) => match wallet_args.command {
            WalletCommands::Show => execute_wallet_show(&cli.config),
        },
    }
}
