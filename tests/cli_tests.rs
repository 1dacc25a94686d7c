//! End-to-end CLI tests: exercise the compiled binary against on-disk fixture configs.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::Command;
use predicates::prelude::*;
use solana_sdk::signature::Keypair;

const VALID_CONFIG: &str = r#"
[endpoints]
rpc_urls = "https://api.mainnet-beta.solana.com"
ws_urls = "wss://api.mainnet-beta.solana.com"
commitment = "confirmed"

[wallet]
keyfile = "WALLET_PLACEHOLDER"

[trade]
quote_mint = "So11111111111111111111111111111111111111112"
quote_amount = "0.05"
take_profit_pct = "50"
stop_loss_pct = "20"
buy_slippage_pct = "5"
sell_slippage_pct = "10"

[programs]
amm_program_id = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8"
openbook_program_id = "srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX"
"#;

const INVALID_CONFIG: &str = r#"
[endpoints]
rpc_urls = "https://a.example|https://b.example"
ws_urls = "wss://a.example"

[wallet]
keyfile = "wallet.json"

[trade]
quote_mint = "So11111111111111111111111111111111111111112"
quote_amount = "0.05"
take_profit_pct = "50"
stop_loss_pct = "20"
buy_slippage_pct = "5"
sell_slippage_pct = "10"

[programs]
amm_program_id = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8"
openbook_program_id = "srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX"
"#;

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn write(name: &str, contents: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("snipelord-{name}-{nanos}"));
        fs::write(&path, contents).expect("write temp fixture");
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn valid_config_with_wallet() -> (TempFile, TempFile) {
    let keypair = Keypair::new();
    let wallet = TempFile::write("wallet.json", &serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap());
    let contents = VALID_CONFIG.replace("WALLET_PLACEHOLDER", &wallet.path.display().to_string());
    let config = TempFile::write("config.toml", &contents);
    (config, wallet)
}

#[test]
fn check_succeeds_on_a_well_formed_config() {
    let (config, _wallet) = valid_config_with_wallet();

    Command::cargo_bin("snipelord")
        .unwrap()
        .args(["--config"])
        .arg(&config.path)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("config: ok"))
        .stdout(predicate::str::contains("collaborators: ok"));
}

#[test]
fn check_fails_on_mismatched_endpoint_counts() {
    let config = TempFile::write("config.toml", INVALID_CONFIG);

    Command::cargo_bin("snipelord")
        .unwrap()
        .args(["--config"])
        .arg(&config.path)
        .arg("check")
        .assert()
        .failure();
}

#[test]
fn check_fails_with_a_clear_message_on_a_missing_config_file() {
    let mut missing = std::env::temp_dir();
    missing.push("snipelord-does-not-exist.toml");
    let _ = fs::remove_file(&missing);

    Command::cargo_bin("snipelord")
        .unwrap()
        .args(["--config"])
        .arg(&missing)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn wallet_show_prints_the_configured_pubkey() {
    let (config, _wallet) = valid_config_with_wallet();

    Command::cargo_bin("snipelord")
        .unwrap()
        .args(["--config"])
        .arg(&config.path)
        .args(["wallet", "show"])
        .assert()
        .success();
}
