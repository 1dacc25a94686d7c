//! Wallet loading: a 64-byte JSON keyfile, or a base58-encoded secret from `WALLET_SECRET`.

use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;

use crate::app::config::WalletConfig;
use crate::error::{Error, Result};

/// Thin facade over the loaded signing keypair.
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    /// Loads the wallet per [`WalletConfig`]: a keyfile if configured, otherwise the
    /// `WALLET_SECRET` environment variable. Keyfile takes precedence when both are present.
    pub fn load(config: &WalletConfig) -> Result<Self> {
        let keypair = if let Some(path) = &config.keyfile {
            Self::load_keyfile(path)?
        } else if let Some(secret) = &config.secret_env {
            Self::load_base58(secret)?
        } else {
            return Err(Error::Wallet("no wallet keyfile or WALLET_SECRET configured".to_string()));
        };

        Ok(Self { keypair })
    }

    fn load_keyfile(path: &std::path::Path) -> Result<Keypair> {
        let contents = std::fs::read_to_string(path)?;
        let bytes: Vec<u8> = serde_json::from_str(&contents)?;
        Keypair::from_bytes(&bytes).map_err(|e| Error::Wallet(format!("invalid wallet keyfile: {e}")))
    }

    fn load_base58(secret: &str) -> Result<Keypair> {
        let bytes = bs58::decode(secret)
            .into_vec()
            .map_err(|e| Error::Wallet(format!("invalid base58 wallet secret: {e}")))?;
        Keypair::from_bytes(&bytes).map_err(|e| Error::Wallet(format!("invalid wallet secret: {e}")))
    }

    #[must_use]
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    #[must_use]
    pub fn pubkey(&self) -> solana_sdk::pubkey::Pubkey {
        self.keypair.pubkey()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_base58_secret() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();

        let config = WalletConfig {
            keyfile: None,
            secret_env: Some(encoded),
        };
        let wallet = Wallet::load(&config).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
    }

    #[test]
    fn loads_from_keyfile() {
        let keypair = Keypair::new();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()).unwrap();

        let config = WalletConfig {
            keyfile: Some(file.path().to_path_buf()),
            secret_env: None,
        };
        let wallet = Wallet::load(&config).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
    }

    #[test]
    fn errors_with_no_source_configured() {
        let config = WalletConfig {
            keyfile: None,
            secret_env: None,
        };
        assert!(Wallet::load(&config).is_err());
    }
}
