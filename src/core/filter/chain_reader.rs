//! Narrow on-chain read interface the filter engine depends on. Kept separate from
//! [`crate::core::storage`] because filters read live mint/vault state, not cached descriptors.

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use crate::error::Result;

/// Mint authority state relevant to the renounced/freezable filters.
#[derive(Debug, Clone, Default)]
pub struct MintAuthorities {
    pub mint_authority: Option<Pubkey>,
    pub freeze_authority: Option<Pubkey>,
}

/// The subset of a metadata account this spec's pump.fun-origin filter inspects.
#[derive(Debug, Clone)]
pub struct MintMetadata {
    pub uri: String,
    pub update_authority: Pubkey,
}

/// Live on-chain reads the filter engine needs. A thin seam so filters can be unit-tested
/// against an in-memory fake instead of a real RPC endpoint.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn mint_supply(&self, mint: &Pubkey) -> Result<u64>;
    async fn mint_authorities(&self, mint: &Pubkey) -> Result<MintAuthorities>;
    async fn token_account_balance(&self, account: &Pubkey) -> Result<u64>;
    async fn metadata_for_mint(&self, mint: &Pubkey) -> Result<Option<MintMetadata>>;
}

fn coption_to_option(value: solana_sdk::program_option::COption<Pubkey>) -> Option<Pubkey> {
    match value {
        solana_sdk::program_option::COption::Some(pubkey) => Some(pubkey),
        solana_sdk::program_option::COption::None => None,
    }
}

/// Production [`ChainReader`] backed by the Solana RPC client.
pub struct RpcChainReader {
    client: solana_client::nonblocking::rpc_client::RpcClient,
}

impl RpcChainReader {
    #[must_use]
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: solana_client::nonblocking::rpc_client::RpcClient::new(rpc_url.into()),
        }
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn mint_supply(&self, mint: &Pubkey) -> Result<u64> {
        let supply = self
            .client
            .get_token_supply(mint)
            .await
            .map_err(crate::error::StorageError::Rpc)?;
        supply
            .amount
            .parse()
            .map_err(|_| crate::error::StorageError::MintNotFound(mint.to_string()).into())
    }

    async fn mint_authorities(&self, mint: &Pubkey) -> Result<MintAuthorities> {
        use solana_sdk::program_pack::Pack;
        let account = self
            .client
            .get_account(mint)
            .await
            .map_err(crate::error::StorageError::Rpc)?;
        let mint_state = spl_token::state::Mint::unpack(&account.data)
            .map_err(|e| crate::error::StorageError::Decode(e.to_string()))?;
        Ok(MintAuthorities {
            mint_authority: coption_to_option(mint_state.mint_authority),
            freeze_authority: coption_to_option(mint_state.freeze_authority),
        })
    }

    async fn token_account_balance(&self, account: &Pubkey) -> Result<u64> {
        let balance = self
            .client
            .get_token_account_balance(account)
            .await
            .map_err(crate::error::StorageError::Rpc)?;
        balance
            .amount
            .parse()
            .map_err(|_| crate::error::StorageError::MintNotFound(account.to_string()).into())
    }

    async fn metadata_for_mint(&self, _mint: &Pubkey) -> Result<Option<MintMetadata>> {
        // Metadata-account derivation and deserialization live outside this spec's scope (§1:
        // on-chain account binary layout is assumed decoded by an external codec); a production
        // build would derive the metadata PDA and decode it with the metadata program's IDL.
        Ok(None)
    }
}
