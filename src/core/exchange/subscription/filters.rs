//! Program-account-change filter construction for each subscription kind (§4.5).

use solana_account_decoder::UiAccountEncoding;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::pubkey::Pubkey;

use crate::core::domain::{MarketDescriptor, MarketId, MintId, PoolDescriptor, PoolId, PoolKind};

/// The literal 8-byte pool-status prefix a classical AMM pool must carry to be considered open.
pub const POOL_STATUS_PREFIX: [u8; 8] = [6, 0, 0, 0, 0, 0, 0, 0];

/// SPL token-account size in bytes.
pub const TOKEN_ACCOUNT_SIZE: u64 = 165;

/// Byte offset of the `owner` field within an SPL token account.
pub const TOKEN_ACCOUNT_OWNER_OFFSET: usize = 32;

/// Byte offset of `quoteMint` within the classical-AMM pool-state layout.
const POOL_QUOTE_MINT_OFFSET: usize = 400;

/// Byte offset of `marketProgramId` within the classical-AMM pool-state layout.
const POOL_MARKET_PROGRAM_ID_OFFSET: usize = 560;

/// Byte offset of the pool-status prefix within the classical-AMM pool-state layout.
const POOL_STATUS_OFFSET: usize = 0;

/// Byte offset of `quoteMint` within the order-book market-state layout.
const MARKET_QUOTE_MINT_OFFSET: usize = 40;

/// Addresses and filter parameters needed to establish the four subscription kinds.
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    pub amm_program_id: Pubkey,
    pub openbook_program_id: Pubkey,
    pub quote_mint: Pubkey,
    pub pool_state_size: u64,
    /// `Some` enables the optional market subscription (§4.5.2).
    pub market_state_size: Option<u64>,
    /// `Some` (with `cpmm_state_size`) enables the optional constant-product-pool subscription,
    /// devnet only (§4.5.3).
    pub cpmm_program_id: Option<Pubkey>,
    pub cpmm_state_size: Option<u64>,
    /// `Some` enables the optional wallet subscription (§4.5.4).
    pub wallet_public_key: Option<Pubkey>,
    pub cache_markets: bool,
}

fn account_info_config() -> RpcAccountInfoConfig {
    RpcAccountInfoConfig {
        encoding: Some(UiAccountEncoding::Base64),
        ..Default::default()
    }
}

/// Filters for the classical-AMM pool subscription: `dataSize`, `quoteMint` offset,
/// `marketProgramId` offset, and the open-pool status-byte prefix.
pub fn pool_subscription_config(config: &SubscriptionConfig) -> RpcProgramAccountsConfig {
    RpcProgramAccountsConfig {
        filters: Some(vec![
            RpcFilterType::DataSize(config.pool_state_size),
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                POOL_QUOTE_MINT_OFFSET,
                config.quote_mint.to_bytes().to_vec(),
            )),
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                POOL_MARKET_PROGRAM_ID_OFFSET,
                config.openbook_program_id.to_bytes().to_vec(),
            )),
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                POOL_STATUS_OFFSET,
                POOL_STATUS_PREFIX.to_vec(),
            )),
        ]),
        account_config: account_info_config(),
        ..Default::default()
    }
}

/// Filters for the optional order-book market subscription: `dataSize` and `quoteMint` offset.
pub fn market_subscription_config(config: &SubscriptionConfig, state_size: u64) -> RpcProgramAccountsConfig {
    RpcProgramAccountsConfig {
        filters: Some(vec![
            RpcFilterType::DataSize(state_size),
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                MARKET_QUOTE_MINT_OFFSET,
                config.quote_mint.to_bytes().to_vec(),
            )),
        ]),
        account_config: account_info_config(),
        ..Default::default()
    }
}

/// Filters for the optional constant-product-pool subscription: state-record size only.
pub fn cpmm_subscription_config(state_size: u64) -> RpcProgramAccountsConfig {
    RpcProgramAccountsConfig {
        filters: Some(vec![RpcFilterType::DataSize(state_size)]),
        account_config: account_info_config(),
        ..Default::default()
    }
}

/// Filters for the optional wallet subscription: token-account size and `owner` offset.
pub fn wallet_subscription_config(wallet: Pubkey) -> RpcProgramAccountsConfig {
    RpcProgramAccountsConfig {
        filters: Some(vec![
            RpcFilterType::DataSize(TOKEN_ACCOUNT_SIZE),
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                TOKEN_ACCOUNT_OWNER_OFFSET,
                wallet.to_bytes().to_vec(),
            )),
        ]),
        account_config: account_info_config(),
        ..Default::default()
    }
}

/// Decodes a raw market account into a [`MarketDescriptor`] using the fixed offsets this spec
/// depends on. Mirrors an external account-layout codec (§1 Out of scope): a production build
/// would delegate this to the on-chain program's own IDL-derived types.
pub fn decode_market_account(account_id: Pubkey, data: &[u8]) -> Option<MarketDescriptor> {
    const EVENT_QUEUE_OFFSET: usize = 264;
    const BIDS_OFFSET: usize = 296;
    const ASKS_OFFSET: usize = 328;

    let read_pubkey = |offset: usize| -> Option<Pubkey> {
        data.get(offset..offset + 32).map(|slice| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Pubkey::from(bytes)
        })
    };

    Some(MarketDescriptor {
        id: MarketId::new(account_id),
        event_queue: read_pubkey(EVENT_QUEUE_OFFSET)?,
        bids: read_pubkey(BIDS_OFFSET)?,
        asks: read_pubkey(ASKS_OFFSET)?,
    })
}

/// Decodes a raw classical-AMM or constant-product pool account into a [`PoolDescriptor`] using
/// the fixed offsets this spec depends on. Mirrors an external account-layout codec (§1 Out of
/// scope). `is_cpmm` pools carry no companion order-book market, so `market_id` is left `None`
/// and the trailing market-id bytes are not read.
pub fn decode_pool_account(account_id: Pubkey, data: &[u8], is_cpmm: bool) -> Option<PoolDescriptor> {
    const OPEN_TIME_OFFSET: usize = 8;
    const BASE_MINT_OFFSET: usize = 16;
    const QUOTE_MINT_OFFSET: usize = 48;
    const LP_MINT_OFFSET: usize = 80;
    const BASE_VAULT_OFFSET: usize = 112;
    const QUOTE_VAULT_OFFSET: usize = 144;
    const MARKET_ID_OFFSET: usize = 176;

    let read_pubkey = |offset: usize| -> Option<Pubkey> {
        data.get(offset..offset + 32).map(|slice| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Pubkey::from(bytes)
        })
    };
    let read_i64 = |offset: usize| -> Option<i64> {
        data.get(offset..offset + 8).map(|slice| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(slice);
            i64::from_le_bytes(bytes)
        })
    };

    let market_id = if is_cpmm {
        None
    } else {
        Some(MarketId::new(read_pubkey(MARKET_ID_OFFSET)?))
    };

    Some(PoolDescriptor {
        id: PoolId::new(account_id),
        base_mint: MintId::new(read_pubkey(BASE_MINT_OFFSET)?),
        quote_mint: MintId::new(read_pubkey(QUOTE_MINT_OFFSET)?),
        base_vault: read_pubkey(BASE_VAULT_OFFSET)?,
        quote_vault: read_pubkey(QUOTE_VAULT_OFFSET)?,
        lp_mint: read_pubkey(LP_MINT_OFFSET)?,
        kind: if is_cpmm { PoolKind::ConstantProduct } else { PoolKind::Classical },
        market_id,
        open_time: read_i64(OPEN_TIME_OFFSET)?,
    })
}
