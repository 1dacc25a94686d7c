//! Newtype identifiers wrapping on-chain addresses.

use solana_sdk::pubkey::Pubkey;
use std::fmt;

/// Opaque 32-byte pool account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub Pubkey);

impl PoolId {
    #[must_use]
    pub fn new(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }

    #[must_use]
    pub fn as_pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Pubkey> for PoolId {
    fn from(pubkey: Pubkey) -> Self {
        Self::new(pubkey)
    }
}

/// SPL mint address identifying a fungible asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MintId(pub Pubkey);

impl MintId {
    #[must_use]
    pub fn new(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }

    #[must_use]
    pub fn as_pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl fmt::Display for MintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Pubkey> for MintId {
    fn from(pubkey: Pubkey) -> Self {
        Self::new(pubkey)
    }
}

/// Order-book market identifier (classical AMM pools only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarketId(pub Pubkey);

impl MarketId {
    #[must_use]
    pub fn new(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }

    #[must_use]
    pub fn as_pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Pubkey> for MarketId {
    fn from(pubkey: Pubkey) -> Self {
        Self::new(pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn display_matches_pubkey() {
        let pk = Pubkey::from_str("11111111111111111111111111111111").unwrap();
        let id = PoolId::new(pk);
        assert_eq!(id.to_string(), pk.to_string());
    }

    #[test]
    fn ids_are_hashable_and_distinct() {
        let a = MintId::new(Pubkey::new_unique());
        let b = MintId::new(Pubkey::new_unique());
        assert_ne!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }
}
