//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction core relies on lives here, next to the
//! [`Network`] value that seeds transaction hashes. These values are fixed by
//! the ledger network itself; changing one produces transactions that
//! validators will reject, so treat edits here as protocol changes.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::hash::sha256;

// ---------------------------------------------------------------------------
// Network Passphrases
// ---------------------------------------------------------------------------

/// The public (production) network. Mistakes here cost real money.
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// The SDF test network, reset periodically.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Futurenet, where upcoming protocol versions are staged.
pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

/// The passphrase used by a local standalone core (quickstart `--standalone`).
pub const STANDALONE_PASSPHRASE: &str = "Standalone Network ; February 2017";

/// Sandbox network used by local tooling.
pub const SANDBOX_PASSPHRASE: &str = "Local Sandbox Stellar Network ; September 2022";

// ---------------------------------------------------------------------------
// Fees & Transaction Limits
// ---------------------------------------------------------------------------

/// Minimum per-operation fee, in stroops. Fee bumps and the builder refuse
/// anything lower.
pub const MIN_BASE_FEE: u32 = 100;

/// Maximum operations in a single transaction (`Operation operations<100>`).
pub const MAX_OPERATIONS: usize = 100;

/// Maximum decorated signatures attached to an envelope (`<20>`).
pub const MAX_SIGNATURES: usize = 20;

/// Maximum extra signers in a V2 precondition set (`SignerKey extraSigners<2>`).
pub const MAX_EXTRA_SIGNERS: usize = 2;

/// Maximum memo text length in bytes, not characters.
pub const MEMO_TEXT_MAX_BYTES: usize = 28;

/// Maximum payload length of an ed25519 signed-payload signer.
pub const SIGNED_PAYLOAD_MAX_BYTES: usize = 64;

/// Maximum length of a decorated signature's signature bytes.
pub const SIGNATURE_MAX_BYTES: usize = 64;

/// Constant-product pool fee in basis points, fixed since protocol 18.
pub const LIQUIDITY_POOL_FEE_V18: i32 = 30;

/// Maximum claimants on a single claimable balance.
pub const MAX_CLAIMANTS: usize = 10;

/// Maximum intermediate assets in a path payment.
pub const MAX_PATH_LENGTH: usize = 5;

/// Maximum length of a data entry name and value (`string64`, `DataValue<64>`).
pub const DATA_ENTRY_MAX_BYTES: usize = 64;

/// Maximum home domain length (`string32`).
pub const HOME_DOMAIN_MAX_BYTES: usize = 32;

/// Stroops per whole unit of any asset. Amounts carry seven decimal places.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Decimal places an amount string may carry.
pub const AMOUNT_DECIMALS: usize = 7;

// ---------------------------------------------------------------------------
// Key Derivation
// ---------------------------------------------------------------------------

/// BIP-44 purpose used for account derivation (SEP-5).
pub const BIP44_PURPOSE: u32 = 44;

/// Registered SLIP-44 coin type for this network.
pub const STELLAR_COIN_TYPE: u32 = 148;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// A ledger network, identified by its passphrase.
///
/// The network ID (SHA-256 of the passphrase) is the first thing hashed into
/// every transaction signature base, so a transaction signed for one network
/// can never be replayed on another. There is no process-wide "current
/// network": every hashing and signing call takes a `&Network` explicitly.
///
/// ```
/// use stellar_protocol::config::Network;
///
/// let testnet = Network::testnet();
/// assert_eq!(testnet.passphrase(), "Test SDF Network ; September 2015");
/// assert_ne!(testnet.network_id(), Network::public().network_id());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    passphrase: Cow<'static, str>,
}

impl Network {
    /// The public network.
    pub const PUBLIC: Network = Network::from_static(PUBLIC_NETWORK_PASSPHRASE);
    /// The SDF test network.
    pub const TESTNET: Network = Network::from_static(TESTNET_PASSPHRASE);
    /// Futurenet.
    pub const FUTURENET: Network = Network::from_static(FUTURENET_PASSPHRASE);
    /// A standalone local network.
    pub const STANDALONE: Network = Network::from_static(STANDALONE_PASSPHRASE);
    /// The local sandbox network.
    pub const SANDBOX: Network = Network::from_static(SANDBOX_PASSPHRASE);

    /// A network with a custom passphrase (private deployments).
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Cow::Owned(passphrase.into()),
        }
    }

    const fn from_static(passphrase: &'static str) -> Self {
        Self {
            passphrase: Cow::Borrowed(passphrase),
        }
    }

    pub fn public() -> Self {
        Self::PUBLIC
    }

    pub fn testnet() -> Self {
        Self::TESTNET
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// `sha256(passphrase)`, the prefix of every signature base.
    pub fn network_id(&self) -> [u8; 32] {
        sha256(self.passphrase.as_bytes())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.passphrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrases_are_distinct() {
        let all = [
            PUBLIC_NETWORK_PASSPHRASE,
            TESTNET_PASSPHRASE,
            FUTURENET_PASSPHRASE,
            STANDALONE_PASSPHRASE,
            SANDBOX_PASSPHRASE,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_public_network_id() {
        assert_eq!(
            hex::encode(Network::PUBLIC.network_id()),
            "7ac33997544e3175d266bd022439b22cdb16508c01163f26e5cb2a3e1045a979"
        );
    }

    #[test]
    fn test_testnet_network_id() {
        assert_eq!(
            hex::encode(Network::TESTNET.network_id()),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
    }

    #[test]
    fn test_custom_network_equals_preset_with_same_passphrase() {
        assert_eq!(Network::new(TESTNET_PASSPHRASE), Network::testnet());
    }

    #[test]
    fn test_network_serde_roundtrip() {
        let json = serde_json::to_string(&Network::FUTURENET).unwrap();
        assert_eq!(
            json,
            r#"{"passphrase":"Test SDF Future Network ; October 2022"}"#
        );
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Network::FUTURENET);
    }

    #[test]
    fn test_limit_constants_sanity() {
        assert_eq!(MAX_OPERATIONS, 100);
        assert_eq!(MAX_EXTRA_SIGNERS, 2);
        assert_eq!(MIN_BASE_FEE, 100);
        assert_eq!(STROOPS_PER_UNIT, 10i64.pow(AMOUNT_DECIMALS as u32));
    }
}
