//! # Identity Module
//!
//! Who a transaction talks about. The layers, from the wire up:
//!
//! 1. **AccountId**: a bare ed25519 public key (`PublicKey` on the wire,
//!    `G...` in text).
//! 2. **MuxedAccount**: an account ID plus an optional 64-bit sub-account
//!    id (`M...` in text). Used for transaction and operation sources and
//!    payment destinations; ledger entries always key on the bare account.
//! 3. **SignerKey**: anything that can satisfy a signature threshold: an
//!    ed25519 key, a pre-authorized transaction hash, a hash-x preimage hash
//!    or an ed25519 signed payload.
//!
//! Key material itself lives in [`crate::crypto`]; this module only deals
//! with public identifiers.

pub mod account;
pub mod signer_key;

use thiserror::Error;

use crate::strkey::StrKeyError;

pub use account::{AccountId, MuxedAccount};
pub use signer_key::{SignedPayloadSigner, SignerKey};

/// `CryptoKeyType` discriminants shared by `MuxedAccount` and `SignerKey`.
pub(crate) const KEY_TYPE_ED25519: i32 = 0;
pub(crate) const KEY_TYPE_PRE_AUTH_TX: i32 = 1;
pub(crate) const KEY_TYPE_HASH_X: i32 = 2;
pub(crate) const KEY_TYPE_ED25519_SIGNED_PAYLOAD: i32 = 3;
pub(crate) const KEY_TYPE_MUXED_ED25519: i32 = 0x100;

/// Errors parsing or constructing public identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error(transparent)]
    StrKey(#[from] StrKeyError),

    /// A signed-payload signer payload above 64 bytes.
    #[error("signed payload too long: {len} bytes, maximum is 64")]
    PayloadTooLong {
        /// Offending payload length.
        len: usize,
    },

    #[error("signed payload must not be empty")]
    EmptyPayload,

    /// The StrKey is valid but names something that is not allowed here
    /// (a secret seed where an address was expected, for instance).
    #[error("{0:?} is not a valid address for this context")]
    UnsupportedAddress(String),
}
