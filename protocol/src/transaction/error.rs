//! Errors raised while building, signing or bumping transactions.

use thiserror::Error;

use super::preconditions::ValidationError;
use crate::crypto::KeyError;
use crate::xdr::XdrError;

/// Errors that can occur while constructing or signing a transaction.
///
/// Each variant maps to one construction rule. Decoding errors are wrapped
/// unchanged so callers can still tell malformed input from unknown
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// A transaction carries 1 to 100 operations.
    #[error("transaction must have between 1 and 100 operations, got {count}")]
    InvalidOperationCount { count: usize },

    /// A structural rule was violated (envelope type, sequence, etc).
    #[error("invalid transaction: {0}")]
    InvalidConstruction(String),

    /// An operation's fields are out of range.
    #[error("invalid operation at index {index}: {reason}")]
    InvalidOperation { index: usize, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The per-operation fee is below the network minimum or below the
    /// inner transaction's rate.
    #[error("base fee {base_fee} is too low, minimum is {minimum}")]
    FeeTooLow {
        /// Fee that was offered, per operation.
        base_fee: i64,
        /// Smallest acceptable fee per operation.
        minimum: i64,
    },

    #[error("total fee overflows")]
    FeeOverflow,

    #[error("sequence number overflows")]
    SequenceOverflow,

    /// Envelopes hold at most 20 signatures.
    #[error("signature list is full (maximum 20)")]
    TooManySignatures,

    #[error("hash-x preimage too long: {len} bytes, maximum is 64")]
    PreimageTooLong { len: usize },

    #[error("memo text too long: {len} bytes, maximum is 28")]
    MemoTooLong { len: usize },

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Xdr(#[from] XdrError),
}
