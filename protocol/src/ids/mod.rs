//! # Deterministic IDs
//!
//! Identifiers that can be computed offline, without asking the network:
//!
//! - [`ClaimableBalanceId`]: derived from the creating transaction's source
//!   account, sequence number and the operation's position;
//! - [`Toid`]: the total-order ID (SEP-35) packing ledger, transaction and
//!   operation positions into one `i64`, used for paging cursors.

pub mod balance;
pub mod toid;

use thiserror::Error;

pub use balance::{claimable_balance_id, ClaimableBalanceId};
pub use toid::{Toid, ToidError, ToidRange};

/// Errors deriving a claimable balance ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("index {index} is outside the {count} operations of this transaction")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("operation at index {index} is {found}, not create_claimable_balance")]
    WrongOperationType {
        index: usize,
        /// Name of the operation actually found.
        found: &'static str,
    },

    #[error("invalid claimable balance ID {0:?}")]
    InvalidBalanceId(String),
}
