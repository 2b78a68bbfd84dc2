//! # Transaction Module
//!
//! Construction, hashing, signing and envelope encoding of transactions and
//! fee bumps.
//!
//! ## Architecture
//!
//! ```text
//! types.rs         Amount parsing/formatting and Price
//! memo.rs          Memo union
//! preconditions.rs Time/ledger bounds, sequence conditions, extra signers
//! claim.rs         Claim predicates and claimants
//! sponsorship.rs   Ledger keys and RevokeSponsorship
//! operation.rs     Operation and the body of every classic operation type
//! builder.rs       Transaction, Account and the fluent TransactionBuilder
//! fee_bump.rs      FeeBumpTransaction
//! signing.rs       Signable: signature base, hash, signatures
//! envelope.rs      EnvelopeType and AnyTransaction (envelope parsing)
//! error.rs         TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] derives fee and sequence number from
//!    an [`Account`], or call [`Transaction::new`] directly.
//! 2. **Sign**: [`Signable::sign`] with each required keypair, for an
//!    explicit [`Network`](crate::config::Network).
//! 3. **Encode**: [`Signable::to_envelope_xdr_base64`] for submission.
//! 4. **Bump** (optional): wrap in a [`FeeBumpTransaction`] and sign that
//!    with the fee source.
//! 5. **Parse**: [`AnyTransaction::from_envelope_xdr_base64`] reads any
//!    envelope kind back.

pub mod builder;
pub mod claim;
pub mod envelope;
pub mod error;
pub mod fee_bump;
pub mod memo;
pub mod operation;
pub mod preconditions;
pub mod signing;
pub mod sponsorship;
pub mod types;

pub use builder::{Account, Transaction, TransactionBuilder};
pub use claim::{ClaimPredicate, Claimant};
pub use envelope::{AnyTransaction, EnvelopeType};
pub use error::TransactionError;
pub use fee_bump::FeeBumpTransaction;
pub use memo::Memo;
pub use operation::{Operation, OperationBody};
pub use preconditions::{
    LedgerBounds, Preconditions, TimeBounds, TransactionPreconditions, ValidationError,
    TIMEOUT_INFINITE,
};
pub use signing::Signable;
pub use sponsorship::{LedgerKey, RevokeSponsorship};
pub use types::{format_amount, parse_amount, Price};
