// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Stellar Protocol: Transaction Core
//!
//! Builds, encodes, hashes, signs and identifies Stellar transactions
//! entirely offline. Everything this crate produces has to match, byte for
//! byte, what validators compute on their side: a single stray padding byte
//! changes the hash, and a changed hash means every signature is worthless.
//!
//! ## Architecture
//!
//! Modules, leaves first:
//!
//! - **config**: network passphrases, the [`Network`] value and protocol
//!   limits (fee floor, operation and signature caps).
//! - **xdr**: the canonical binary codec. Strict on decode.
//! - **strkey**: checksummed base32 text for keys, hashes and addresses.
//! - **crypto**: ed25519 keypairs, signature hints, SHA-256, SLIP-10.
//! - **identity**: account IDs, muxed accounts, signer keys.
//! - **asset**: assets, their total order, liquidity pool parameters and IDs.
//! - **transaction**: memos, operations, preconditions, transactions, fee
//!   bumps, envelopes, signing and the builder.
//! - **ids**: claimable balance IDs and total-order IDs.
//! - **error** / **logging**: the crate-wide error and subscriber setup.
//!
//! ## Quick Start
//!
//! ```
//! use stellar_protocol::asset::Asset;
//! use stellar_protocol::config::Network;
//! use stellar_protocol::crypto::KeyPair;
//! use stellar_protocol::transaction::{
//!     Account, AnyTransaction, Operation, Signable, TransactionBuilder, TIMEOUT_INFINITE,
//! };
//!
//! let source = KeyPair::random();
//! let destination = KeyPair::random();
//! let mut account = Account::new(&source, 1_000);
//!
//! let mut tx = TransactionBuilder::new(&mut account)
//!     .add_operation(Operation::payment(&destination, Asset::native(), 10_000_000))
//!     .set_timeout(0, TIMEOUT_INFINITE)
//!     .build()?;
//! tx.sign(&source, &Network::TESTNET)?;
//!
//! let envelope = tx.to_envelope_xdr_base64();
//! let parsed = AnyTransaction::from_envelope_xdr_base64(&envelope)?;
//! assert_eq!(parsed.hash(&Network::TESTNET), tx.hash(&Network::TESTNET));
//! assert_eq!(account.sequence_number(), 1_001);
//! # Ok::<(), stellar_protocol::Error>(())
//! ```
//!
//! ## Ground Rules
//!
//! 1. The network is always an argument. There is no global default.
//! 2. No clock, no sockets, no filesystem. Callers pass `now` in.
//! 3. Library code returns errors; it does not panic on bad input.
//! 4. Secret keys are zeroized on drop and never logged.

pub mod asset;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod ids;
pub mod logging;
pub mod strkey;
pub mod transaction;
pub mod xdr;

pub use config::Network;
pub use error::{Error, Result};
