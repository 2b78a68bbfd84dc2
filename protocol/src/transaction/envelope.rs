//! # Transaction Envelopes
//!
//! An envelope is what actually travels to the network: a transaction (or
//! fee bump) plus its signatures, tagged with an `EnvelopeType`.
//!
//! ```text
//! TransactionEnvelope
//!   ENVELOPE_TYPE_TX_V0      -> { TransactionV0 tx;        DecoratedSignature signatures<20>; }
//!   ENVELOPE_TYPE_TX         -> { Transaction tx;          DecoratedSignature signatures<20>; }
//!   ENVELOPE_TYPE_TX_FEE_BUMP-> { FeeBumpTransaction tx;   DecoratedSignature signatures<20>; }
//! ```
//!
//! The same tags prefix the signature base (see [`super::signing`]), where a
//! V0 transaction is hashed exactly as if it were V1.

use crate::config::Network;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

use super::builder::Transaction;
use super::fee_bump::FeeBumpTransaction;
use super::signing::Signable;

pub(crate) const ENVELOPE_TYPE_TX_V0: i32 = 0;
pub(crate) const ENVELOPE_TYPE_TX: i32 = 2;
pub(crate) const ENVELOPE_TYPE_TX_FEE_BUMP: i32 = 5;
pub(crate) const ENVELOPE_TYPE_OP_ID: i32 = 6;

/// Which envelope layout a transaction is serialized with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EnvelopeType {
    /// Pre-protocol-13 layout: raw ed25519 source, time bounds only.
    TxV0,
    #[default]
    Tx,
    TxFeeBump,
}

impl EnvelopeType {
    pub fn discriminant(self) -> i32 {
        match self {
            Self::TxV0 => ENVELOPE_TYPE_TX_V0,
            Self::Tx => ENVELOPE_TYPE_TX,
            Self::TxFeeBump => ENVELOPE_TYPE_TX_FEE_BUMP,
        }
    }
}

/// A parsed envelope of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyTransaction {
    Transaction(Transaction),
    FeeBump(FeeBumpTransaction),
}

impl AnyTransaction {
    /// Parse a binary `TransactionEnvelope`.
    pub fn from_envelope_xdr(bytes: &[u8]) -> Result<Self, XdrError> {
        Self::from_xdr(bytes)
    }

    /// Parse a base64 `TransactionEnvelope`, the form Horizon and most
    /// tooling exchange.
    pub fn from_envelope_xdr_base64(encoded: &str) -> Result<Self, XdrError> {
        Self::from_xdr_base64(encoded)
    }

    pub fn envelope_type(&self) -> EnvelopeType {
        match self {
            Self::Transaction(tx) => tx.envelope_type(),
            Self::FeeBump(_) => EnvelopeType::TxFeeBump,
        }
    }

    pub fn hash(&self, network: &Network) -> [u8; 32] {
        match self {
            Self::Transaction(tx) => tx.hash(network),
            Self::FeeBump(fee_bump) => fee_bump.hash(network),
        }
    }

    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Transaction(tx) => Some(tx),
            Self::FeeBump(_) => None,
        }
    }

    pub fn as_fee_bump(&self) -> Option<&FeeBumpTransaction> {
        match self {
            Self::Transaction(_) => None,
            Self::FeeBump(fee_bump) => Some(fee_bump),
        }
    }
}

impl From<Transaction> for AnyTransaction {
    fn from(tx: Transaction) -> Self {
        Self::Transaction(tx)
    }
}

impl From<FeeBumpTransaction> for AnyTransaction {
    fn from(fee_bump: FeeBumpTransaction) -> Self {
        Self::FeeBump(fee_bump)
    }
}

impl WriteXdr for AnyTransaction {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::Transaction(tx) => tx.write_envelope(w),
            Self::FeeBump(fee_bump) => fee_bump.write_envelope(w),
        }
    }
}

impl ReadXdr for AnyTransaction {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            ENVELOPE_TYPE_TX_V0 => Ok(Self::Transaction(Transaction::read_v0_envelope(r)?)),
            ENVELOPE_TYPE_TX => Ok(Self::Transaction(Transaction::read_v1_envelope(r)?)),
            ENVELOPE_TYPE_TX_FEE_BUMP => Ok(Self::FeeBump(FeeBumpTransaction::read_envelope(r)?)),
            other => Err(XdrError::unknown_variant("EnvelopeType", other)),
        }
    }
}
