//! Fee bump transactions.
//!
//! A fee bump lets a second account pay a higher fee for an already signed
//! transaction without touching the inner signatures. The inner
//! transaction is always carried as V1; a V0 inner transaction is upgraded
//! on the way in, which keeps its signatures valid because V0 and V1 hash
//! identically.

use tracing::debug;

use crate::config::MIN_BASE_FEE;
use crate::crypto::DecoratedSignature;
use crate::identity::MuxedAccount;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

use super::builder::{read_empty_ext, read_signatures, Transaction};
use super::envelope::{EnvelopeType, ENVELOPE_TYPE_TX, ENVELOPE_TYPE_TX_FEE_BUMP};
use super::error::TransactionError;

/// A transaction wrapped with a new fee source and total fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBumpTransaction {
    fee_source: MuxedAccount,
    /// Total fee in stroops, covering the inner operations plus one.
    fee: i64,
    inner: Transaction,
    pub(super) signatures: Vec<DecoratedSignature>,
}

impl FeeBumpTransaction {
    /// Wrap `inner` so that `fee_source` pays `base_fee` per operation.
    ///
    /// The fee bump itself counts as one extra operation, so the total fee
    /// is `base_fee * (inner operations + 1)`. The base fee must be at least
    /// the network minimum and at least the rate the inner transaction
    /// already offers.
    pub fn with_base_fee(
        fee_source: impl Into<MuxedAccount>,
        base_fee: i64,
        mut inner: Transaction,
    ) -> Result<Self, TransactionError> {
        let minimum = i64::from(MIN_BASE_FEE);
        if base_fee < minimum {
            return Err(TransactionError::FeeTooLow { base_fee, minimum });
        }

        let ops = inner.operations().len() as i64;
        let inner_base_fee = i64::from(inner.fee()) / ops.max(1);
        if base_fee < inner_base_fee {
            return Err(TransactionError::FeeTooLow {
                base_fee,
                minimum: inner_base_fee,
            });
        }

        let fee = base_fee
            .checked_mul(ops + 1)
            .ok_or(TransactionError::FeeOverflow)?;

        // V0 -> V1 is always allowed.
        inner.set_envelope_type(EnvelopeType::Tx)?;

        let fee_source = fee_source.into();
        debug!(fee_source = %fee_source, base_fee, fee, ops, "built fee bump");
        Ok(Self {
            fee_source,
            fee,
            inner,
            signatures: Vec::new(),
        })
    }

    pub fn fee_source(&self) -> &MuxedAccount {
        &self.fee_source
    }

    pub fn fee(&self) -> i64 {
        self.fee
    }

    /// The wrapped transaction, in its V1 form, with its own signatures.
    pub fn inner_transaction(&self) -> &Transaction {
        &self.inner
    }

    /// The `FeeBumpTransaction` struct; also what the signature base hashes.
    pub(crate) fn write_body(&self, w: &mut XdrWriter) {
        self.fee_source.write_xdr(w);
        w.write_i64(self.fee);
        w.write_discriminant(ENVELOPE_TYPE_TX);
        self.inner.write_v1(w);
        w.write_var_array(self.inner.signatures.as_slice());
        w.write_discriminant(0);
    }

    pub(crate) fn write_envelope(&self, w: &mut XdrWriter) {
        w.write_discriminant(ENVELOPE_TYPE_TX_FEE_BUMP);
        self.write_body(w);
        w.write_var_array(&self.signatures);
    }

    /// Decode after the envelope tag has been consumed.
    pub(crate) fn read_envelope(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let fee_source = MuxedAccount::read_xdr(r)?;
        let fee = r.read_i64()?;
        let inner = match r.read_discriminant()? {
            ENVELOPE_TYPE_TX => Transaction::read_v1_envelope(r)?,
            other => return Err(XdrError::unknown_variant("FeeBumpInnerTx", other)),
        };
        read_empty_ext(r, "FeeBumpTransactionExt")?;
        let signatures = read_signatures(r)?;
        Ok(Self {
            fee_source,
            fee,
            inner,
            signatures,
        })
    }
}
