//! Claimable balance IDs.
//!
//! ```text
//! id = sha256(HashIDPreimage {
//!          ENVELOPE_TYPE_OP_ID,
//!          sourceAccount,   // transaction source, muxed id stripped
//!          seqNum,          // transaction sequence number
//!          opNum,           // operation index
//!      })
//! ```
//!
//! Operation-level source overrides and muxed IDs never influence the
//! result, so every party that sees the transaction agrees on the ID before
//! it is even submitted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::IdError;
use crate::crypto::sha256;
use crate::transaction::envelope::ENVELOPE_TYPE_OP_ID;
use crate::transaction::{OperationBody, Transaction};
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

const CLAIMABLE_BALANCE_ID_TYPE_V0: i32 = 0;

/// Identifies a claimable balance on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClaimableBalanceId {
    V0([u8; 32]),
}

impl ClaimableBalanceId {
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self::V0(hash)
    }

    pub fn hash(&self) -> &[u8; 32] {
        match self {
            Self::V0(hash) => hash,
        }
    }

    /// Lower-case hex of the 36-byte XDR form (type tag then hash), the
    /// format Horizon uses.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_xdr())
    }

    /// Parse the 72-character hex form, either case.
    pub fn from_hex(s: &str) -> Result<Self, IdError> {
        let invalid = || IdError::InvalidBalanceId(s.to_string());
        let mut bytes = [0u8; 36];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| invalid())?;
        Self::from_xdr(&bytes).map_err(|_| invalid())
    }
}

impl fmt::Display for ClaimableBalanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ClaimableBalanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClaimableBalanceId({})", self.to_hex())
    }
}

impl FromStr for ClaimableBalanceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl WriteXdr for ClaimableBalanceId {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::V0(hash) => {
                w.write_discriminant(CLAIMABLE_BALANCE_ID_TYPE_V0);
                w.write_fixed_opaque(hash);
            }
        }
    }
}

impl ReadXdr for ClaimableBalanceId {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            CLAIMABLE_BALANCE_ID_TYPE_V0 => Ok(Self::V0(r.read_fixed_opaque()?)),
            other => Err(XdrError::unknown_variant("ClaimableBalanceIDType", other)),
        }
    }
}

impl Serialize for ClaimableBalanceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ClaimableBalanceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The ID of the balance created by the operation at `index`.
pub fn claimable_balance_id(tx: &Transaction, index: usize) -> Result<ClaimableBalanceId, IdError> {
    let operations = tx.operations();
    let op = operations.get(index).ok_or(IdError::IndexOutOfRange {
        index,
        count: operations.len(),
    })?;
    if !matches!(op.body, OperationBody::CreateClaimableBalance(_)) {
        return Err(IdError::WrongOperationType {
            index,
            found: op.body.name(),
        });
    }
    // Bounded by the 100-operation limit.
    let op_num = index as u32;

    let mut w = XdrWriter::with_capacity(52);
    w.write_discriminant(ENVELOPE_TYPE_OP_ID);
    tx.source_account().account_id().write_xdr(&mut w);
    w.write_i64(tx.sequence_number());
    w.write_u32(op_num);
    Ok(ClaimableBalanceId::V0(sha256(w.as_bytes())))
}
