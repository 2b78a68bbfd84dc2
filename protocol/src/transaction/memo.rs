//! Transaction memos.

use std::fmt;

use super::error::TransactionError;
use crate::config::MEMO_TEXT_MAX_BYTES;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

const MEMO_NONE: i32 = 0;
const MEMO_TEXT: i32 = 1;
const MEMO_ID: i32 = 2;
const MEMO_HASH: i32 = 3;
const MEMO_RETURN: i32 = 4;

/// Free-form data attached to a transaction.
///
/// Text memos are raw bytes (at most 28). They are usually UTF-8 but the
/// network does not require it, so decoding keeps whatever bytes arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Memo {
    #[default]
    None,
    Text(Vec<u8>),
    Id(u64),
    Hash([u8; 32]),
    /// Hash of the transaction being refunded.
    Return([u8; 32]),
}

impl Memo {
    pub fn none() -> Self {
        Self::None
    }

    /// A text memo. The limit is 28 *bytes*, so multi-byte characters count
    /// more than once.
    pub fn text(text: &str) -> Result<Self, TransactionError> {
        Self::text_bytes(text.as_bytes().to_vec())
    }

    pub fn text_bytes(bytes: Vec<u8>) -> Result<Self, TransactionError> {
        if bytes.len() > MEMO_TEXT_MAX_BYTES {
            return Err(TransactionError::MemoTooLong { len: bytes.len() });
        }
        Ok(Self::Text(bytes))
    }

    pub fn id(id: u64) -> Self {
        Self::Id(id)
    }

    pub fn hash(hash: [u8; 32]) -> Self {
        Self::Hash(hash)
    }

    pub fn return_hash(hash: [u8; 32]) -> Self {
        Self::Return(hash)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Text(bytes) => write!(f, "text:{}", String::from_utf8_lossy(bytes)),
            Self::Id(id) => write!(f, "id:{id}"),
            Self::Hash(hash) => write!(f, "hash:{}", hex::encode(hash)),
            Self::Return(hash) => write!(f, "return:{}", hex::encode(hash)),
        }
    }
}

impl WriteXdr for Memo {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::None => w.write_discriminant(MEMO_NONE),
            Self::Text(bytes) => {
                w.write_discriminant(MEMO_TEXT);
                w.write_string(bytes);
            }
            Self::Id(id) => {
                w.write_discriminant(MEMO_ID);
                w.write_u64(*id);
            }
            Self::Hash(hash) => {
                w.write_discriminant(MEMO_HASH);
                w.write_fixed_opaque(hash);
            }
            Self::Return(hash) => {
                w.write_discriminant(MEMO_RETURN);
                w.write_fixed_opaque(hash);
            }
        }
    }
}

impl ReadXdr for Memo {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            MEMO_NONE => Ok(Self::None),
            MEMO_TEXT => Ok(Self::Text(r.read_string(MEMO_TEXT_MAX_BYTES as u32)?)),
            MEMO_ID => Ok(Self::Id(r.read_u64()?)),
            MEMO_HASH => Ok(Self::Hash(r.read_fixed_opaque()?)),
            MEMO_RETURN => Ok(Self::Return(r.read_fixed_opaque()?)),
            other => Err(XdrError::unknown_variant("MemoType", other)),
        }
    }
}
