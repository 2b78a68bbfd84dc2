//! # Transaction Preconditions
//!
//! Conditions that must hold for a transaction to be valid, beyond its
//! sequence number and signatures:
//!
//! - a wall-clock window (`TimeBounds`, unix seconds);
//! - a ledger window (`LedgerBounds`);
//! - the source account's sequence number, age and ledger gap;
//! - up to two extra signers whose signatures must be present.
//!
//! [`TransactionPreconditions`] is the model callers build. It always encodes
//! in the smallest wire form that can carry it: `PRECOND_NONE` when empty,
//! `PRECOND_TIME` when only time bounds are set, `PRECOND_V2` otherwise.
//! Decoding accepts every form and normalises back to the same model, so
//! `encode(decode(x))` is the minimal form of `x`.
//!
//! Zero is "no limit" for both upper bounds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MAX_EXTRA_SIGNERS;
use crate::identity::SignerKey;
use crate::xdr::{xdr_struct, ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

/// A timeout of zero means the transaction never expires.
pub const TIMEOUT_INFINITE: u64 = 0;

const PRECOND_NONE: i32 = 0;
const PRECOND_TIME: i32 = 1;
const PRECOND_V2: i32 = 2;

/// Invalid precondition combinations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("time bounds are required once any other precondition is set")]
    MissingTimeBounds,

    #[error("at most 2 extra signers are allowed, got {count}")]
    TooManyExtraSigners { count: usize },

    #[error("time bounds min {min} is after max {max}")]
    InvalidTimeBounds { min: u64, max: u64 },

    #[error("ledger bounds min {min} is after max {max}")]
    InvalidLedgerBounds { min: u32, max: u32 },
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

xdr_struct! {
    /// Unix-second validity window. `max_time == 0` means unbounded.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TimeBounds {
        pub min_time: u64,
        pub max_time: u64,
    }
}

impl TimeBounds {
    pub fn new(min_time: u64, max_time: u64) -> Result<Self, ValidationError> {
        let bounds = Self { min_time, max_time };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Valid from the beginning of time until `now + timeout`.
    /// [`TIMEOUT_INFINITE`] gives an unbounded window.
    pub fn expires_after(now: u64, timeout: u64) -> Self {
        let max_time = if timeout == TIMEOUT_INFINITE {
            0
        } else {
            now.saturating_add(timeout)
        };
        Self {
            min_time: 0,
            max_time,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_time != 0 && self.min_time > self.max_time {
            return Err(ValidationError::InvalidTimeBounds {
                min: self.min_time,
                max: self.max_time,
            });
        }
        Ok(())
    }
}

xdr_struct! {
    /// Ledger-sequence validity window. `max_ledger == 0` means unbounded.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LedgerBounds {
        pub min_ledger: u32,
        pub max_ledger: u32,
    }
}

impl LedgerBounds {
    pub fn new(min_ledger: u32, max_ledger: u32) -> Result<Self, ValidationError> {
        let bounds = Self {
            min_ledger,
            max_ledger,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_ledger != 0 && self.min_ledger > self.max_ledger {
            return Err(ValidationError::InvalidLedgerBounds {
                min: self.min_ledger,
                max: self.max_ledger,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TransactionPreconditions
// ---------------------------------------------------------------------------

/// Every precondition a transaction can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TransactionPreconditions {
    pub time_bounds: Option<TimeBounds>,
    pub ledger_bounds: Option<LedgerBounds>,
    /// The source account's sequence number must be at least this; unset
    /// means "exactly one less than the transaction's".
    pub min_sequence_number: Option<i64>,
    /// Seconds since the source account's sequence number last changed.
    pub min_sequence_age: u64,
    /// Ledgers since the source account's sequence number last changed.
    pub min_sequence_ledger_gap: u32,
    pub extra_signers: Vec<SignerKey>,
}

impl TransactionPreconditions {
    /// Only a time window.
    pub fn with_time_bounds(time_bounds: TimeBounds) -> Self {
        Self {
            time_bounds: Some(time_bounds),
            ..Self::default()
        }
    }

    /// Whether anything beyond time bounds is set, which forces the V2 wire
    /// form.
    pub fn has_v2(&self) -> bool {
        self.ledger_bounds.is_some()
            || self.min_sequence_number.is_some()
            || self.min_sequence_age > 0
            || self.min_sequence_ledger_gap > 0
            || !self.extra_signers.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.time_bounds.is_none() && !self.has_v2()
    }

    pub fn is_valid(&self) -> Result<(), ValidationError> {
        if self.has_v2() && self.time_bounds.is_none() {
            return Err(ValidationError::MissingTimeBounds);
        }
        if self.extra_signers.len() > MAX_EXTRA_SIGNERS {
            return Err(ValidationError::TooManyExtraSigners {
                count: self.extra_signers.len(),
            });
        }
        if let Some(bounds) = &self.time_bounds {
            bounds.validate()?;
        }
        if let Some(bounds) = &self.ledger_bounds {
            bounds.validate()?;
        }
        Ok(())
    }

    /// The minimal wire form.
    pub fn to_wire(&self) -> Preconditions {
        if self.has_v2() {
            Preconditions::V2(self.clone())
        } else if let Some(bounds) = self.time_bounds {
            Preconditions::Time(bounds)
        } else {
            Preconditions::None
        }
    }

    /// Normalise any wire form.
    pub fn from_wire(wire: Preconditions) -> Self {
        match wire {
            Preconditions::None => Self::default(),
            Preconditions::Time(bounds) => Self::with_time_bounds(bounds),
            Preconditions::V2(inner) => inner,
        }
    }

    fn write_v2(&self, w: &mut XdrWriter) {
        self.time_bounds.write_xdr(w);
        self.ledger_bounds.write_xdr(w);
        self.min_sequence_number.write_xdr(w);
        w.write_u64(self.min_sequence_age);
        w.write_u32(self.min_sequence_ledger_gap);
        w.write_var_array(&self.extra_signers);
    }

    fn read_v2(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            time_bounds: Option::read_xdr(r)?,
            ledger_bounds: Option::read_xdr(r)?,
            min_sequence_number: Option::read_xdr(r)?,
            min_sequence_age: r.read_u64()?,
            min_sequence_ledger_gap: r.read_u32()?,
            extra_signers: r.read_var_array(MAX_EXTRA_SIGNERS as u32)?,
        })
    }
}

impl WriteXdr for TransactionPreconditions {
    /// Always the minimal form.
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.to_wire().write_xdr(w);
    }
}

impl ReadXdr for TransactionPreconditions {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self::from_wire(Preconditions::read_xdr(r)?))
    }
}

// ---------------------------------------------------------------------------
// Wire union
// ---------------------------------------------------------------------------

/// The `Preconditions` union exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Preconditions {
    None,
    Time(TimeBounds),
    V2(TransactionPreconditions),
}

impl WriteXdr for Preconditions {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::None => w.write_discriminant(PRECOND_NONE),
            Self::Time(bounds) => {
                w.write_discriminant(PRECOND_TIME);
                bounds.write_xdr(w);
            }
            Self::V2(inner) => {
                w.write_discriminant(PRECOND_V2);
                inner.write_v2(w);
            }
        }
    }
}

impl ReadXdr for Preconditions {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            PRECOND_NONE => Ok(Self::None),
            PRECOND_TIME => Ok(Self::Time(TimeBounds::read_xdr(r)?)),
            PRECOND_V2 => Ok(Self::V2(TransactionPreconditions::read_v2(r)?)),
            other => Err(XdrError::unknown_variant("PreconditionType", other)),
        }
    }
}
