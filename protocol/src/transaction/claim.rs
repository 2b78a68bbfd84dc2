//! Claimants and the predicates that gate claimable balances.

use crate::config::MAX_CLAIMANTS;
use crate::identity::AccountId;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

const PREDICATE_UNCONDITIONAL: i32 = 0;
const PREDICATE_AND: i32 = 1;
const PREDICATE_OR: i32 = 2;
const PREDICATE_NOT: i32 = 3;
const PREDICATE_BEFORE_ABSOLUTE_TIME: i32 = 4;
const PREDICATE_BEFORE_RELATIVE_TIME: i32 = 5;

const CLAIMANT_TYPE_V0: i32 = 0;

/// Deepest predicate tree the network accepts.
pub const MAX_PREDICATE_DEPTH: usize = 4;

/// Decoding refuses trees deeper than this so hostile input cannot exhaust
/// the stack. Anything past [`MAX_PREDICATE_DEPTH`] is invalid anyway.
const DECODE_DEPTH_LIMIT: usize = 32;

/// A condition under which a claimant may claim a balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimPredicate {
    Unconditional,
    And(Box<ClaimPredicate>, Box<ClaimPredicate>),
    Or(Box<ClaimPredicate>, Box<ClaimPredicate>),
    Not(Box<ClaimPredicate>),
    /// Unix seconds; the claim must close before this time.
    BeforeAbsoluteTime(i64),
    /// Seconds after the balance was created.
    BeforeRelativeTime(i64),
}

impl ClaimPredicate {
    pub fn and(left: ClaimPredicate, right: ClaimPredicate) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: ClaimPredicate, right: ClaimPredicate) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: ClaimPredicate) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Levels in the tree; a leaf is 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::And(l, r) | Self::Or(l, r) => 1 + l.depth().max(r.depth()),
            Self::Not(inner) => 1 + inner.depth(),
            _ => 1,
        }
    }

    fn read_nested(r: &mut XdrReader<'_>, depth: usize) -> Result<Self, XdrError> {
        if depth > DECODE_DEPTH_LIMIT {
            return Err(XdrError::InvalidValue(
                "claim predicate nested too deeply".into(),
            ));
        }
        match r.read_discriminant()? {
            PREDICATE_UNCONDITIONAL => Ok(Self::Unconditional),
            disc @ (PREDICATE_AND | PREDICATE_OR) => {
                let len = r.read_u32()?;
                if len != 2 {
                    return Err(XdrError::InvalidValue(format!(
                        "claim predicate combinator needs 2 operands, got {len}"
                    )));
                }
                let left = Box::new(Self::read_nested(r, depth + 1)?);
                let right = Box::new(Self::read_nested(r, depth + 1)?);
                Ok(if disc == PREDICATE_AND {
                    Self::And(left, right)
                } else {
                    Self::Or(left, right)
                })
            }
            PREDICATE_NOT => {
                if !r.read_bool()? {
                    return Err(XdrError::InvalidValue(
                        "negated claim predicate is missing".into(),
                    ));
                }
                Ok(Self::Not(Box::new(Self::read_nested(r, depth + 1)?)))
            }
            PREDICATE_BEFORE_ABSOLUTE_TIME => Ok(Self::BeforeAbsoluteTime(r.read_i64()?)),
            PREDICATE_BEFORE_RELATIVE_TIME => Ok(Self::BeforeRelativeTime(r.read_i64()?)),
            other => Err(XdrError::unknown_variant("ClaimPredicateType", other)),
        }
    }
}

impl WriteXdr for ClaimPredicate {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::Unconditional => w.write_discriminant(PREDICATE_UNCONDITIONAL),
            Self::And(l, r) | Self::Or(l, r) => {
                let disc = if matches!(self, Self::And(..)) {
                    PREDICATE_AND
                } else {
                    PREDICATE_OR
                };
                w.write_discriminant(disc);
                w.write_u32(2);
                l.write_xdr(w);
                r.write_xdr(w);
            }
            Self::Not(inner) => {
                w.write_discriminant(PREDICATE_NOT);
                w.write_optional(Some(inner));
            }
            Self::BeforeAbsoluteTime(t) => {
                w.write_discriminant(PREDICATE_BEFORE_ABSOLUTE_TIME);
                w.write_i64(*t);
            }
            Self::BeforeRelativeTime(t) => {
                w.write_discriminant(PREDICATE_BEFORE_RELATIVE_TIME);
                w.write_i64(*t);
            }
        }
    }
}

impl ReadXdr for ClaimPredicate {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Self::read_nested(r, 1)
    }
}

/// An account allowed to claim a balance, and under which condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Claimant {
    pub destination: AccountId,
    pub predicate: ClaimPredicate,
}

impl Claimant {
    pub fn new(destination: AccountId, predicate: ClaimPredicate) -> Self {
        Self {
            destination,
            predicate,
        }
    }
}

impl WriteXdr for Claimant {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_discriminant(CLAIMANT_TYPE_V0);
        self.destination.write_xdr(w);
        self.predicate.write_xdr(w);
    }
}

impl ReadXdr for Claimant {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            CLAIMANT_TYPE_V0 => Ok(Self {
                destination: AccountId::read_xdr(r)?,
                predicate: ClaimPredicate::read_xdr(r)?,
            }),
            other => Err(XdrError::unknown_variant("ClaimantType", other)),
        }
    }
}

/// Claimant lists on the wire carry at most ten entries.
pub(crate) fn read_claimants(r: &mut XdrReader<'_>) -> Result<Vec<Claimant>, XdrError> {
    r.read_var_array(MAX_CLAIMANTS as u32)
}
