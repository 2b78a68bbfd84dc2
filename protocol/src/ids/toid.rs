//! Total order IDs (SEP-35).
//!
//! ```text
//!  63        32 31          12 11        0
//! +------------+--------------+-----------+
//! |   ledger   | transaction  | operation |
//! |  31 bits   |   20 bits    |  12 bits  |
//! +------------+--------------+-----------+
//! ```
//!
//! The sign bit is never set, so IDs sort the same as signed or unsigned
//! integers and the natural order of the packed value is ledger, then
//! transaction, then operation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const LEDGER_SHIFT: u32 = 32;
const TRANSACTION_SHIFT: u32 = 12;

pub const MAX_LEDGER_SEQUENCE: u32 = i32::MAX as u32;
pub const MAX_TRANSACTION_ORDER: u32 = (1 << 20) - 1;
pub const MAX_OPERATION_INDEX: u32 = (1 << 12) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToidError {
    #[error("{component} {value} exceeds the maximum of {max}")]
    OutOfRange {
        component: &'static str,
        value: i64,
        max: i64,
    },

    #[error("operation index rolled past the last transaction of the ledger")]
    Overflow,

    #[error("invalid ledger range {from}..={to}")]
    InvalidRange { from: u32, to: u32 },
}

/// A position in the ledger history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Toid {
    ledger_sequence: u32,
    transaction_order: u32,
    operation_index: u32,
}

/// Half-open `[start, end)` range of TOIDs covering whole ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToidRange {
    pub start: i64,
    pub end: i64,
}

impl ToidRange {
    pub fn contains(&self, id: i64) -> bool {
        (self.start..self.end).contains(&id)
    }
}

fn check(component: &'static str, value: u32, max: u32) -> Result<(), ToidError> {
    if value > max {
        return Err(ToidError::OutOfRange {
            component,
            value: i64::from(value),
            max: i64::from(max),
        });
    }
    Ok(())
}

impl Toid {
    pub fn new(
        ledger_sequence: u32,
        transaction_order: u32,
        operation_index: u32,
    ) -> Result<Self, ToidError> {
        check("ledger sequence", ledger_sequence, MAX_LEDGER_SEQUENCE)?;
        check("transaction order", transaction_order, MAX_TRANSACTION_ORDER)?;
        check("operation index", operation_index, MAX_OPERATION_INDEX)?;
        Ok(Self {
            ledger_sequence,
            transaction_order,
            operation_index,
        })
    }

    pub fn ledger_sequence(&self) -> u32 {
        self.ledger_sequence
    }

    pub fn transaction_order(&self) -> u32 {
        self.transaction_order
    }

    pub fn operation_index(&self) -> u32 {
        self.operation_index
    }

    pub fn to_i64(&self) -> i64 {
        (i64::from(self.ledger_sequence) << LEDGER_SHIFT)
            | (i64::from(self.transaction_order) << TRANSACTION_SHIFT)
            | i64::from(self.operation_index)
    }

    /// Unpack an ID. Negative values have no meaning and are rejected.
    pub fn from_i64(value: i64) -> Result<Self, ToidError> {
        if value < 0 {
            return Err(ToidError::OutOfRange {
                component: "toid",
                value,
                max: i64::MAX,
            });
        }
        // Non-negative, so every masked field fits its width.
        Ok(Self {
            ledger_sequence: (value >> LEDGER_SHIFT) as u32,
            transaction_order: ((value >> TRANSACTION_SHIFT) & i64::from(MAX_TRANSACTION_ORDER)) as u32,
            operation_index: (value & i64::from(MAX_OPERATION_INDEX)) as u32,
        })
    }

    /// Step to the next operation, carrying into the transaction order.
    ///
    /// Fails with [`ToidError::Overflow`] when both the operation index and
    /// the transaction order are already at their maximum; `self` is left
    /// untouched in that case.
    pub fn increment_operation_index(&mut self) -> Result<(), ToidError> {
        if self.operation_index < MAX_OPERATION_INDEX {
            self.operation_index += 1;
            return Ok(());
        }
        if self.transaction_order >= MAX_TRANSACTION_ORDER {
            return Err(ToidError::Overflow);
        }
        self.transaction_order += 1;
        self.operation_index = 0;
        Ok(())
    }

    /// The last possible ID inside `ledger`; anything greater belongs to a
    /// later ledger.
    pub fn after_ledger(ledger: u32) -> Result<Self, ToidError> {
        Self::new(ledger, MAX_TRANSACTION_ORDER, MAX_OPERATION_INDEX)
    }

    /// IDs spanning ledgers `from` through `to`, both inclusive.
    ///
    /// Ledger 1 has no transactions of its own, so a range starting there
    /// begins at 0 to cover genesis entries.
    pub fn ledger_range_inclusive(from: u32, to: u32) -> Result<ToidRange, ToidError> {
        if from == 0 || from > to {
            return Err(ToidError::InvalidRange { from, to });
        }
        let start = if from == 1 {
            0
        } else {
            Self::new(from, 0, 0)?.to_i64()
        };
        let after = to
            .checked_add(1)
            .ok_or(ToidError::InvalidRange { from, to })?;
        let end = Self::new(after, 0, 0)?.to_i64();
        Ok(ToidRange { start, end })
    }
}

impl From<Toid> for i64 {
    fn from(toid: Toid) -> Self {
        toid.to_i64()
    }
}

impl TryFrom<i64> for Toid {
    type Error = ToidError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_i64(value)
    }
}

impl fmt::Display for Toid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing() {
        assert_eq!(Toid::new(0, 0, 1).unwrap().to_i64(), 1);
        assert_eq!(Toid::new(0, 1, 0).unwrap().to_i64(), 4096);
        assert_eq!(Toid::new(1, 0, 0).unwrap().to_i64(), 4_294_967_296);
        assert_eq!(
            Toid::new(MAX_LEDGER_SEQUENCE, MAX_TRANSACTION_ORDER, MAX_OPERATION_INDEX)
                .unwrap()
                .to_i64(),
            i64::MAX
        );
    }

    #[test]
    fn test_unpacking() {
        let toid = Toid::from_i64(i64::MAX).unwrap();
        assert_eq!(toid.ledger_sequence(), 2_147_483_647);
        assert_eq!(toid.transaction_order(), 1_048_575);
        assert_eq!(toid.operation_index(), 4_095);

        let toid = Toid::from_i64(4_294_967_296 + 4096 * 3 + 7).unwrap();
        assert_eq!(toid, Toid::new(1, 3, 7).unwrap());

        assert!(matches!(
            Toid::from_i64(-1),
            Err(ToidError::OutOfRange { value: -1, .. })
        ));
    }

    #[test]
    fn test_component_limits() {
        assert_eq!(
            Toid::new(0, MAX_TRANSACTION_ORDER + 1, 0),
            Err(ToidError::OutOfRange {
                component: "transaction order",
                value: 1 << 20,
                max: (1 << 20) - 1,
            })
        );
        assert!(Toid::new(0, 0, MAX_OPERATION_INDEX + 1).is_err());
        assert!(Toid::new(MAX_LEDGER_SEQUENCE + 1, 0, 0).is_err());
    }

    #[test]
    fn test_increment() {
        let mut toid = Toid::new(5, 2, 0).unwrap();
        toid.increment_operation_index().unwrap();
        assert_eq!(toid, Toid::new(5, 2, 1).unwrap());

        let mut toid = Toid::new(5, 2, MAX_OPERATION_INDEX).unwrap();
        toid.increment_operation_index().unwrap();
        assert_eq!(toid, Toid::new(5, 3, 0).unwrap());

        let mut last = Toid::after_ledger(5).unwrap();
        assert_eq!(last.increment_operation_index(), Err(ToidError::Overflow));
        assert_eq!(last, Toid::after_ledger(5).unwrap());
    }

    #[test]
    fn test_after_ledger_sorts_below_next_ledger() {
        let last = Toid::after_ledger(10).unwrap().to_i64();
        let next = Toid::new(11, 0, 0).unwrap().to_i64();
        assert_eq!(last + 1, next);
    }

    #[test]
    fn test_ledger_range() {
        let range = Toid::ledger_range_inclusive(1, 1).unwrap();
        assert_eq!(range, ToidRange { start: 0, end: 2 << 32 });

        let range = Toid::ledger_range_inclusive(2, 4).unwrap();
        assert_eq!(range.start, 2 << 32);
        assert_eq!(range.end, 5 << 32);
        assert!(range.contains(Toid::after_ledger(4).unwrap().to_i64()));
        assert!(!range.contains(Toid::new(5, 0, 0).unwrap().to_i64()));

        assert_eq!(
            Toid::ledger_range_inclusive(0, 5),
            Err(ToidError::InvalidRange { from: 0, to: 5 })
        );
        assert_eq!(
            Toid::ledger_range_inclusive(6, 5),
            Err(ToidError::InvalidRange { from: 6, to: 5 })
        );
        assert!(Toid::ledger_range_inclusive(1, MAX_LEDGER_SEQUENCE).is_err());
    }

    #[test]
    fn test_serde_as_integer() {
        let toid = Toid::new(1, 0, 1).unwrap();
        let json = serde_json::to_string(&toid).unwrap();
        assert_eq!(json, "4294967297");
        assert_eq!(serde_json::from_str::<Toid>(&json).unwrap(), toid);
        assert!(serde_json::from_str::<Toid>("-5").is_err());
    }
}
