//! Value types shared by operations: amounts and prices.
//!
//! Amounts are `i64` stroops on the wire. Nothing here touches floating
//! point: decimal strings are parsed digit by digit and prices are
//! approximated with exact integer continued fractions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use crate::config::{AMOUNT_DECIMALS, STROOPS_PER_UNIT};
use crate::xdr::xdr_struct;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Parse a decimal amount ("12.5", "0.0000001") into stroops.
///
/// At most seven fractional digits; negative values and anything that
/// overflows `i64` are rejected.
///
/// ```
/// use stellar_protocol::transaction::types::{format_amount, parse_amount};
///
/// assert_eq!(parse_amount("12.5").unwrap(), 125_000_000);
/// assert_eq!(format_amount(125_000_000), "12.5000000");
/// ```
pub fn parse_amount(s: &str) -> Result<i64, TransactionError> {
    let invalid = || TransactionError::InvalidAmount(s.to_string());
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !digits_only(whole) || !digits_only(frac) {
        return Err(invalid());
    }
    if frac.len() > AMOUNT_DECIMALS || (s.contains('.') && frac.is_empty()) {
        return Err(invalid());
    }
    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let mut frac_stroops: i64 = 0;
    for (i, b) in frac.bytes().enumerate() {
        let scale = 10i64.pow((AMOUNT_DECIMALS - 1 - i) as u32);
        frac_stroops += i64::from(b - b'0') * scale;
    }
    whole
        .checked_mul(STROOPS_PER_UNIT)
        .and_then(|w| w.checked_add(frac_stroops))
        .ok_or_else(invalid)
}

/// Render stroops with exactly seven fractional digits.
pub fn format_amount(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let abs = stroops.unsigned_abs();
    let unit = STROOPS_PER_UNIT.unsigned_abs();
    format!(
        "{sign}{}.{:0>width$}",
        abs / unit,
        abs % unit,
        width = AMOUNT_DECIMALS
    )
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

xdr_struct! {
    /// An exact price as a fraction `n / d` of two `i32`s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Price {
        /// Numerator.
        pub n: i32,
        /// Denominator.
        pub d: i32,
    }
}

impl Price {
    pub fn new(n: i32, d: i32) -> Self {
        Self { n, d }
    }

    /// The best rational approximation of a positive decimal string whose
    /// numerator and denominator both fit in an `i32`.
    ///
    /// ```
    /// use stellar_protocol::transaction::types::Price;
    ///
    /// assert_eq!(Price::from_decimal_str("1.25").unwrap(), Price::new(5, 4));
    /// ```
    pub fn from_decimal_str(s: &str) -> Result<Self, TransactionError> {
        let invalid = || TransactionError::InvalidPrice(s.to_string());
        let (mut num, mut den) = parse_decimal_fraction(s).ok_or_else(invalid)?;
        let max = i32::MAX as u128;

        // Convergents h/k; start from (h_-2, k_-2) = (0, 1), (h_-1, k_-1) = (1, 0).
        let (mut h0, mut k0, mut h1, mut k1) = (0u128, 1u128, 1u128, 0u128);
        loop {
            let a = num / den;
            let rem = num % den;
            let next = a
                .checked_mul(h1)
                .and_then(|x| x.checked_add(h0))
                .zip(a.checked_mul(k1).and_then(|x| x.checked_add(k0)));
            let Some((h, k)) = next.filter(|(h, k)| *h <= max && *k <= max) else {
                break;
            };
            (h0, k0, h1, k1) = (h1, k1, h, k);
            if rem == 0 {
                break;
            }
            (num, den) = (den, rem);
        }

        if h1 == 0 || k1 == 0 {
            return Err(invalid());
        }
        // Both are bounded by i32::MAX above.
        Ok(Self::new(h1 as i32, k1 as i32))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

impl FromStr for Price {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

/// `"12.345"` as `(12345, 1000)`. Up to 30 significant digits.
fn parse_decimal_fraction(s: &str) -> Option<(u128, u128)> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    if whole.len() + frac.len() > 30 {
        return None;
    }
    let mut num: u128 = 0;
    for b in whole.bytes().chain(frac.bytes()) {
        num = num * 10 + u128::from(b - b'0');
    }
    let den = 10u128.pow(frac.len() as u32);
    Some((num, den))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::{ReadXdr, WriteXdr};

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1").unwrap(), 10_000_000);
        assert_eq!(parse_amount("0.0000001").unwrap(), 1);
        assert_eq!(parse_amount("922337203685.4775807").unwrap(), i64::MAX);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        for bad in ["", "-1", "1.", ".5", "1.00000001", "1e5", "922337203685.4775808", "abc"] {
            assert!(parse_amount(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0.0000000");
        assert_eq!(format_amount(1), "0.0000001");
        assert_eq!(format_amount(i64::MAX), "922337203685.4775807");
        assert_eq!(format_amount(-15_000_000), "-1.5000000");
    }

    #[test]
    fn test_price_continued_fractions() {
        let cases = [
            ("2.93850088", (36731261, 12500000)),
            ("1.25", (5, 4)),
            ("0.1", (1, 10)),
            ("1000000000", (1000000000, 1)),
            ("0.0000001", (1, 10000000)),
            ("3.14159265358979", (1434877259, 456735617)),
        ];
        for (input, (n, d)) in cases {
            assert_eq!(Price::from_decimal_str(input).unwrap(), Price::new(n, d), "{input}");
        }
    }

    #[test]
    fn test_price_rejects_out_of_range() {
        assert!(Price::from_decimal_str("0").is_err());
        assert!(Price::from_decimal_str("3000000000").is_err());
        assert!(Price::from_decimal_str("-1").is_err());
        assert!(Price::from_decimal_str("abc").is_err());
    }

    #[test]
    fn test_price_xdr_and_serde() {
        let price = Price::new(5, 4);
        assert_eq!(price.to_xdr(), vec![0, 0, 0, 5, 0, 0, 0, 4]);
        assert_eq!(Price::from_xdr(&price.to_xdr()).unwrap(), price);
        assert_eq!(serde_json::to_string(&price).unwrap(), r#"{"n":5,"d":4}"#);
    }
}
