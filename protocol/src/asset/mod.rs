//! # Assets & Liquidity Pools
//!
//! Three related asset unions appear on the wire:
//!
//! | Type | Variants | Used by |
//! |---|---|---|
//! | [`Asset`] | native, alphanum4, alphanum12 | payments, offers, paths |
//! | [`ChangeTrustAsset`] | asset or pool parameters | `ChangeTrust` |
//! | [`TrustLineAsset`] | asset or pool ID | trustline keys, `SetTrustLineFlags`-style lookups |
//!
//! All three share one total order: native first, then alphanum4, then
//! alphanum12, then pool shares; within a kind by padded code bytes and
//! then by issuer key bytes. Liquidity pool parameters must list their two
//! assets in that order, which is what makes pool IDs unique.

pub mod code;
pub mod pool;
pub mod trustline;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{AccountId, IdentityError};
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

pub use pool::{LiquidityPoolId, LiquidityPoolParameters};
pub use trustline::{ChangeTrustAsset, TrustLineAsset};

pub(crate) const ASSET_TYPE_NATIVE: i32 = 0;
pub(crate) const ASSET_TYPE_CREDIT_ALPHANUM4: i32 = 1;
pub(crate) const ASSET_TYPE_CREDIT_ALPHANUM12: i32 = 2;
pub(crate) const ASSET_TYPE_POOL_SHARE: i32 = 3;

/// Errors constructing or parsing assets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("invalid asset code {0:?}: must be 1-12 ASCII letters or digits")]
    InvalidAssetCode(String),

    /// Pool parameters must list the smaller asset first.
    #[error("liquidity pool assets are not in canonical order (asset_a must be < asset_b)")]
    InvalidAssetOrder,

    #[error("invalid issuer: {0}")]
    InvalidIssuer(IdentityError),

    #[error("invalid canonical asset string {0:?}")]
    InvalidCanonicalForm(String),
}

// ---------------------------------------------------------------------------
// Credit assets
// ---------------------------------------------------------------------------

/// A credit asset with a code of 1-4 characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaNum4 {
    code: [u8; 4],
    issuer: AccountId,
}

/// A credit asset with a code of 5-12 characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaNum12 {
    code: [u8; 12],
    issuer: AccountId,
}

impl AlphaNum4 {
    pub fn code(&self) -> String {
        code::unpad(&self.code).unwrap_or_default()
    }

    pub fn issuer(&self) -> &AccountId {
        &self.issuer
    }
}

impl AlphaNum12 {
    pub fn code(&self) -> String {
        code::unpad(&self.code).unwrap_or_default()
    }

    pub fn issuer(&self) -> &AccountId {
        &self.issuer
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// An asset that can be held, paid and traded.
///
/// ```
/// use stellar_protocol::asset::Asset;
///
/// let usd: Asset = "USD:GBJCHUKZMTFSLOMNC7P4TS4VJJBTCYL3XKSOLXAUJSD56C4LHND5TWUC"
///     .parse()
///     .unwrap();
/// assert!(Asset::native() < usd);
/// assert_eq!(usd.code().as_deref(), Some("USD"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Asset {
    Native,
    CreditAlphanum4(AlphaNum4),
    CreditAlphanum12(AlphaNum12),
}

impl Asset {
    pub fn native() -> Self {
        Self::Native
    }

    /// A credit asset. Codes of 1-4 characters give alphanum4, 5-12 give
    /// alphanum12.
    pub fn credit(code: &str, issuer: AccountId) -> Result<Self, AssetError> {
        code::validate(code)?;
        if code.len() <= code::ALPHANUM4_MAX_LEN {
            Ok(Self::CreditAlphanum4(AlphaNum4 {
                code: code::pad(code),
                issuer,
            }))
        } else {
            Ok(Self::CreditAlphanum12(AlphaNum12 {
                code: code::pad(code),
                issuer,
            }))
        }
    }

    /// Parse `native` or `CODE:ISSUER`.
    pub fn from_canonical(s: &str) -> Result<Self, AssetError> {
        if s == "native" {
            return Ok(Self::Native);
        }
        let (code, issuer) = s
            .split_once(':')
            .ok_or_else(|| AssetError::InvalidCanonicalForm(s.to_string()))?;
        let issuer = AccountId::from_strkey(issuer).map_err(AssetError::InvalidIssuer)?;
        Self::credit(code, issuer)
    }

    pub fn canonical_string(&self) -> String {
        match (self.code(), self.issuer()) {
            (Some(code), Some(issuer)) => format!("{code}:{issuer}"),
            _ => "native".to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    pub fn code(&self) -> Option<String> {
        match self {
            Self::Native => None,
            Self::CreditAlphanum4(a) => Some(a.code()),
            Self::CreditAlphanum12(a) => Some(a.code()),
        }
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Self::Native => None,
            Self::CreditAlphanum4(a) => Some(&a.issuer),
            Self::CreditAlphanum12(a) => Some(&a.issuer),
        }
    }

    /// Decode the arm selected by an already-read `AssetType` discriminant.
    /// Shared with the trustline asset unions, whose first three arms are
    /// identical.
    pub(crate) fn read_arm(discriminant: i32, r: &mut XdrReader<'_>) -> Result<Option<Self>, XdrError> {
        let asset = match discriminant {
            ASSET_TYPE_NATIVE => Self::Native,
            ASSET_TYPE_CREDIT_ALPHANUM4 => {
                let raw: [u8; 4] = r.read_fixed_opaque()?;
                let issuer = AccountId::read_xdr(r)?;
                code::unpad(&raw).map_err(|e| XdrError::InvalidValue(e.to_string()))?;
                Self::CreditAlphanum4(AlphaNum4 { code: raw, issuer })
            }
            ASSET_TYPE_CREDIT_ALPHANUM12 => {
                let raw: [u8; 12] = r.read_fixed_opaque()?;
                let issuer = AccountId::read_xdr(r)?;
                let text = code::unpad(&raw).map_err(|e| XdrError::InvalidValue(e.to_string()))?;
                if text.len() <= code::ALPHANUM4_MAX_LEN {
                    return Err(XdrError::InvalidValue(format!(
                        "alphanum12 code {text:?} is too short"
                    )));
                }
                Self::CreditAlphanum12(AlphaNum12 { code: raw, issuer })
            }
            _ => return Ok(None),
        };
        Ok(Some(asset))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({})", self.canonical_string())
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical(s)
    }
}

impl WriteXdr for Asset {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::Native => w.write_discriminant(ASSET_TYPE_NATIVE),
            Self::CreditAlphanum4(a) => {
                w.write_discriminant(ASSET_TYPE_CREDIT_ALPHANUM4);
                w.write_fixed_opaque(&a.code);
                a.issuer.write_xdr(w);
            }
            Self::CreditAlphanum12(a) => {
                w.write_discriminant(ASSET_TYPE_CREDIT_ALPHANUM12);
                w.write_fixed_opaque(&a.code);
                a.issuer.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for Asset {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let discriminant = r.read_discriminant()?;
        Self::read_arm(discriminant, r)?
            .ok_or_else(|| XdrError::unknown_variant("AssetType", discriminant))
    }
}

impl Serialize for Asset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical_string())
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_canonical(&s).map_err(serde::de::Error::custom)
    }
}
