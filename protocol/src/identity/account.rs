//! Account identifiers: [`AccountId`] and [`MuxedAccount`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{IdentityError, KEY_TYPE_ED25519, KEY_TYPE_MUXED_ED25519};
use crate::crypto::KeyPair;
use crate::strkey::{self, VersionByte};
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A bare account: an ed25519 public key.
///
/// Ordering is the unsigned lexicographic order of the key bytes, which is
/// what asset ordering relies on for issuers.
///
/// ```
/// use stellar_protocol::identity::AccountId;
///
/// let id: AccountId = "GBJCHUKZMTFSLOMNC7P4TS4VJJBTCYL3XKSOLXAUJSD56C4LHND5TWUC"
///     .parse()
///     .unwrap();
/// assert_eq!(id.to_string(), "GBJCHUKZMTFSLOMNC7P4TS4VJJBTCYL3XKSOLXAUJSD56C4LHND5TWUC");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 32]);

impl AccountId {
    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a `G...` StrKey.
    pub fn from_strkey(encoded: &str) -> Result<Self, IdentityError> {
        Ok(Self(strkey::decode_account_id(encoded)?))
    }

    pub fn to_strkey(&self) -> String {
        strkey::encode_account_id(&self.0)
    }
}

impl From<&KeyPair> for AccountId {
    fn from(keypair: &KeyPair) -> Self {
        Self(keypair.public_key())
    }
}

impl FromStr for AccountId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_strkey(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_strkey())
    }
}

impl WriteXdr for AccountId {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_discriminant(KEY_TYPE_ED25519);
        w.write_fixed_opaque(&self.0);
    }
}

impl ReadXdr for AccountId {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            KEY_TYPE_ED25519 => Ok(Self(r.read_fixed_opaque()?)),
            other => Err(XdrError::unknown_variant("PublicKeyType", other)),
        }
    }
}

impl Serialize for AccountId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_strkey())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_strkey(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// MuxedAccount
// ---------------------------------------------------------------------------

/// An account with an optional multiplexing id.
///
/// Without an id this is indistinguishable from the plain account on the
/// wire (`KEY_TYPE_ED25519`). With one it encodes as
/// `KEY_TYPE_MUXED_ED25519 { u64 id; uint256 key }` and renders as an
/// `M...` address, whose payload puts the key first and the id last.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MuxedAccount {
    key: [u8; 32],
    id: Option<u64>,
}

impl MuxedAccount {
    pub fn new(key: [u8; 32], id: Option<u64>) -> Self {
        Self { key, id }
    }

    /// Attach a multiplexing id to `account`.
    pub fn with_id(account: AccountId, id: u64) -> Self {
        Self {
            key: account.0,
            id: Some(id),
        }
    }

    /// Parse either a `G...` or an `M...` address.
    pub fn from_address(address: &str) -> Result<Self, IdentityError> {
        match strkey::decode_version_byte(address)? {
            VersionByte::AccountId => Ok(Self::new(strkey::decode_account_id(address)?, None)),
            VersionByte::MuxedAccount => {
                let (key, id) = strkey::decode_muxed_account(address)?;
                Ok(Self::new(key, Some(id)))
            }
            _ => Err(IdentityError::UnsupportedAddress(address.to_string())),
        }
    }

    /// `G...` when there is no id, `M...` otherwise.
    pub fn address(&self) -> String {
        match self.id {
            None => strkey::encode_account_id(&self.key),
            Some(id) => strkey::encode_muxed_account(&self.key, id),
        }
    }

    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// The underlying account with the multiplexing id stripped.
    pub fn account_id(&self) -> AccountId {
        AccountId(self.key)
    }

    pub fn is_muxed(&self) -> bool {
        self.id.is_some()
    }
}

impl From<AccountId> for MuxedAccount {
    fn from(account: AccountId) -> Self {
        Self {
            key: account.0,
            id: None,
        }
    }
}

impl From<&KeyPair> for MuxedAccount {
    fn from(keypair: &KeyPair) -> Self {
        AccountId::from(keypair).into()
    }
}

impl FromStr for MuxedAccount {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address(s)
    }
}

impl fmt::Display for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

impl fmt::Debug for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MuxedAccount({})", self.address())
    }
}

impl WriteXdr for MuxedAccount {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self.id {
            None => {
                w.write_discriminant(KEY_TYPE_ED25519);
                w.write_fixed_opaque(&self.key);
            }
            Some(id) => {
                w.write_discriminant(KEY_TYPE_MUXED_ED25519);
                w.write_u64(id);
                w.write_fixed_opaque(&self.key);
            }
        }
    }
}

impl ReadXdr for MuxedAccount {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            KEY_TYPE_ED25519 => Ok(Self::new(r.read_fixed_opaque()?, None)),
            KEY_TYPE_MUXED_ED25519 => {
                let id = r.read_u64()?;
                let key = r.read_fixed_opaque()?;
                Ok(Self::new(key, Some(id)))
            }
            other => Err(XdrError::unknown_variant("CryptoKeyType", other)),
        }
    }
}

impl Serialize for MuxedAccount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.address())
    }
}

impl<'de> Deserialize<'de> for MuxedAccount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_address(&s).map_err(serde::de::Error::custom)
    }
}
