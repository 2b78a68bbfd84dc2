//! Constant-product liquidity pools and their deterministic IDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Asset, AssetError};
use crate::config::LIQUIDITY_POOL_FEE_V18;
use crate::crypto::sha256;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

/// `LiquidityPoolType::LIQUIDITY_POOL_CONSTANT_PRODUCT`.
const LIQUIDITY_POOL_CONSTANT_PRODUCT: i32 = 0;

/// The parameters that define a constant-product pool.
///
/// `asset_a < asset_b` always holds; the constructor refuses anything else
/// and so does the XDR decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LiquidityPoolParameters {
    asset_a: Asset,
    asset_b: Asset,
    fee: i32,
}

impl LiquidityPoolParameters {
    pub fn new(asset_a: Asset, asset_b: Asset, fee: i32) -> Result<Self, AssetError> {
        if asset_a >= asset_b {
            return Err(AssetError::InvalidAssetOrder);
        }
        Ok(Self {
            asset_a,
            asset_b,
            fee,
        })
    }

    /// A pool with the protocol's fixed 30 bp fee.
    pub fn constant_product(asset_a: Asset, asset_b: Asset) -> Result<Self, AssetError> {
        Self::new(asset_a, asset_b, LIQUIDITY_POOL_FEE_V18)
    }

    pub fn asset_a(&self) -> &Asset {
        &self.asset_a
    }

    pub fn asset_b(&self) -> &Asset {
        &self.asset_b
    }

    /// Fee in basis points.
    pub fn fee(&self) -> i32 {
        self.fee
    }

    /// `sha256` of the parameters' XDR. This is the ID the network assigns.
    pub fn pool_id(&self) -> LiquidityPoolId {
        LiquidityPoolId(sha256(&self.to_xdr()))
    }
}

impl WriteXdr for LiquidityPoolParameters {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_discriminant(LIQUIDITY_POOL_CONSTANT_PRODUCT);
        self.asset_a.write_xdr(w);
        self.asset_b.write_xdr(w);
        w.write_i32(self.fee);
    }
}

impl ReadXdr for LiquidityPoolParameters {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            LIQUIDITY_POOL_CONSTANT_PRODUCT => {
                let asset_a = Asset::read_xdr(r)?;
                let asset_b = Asset::read_xdr(r)?;
                let fee = r.read_i32()?;
                Self::new(asset_a, asset_b, fee).map_err(|e| XdrError::InvalidValue(e.to_string()))
            }
            other => Err(XdrError::unknown_variant("LiquidityPoolType", other)),
        }
    }
}

/// A liquidity pool ID: 32 bytes, shown as lower-case hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LiquidityPoolId([u8; 32]);

impl LiquidityPoolId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse 64 hex characters (either case).
    pub fn from_hex(s: &str) -> Result<Self, AssetError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| AssetError::InvalidCanonicalForm(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for LiquidityPoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for LiquidityPoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LiquidityPoolId({})", self.to_hex())
    }
}

impl FromStr for LiquidityPoolId {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl WriteXdr for LiquidityPoolId {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_fixed_opaque(&self.0);
    }
}

impl ReadXdr for LiquidityPoolId {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self(r.read_fixed_opaque()?))
    }
}

impl Serialize for LiquidityPoolId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for LiquidityPoolId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
