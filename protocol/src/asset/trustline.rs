//! The two trustline-flavoured asset unions.
//!
//! Both start with the three [`Asset`] arms and add a pool-share arm:
//! `ChangeTrustAsset` carries the full pool parameters (so the network can
//! create the pool), `TrustLineAsset` only the resulting pool ID.

use super::{Asset, LiquidityPoolId, LiquidityPoolParameters, ASSET_TYPE_POOL_SHARE};
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

/// The asset of a `ChangeTrust` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeTrustAsset {
    Asset(Asset),
    PoolShare(LiquidityPoolParameters),
}

/// The asset a trustline is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrustLineAsset {
    Asset(Asset),
    PoolShare(LiquidityPoolId),
}

impl From<Asset> for ChangeTrustAsset {
    fn from(asset: Asset) -> Self {
        Self::Asset(asset)
    }
}

impl From<LiquidityPoolParameters> for ChangeTrustAsset {
    fn from(params: LiquidityPoolParameters) -> Self {
        Self::PoolShare(params)
    }
}

impl From<Asset> for TrustLineAsset {
    fn from(asset: Asset) -> Self {
        Self::Asset(asset)
    }
}

impl From<LiquidityPoolId> for TrustLineAsset {
    fn from(id: LiquidityPoolId) -> Self {
        Self::PoolShare(id)
    }
}

impl From<ChangeTrustAsset> for TrustLineAsset {
    /// Pool parameters collapse to their ID.
    fn from(asset: ChangeTrustAsset) -> Self {
        match asset {
            ChangeTrustAsset::Asset(a) => Self::Asset(a),
            ChangeTrustAsset::PoolShare(params) => Self::PoolShare(params.pool_id()),
        }
    }
}

impl WriteXdr for ChangeTrustAsset {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::Asset(asset) => asset.write_xdr(w),
            Self::PoolShare(params) => {
                w.write_discriminant(ASSET_TYPE_POOL_SHARE);
                params.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for ChangeTrustAsset {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let discriminant = r.read_discriminant()?;
        if discriminant == ASSET_TYPE_POOL_SHARE {
            return Ok(Self::PoolShare(LiquidityPoolParameters::read_xdr(r)?));
        }
        Asset::read_arm(discriminant, r)?
            .map(Self::Asset)
            .ok_or_else(|| XdrError::unknown_variant("AssetType", discriminant))
    }
}

impl WriteXdr for TrustLineAsset {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::Asset(asset) => asset.write_xdr(w),
            Self::PoolShare(id) => {
                w.write_discriminant(ASSET_TYPE_POOL_SHARE);
                id.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for TrustLineAsset {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let discriminant = r.read_discriminant()?;
        if discriminant == ASSET_TYPE_POOL_SHARE {
            return Ok(Self::PoolShare(LiquidityPoolId::read_xdr(r)?));
        }
        Asset::read_arm(discriminant, r)?
            .map(Self::Asset)
            .ok_or_else(|| XdrError::unknown_variant("AssetType", discriminant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccountId;

    fn usd() -> Asset {
        let issuer =
            AccountId::from_strkey("GBJCHUKZMTFSLOMNC7P4TS4VJJBTCYL3XKSOLXAUJSD56C4LHND5TWUC")
                .unwrap();
        Asset::credit("USD", issuer).unwrap()
    }

    fn params() -> LiquidityPoolParameters {
        LiquidityPoolParameters::constant_product(Asset::Native, usd()).unwrap()
    }

    #[test]
    fn test_plain_assets_encode_like_asset() {
        assert_eq!(ChangeTrustAsset::from(usd()).to_xdr(), usd().to_xdr());
        assert_eq!(TrustLineAsset::from(usd()).to_xdr(), usd().to_xdr());
    }

    #[test]
    fn test_change_trust_pool_share_carries_parameters() {
        let asset = ChangeTrustAsset::from(params());
        let bytes = asset.to_xdr();
        assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
        assert_eq!(&bytes[4..], params().to_xdr().as_slice());
        assert_eq!(ChangeTrustAsset::from_xdr(&bytes).unwrap(), asset);
    }

    #[test]
    fn test_trustline_pool_share_carries_id() {
        let asset = TrustLineAsset::from(ChangeTrustAsset::from(params()));
        assert_eq!(asset, TrustLineAsset::PoolShare(params().pool_id()));
        let bytes = asset.to_xdr();
        assert_eq!(bytes.len(), 4 + 32);
        assert_eq!(TrustLineAsset::from_xdr(&bytes).unwrap(), asset);
    }

    #[test]
    fn test_pool_shares_order_after_assets() {
        let share = ChangeTrustAsset::from(params());
        assert!(ChangeTrustAsset::from(Asset::Native) < share);
        assert!(ChangeTrustAsset::from(usd()) < share);
        let share_id = TrustLineAsset::from(params().pool_id());
        assert!(TrustLineAsset::from(usd()) < share_id);
    }

    #[test]
    fn test_unknown_asset_type() {
        assert_eq!(
            TrustLineAsset::from_xdr(&[0, 0, 0, 4]),
            Err(XdrError::unknown_variant("AssetType", 4))
        );
    }
}
