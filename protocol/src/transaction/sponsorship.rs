//! Ledger keys and the `RevokeSponsorship` operation body.

use crate::asset::{LiquidityPoolId, TrustLineAsset};
use crate::config::DATA_ENTRY_MAX_BYTES;
use crate::identity::{AccountId, SignerKey};
use crate::ids::ClaimableBalanceId;
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

const LEDGER_ENTRY_ACCOUNT: i32 = 0;
const LEDGER_ENTRY_TRUSTLINE: i32 = 1;
const LEDGER_ENTRY_OFFER: i32 = 2;
const LEDGER_ENTRY_DATA: i32 = 3;
const LEDGER_ENTRY_CLAIMABLE_BALANCE: i32 = 4;
const LEDGER_ENTRY_LIQUIDITY_POOL: i32 = 5;

const REVOKE_LEDGER_ENTRY: i32 = 0;
const REVOKE_SIGNER: i32 = 1;

/// Identifies a single ledger entry.
///
/// Only the classic entry types are modelled; contract entries decode as an
/// unknown variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerKey {
    Account {
        account_id: AccountId,
    },
    Trustline {
        account_id: AccountId,
        asset: TrustLineAsset,
    },
    Offer {
        seller_id: AccountId,
        offer_id: i64,
    },
    Data {
        account_id: AccountId,
        data_name: String,
    },
    ClaimableBalance {
        balance_id: ClaimableBalanceId,
    },
    LiquidityPool {
        pool_id: LiquidityPoolId,
    },
}

impl WriteXdr for LedgerKey {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::Account { account_id } => {
                w.write_discriminant(LEDGER_ENTRY_ACCOUNT);
                account_id.write_xdr(w);
            }
            Self::Trustline { account_id, asset } => {
                w.write_discriminant(LEDGER_ENTRY_TRUSTLINE);
                account_id.write_xdr(w);
                asset.write_xdr(w);
            }
            Self::Offer {
                seller_id,
                offer_id,
            } => {
                w.write_discriminant(LEDGER_ENTRY_OFFER);
                seller_id.write_xdr(w);
                w.write_i64(*offer_id);
            }
            Self::Data {
                account_id,
                data_name,
            } => {
                w.write_discriminant(LEDGER_ENTRY_DATA);
                account_id.write_xdr(w);
                w.write_string(data_name.as_bytes());
            }
            Self::ClaimableBalance { balance_id } => {
                w.write_discriminant(LEDGER_ENTRY_CLAIMABLE_BALANCE);
                balance_id.write_xdr(w);
            }
            Self::LiquidityPool { pool_id } => {
                w.write_discriminant(LEDGER_ENTRY_LIQUIDITY_POOL);
                pool_id.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for LedgerKey {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            LEDGER_ENTRY_ACCOUNT => Ok(Self::Account {
                account_id: AccountId::read_xdr(r)?,
            }),
            LEDGER_ENTRY_TRUSTLINE => Ok(Self::Trustline {
                account_id: AccountId::read_xdr(r)?,
                asset: TrustLineAsset::read_xdr(r)?,
            }),
            LEDGER_ENTRY_OFFER => Ok(Self::Offer {
                seller_id: AccountId::read_xdr(r)?,
                offer_id: r.read_i64()?,
            }),
            LEDGER_ENTRY_DATA => Ok(Self::Data {
                account_id: AccountId::read_xdr(r)?,
                data_name: read_utf8_string(r, DATA_ENTRY_MAX_BYTES)?,
            }),
            LEDGER_ENTRY_CLAIMABLE_BALANCE => Ok(Self::ClaimableBalance {
                balance_id: ClaimableBalanceId::read_xdr(r)?,
            }),
            LEDGER_ENTRY_LIQUIDITY_POOL => Ok(Self::LiquidityPool {
                pool_id: LiquidityPoolId::read_xdr(r)?,
            }),
            other => Err(XdrError::unknown_variant("LedgerEntryType", other)),
        }
    }
}

/// What a `RevokeSponsorship` operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RevokeSponsorship {
    LedgerEntry(LedgerKey),
    Signer {
        account_id: AccountId,
        signer_key: SignerKey,
    },
}

impl WriteXdr for RevokeSponsorship {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::LedgerEntry(key) => {
                w.write_discriminant(REVOKE_LEDGER_ENTRY);
                key.write_xdr(w);
            }
            Self::Signer {
                account_id,
                signer_key,
            } => {
                w.write_discriminant(REVOKE_SIGNER);
                account_id.write_xdr(w);
                signer_key.write_xdr(w);
            }
        }
    }
}

impl ReadXdr for RevokeSponsorship {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            REVOKE_LEDGER_ENTRY => Ok(Self::LedgerEntry(LedgerKey::read_xdr(r)?)),
            REVOKE_SIGNER => Ok(Self::Signer {
                account_id: AccountId::read_xdr(r)?,
                signer_key: SignerKey::read_xdr(r)?,
            }),
            other => Err(XdrError::unknown_variant("RevokeSponsorshipType", other)),
        }
    }
}

/// A bounded XDR string that must also be valid UTF-8.
pub(crate) fn read_utf8_string(r: &mut XdrReader<'_>, max: usize) -> Result<String, XdrError> {
    let bytes = r.read_string(max as u32)?;
    String::from_utf8(bytes).map_err(|e| XdrError::InvalidValue(format!("string is not UTF-8: {e}")))
}
