//! # Operations
//!
//! An [`Operation`] is an optional source-account override plus one
//! [`OperationBody`]. The body enum covers every classic operation type
//! (0 through 23). Smart-contract operation types decode as
//! [`XdrError::UnknownVariant`]; building them is out of scope.
//!
//! Simple bodies are plain structs whose fields encode in declaration
//! order. Bodies with bounded lists or strings carry hand-written codecs so
//! the bounds are enforced on decode, and [`OperationBody::check`] enforces
//! the same bounds (plus sign rules on amounts) before a transaction is
//! built.

use crate::asset::{self, Asset, ChangeTrustAsset, LiquidityPoolId};
use crate::config::{
    DATA_ENTRY_MAX_BYTES, HOME_DOMAIN_MAX_BYTES, MAX_CLAIMANTS, MAX_PATH_LENGTH,
};
use crate::identity::{AccountId, MuxedAccount, SignerKey};
use crate::ids::ClaimableBalanceId;
use crate::xdr::{xdr_struct, ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

use super::claim::{read_claimants, Claimant};
use super::sponsorship::{read_utf8_string, RevokeSponsorship};
use super::types::Price;

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Account flag: trustlines must be authorized by the issuer.
pub const AUTH_REQUIRED_FLAG: u32 = 0x1;
/// Account flag: the issuer may revoke authorization.
pub const AUTH_REVOCABLE_FLAG: u32 = 0x2;
/// Account flag: no auth flag can change and the account cannot be merged.
pub const AUTH_IMMUTABLE_FLAG: u32 = 0x4;
/// Account flag: new trustlines are created with clawback enabled.
pub const AUTH_CLAWBACK_ENABLED_FLAG: u32 = 0x8;

/// Trustline flag: fully authorized.
pub const TRUSTLINE_AUTHORIZED_FLAG: u32 = 0x1;
/// Trustline flag: may maintain offers but not receive new funds.
pub const TRUSTLINE_AUTHORIZED_TO_MAINTAIN_LIABILITIES_FLAG: u32 = 0x2;
/// Trustline flag: the issuer may claw back.
pub const TRUSTLINE_CLAWBACK_ENABLED_FLAG: u32 = 0x4;

// ---------------------------------------------------------------------------
// Operation type codes
// ---------------------------------------------------------------------------

const CREATE_ACCOUNT: i32 = 0;
const PAYMENT: i32 = 1;
const PATH_PAYMENT_STRICT_RECEIVE: i32 = 2;
const MANAGE_SELL_OFFER: i32 = 3;
const CREATE_PASSIVE_SELL_OFFER: i32 = 4;
const SET_OPTIONS: i32 = 5;
const CHANGE_TRUST: i32 = 6;
const ALLOW_TRUST: i32 = 7;
const ACCOUNT_MERGE: i32 = 8;
const INFLATION: i32 = 9;
const MANAGE_DATA: i32 = 10;
const BUMP_SEQUENCE: i32 = 11;
const MANAGE_BUY_OFFER: i32 = 12;
const PATH_PAYMENT_STRICT_SEND: i32 = 13;
const CREATE_CLAIMABLE_BALANCE: i32 = 14;
const CLAIM_CLAIMABLE_BALANCE: i32 = 15;
const BEGIN_SPONSORING_FUTURE_RESERVES: i32 = 16;
const END_SPONSORING_FUTURE_RESERVES: i32 = 17;
const REVOKE_SPONSORSHIP: i32 = 18;
const CLAWBACK: i32 = 19;
const CLAWBACK_CLAIMABLE_BALANCE: i32 = 20;
const SET_TRUST_LINE_FLAGS: i32 = 21;
const LIQUIDITY_POOL_DEPOSIT: i32 = 22;
const LIQUIDITY_POOL_WITHDRAW: i32 = 23;

// ---------------------------------------------------------------------------
// Fixed-layout bodies
// ---------------------------------------------------------------------------

xdr_struct! {
    /// Create and fund a new account.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct CreateAccountOp {
        pub destination: AccountId,
        pub starting_balance: i64,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct PaymentOp {
        pub destination: MuxedAccount,
        pub asset: Asset,
        pub amount: i64,
    }
}

xdr_struct! {
    /// Create, update (`amount > 0`) or delete (`amount == 0`) a sell offer.
    /// `offer_id == 0` creates a new one.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct ManageSellOfferOp {
        pub selling: Asset,
        pub buying: Asset,
        pub amount: i64,
        pub price: Price,
        pub offer_id: i64,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct CreatePassiveSellOfferOp {
        pub selling: Asset,
        pub buying: Asset,
        pub amount: i64,
        pub price: Price,
    }
}

xdr_struct! {
    /// Add, update or remove (`limit == 0`) a trustline.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct ChangeTrustOp {
        pub line: ChangeTrustAsset,
        pub limit: i64,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct BumpSequenceOp {
        pub bump_to: i64,
    }
}

xdr_struct! {
    /// Like [`ManageSellOfferOp`] but the amount is of the asset bought and
    /// the price is buying in terms of selling.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct ManageBuyOfferOp {
        pub selling: Asset,
        pub buying: Asset,
        pub buy_amount: i64,
        pub price: Price,
        pub offer_id: i64,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct ClaimClaimableBalanceOp {
        pub balance_id: ClaimableBalanceId,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct BeginSponsoringFutureReservesOp {
        pub sponsored_id: AccountId,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct ClawbackOp {
        pub asset: Asset,
        pub from: MuxedAccount,
        pub amount: i64,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct ClawbackClaimableBalanceOp {
        pub balance_id: ClaimableBalanceId,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SetTrustLineFlagsOp {
        pub trustor: AccountId,
        pub asset: Asset,
        pub clear_flags: u32,
        pub set_flags: u32,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct LiquidityPoolDepositOp {
        pub liquidity_pool_id: LiquidityPoolId,
        pub max_amount_a: i64,
        pub max_amount_b: i64,
        pub min_price: Price,
        pub max_price: Price,
    }
}

xdr_struct! {
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct LiquidityPoolWithdrawOp {
        pub liquidity_pool_id: LiquidityPoolId,
        pub amount: i64,
        pub min_amount_a: i64,
        pub min_amount_b: i64,
    }
}

xdr_struct! {
    /// An account signer and its weight. Weight 0 removes the signer.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct Signer {
        pub key: SignerKey,
        pub weight: u32,
    }
}

// ---------------------------------------------------------------------------
// Bodies with bounded fields
// ---------------------------------------------------------------------------

/// Send at most `send_max` so that the destination receives exactly
/// `dest_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPaymentStrictReceiveOp {
    pub send_asset: Asset,
    pub send_max: i64,
    pub destination: MuxedAccount,
    pub dest_asset: Asset,
    pub dest_amount: i64,
    /// Intermediate hops, at most 5.
    pub path: Vec<Asset>,
}

impl WriteXdr for PathPaymentStrictReceiveOp {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.send_asset.write_xdr(w);
        w.write_i64(self.send_max);
        self.destination.write_xdr(w);
        self.dest_asset.write_xdr(w);
        w.write_i64(self.dest_amount);
        w.write_var_array(&self.path);
    }
}

impl ReadXdr for PathPaymentStrictReceiveOp {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            send_asset: Asset::read_xdr(r)?,
            send_max: r.read_i64()?,
            destination: MuxedAccount::read_xdr(r)?,
            dest_asset: Asset::read_xdr(r)?,
            dest_amount: r.read_i64()?,
            path: r.read_var_array(MAX_PATH_LENGTH as u32)?,
        })
    }
}

/// Send exactly `send_amount` so that the destination receives at least
/// `dest_min`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPaymentStrictSendOp {
    pub send_asset: Asset,
    pub send_amount: i64,
    pub destination: MuxedAccount,
    pub dest_asset: Asset,
    pub dest_min: i64,
    /// Intermediate hops, at most 5.
    pub path: Vec<Asset>,
}

impl WriteXdr for PathPaymentStrictSendOp {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.send_asset.write_xdr(w);
        w.write_i64(self.send_amount);
        self.destination.write_xdr(w);
        self.dest_asset.write_xdr(w);
        w.write_i64(self.dest_min);
        w.write_var_array(&self.path);
    }
}

impl ReadXdr for PathPaymentStrictSendOp {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            send_asset: Asset::read_xdr(r)?,
            send_amount: r.read_i64()?,
            destination: MuxedAccount::read_xdr(r)?,
            dest_asset: Asset::read_xdr(r)?,
            dest_min: r.read_i64()?,
            path: r.read_var_array(MAX_PATH_LENGTH as u32)?,
        })
    }
}

/// Change account settings. Every field is optional; unset fields are left
/// as they are on the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SetOptionsOp {
    pub inflation_destination: Option<AccountId>,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
    pub master_key_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub medium_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    /// At most 32 bytes.
    pub home_domain: Option<String>,
    pub signer: Option<Signer>,
}

impl WriteXdr for SetOptionsOp {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.inflation_destination.write_xdr(w);
        self.clear_flags.write_xdr(w);
        self.set_flags.write_xdr(w);
        self.master_key_weight.write_xdr(w);
        self.low_threshold.write_xdr(w);
        self.medium_threshold.write_xdr(w);
        self.high_threshold.write_xdr(w);
        match &self.home_domain {
            Some(domain) => {
                w.write_bool(true);
                w.write_string(domain.as_bytes());
            }
            None => w.write_bool(false),
        }
        self.signer.write_xdr(w);
    }
}

impl ReadXdr for SetOptionsOp {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            inflation_destination: Option::read_xdr(r)?,
            clear_flags: Option::read_xdr(r)?,
            set_flags: Option::read_xdr(r)?,
            master_key_weight: Option::read_xdr(r)?,
            low_threshold: Option::read_xdr(r)?,
            medium_threshold: Option::read_xdr(r)?,
            high_threshold: Option::read_xdr(r)?,
            home_domain: if r.read_bool()? {
                Some(read_utf8_string(r, HOME_DOMAIN_MAX_BYTES)?)
            } else {
                None
            },
            signer: Option::read_xdr(r)?,
        })
    }
}

/// Deprecated issuer authorization of a trustline. The asset is named by
/// its code only; the issuer is the operation's source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllowTrustOp {
    pub trustor: AccountId,
    pub asset_code: String,
    /// One of the `TRUSTLINE_*` authorization flags, or 0 to revoke.
    pub authorize: u32,
}

impl WriteXdr for AllowTrustOp {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.trustor.write_xdr(w);
        if self.asset_code.len() <= asset::code::ALPHANUM4_MAX_LEN {
            w.write_discriminant(asset::ASSET_TYPE_CREDIT_ALPHANUM4);
            w.write_fixed_opaque(&asset::code::pad::<4>(&self.asset_code));
        } else {
            w.write_discriminant(asset::ASSET_TYPE_CREDIT_ALPHANUM12);
            w.write_fixed_opaque(&asset::code::pad::<12>(&self.asset_code));
        }
        w.write_u32(self.authorize);
    }
}

impl ReadXdr for AllowTrustOp {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let trustor = AccountId::read_xdr(r)?;
        let invalid = |e: asset::AssetError| XdrError::InvalidValue(e.to_string());
        let asset_code = match r.read_discriminant()? {
            asset::ASSET_TYPE_CREDIT_ALPHANUM4 => {
                asset::code::unpad(&r.read_fixed_opaque::<4>()?).map_err(invalid)?
            }
            asset::ASSET_TYPE_CREDIT_ALPHANUM12 => {
                let code = asset::code::unpad(&r.read_fixed_opaque::<12>()?).map_err(invalid)?;
                if code.len() <= asset::code::ALPHANUM4_MAX_LEN {
                    return Err(XdrError::InvalidValue(format!(
                        "alphanum12 code {code:?} is too short"
                    )));
                }
                code
            }
            other => return Err(XdrError::unknown_variant("AssetCode", other)),
        };
        Ok(Self {
            trustor,
            asset_code,
            authorize: r.read_u32()?,
        })
    }
}

/// Set, change or (with `data_value == None`) delete a data entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManageDataOp {
    /// 1 to 64 bytes.
    pub data_name: String,
    /// At most 64 bytes.
    pub data_value: Option<Vec<u8>>,
}

impl WriteXdr for ManageDataOp {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_string(self.data_name.as_bytes());
        match &self.data_value {
            Some(value) => {
                w.write_bool(true);
                w.write_var_opaque(value);
            }
            None => w.write_bool(false),
        }
    }
}

impl ReadXdr for ManageDataOp {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            data_name: read_utf8_string(r, DATA_ENTRY_MAX_BYTES)?,
            data_value: if r.read_bool()? {
                Some(r.read_var_opaque(DATA_ENTRY_MAX_BYTES as u32)?)
            } else {
                None
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreateClaimableBalanceOp {
    pub asset: Asset,
    pub amount: i64,
    /// 1 to 10 claimants.
    pub claimants: Vec<Claimant>,
}

impl WriteXdr for CreateClaimableBalanceOp {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.asset.write_xdr(w);
        w.write_i64(self.amount);
        w.write_var_array(&self.claimants);
    }
}

impl ReadXdr for CreateClaimableBalanceOp {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            asset: Asset::read_xdr(r)?,
            amount: r.read_i64()?,
            claimants: read_claimants(r)?,
        })
    }
}

// ---------------------------------------------------------------------------
// OperationBody
// ---------------------------------------------------------------------------

/// The operation union, one arm per classic operation type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    PathPaymentStrictReceive(PathPaymentStrictReceiveOp),
    ManageSellOffer(ManageSellOfferOp),
    CreatePassiveSellOffer(CreatePassiveSellOfferOp),
    SetOptions(SetOptionsOp),
    ChangeTrust(ChangeTrustOp),
    AllowTrust(AllowTrustOp),
    AccountMerge(MuxedAccount),
    Inflation,
    ManageData(ManageDataOp),
    BumpSequence(BumpSequenceOp),
    ManageBuyOffer(ManageBuyOfferOp),
    PathPaymentStrictSend(PathPaymentStrictSendOp),
    CreateClaimableBalance(CreateClaimableBalanceOp),
    ClaimClaimableBalance(ClaimClaimableBalanceOp),
    BeginSponsoringFutureReserves(BeginSponsoringFutureReservesOp),
    EndSponsoringFutureReserves,
    RevokeSponsorship(RevokeSponsorship),
    Clawback(ClawbackOp),
    ClawbackClaimableBalance(ClawbackClaimableBalanceOp),
    SetTrustLineFlags(SetTrustLineFlagsOp),
    LiquidityPoolDeposit(LiquidityPoolDepositOp),
    LiquidityPoolWithdraw(LiquidityPoolWithdrawOp),
}

impl OperationBody {
    /// The `OperationType` discriminant.
    pub fn type_code(&self) -> i32 {
        match self {
            Self::CreateAccount(_) => CREATE_ACCOUNT,
            Self::Payment(_) => PAYMENT,
            Self::PathPaymentStrictReceive(_) => PATH_PAYMENT_STRICT_RECEIVE,
            Self::ManageSellOffer(_) => MANAGE_SELL_OFFER,
            Self::CreatePassiveSellOffer(_) => CREATE_PASSIVE_SELL_OFFER,
            Self::SetOptions(_) => SET_OPTIONS,
            Self::ChangeTrust(_) => CHANGE_TRUST,
            Self::AllowTrust(_) => ALLOW_TRUST,
            Self::AccountMerge(_) => ACCOUNT_MERGE,
            Self::Inflation => INFLATION,
            Self::ManageData(_) => MANAGE_DATA,
            Self::BumpSequence(_) => BUMP_SEQUENCE,
            Self::ManageBuyOffer(_) => MANAGE_BUY_OFFER,
            Self::PathPaymentStrictSend(_) => PATH_PAYMENT_STRICT_SEND,
            Self::CreateClaimableBalance(_) => CREATE_CLAIMABLE_BALANCE,
            Self::ClaimClaimableBalance(_) => CLAIM_CLAIMABLE_BALANCE,
            Self::BeginSponsoringFutureReserves(_) => BEGIN_SPONSORING_FUTURE_RESERVES,
            Self::EndSponsoringFutureReserves => END_SPONSORING_FUTURE_RESERVES,
            Self::RevokeSponsorship(_) => REVOKE_SPONSORSHIP,
            Self::Clawback(_) => CLAWBACK,
            Self::ClawbackClaimableBalance(_) => CLAWBACK_CLAIMABLE_BALANCE,
            Self::SetTrustLineFlags(_) => SET_TRUST_LINE_FLAGS,
            Self::LiquidityPoolDeposit(_) => LIQUIDITY_POOL_DEPOSIT,
            Self::LiquidityPoolWithdraw(_) => LIQUIDITY_POOL_WITHDRAW,
        }
    }

    /// Snake-case operation name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAccount(_) => "create_account",
            Self::Payment(_) => "payment",
            Self::PathPaymentStrictReceive(_) => "path_payment_strict_receive",
            Self::ManageSellOffer(_) => "manage_sell_offer",
            Self::CreatePassiveSellOffer(_) => "create_passive_sell_offer",
            Self::SetOptions(_) => "set_options",
            Self::ChangeTrust(_) => "change_trust",
            Self::AllowTrust(_) => "allow_trust",
            Self::AccountMerge(_) => "account_merge",
            Self::Inflation => "inflation",
            Self::ManageData(_) => "manage_data",
            Self::BumpSequence(_) => "bump_sequence",
            Self::ManageBuyOffer(_) => "manage_buy_offer",
            Self::PathPaymentStrictSend(_) => "path_payment_strict_send",
            Self::CreateClaimableBalance(_) => "create_claimable_balance",
            Self::ClaimClaimableBalance(_) => "claim_claimable_balance",
            Self::BeginSponsoringFutureReserves(_) => "begin_sponsoring_future_reserves",
            Self::EndSponsoringFutureReserves => "end_sponsoring_future_reserves",
            Self::RevokeSponsorship(_) => "revoke_sponsorship",
            Self::Clawback(_) => "clawback",
            Self::ClawbackClaimableBalance(_) => "clawback_claimable_balance",
            Self::SetTrustLineFlags(_) => "set_trust_line_flags",
            Self::LiquidityPoolDeposit(_) => "liquidity_pool_deposit",
            Self::LiquidityPoolWithdraw(_) => "liquidity_pool_withdraw",
        }
    }

    /// Field rules a well-formed operation must satisfy: list and string
    /// bounds that the encoder would otherwise happily exceed, and amounts
    /// that can never be negative.
    pub(crate) fn check(&self) -> Result<(), String> {
        match self {
            Self::CreateAccount(op) => non_negative("starting_balance", op.starting_balance),
            Self::Payment(op) => positive("amount", op.amount),
            Self::PathPaymentStrictReceive(op) => {
                positive("send_max", op.send_max)?;
                positive("dest_amount", op.dest_amount)?;
                path_len(&op.path)
            }
            Self::PathPaymentStrictSend(op) => {
                positive("send_amount", op.send_amount)?;
                positive("dest_min", op.dest_min)?;
                path_len(&op.path)
            }
            Self::ManageSellOffer(op) => {
                non_negative("amount", op.amount)?;
                non_negative("offer_id", op.offer_id)?;
                price("price", &op.price)
            }
            Self::ManageBuyOffer(op) => {
                non_negative("buy_amount", op.buy_amount)?;
                non_negative("offer_id", op.offer_id)?;
                price("price", &op.price)
            }
            Self::CreatePassiveSellOffer(op) => {
                positive("amount", op.amount)?;
                price("price", &op.price)
            }
            Self::SetOptions(op) => match &op.home_domain {
                Some(domain) if domain.len() > HOME_DOMAIN_MAX_BYTES => Err(format!(
                    "home domain is {} bytes, maximum is {HOME_DOMAIN_MAX_BYTES}",
                    domain.len()
                )),
                _ => Ok(()),
            },
            Self::ChangeTrust(op) => non_negative("limit", op.limit),
            Self::AllowTrust(op) => {
                asset::code::validate(&op.asset_code).map_err(|e| e.to_string())
            }
            Self::ManageData(op) => {
                if op.data_name.is_empty() || op.data_name.len() > DATA_ENTRY_MAX_BYTES {
                    return Err(format!(
                        "data name must be 1 to {DATA_ENTRY_MAX_BYTES} bytes"
                    ));
                }
                match &op.data_value {
                    Some(value) if value.len() > DATA_ENTRY_MAX_BYTES => Err(format!(
                        "data value is {} bytes, maximum is {DATA_ENTRY_MAX_BYTES}",
                        value.len()
                    )),
                    _ => Ok(()),
                }
            }
            Self::BumpSequence(op) => non_negative("bump_to", op.bump_to),
            Self::CreateClaimableBalance(op) => {
                positive("amount", op.amount)?;
                if op.claimants.is_empty() || op.claimants.len() > MAX_CLAIMANTS {
                    return Err(format!(
                        "claimable balance needs 1 to {MAX_CLAIMANTS} claimants, got {}",
                        op.claimants.len()
                    ));
                }
                Ok(())
            }
            Self::Clawback(op) => positive("amount", op.amount),
            Self::LiquidityPoolDeposit(op) => {
                positive("max_amount_a", op.max_amount_a)?;
                positive("max_amount_b", op.max_amount_b)?;
                price("min_price", &op.min_price)?;
                price("max_price", &op.max_price)
            }
            Self::LiquidityPoolWithdraw(op) => {
                positive("amount", op.amount)?;
                non_negative("min_amount_a", op.min_amount_a)?;
                non_negative("min_amount_b", op.min_amount_b)
            }
            Self::AccountMerge(_)
            | Self::Inflation
            | Self::ClaimClaimableBalance(_)
            | Self::BeginSponsoringFutureReserves(_)
            | Self::EndSponsoringFutureReserves
            | Self::RevokeSponsorship(_)
            | Self::ClawbackClaimableBalance(_)
            | Self::SetTrustLineFlags(_) => Ok(()),
        }
    }
}

fn non_negative(field: &str, value: i64) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{field} must not be negative, got {value}"));
    }
    Ok(())
}

fn positive(field: &str, value: i64) -> Result<(), String> {
    if value <= 0 {
        return Err(format!("{field} must be positive, got {value}"));
    }
    Ok(())
}

fn price(field: &str, value: &Price) -> Result<(), String> {
    if value.n <= 0 || value.d <= 0 {
        return Err(format!("{field} must be a positive fraction, got {value}"));
    }
    Ok(())
}

fn path_len(path: &[Asset]) -> Result<(), String> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(format!(
            "payment path has {} hops, maximum is {MAX_PATH_LENGTH}",
            path.len()
        ));
    }
    Ok(())
}

impl WriteXdr for OperationBody {
    fn write_xdr(&self, w: &mut XdrWriter) {
        w.write_discriminant(self.type_code());
        match self {
            Self::CreateAccount(op) => op.write_xdr(w),
            Self::Payment(op) => op.write_xdr(w),
            Self::PathPaymentStrictReceive(op) => op.write_xdr(w),
            Self::ManageSellOffer(op) => op.write_xdr(w),
            Self::CreatePassiveSellOffer(op) => op.write_xdr(w),
            Self::SetOptions(op) => op.write_xdr(w),
            Self::ChangeTrust(op) => op.write_xdr(w),
            Self::AllowTrust(op) => op.write_xdr(w),
            Self::AccountMerge(destination) => destination.write_xdr(w),
            Self::Inflation | Self::EndSponsoringFutureReserves => {}
            Self::ManageData(op) => op.write_xdr(w),
            Self::BumpSequence(op) => op.write_xdr(w),
            Self::ManageBuyOffer(op) => op.write_xdr(w),
            Self::PathPaymentStrictSend(op) => op.write_xdr(w),
            Self::CreateClaimableBalance(op) => op.write_xdr(w),
            Self::ClaimClaimableBalance(op) => op.write_xdr(w),
            Self::BeginSponsoringFutureReserves(op) => op.write_xdr(w),
            Self::RevokeSponsorship(op) => op.write_xdr(w),
            Self::Clawback(op) => op.write_xdr(w),
            Self::ClawbackClaimableBalance(op) => op.write_xdr(w),
            Self::SetTrustLineFlags(op) => op.write_xdr(w),
            Self::LiquidityPoolDeposit(op) => op.write_xdr(w),
            Self::LiquidityPoolWithdraw(op) => op.write_xdr(w),
        }
    }
}

impl ReadXdr for OperationBody {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let body = match r.read_discriminant()? {
            CREATE_ACCOUNT => Self::CreateAccount(ReadXdr::read_xdr(r)?),
            PAYMENT => Self::Payment(ReadXdr::read_xdr(r)?),
            PATH_PAYMENT_STRICT_RECEIVE => Self::PathPaymentStrictReceive(ReadXdr::read_xdr(r)?),
            MANAGE_SELL_OFFER => Self::ManageSellOffer(ReadXdr::read_xdr(r)?),
            CREATE_PASSIVE_SELL_OFFER => Self::CreatePassiveSellOffer(ReadXdr::read_xdr(r)?),
            SET_OPTIONS => Self::SetOptions(ReadXdr::read_xdr(r)?),
            CHANGE_TRUST => Self::ChangeTrust(ReadXdr::read_xdr(r)?),
            ALLOW_TRUST => Self::AllowTrust(ReadXdr::read_xdr(r)?),
            ACCOUNT_MERGE => Self::AccountMerge(ReadXdr::read_xdr(r)?),
            INFLATION => Self::Inflation,
            MANAGE_DATA => Self::ManageData(ReadXdr::read_xdr(r)?),
            BUMP_SEQUENCE => Self::BumpSequence(ReadXdr::read_xdr(r)?),
            MANAGE_BUY_OFFER => Self::ManageBuyOffer(ReadXdr::read_xdr(r)?),
            PATH_PAYMENT_STRICT_SEND => Self::PathPaymentStrictSend(ReadXdr::read_xdr(r)?),
            CREATE_CLAIMABLE_BALANCE => Self::CreateClaimableBalance(ReadXdr::read_xdr(r)?),
            CLAIM_CLAIMABLE_BALANCE => Self::ClaimClaimableBalance(ReadXdr::read_xdr(r)?),
            BEGIN_SPONSORING_FUTURE_RESERVES => {
                Self::BeginSponsoringFutureReserves(ReadXdr::read_xdr(r)?)
            }
            END_SPONSORING_FUTURE_RESERVES => Self::EndSponsoringFutureReserves,
            REVOKE_SPONSORSHIP => Self::RevokeSponsorship(ReadXdr::read_xdr(r)?),
            CLAWBACK => Self::Clawback(ReadXdr::read_xdr(r)?),
            CLAWBACK_CLAIMABLE_BALANCE => Self::ClawbackClaimableBalance(ReadXdr::read_xdr(r)?),
            SET_TRUST_LINE_FLAGS => Self::SetTrustLineFlags(ReadXdr::read_xdr(r)?),
            LIQUIDITY_POOL_DEPOSIT => Self::LiquidityPoolDeposit(ReadXdr::read_xdr(r)?),
            LIQUIDITY_POOL_WITHDRAW => Self::LiquidityPoolWithdraw(ReadXdr::read_xdr(r)?),
            other => return Err(XdrError::unknown_variant("OperationType", other)),
        };
        Ok(body)
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One operation: a body and an optional source account that overrides the
/// transaction's source for this operation only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    pub source_account: Option<MuxedAccount>,
    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Self {
            source_account: None,
            body,
        }
    }

    pub fn with_source(mut self, source: impl Into<MuxedAccount>) -> Self {
        self.source_account = Some(source.into());
        self
    }

    pub fn create_account(destination: AccountId, starting_balance: i64) -> Self {
        Self::new(OperationBody::CreateAccount(CreateAccountOp {
            destination,
            starting_balance,
        }))
    }

    pub fn payment(destination: impl Into<MuxedAccount>, asset: Asset, amount: i64) -> Self {
        Self::new(OperationBody::Payment(PaymentOp {
            destination: destination.into(),
            asset,
            amount,
        }))
    }

    pub fn change_trust(line: impl Into<ChangeTrustAsset>, limit: i64) -> Self {
        Self::new(OperationBody::ChangeTrust(ChangeTrustOp {
            line: line.into(),
            limit,
        }))
    }

    pub fn manage_data(name: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        Self::new(OperationBody::ManageData(ManageDataOp {
            data_name: name.into(),
            data_value: value,
        }))
    }

    pub fn bump_sequence(bump_to: i64) -> Self {
        Self::new(OperationBody::BumpSequence(BumpSequenceOp { bump_to }))
    }

    pub fn account_merge(destination: impl Into<MuxedAccount>) -> Self {
        Self::new(OperationBody::AccountMerge(destination.into()))
    }

    pub fn create_claimable_balance(asset: Asset, amount: i64, claimants: Vec<Claimant>) -> Self {
        Self::new(OperationBody::CreateClaimableBalance(CreateClaimableBalanceOp {
            asset,
            amount,
            claimants,
        }))
    }

    pub fn claim_claimable_balance(balance_id: ClaimableBalanceId) -> Self {
        Self::new(OperationBody::ClaimClaimableBalance(ClaimClaimableBalanceOp {
            balance_id,
        }))
    }
}

impl WriteXdr for Operation {
    fn write_xdr(&self, w: &mut XdrWriter) {
        self.source_account.write_xdr(w);
        self.body.write_xdr(w);
    }
}

impl ReadXdr for Operation {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            source_account: Option::read_xdr(r)?,
            body: OperationBody::read_xdr(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::LiquidityPoolParameters;
    use crate::transaction::claim::ClaimPredicate;
    use crate::transaction::sponsorship::LedgerKey;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    fn usd() -> Asset {
        Asset::credit("USD", account(1)).unwrap()
    }

    fn eurt() -> Asset {
        Asset::credit("EURTOKEN", account(2)).unwrap()
    }

    fn every_body() -> Vec<OperationBody> {
        let pool = LiquidityPoolParameters::constant_product(Asset::Native, usd()).unwrap();
        vec![
            OperationBody::CreateAccount(CreateAccountOp {
                destination: account(3),
                starting_balance: 10_000_000,
            }),
            OperationBody::Payment(PaymentOp {
                destination: MuxedAccount::with_id(account(3), 7),
                asset: usd(),
                amount: 1,
            }),
            OperationBody::PathPaymentStrictReceive(PathPaymentStrictReceiveOp {
                send_asset: Asset::Native,
                send_max: 100,
                destination: account(3).into(),
                dest_asset: usd(),
                dest_amount: 50,
                path: vec![eurt()],
            }),
            OperationBody::ManageSellOffer(ManageSellOfferOp {
                selling: usd(),
                buying: Asset::Native,
                amount: 5,
                price: Price::new(1, 2),
                offer_id: 0,
            }),
            OperationBody::CreatePassiveSellOffer(CreatePassiveSellOfferOp {
                selling: usd(),
                buying: eurt(),
                amount: 5,
                price: Price::new(3, 1),
            }),
            OperationBody::SetOptions(SetOptionsOp {
                set_flags: Some(AUTH_REQUIRED_FLAG | AUTH_REVOCABLE_FLAG),
                home_domain: Some("example.com".into()),
                signer: Some(Signer {
                    key: SignerKey::HashX([4; 32]),
                    weight: 1,
                }),
                ..SetOptionsOp::default()
            }),
            OperationBody::ChangeTrust(ChangeTrustOp {
                line: pool.into(),
                limit: i64::MAX,
            }),
            OperationBody::AllowTrust(AllowTrustOp {
                trustor: account(3),
                asset_code: "EURTOKEN".into(),
                authorize: TRUSTLINE_AUTHORIZED_FLAG,
            }),
            OperationBody::AccountMerge(account(3).into()),
            OperationBody::Inflation,
            OperationBody::ManageData(ManageDataOp {
                data_name: "key".into(),
                data_value: Some(vec![1, 2, 3]),
            }),
            OperationBody::BumpSequence(BumpSequenceOp { bump_to: 99 }),
            OperationBody::ManageBuyOffer(ManageBuyOfferOp {
                selling: Asset::Native,
                buying: usd(),
                buy_amount: 9,
                price: Price::new(2, 3),
                offer_id: 12,
            }),
            OperationBody::PathPaymentStrictSend(PathPaymentStrictSendOp {
                send_asset: usd(),
                send_amount: 10,
                destination: account(3).into(),
                dest_asset: Asset::Native,
                dest_min: 1,
                path: vec![],
            }),
            OperationBody::CreateClaimableBalance(CreateClaimableBalanceOp {
                asset: Asset::Native,
                amount: 10,
                claimants: vec![Claimant::new(account(3), ClaimPredicate::Unconditional)],
            }),
            OperationBody::ClaimClaimableBalance(ClaimClaimableBalanceOp {
                balance_id: ClaimableBalanceId::from_hash([5; 32]),
            }),
            OperationBody::BeginSponsoringFutureReserves(BeginSponsoringFutureReservesOp {
                sponsored_id: account(3),
            }),
            OperationBody::EndSponsoringFutureReserves,
            OperationBody::RevokeSponsorship(RevokeSponsorship::LedgerEntry(
                LedgerKey::Account {
                    account_id: account(3),
                },
            )),
            OperationBody::Clawback(ClawbackOp {
                asset: usd(),
                from: account(3).into(),
                amount: 4,
            }),
            OperationBody::ClawbackClaimableBalance(ClawbackClaimableBalanceOp {
                balance_id: ClaimableBalanceId::from_hash([6; 32]),
            }),
            OperationBody::SetTrustLineFlags(SetTrustLineFlagsOp {
                trustor: account(3),
                asset: usd(),
                clear_flags: TRUSTLINE_AUTHORIZED_FLAG,
                set_flags: TRUSTLINE_AUTHORIZED_TO_MAINTAIN_LIABILITIES_FLAG,
            }),
            OperationBody::LiquidityPoolDeposit(LiquidityPoolDepositOp {
                liquidity_pool_id: pool.pool_id(),
                max_amount_a: 100,
                max_amount_b: 200,
                min_price: Price::new(1, 2),
                max_price: Price::new(2, 1),
            }),
            OperationBody::LiquidityPoolWithdraw(LiquidityPoolWithdrawOp {
                liquidity_pool_id: pool.pool_id(),
                amount: 100,
                min_amount_a: 0,
                min_amount_b: 0,
            }),
        ]
    }

    #[test]
    fn test_every_operation_type_roundtrips() {
        let bodies = every_body();
        assert_eq!(bodies.len(), 24);
        for (code, body) in bodies.into_iter().enumerate() {
            assert_eq!(body.type_code(), code as i32, "{}", body.name());
            assert!(body.check().is_ok(), "{}", body.name());
            let op = Operation::new(body).with_source(MuxedAccount::with_id(account(9), 1));
            let bytes = op.to_xdr();
            assert_eq!(Operation::from_xdr(&bytes).unwrap(), op);
        }
    }

    #[test]
    fn test_payment_layout() {
        let op = Operation::payment(account(3), Asset::Native, 10);
        let bytes = op.to_xdr();
        // no source, type 1, ed25519 destination, native asset, amount
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(bytes.len(), 4 + 4 + 36 + 4 + 8);
        assert_eq!(&bytes[bytes.len() - 8..], &10i64.to_be_bytes());
    }

    #[test]
    fn test_smart_contract_operations_are_unknown() {
        for code in [24, 25, 26] {
            let mut w = XdrWriter::new();
            w.write_bool(false);
            w.write_discriminant(code);
            assert_eq!(
                Operation::from_xdr(w.as_bytes()),
                Err(XdrError::unknown_variant("OperationType", code))
            );
        }
    }

    #[test]
    fn test_path_longer_than_five_rejected() {
        let body = OperationBody::PathPaymentStrictSend(PathPaymentStrictSendOp {
            send_asset: usd(),
            send_amount: 10,
            destination: account(3).into(),
            dest_asset: Asset::Native,
            dest_min: 1,
            path: vec![eurt(); 6],
        });
        assert!(body.check().is_err());
        let bytes = body.to_xdr();
        assert!(OperationBody::from_xdr(&bytes).unwrap_err().is_malformed());
    }

    #[test]
    fn test_claimant_count_bounds() {
        let claimant = Claimant::new(account(3), ClaimPredicate::Unconditional);
        let none = Operation::create_claimable_balance(Asset::Native, 1, vec![]);
        let eleven = Operation::create_claimable_balance(Asset::Native, 1, vec![claimant; 11]);
        assert!(none.body.check().is_err());
        assert!(eleven.body.check().is_err());
        assert!(OperationBody::from_xdr(&eleven.body.to_xdr())
            .unwrap_err()
            .is_malformed());
    }

    #[test]
    fn test_manage_data_bounds() {
        assert!(Operation::manage_data("", None).body.check().is_err());
        assert!(Operation::manage_data("a".repeat(65), None).body.check().is_err());
        assert!(Operation::manage_data("a".repeat(64), Some(vec![0; 64]))
            .body
            .check()
            .is_ok());
        assert!(Operation::manage_data("a", Some(vec![0; 65]))
            .body
            .check()
            .is_err());
    }

    #[test]
    fn test_delete_data_entry_encodes_absent_value() {
        let op = Operation::manage_data("k", None);
        let bytes = op.body.to_xdr();
        assert_eq!(bytes, vec![0, 0, 0, 10, 0, 0, 0, 1, b'k', 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_home_domain_limit() {
        let body = OperationBody::SetOptions(SetOptionsOp {
            home_domain: Some("a".repeat(33)),
            ..SetOptionsOp::default()
        });
        assert!(body.check().is_err());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert!(Operation::payment(account(3), Asset::Native, -1).body.check().is_err());
        assert!(Operation::payment(account(3), Asset::Native, 0).body.check().is_err());
        assert!(Operation::create_account(account(3), 0).body.check().is_ok());
        assert!(Operation::change_trust(usd(), -5).body.check().is_err());
    }

    #[test]
    fn test_allow_trust_code_width() {
        let short = AllowTrustOp {
            trustor: account(3),
            asset_code: "USD".into(),
            authorize: 1,
        };
        let bytes = short.to_xdr();
        assert_eq!(&bytes[36..40], &[0, 0, 0, 1]);
        assert_eq!(&bytes[40..44], b"USD\0");
        assert_eq!(AllowTrustOp::from_xdr(&bytes).unwrap(), short);
    }
}
