//! Crate-wide error type.
//!
//! Every module has its own error enum; [`Error`] wraps each of them so
//! callers that mix modules can use a single [`Result`].

use thiserror::Error;

use crate::asset::AssetError;
use crate::crypto::{KeyError, SignatureError};
use crate::identity::IdentityError;
use crate::ids::{IdError, ToidError};
use crate::logging::LoggingError;
use crate::strkey::StrKeyError;
use crate::transaction::{TransactionError, ValidationError};
use crate::xdr::XdrError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("xdr: {0}")]
    Xdr(#[from] XdrError),

    #[error("strkey: {0}")]
    StrKey(#[from] StrKeyError),

    #[error("key: {0}")]
    Key(#[from] KeyError),

    #[error("signature: {0}")]
    Signature(#[from] SignatureError),

    #[error("identity: {0}")]
    Identity(#[from] IdentityError),

    #[error("asset: {0}")]
    Asset(#[from] AssetError),

    #[error("preconditions: {0}")]
    Validation(#[from] ValidationError),

    #[error("transaction: {0}")]
    Transaction(#[from] TransactionError),

    #[error("claimable balance id: {0}")]
    Id(#[from] IdError),

    #[error("toid: {0}")]
    Toid(#[from] ToidError),

    #[error("logging: {0}")]
    Logging(#[from] LoggingError),
}

pub type Result<T> = std::result::Result<T, Error>;
