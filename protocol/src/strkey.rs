//! # StrKey Encoding
//!
//! Human-readable, checksummed text for raw key, hash and address bytes.
//! A StrKey is the unpadded RFC 4648 base32 encoding of
//!
//! ```text
//! version_byte || payload || crc16_xmodem(version_byte || payload)  (little-endian)
//! ```
//!
//! The version byte is always a multiple of 8, so the first base32 character
//! tells you what you're looking at: `G` account, `M` muxed account, `S`
//! secret seed, `T` pre-authorized transaction, `X` hash-x signer, `P` signed
//! payload signer, `C` contract.
//!
//! ## Decoding is strict
//!
//! Base32 is not injective on its own: the final symbol can carry bits that
//! are thrown away. Two different strings would then decode to the same key,
//! which is a phishing vector for addresses. [`decode_check`] therefore runs
//! a fixed pipeline, each step with its own [`StrKeyError`] variant:
//!
//! 1. minimum length (5 characters, the encoding of version + checksum);
//! 2. alphabet and base32 length validity;
//! 3. decoded length matches what the version byte requires;
//! 4. unused bits of the last symbol are zero;
//! 5. version byte matches;
//! 6. checksum matches.

use std::fmt;

use crc::{Crc, CRC_16_XMODEM};
use data_encoding::BASE32_NOPAD;
use thiserror::Error;

use crate::config::SIGNED_PAYLOAD_MAX_BYTES;

const XMODEM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Version byte plus checksum: the smallest possible StrKey body.
const MIN_ENCODED_LEN: usize = 5;

/// Key (32) + length prefix (4): the fixed part of a signed payload body.
const SIGNED_PAYLOAD_HEADER_LEN: usize = 36;

// ---------------------------------------------------------------------------
// VersionByte
// ---------------------------------------------------------------------------

/// The kinds of data a StrKey can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionByte {
    /// `G...`: an ed25519 public key used as an account ID.
    AccountId,
    /// `M...`: an ed25519 key plus a 64-bit multiplexing id.
    MuxedAccount,
    /// `S...`: an ed25519 secret seed.
    Seed,
    /// `T...`: the hash of a pre-authorized transaction.
    PreAuthTx,
    /// `X...`: the SHA-256 hash of a hash-x signer preimage.
    Sha256Hash,
    /// `P...`: an ed25519 signed-payload signer.
    SignedPayload,
    /// `C...`: a contract ID.
    Contract,
}

impl VersionByte {
    pub const ALL: [VersionByte; 7] = [
        VersionByte::AccountId,
        VersionByte::MuxedAccount,
        VersionByte::Seed,
        VersionByte::PreAuthTx,
        VersionByte::Sha256Hash,
        VersionByte::SignedPayload,
        VersionByte::Contract,
    ];

    /// The raw byte prepended to the payload.
    pub const fn byte(self) -> u8 {
        match self {
            Self::AccountId => 6 << 3,
            Self::MuxedAccount => 12 << 3,
            Self::Seed => 18 << 3,
            Self::PreAuthTx => 19 << 3,
            Self::Sha256Hash => 23 << 3,
            Self::SignedPayload => 15 << 3,
            Self::Contract => 2 << 3,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.byte() == byte)
    }

    /// The leading character of every StrKey of this kind.
    pub const fn prefix(self) -> char {
        match self {
            Self::AccountId => 'G',
            Self::MuxedAccount => 'M',
            Self::Seed => 'S',
            Self::PreAuthTx => 'T',
            Self::Sha256Hash => 'X',
            Self::SignedPayload => 'P',
            Self::Contract => 'C',
        }
    }

    /// Whether a decoded body (version + payload + checksum) of `len` bytes
    /// is acceptable for this version.
    fn accepts_decoded_len(self, len: usize) -> bool {
        match self {
            Self::MuxedAccount => len == 1 + 40 + 2,
            Self::SignedPayload => {
                let min = 1 + SIGNED_PAYLOAD_HEADER_LEN + 4 + 2;
                let max = 1 + SIGNED_PAYLOAD_HEADER_LEN + SIGNED_PAYLOAD_MAX_BYTES + 2;
                (min..=max).contains(&len)
            }
            _ => len == 1 + 32 + 2,
        }
    }
}

impl fmt::Display for VersionByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AccountId => "account id",
            Self::MuxedAccount => "muxed account",
            Self::Seed => "secret seed",
            Self::PreAuthTx => "pre-auth tx",
            Self::Sha256Hash => "sha256 hash",
            Self::SignedPayload => "signed payload",
            Self::Contract => "contract",
        };
        write!(f, "{} ({})", name, self.prefix())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a string is not a valid StrKey of the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrKeyError {
    #[error("strkey too short: {len} characters, need at least 5")]
    TooShort { len: usize },

    #[error("invalid base32 character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("{len} characters is not a valid unpadded base32 length")]
    InvalidEncodedLength { len: usize },

    #[error("decoded length {len} is invalid for {version}")]
    InvalidLength { version: VersionByte, len: usize },

    #[error("unused trailing bits must be zero")]
    NonZeroUnusedBits,

    #[error("version byte mismatch: expected {expected}, found 0x{found:02x}")]
    InvalidVersionByte { expected: VersionByte, found: u8 },

    #[error("unknown version byte 0x{0:02x}")]
    UnknownVersionByte(u8),

    #[error("checksum mismatch")]
    InvalidChecksum,

    /// The signed-payload body is internally inconsistent.
    #[error("invalid signed payload: {0}")]
    InvalidSignedPayload(&'static str),
}

// ---------------------------------------------------------------------------
// Core codec
// ---------------------------------------------------------------------------

/// CRC16-XMODEM over `data`.
pub fn checksum(data: &[u8]) -> [u8; 2] {
    XMODEM.checksum(data).to_le_bytes()
}

/// Encode `payload` under `version`.
pub fn encode_check(version: VersionByte, payload: &[u8]) -> String {
    let mut body = Vec::with_capacity(payload.len() + 3);
    body.push(version.byte());
    body.extend_from_slice(payload);
    let crc = checksum(&body);
    body.extend_from_slice(&crc);
    BASE32_NOPAD.encode(&body)
}

/// Decode a StrKey that must be of kind `version`, returning the payload.
pub fn decode_check(version: VersionByte, encoded: &str) -> Result<Vec<u8>, StrKeyError> {
    let body = decode_body(encoded, Some(version))?;
    let found = body[0];
    if found != version.byte() {
        return Err(StrKeyError::InvalidVersionByte {
            expected: version,
            found,
        });
    }
    verify_checksum(&body)?;
    Ok(body[1..body.len() - 2].to_vec())
}

/// Identify the kind of a StrKey without validating its length or checksum.
pub fn decode_version_byte(encoded: &str) -> Result<VersionByte, StrKeyError> {
    let body = decode_body(encoded, None)?;
    VersionByte::from_byte(body[0]).ok_or(StrKeyError::UnknownVersionByte(body[0]))
}

/// Pipeline steps 1-4: everything that can be checked before the version byte.
fn decode_body(encoded: &str, version: Option<VersionByte>) -> Result<Vec<u8>, StrKeyError> {
    let bytes = encoded.as_bytes();
    let len = bytes.len();
    if len < MIN_ENCODED_LEN {
        return Err(StrKeyError::TooShort { len });
    }

    let mut last_value = 0u8;
    for (position, &b) in bytes.iter().enumerate() {
        last_value = base32_value(b).ok_or(StrKeyError::InvalidCharacter {
            ch: char::from(b),
            position,
        })?;
    }

    // A final group of five or more leftover bits would be a whole unused
    // character, which no encoder produces.
    let leftover_bits = (len * 5) % 8;
    if leftover_bits >= 5 {
        return Err(StrKeyError::InvalidEncodedLength { len });
    }

    let decoded_len = len * 5 / 8;
    if let Some(version) = version {
        if !version.accepts_decoded_len(decoded_len) {
            return Err(StrKeyError::InvalidLength {
                version,
                len: decoded_len,
            });
        }
    }

    if leftover_bits > 0 {
        let mask = 0x0f_u8 >> (4 - leftover_bits);
        if last_value & mask != 0 {
            return Err(StrKeyError::NonZeroUnusedBits);
        }
    }

    BASE32_NOPAD
        .decode(bytes)
        .map_err(|_| StrKeyError::InvalidEncodedLength { len })
}

fn verify_checksum(body: &[u8]) -> Result<(), StrKeyError> {
    let split = body.len() - 2;
    let expected = checksum(&body[..split]);
    if body[split..] != expected {
        return Err(StrKeyError::InvalidChecksum);
    }
    Ok(())
}

fn base32_value(symbol: u8) -> Option<u8> {
    match symbol {
        b'A'..=b'Z' => Some(symbol - b'A'),
        b'2'..=b'7' => Some(symbol - b'2' + 26),
        _ => None,
    }
}

fn decode_32(version: VersionByte, encoded: &str) -> Result<[u8; 32], StrKeyError> {
    let payload = decode_check(version, encoded)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&payload);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

pub fn encode_account_id(key: &[u8; 32]) -> String {
    encode_check(VersionByte::AccountId, key)
}

pub fn decode_account_id(encoded: &str) -> Result<[u8; 32], StrKeyError> {
    decode_32(VersionByte::AccountId, encoded)
}

pub fn encode_secret_seed(seed: &[u8; 32]) -> String {
    encode_check(VersionByte::Seed, seed)
}

pub fn decode_secret_seed(encoded: &str) -> Result<[u8; 32], StrKeyError> {
    decode_32(VersionByte::Seed, encoded)
}

pub fn encode_pre_auth_tx(hash: &[u8; 32]) -> String {
    encode_check(VersionByte::PreAuthTx, hash)
}

pub fn decode_pre_auth_tx(encoded: &str) -> Result<[u8; 32], StrKeyError> {
    decode_32(VersionByte::PreAuthTx, encoded)
}

pub fn encode_sha256_hash(hash: &[u8; 32]) -> String {
    encode_check(VersionByte::Sha256Hash, hash)
}

pub fn decode_sha256_hash(encoded: &str) -> Result<[u8; 32], StrKeyError> {
    decode_32(VersionByte::Sha256Hash, encoded)
}

pub fn encode_contract(id: &[u8; 32]) -> String {
    encode_check(VersionByte::Contract, id)
}

pub fn decode_contract(encoded: &str) -> Result<[u8; 32], StrKeyError> {
    decode_32(VersionByte::Contract, encoded)
}

/// `M...` address: key followed by the id as 8 big-endian bytes.
pub fn encode_muxed_account(key: &[u8; 32], id: u64) -> String {
    let mut payload = [0u8; 40];
    payload[..32].copy_from_slice(key);
    payload[32..].copy_from_slice(&id.to_be_bytes());
    encode_check(VersionByte::MuxedAccount, &payload)
}

pub fn decode_muxed_account(encoded: &str) -> Result<([u8; 32], u64), StrKeyError> {
    let payload = decode_check(VersionByte::MuxedAccount, encoded)?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&payload[..32]);
    let mut id = [0u8; 8];
    id.copy_from_slice(&payload[32..40]);
    Ok((key, u64::from_be_bytes(id)))
}

/// `P...` signer: key, 4-byte big-endian payload length, payload, zero padding.
///
/// Callers pass a payload of 1 to 64 bytes; anything else is rejected.
pub fn encode_signed_payload(key: &[u8; 32], payload: &[u8]) -> Result<String, StrKeyError> {
    if payload.is_empty() {
        return Err(StrKeyError::InvalidSignedPayload("payload is empty"));
    }
    if payload.len() > SIGNED_PAYLOAD_MAX_BYTES {
        return Err(StrKeyError::InvalidSignedPayload("payload longer than 64 bytes"));
    }
    let padding = (4 - payload.len() % 4) % 4;
    let mut body = Vec::with_capacity(SIGNED_PAYLOAD_HEADER_LEN + payload.len() + padding);
    body.extend_from_slice(key);
    body.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    body.extend_from_slice(payload);
    body.extend(std::iter::repeat(0u8).take(padding));
    Ok(encode_check(VersionByte::SignedPayload, &body))
}

pub fn decode_signed_payload(encoded: &str) -> Result<([u8; 32], Vec<u8>), StrKeyError> {
    let body = decode_check(VersionByte::SignedPayload, encoded)?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&body[..32]);
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&body[32..SIGNED_PAYLOAD_HEADER_LEN]);
    let declared = u32::from_be_bytes(len_bytes) as usize;
    if declared == 0 || declared > SIGNED_PAYLOAD_MAX_BYTES {
        return Err(StrKeyError::InvalidSignedPayload("declared length out of range"));
    }
    let padded = declared + (4 - declared % 4) % 4;
    if body.len() != SIGNED_PAYLOAD_HEADER_LEN + padded {
        return Err(StrKeyError::InvalidSignedPayload(
            "declared length does not match body",
        ));
    }
    let payload_end = SIGNED_PAYLOAD_HEADER_LEN + declared;
    if body[payload_end..].iter().any(|b| *b != 0) {
        return Err(StrKeyError::InvalidSignedPayload("non-zero padding"));
    }
    Ok((key, body[SIGNED_PAYLOAD_HEADER_LEN..payload_end].to_vec()))
}

pub fn is_valid_account_id(encoded: &str) -> bool {
    decode_account_id(encoded).is_ok()
}

pub fn is_valid_secret_seed(encoded: &str) -> bool {
    decode_secret_seed(encoded).is_ok()
}

pub fn is_valid_muxed_account(encoded: &str) -> bool {
    decode_muxed_account(encoded).is_ok()
}

pub fn is_valid_pre_auth_tx(encoded: &str) -> bool {
    decode_pre_auth_tx(encoded).is_ok()
}

pub fn is_valid_sha256_hash(encoded: &str) -> bool {
    decode_sha256_hash(encoded).is_ok()
}

pub fn is_valid_signed_payload(encoded: &str) -> bool {
    decode_signed_payload(encoded).is_ok()
}

pub fn is_valid_contract(encoded: &str) -> bool {
    decode_contract(encoded).is_ok()
}
