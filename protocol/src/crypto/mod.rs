//! # Cryptographic Primitives
//!
//! Everything signing- or hashing-related flows through here:
//!
//! - **Ed25519** keypairs and signatures ([`keys`], [`signatures`]).
//! - **SHA-256** for every network identifier ([`hash`]).
//! - **SLIP-10** hardened derivation for SEP-5 accounts ([`slip10`]).
//!
//! Everything here is a thin, type-safe wrapper around `ed25519-dalek`,
//! `sha2` and `hmac`. Nothing is hand-rolled.

pub mod hash;
pub mod keys;
pub mod signatures;
pub mod slip10;

pub use hash::{sha256, sha256_hex};
pub use keys::{KeyError, KeyPair};
pub use signatures::{
    ed25519_hint, hash_x_hint, signed_payload_hint, verify, DecoratedSignature, SignatureError,
    SignatureHint,
};
pub use slip10::ExtendedKey;
