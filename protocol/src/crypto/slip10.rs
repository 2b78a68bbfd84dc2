//! SLIP-10 hierarchical derivation for ed25519 keys.
//!
//! ed25519 only supports hardened derivation, so every index is forced into
//! the hardened range (`index | 0x8000_0000`) whether or not the caller set
//! the high bit. `m/44'/148'/0'` and `m/44/148/0` name the same key.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::hash::hmac_sha512;
use super::keys::KeyError;

/// Offset added to every derivation index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

/// A derived private key with its chain code.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedKey {
    /// The master node for `seed` (usually a 64-byte BIP-39 seed).
    pub fn master(seed: &[u8]) -> Result<Self, KeyError> {
        let digest = hmac_sha512(MASTER_HMAC_KEY, &[seed]).ok_or(KeyError::Derivation)?;
        Ok(Self::from_digest(&digest))
    }

    /// Derive the hardened child at `index`.
    pub fn derive_child(&self, index: u32) -> Result<Self, KeyError> {
        let hardened = (index | HARDENED_OFFSET).to_be_bytes();
        let digest = hmac_sha512(&self.chain_code, &[&[0u8], &self.key, &hardened])
            .ok_or(KeyError::Derivation)?;
        Ok(Self::from_digest(&digest))
    }

    /// Walk `path` from the master node of `seed`.
    pub fn derive_path(seed: &[u8], path: &[u32]) -> Result<Self, KeyError> {
        path.iter()
            .try_fold(Self::master(seed)?, |node, index| node.derive_child(*index))
    }

    /// The 32-byte ed25519 seed at this node.
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    fn from_digest(digest: &[u8; 64]) -> Self {
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
        Self { key, chain_code }
    }
}

impl std::fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExtendedKey(..)")
    }
}

/// Parse a textual path such as `m/44'/148'/0'`.
///
/// The apostrophe (or `h`) marker is accepted but optional, since every
/// index is hardened anyway.
pub fn parse_path(path: &str) -> Result<Vec<u32>, KeyError> {
    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(KeyError::InvalidPath(path.to_string()));
    }
    segments
        .map(|segment| {
            let digits = segment.trim_end_matches(['\'', 'h', 'H']);
            digits
                .parse::<u32>()
                .ok()
                .filter(|index| *index < HARDENED_OFFSET)
                .ok_or_else(|| KeyError::InvalidPath(path.to_string()))
        })
        .collect()
}
