//! # Key Management
//!
//! Ed25519 keypairs for ledger accounts.
//!
//! A [`KeyPair`] always has a public key and may or may not have the secret
//! half. Public-only pairs come from parsing a `G...` account ID; they can
//! verify signatures and compute hints but every signing call on them fails
//! with [`KeyError::MissingSecretKey`].
//!
//! ## Text forms
//!
//! - public key: `G...` StrKey (the account ID);
//! - secret: `S...` StrKey wrapping the raw 32-byte ed25519 seed.
//!
//! ## Security considerations
//!
//! - Secret seeds never appear in `Debug` output and are never logged.
//! - Fresh keys come from `OsRng`.
//! - Equality compares public keys only, never secret bytes.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use super::hash::sha256_concat;
use super::signatures::{self, DecoratedSignature, SignatureHint};
use super::slip10::ExtendedKey;
use crate::config::{BIP44_PURPOSE, STELLAR_COIN_TYPE};
use crate::strkey::{self, StrKeyError};

/// Prefix hashed in front of every SEP-53 signed message.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"Stellar Signed Message:\n";

/// Errors that can occur during key operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret seed: {0}")]
    InvalidSecretSeed(StrKeyError),

    #[error("invalid account id: {0}")]
    InvalidAccountId(StrKeyError),

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    /// The pair was built from a public key only.
    #[error("keypair has no secret key and cannot sign")]
    MissingSecretKey,

    #[error("key derivation failed")]
    Derivation,

    #[error("invalid derivation path {0:?}")]
    InvalidPath(String),
}

/// An account keypair: a public key plus, optionally, its secret.
///
/// # Examples
///
/// ```
/// use stellar_protocol::crypto::keys::KeyPair;
///
/// let kp = KeyPair::random();
/// let msg = b"pay 10 XLM to alice";
/// let sig = kp.sign(msg).unwrap();
/// assert!(kp.verify(msg, &sig));
///
/// let watcher = KeyPair::from_account_id(&kp.account_id()).unwrap();
/// assert!(!watcher.can_sign());
/// assert!(watcher.verify(msg, &sig));
/// ```
pub struct KeyPair {
    public_key: VerifyingKey,
    secret_key: Option<SigningKey>,
}

impl KeyPair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn random() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Build a full keypair from a raw 32-byte ed25519 seed.
    pub fn from_raw_seed(seed: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Parse an `S...` secret seed.
    pub fn from_secret_seed(seed: &str) -> Result<Self, KeyError> {
        let raw = strkey::decode_secret_seed(seed).map_err(KeyError::InvalidSecretSeed)?;
        Ok(Self::from_raw_seed(&raw))
    }

    /// Parse a `G...` account ID into a public-only keypair.
    pub fn from_account_id(account_id: &str) -> Result<Self, KeyError> {
        let raw = strkey::decode_account_id(account_id).map_err(KeyError::InvalidAccountId)?;
        Self::from_public_key(&raw)
    }

    /// A public-only keypair from raw key bytes. The bytes must decode to a
    /// curve point.
    pub fn from_public_key(public_key: &[u8; 32]) -> Result<Self, KeyError> {
        let public_key =
            VerifyingKey::from_bytes(public_key).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self {
            public_key,
            secret_key: None,
        })
    }

    /// SEP-5 account `account` from a 64-byte BIP-39 seed, at path
    /// `m/44'/148'/account'`.
    pub fn from_bip39_seed(seed: &[u8], account: u32) -> Result<Self, KeyError> {
        let node = ExtendedKey::derive_path(seed, &[BIP44_PURPOSE, STELLAR_COIN_TYPE, account])?;
        Ok(Self::from_raw_seed(node.key()))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        Self {
            public_key: signing_key.verifying_key(),
            secret_key: Some(signing_key),
        }
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> [u8; 32] {
        self.public_key.to_bytes()
    }

    /// The `G...` account ID.
    pub fn account_id(&self) -> String {
        strkey::encode_account_id(&self.public_key())
    }

    /// The `S...` secret seed, if this pair holds one.
    pub fn secret_seed(&self) -> Option<String> {
        self.raw_secret_seed()
            .map(|seed| strkey::encode_secret_seed(&seed))
    }

    /// The raw 32-byte seed, if this pair holds one. Handle with care.
    pub fn raw_secret_seed(&self) -> Option<[u8; 32]> {
        self.secret_key.as_ref().map(SigningKey::to_bytes)
    }

    pub fn can_sign(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Sign `data`, returning the 64-byte ed25519 signature.
    pub fn sign(&self, data: &[u8]) -> Result<[u8; 64], KeyError> {
        let secret = self.secret_key.as_ref().ok_or(KeyError::MissingSecretKey)?;
        Ok(secret.sign(data).to_bytes())
    }

    /// Verify `signature` over `data`. Any malformed input is just `false`.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        signatures::verify(&self.public_key(), data, signature)
    }

    /// The last four bytes of the public key.
    pub fn signature_hint(&self) -> SignatureHint {
        signatures::ed25519_hint(&self.public_key())
    }

    /// Sign `data` and attach this key's hint.
    pub fn sign_decorated(&self, data: &[u8]) -> Result<DecoratedSignature, KeyError> {
        let signature = self.sign(data)?;
        Ok(DecoratedSignature::from_ed25519(self.signature_hint(), signature))
    }

    /// Sign `payload` for an ed25519 signed-payload signer.
    ///
    /// The signature is over the payload itself; the hint is the key hint
    /// XOR the payload's tail, matching what validators compute for the
    /// `P...` signer.
    pub fn sign_payload_decorated(&self, payload: &[u8]) -> Result<DecoratedSignature, KeyError> {
        let signature = self.sign(payload)?;
        let hint = signatures::signed_payload_hint(&self.public_key(), payload);
        Ok(DecoratedSignature::from_ed25519(hint, signature))
    }

    /// Sign an arbitrary off-chain message (SEP-53).
    ///
    /// The signature covers `sha256("Stellar Signed Message:\n" || message)`,
    /// so it can never be mistaken for a transaction signature.
    pub fn sign_message(&self, message: &[u8]) -> Result<[u8; 64], KeyError> {
        self.sign(&signed_message_hash(message))
    }

    /// Verify a SEP-53 message signature.
    pub fn verify_message(&self, message: &[u8], signature: &[u8]) -> bool {
        self.verify(&signed_message_hash(message), signature)
    }
}

fn signed_message_hash(message: &[u8]) -> [u8; 32] {
    sha256_concat(&[SIGNED_MESSAGE_PREFIX, message])
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self {
            public_key: self.public_key,
            secret_key: self
                .secret_key
                .as_ref()
                .map(|secret| SigningKey::from_bytes(&secret.to_bytes())),
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        f.debug_struct("KeyPair")
            .field("account_id", &self.account_id())
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

impl PartialEq for KeyPair {
    /// Two keypairs are equal if their public keys match and both (or
    /// neither) can sign.
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key && self.can_sign() == other.can_sign()
    }
}

impl Eq for KeyPair {}

impl Hash for KeyPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.public_key.as_bytes().hash(state);
        self.can_sign().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "SDJHRQF4GCMIIKAAAQ6IHY42X73FQFLHUULAPSKKD4DFDM7UXWWCRHBE";
    const ACCOUNT: &str = "GCZHXL5HXQX5ABDM26LHYRCQZ5OJFHLOPLZX47WEBP3V2PF5AVFK2A5D";

    #[test]
    fn test_secret_seed_to_account_id_vectors() {
        let pairs = [
            (SEED, ACCOUNT),
            (
                "SDTQN6XUC3D2Z6TIG3XLUTJIMHOSON2FMSKCTM2OHKKH2UX56RQ7R5Y4",
                "GDEAOZWTVHQZGGJY6KG4NAGJQ6DXATXAJO3AMW7C4IXLKMPWWB4FDNFZ",
            ),
            (
                "SDIREFASXYQVEI6RWCQW7F37E6YNXECQJ4SPIOFMMMJRU5CMDQVW32L5",
                "GD2EVR7DGDLNKWEG366FIKXO2KCUAIE3HBUQP4RNY7LEZR5LDKBYHMM6",
            ),
        ];
        for (seed, account) in pairs {
            let kp = KeyPair::from_secret_seed(seed).unwrap();
            assert_eq!(kp.account_id(), account);
            assert_eq!(kp.secret_seed().as_deref(), Some(seed));
        }
    }

    #[test]
    fn test_known_signature_vector() {
        let kp = KeyPair::from_secret_seed(SEED).unwrap();
        let sig = kp.sign(b"hello world").unwrap();
        assert_eq!(
            hex::encode(sig),
            "694a7db1f37a1cd0e0ac8b83bb01051fa32ceca6dfd677d6b3ba98bd98b3ba60\
             1ebd4d3a0df957f691906f293fa581b13728750ee94dfba3c62d6bd5985f300d"
        );
        assert!(kp.verify(b"hello world", &sig));
    }

    #[test]
    fn test_signature_hint_is_key_tail() {
        let kp = KeyPair::from_secret_seed(SEED).unwrap();
        assert_eq!(hex::encode(kp.signature_hint()), "bd054aad");
    }

    #[test]
    fn test_public_only_pair_cannot_sign() {
        let kp = KeyPair::from_account_id(ACCOUNT).unwrap();
        assert!(!kp.can_sign());
        assert_eq!(kp.secret_seed(), None);
        assert_eq!(kp.sign(b"x"), Err(KeyError::MissingSecretKey));
        assert_eq!(kp.sign_decorated(b"x"), Err(KeyError::MissingSecretKey));
    }

    #[test]
    fn test_public_only_pair_verifies() {
        let signer = KeyPair::from_secret_seed(SEED).unwrap();
        let watcher = KeyPair::from_account_id(ACCOUNT).unwrap();
        let sig = signer.sign(b"payload").unwrap();
        assert!(watcher.verify(b"payload", &sig));
        assert!(!watcher.verify(b"other", &sig));
    }

    #[test]
    fn verify_with_short_signature_is_false() {
        let kp = KeyPair::from_secret_seed(SEED).unwrap();
        assert!(!kp.verify(b"hello world", &[0u8]));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let kp1 = KeyPair::random();
        let kp2 = KeyPair::random();
        let sig = kp1.sign(b"message").unwrap();
        assert!(!kp2.verify(b"message", &sig));
    }

    #[test]
    fn test_invalid_strkeys_rejected() {
        assert!(matches!(
            KeyPair::from_secret_seed(ACCOUNT),
            Err(KeyError::InvalidSecretSeed(_))
        ));
        assert!(matches!(
            KeyPair::from_account_id(SEED),
            Err(KeyError::InvalidAccountId(_))
        ));
        assert!(KeyPair::from_account_id("GBPXX0A5N4JYPESHAADMQKBPWZWQDQ64ZV6ZL2S3LAGW4SY7NTCMWIVL").is_err());
    }

    #[test]
    fn test_sign_decorated_uses_key_hint() {
        let kp = KeyPair::from_secret_seed(SEED).unwrap();
        let decorated = kp.sign_decorated(b"data").unwrap();
        assert_eq!(decorated.hint(), kp.signature_hint());
        assert_eq!(decorated.signature(), kp.sign(b"data").unwrap().as_slice());
    }

    #[test]
    fn test_sign_payload_decorated_xors_hint() {
        let kp = KeyPair::from_secret_seed(SEED).unwrap();
        let payload = [1u8, 2, 3, 4, 5];
        let decorated = kp.sign_payload_decorated(&payload).unwrap();
        let key_hint = kp.signature_hint();
        let expected = [
            key_hint[0] ^ 2,
            key_hint[1] ^ 3,
            key_hint[2] ^ 4,
            key_hint[3] ^ 5,
        ];
        assert_eq!(decorated.hint(), expected);
        assert!(kp.verify(&payload, decorated.signature()));
    }

    #[test]
    fn test_sep53_message_vector() {
        let kp =
            KeyPair::from_secret_seed("SAKICEVQLYWGSOJS4WW7HZJWAHZVEEBS527LHK5V4MLJALYKICQCJXMW")
                .unwrap();
        let sig = kp.sign_message(b"Hello, World!").unwrap();
        assert_eq!(
            hex::encode(sig),
            "7cee5d6d885752104c85eea421dfdcb95abf01f1271d11c4bec3fcbd7874dccd\
             6e2e98b97b8eb23b643cac4073bb77de5d07b0710139180ae9f3cbba78f2ba04"
        );
        assert!(kp.verify_message(b"Hello, World!", &sig));
        assert!(!kp.verify_message(b"Hello, World?", &sig));
        // A message signature is not a signature over the raw message.
        assert!(!kp.verify(b"Hello, World!", &sig));
    }

    #[test]
    fn test_sep5_account_zero() {
        let seed = hex::decode(
            "e4a5a632e70943ae7f07659df1332160937fad82587216a4c64315a0fb39497e\
             e4a01f76ddab4cba68147977f3a147b6ad584c41808e8238a07f6cc4b582f186",
        )
        .unwrap();
        let kp = KeyPair::from_bip39_seed(&seed, 0).unwrap();
        assert_eq!(
            kp.account_id(),
            "GDRXE2BQUC3AZNPVFSCEZ76NJ3WWL25FYFK6RGZGIEKWE4SOOHSUJUJ6"
        );
        assert_eq!(
            kp.secret_seed().as_deref(),
            Some("SBGWSG6BTNCKCOB3DIFBGCVMUPQFYPA2G4O34RMTB343OYPXU5DJDVMN")
        );
    }

    #[test]
    fn test_equality_ignores_secret_bytes_but_not_capability() {
        let full = KeyPair::from_secret_seed(SEED).unwrap();
        let public = KeyPair::from_account_id(ACCOUNT).unwrap();
        assert_eq!(full, full.clone());
        assert_ne!(full, public);
        assert_eq!(public, KeyPair::from_public_key(&full.public_key()).unwrap());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = KeyPair::from_secret_seed(SEED).unwrap();
        let debug_str = format!("{kp:?}");
        assert!(debug_str.contains(ACCOUNT));
        assert!(!debug_str.contains(SEED));
    }

    #[test]
    fn test_deterministic_signatures() {
        let kp = KeyPair::random();
        let msg = b"same input, same output";
        assert_eq!(kp.sign(msg).unwrap(), kp.sign(msg).unwrap());
    }
}
