//! Signer keys: the things an account can list as signers or a
//! transaction can demand as extra signers.

use std::fmt;
use std::str::FromStr;

use super::{
    IdentityError, KEY_TYPE_ED25519, KEY_TYPE_ED25519_SIGNED_PAYLOAD, KEY_TYPE_HASH_X,
    KEY_TYPE_PRE_AUTH_TX,
};
use crate::config::SIGNED_PAYLOAD_MAX_BYTES;
use crate::crypto::signatures::{ed25519_hint, signed_payload_hint, SignatureHint};
use crate::crypto::{sha256, KeyPair};
use crate::strkey::{self, VersionByte};
use crate::xdr::{ReadXdr, WriteXdr, XdrError, XdrReader, XdrWriter};

/// An ed25519 key bound to a payload of 1 to 64 bytes.
///
/// The signer is satisfied by an ed25519 signature over the payload, which
/// lets one signature authorize something outside the transaction itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedPayloadSigner {
    key: [u8; 32],
    payload: Vec<u8>,
}

impl SignedPayloadSigner {
    pub fn new(key: [u8; 32], payload: Vec<u8>) -> Result<Self, IdentityError> {
        if payload.is_empty() {
            return Err(IdentityError::EmptyPayload);
        }
        if payload.len() > SIGNED_PAYLOAD_MAX_BYTES {
            return Err(IdentityError::PayloadTooLong { len: payload.len() });
        }
        Ok(Self { key, payload })
    }

    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The decorated-signature hint validators expect for this signer.
    pub fn hint(&self) -> SignatureHint {
        signed_payload_hint(&self.key, &self.payload)
    }
}

/// A signer: one of four ways to contribute signing weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignerKey {
    Ed25519([u8; 32]),
    /// The hash of a transaction that is pre-authorized.
    PreAuthTx([u8; 32]),
    /// `sha256(preimage)`; satisfied by revealing the preimage.
    HashX([u8; 32]),
    Ed25519SignedPayload(SignedPayloadSigner),
}

impl SignerKey {
    /// A hash-x signer for `preimage`.
    pub fn hash_x_from_preimage(preimage: &[u8]) -> Self {
        Self::HashX(sha256(preimage))
    }

    /// Parse a `G...`, `T...`, `X...` or `P...` StrKey.
    pub fn from_strkey(encoded: &str) -> Result<Self, IdentityError> {
        match strkey::decode_version_byte(encoded)? {
            VersionByte::AccountId => Ok(Self::Ed25519(strkey::decode_account_id(encoded)?)),
            VersionByte::PreAuthTx => Ok(Self::PreAuthTx(strkey::decode_pre_auth_tx(encoded)?)),
            VersionByte::Sha256Hash => Ok(Self::HashX(strkey::decode_sha256_hash(encoded)?)),
            VersionByte::SignedPayload => {
                let (key, payload) = strkey::decode_signed_payload(encoded)?;
                Ok(Self::Ed25519SignedPayload(SignedPayloadSigner::new(
                    key, payload,
                )?))
            }
            _ => Err(IdentityError::UnsupportedAddress(encoded.to_string())),
        }
    }

    pub fn to_strkey(&self) -> String {
        match self {
            Self::Ed25519(key) => strkey::encode_account_id(key),
            Self::PreAuthTx(hash) => strkey::encode_pre_auth_tx(hash),
            Self::HashX(hash) => strkey::encode_sha256_hash(hash),
            Self::Ed25519SignedPayload(signer) => {
                // The payload length was checked at construction, so the
                // encoder cannot reject it.
                strkey::encode_signed_payload(&signer.key, &signer.payload).unwrap_or_default()
            }
        }
    }

    /// The hint a decorated signature for this signer carries.
    pub fn hint(&self) -> SignatureHint {
        match self {
            Self::Ed25519(bytes) | Self::PreAuthTx(bytes) | Self::HashX(bytes) => {
                ed25519_hint(bytes)
            }
            Self::Ed25519SignedPayload(signer) => signer.hint(),
        }
    }
}

impl From<&KeyPair> for SignerKey {
    fn from(keypair: &KeyPair) -> Self {
        Self::Ed25519(keypair.public_key())
    }
}

impl FromStr for SignerKey {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_strkey(s)
    }
}

impl fmt::Display for SignerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_strkey())
    }
}

impl WriteXdr for SignerKey {
    fn write_xdr(&self, w: &mut XdrWriter) {
        match self {
            Self::Ed25519(key) => {
                w.write_discriminant(KEY_TYPE_ED25519);
                w.write_fixed_opaque(key);
            }
            Self::PreAuthTx(hash) => {
                w.write_discriminant(KEY_TYPE_PRE_AUTH_TX);
                w.write_fixed_opaque(hash);
            }
            Self::HashX(hash) => {
                w.write_discriminant(KEY_TYPE_HASH_X);
                w.write_fixed_opaque(hash);
            }
            Self::Ed25519SignedPayload(signer) => {
                w.write_discriminant(KEY_TYPE_ED25519_SIGNED_PAYLOAD);
                w.write_fixed_opaque(&signer.key);
                w.write_var_opaque(&signer.payload);
            }
        }
    }
}

impl ReadXdr for SignerKey {
    fn read_xdr(r: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        match r.read_discriminant()? {
            KEY_TYPE_ED25519 => Ok(Self::Ed25519(r.read_fixed_opaque()?)),
            KEY_TYPE_PRE_AUTH_TX => Ok(Self::PreAuthTx(r.read_fixed_opaque()?)),
            KEY_TYPE_HASH_X => Ok(Self::HashX(r.read_fixed_opaque()?)),
            KEY_TYPE_ED25519_SIGNED_PAYLOAD => {
                let key = r.read_fixed_opaque()?;
                let payload = r.read_var_opaque(SIGNED_PAYLOAD_MAX_BYTES as u32)?;
                let signer = SignedPayloadSigner::new(key, payload)
                    .map_err(|e| XdrError::InvalidValue(e.to_string()))?;
                Ok(Self::Ed25519SignedPayload(signer))
            }
            other => Err(XdrError::unknown_variant("SignerKeyType", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_KEY: &str = "5223d15964cb25b98d17dfc9cb954a4331617bbaa4e5dc144c87df0b8b3b47d9";
    const ACCOUNT: &str = "GBJCHUKZMTFSLOMNC7P4TS4VJJBTCYL3XKSOLXAUJSD56C4LHND5TWUC";
    const ONE_BYTE_PAYLOAD: &str =
        "PBJCHUKZMTFSLOMNC7P4TS4VJJBTCYL3XKSOLXAUJSD56C4LHND5SAAAAAAQMAAAADDCO";

    fn key() -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hex::decode(RAW_KEY).unwrap());
        out
    }

    #[test]
    fn test_signed_payload_length_limits() {
        assert_eq!(
            SignedPayloadSigner::new(key(), vec![]),
            Err(IdentityError::EmptyPayload)
        );
        assert_eq!(
            SignedPayloadSigner::new(key(), vec![0; 65]),
            Err(IdentityError::PayloadTooLong { len: 65 })
        );
        assert!(SignedPayloadSigner::new(key(), vec![0; 64]).is_ok());
    }

    #[test]
    fn test_strkey_roundtrip_for_each_kind() {
        let signers = [
            SignerKey::Ed25519(key()),
            SignerKey::PreAuthTx(key()),
            SignerKey::HashX(key()),
            SignerKey::Ed25519SignedPayload(SignedPayloadSigner::new(key(), vec![6]).unwrap()),
        ];
        for signer in signers {
            let text = signer.to_strkey();
            assert_eq!(SignerKey::from_strkey(&text).unwrap(), signer);
        }
    }

    #[test]
    fn test_known_strkeys() {
        assert_eq!(SignerKey::Ed25519(key()).to_strkey(), ACCOUNT);
        let parsed: SignerKey = ONE_BYTE_PAYLOAD.parse().unwrap();
        assert_eq!(
            parsed,
            SignerKey::Ed25519SignedPayload(SignedPayloadSigner::new(key(), vec![6]).unwrap())
        );
    }

    #[test]
    fn test_signed_payload_xdr_layout() {
        let signer =
            SignerKey::Ed25519SignedPayload(SignedPayloadSigner::new(key(), vec![1, 2, 3]).unwrap());
        let bytes = signer.to_xdr();
        assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
        assert_eq!(&bytes[4..36], &key());
        assert_eq!(&bytes[36..40], &[0, 0, 0, 3]);
        assert_eq!(&bytes[40..], &[1, 2, 3, 0]);
        assert_eq!(SignerKey::from_xdr(&bytes).unwrap(), signer);
    }

    #[test]
    fn test_empty_signed_payload_fails_decoding() {
        let mut w = XdrWriter::new();
        w.write_discriminant(KEY_TYPE_ED25519_SIGNED_PAYLOAD);
        w.write_fixed_opaque(&key());
        w.write_var_opaque(&[]);
        assert!(matches!(
            SignerKey::from_xdr(w.as_bytes()),
            Err(XdrError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_unknown_signer_type() {
        let mut w = XdrWriter::new();
        w.write_discriminant(7);
        w.write_fixed_opaque(&key());
        assert_eq!(
            SignerKey::from_xdr(w.as_bytes()),
            Err(XdrError::unknown_variant("SignerKeyType", 7))
        );
    }

    #[test]
    fn test_hints() {
        let ed = SignerKey::Ed25519(key());
        assert_eq!(ed.hint(), [0x8b, 0x3b, 0x47, 0xd9]);
        let payload =
            SignerKey::Ed25519SignedPayload(SignedPayloadSigner::new(key(), vec![1, 2]).unwrap());
        assert_eq!(payload.hint(), [0x8b ^ 1, 0x3b ^ 2, 0x47, 0xd9]);
    }

    #[test]
    fn test_hash_x_from_preimage() {
        let signer = SignerKey::hash_x_from_preimage(b"preimage");
        assert_eq!(signer, SignerKey::HashX(sha256(b"preimage")));
        assert!(signer.to_strkey().starts_with('X'));
    }

    #[test]
    fn test_seed_is_not_a_signer() {
        assert!(matches!(
            SignerKey::from_strkey("SDJHRQF4GCMIIKAAAQ6IHY42X73FQFLHUULAPSKKD4DFDM7UXWWCRHBE"),
            Err(IdentityError::UnsupportedAddress(_))
        ));
    }
}
