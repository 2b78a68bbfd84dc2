//! Hashing and signing of transactions and fee bumps.
//!
//! Signing is a separate step from building because the keypair may not
//! be available at construction time (hardware wallet, remote signer,
//! multi-party flows). Both [`Transaction`] and [`FeeBumpTransaction`]
//! implement [`Signable`], which derives everything from one primitive: the
//! signature base.
//!
//! ```text
//! signature_base = network_id (32) || envelope tag (i32) || tx body XDR
//! hash           = sha256(signature_base)
//! ```
//!
//! The tag is `ENVELOPE_TYPE_TX` (2) for transactions, even those that
//! travel in a V0 envelope, and `ENVELOPE_TYPE_TX_FEE_BUMP` (5) for fee
//! bumps. The network ID is always passed explicitly, so the same value can
//! be signed for several networks side by side.

use tracing::debug;

use crate::config::{Network, MAX_SIGNATURES, SIGNATURE_MAX_BYTES};
use crate::crypto::{ed25519_hint, hash_x_hint, sha256, verify, DecoratedSignature, KeyPair};
use crate::xdr::{WriteXdr, XdrWriter};

use super::builder::Transaction;
use super::envelope::{AnyTransaction, ENVELOPE_TYPE_TX, ENVELOPE_TYPE_TX_FEE_BUMP};
use super::error::TransactionError;
use super::fee_bump::FeeBumpTransaction;

mod private {
    use crate::crypto::DecoratedSignature;

    /// Keeps [`Signable`](super::Signable) closed to this crate and gives
    /// it mutable access to the signature list without making that public.
    pub trait Sealed {
        fn signature_list(&mut self) -> &mut Vec<DecoratedSignature>;
    }
}

/// Anything that can be hashed for a network and carry signatures.
pub trait Signable: private::Sealed {
    /// `network_id || envelope tag || body`, the bytes whose hash is signed.
    fn signature_base(&self, network: &Network) -> Vec<u8>;

    /// Signatures attached so far, in the order they were added.
    fn signatures(&self) -> &[DecoratedSignature];

    /// The full envelope, signatures included.
    fn to_envelope(&self) -> AnyTransaction;

    /// SHA-256 of the signature base.
    fn hash(&self, network: &Network) -> [u8; 32] {
        sha256(&self.signature_base(network))
    }

    /// Lower-case hex of [`hash`](Self::hash), as block explorers show it.
    fn hash_hex(&self, network: &Network) -> String {
        hex::encode(self.hash(network))
    }

    /// Attach a signature produced elsewhere. Envelopes hold at most 20.
    fn add_signature(&mut self, signature: DecoratedSignature) -> Result<(), TransactionError> {
        let list = self.signature_list();
        if list.len() >= MAX_SIGNATURES {
            return Err(TransactionError::TooManySignatures);
        }
        list.push(signature);
        Ok(())
    }

    /// Sign the hash for `network` with an ed25519 key.
    fn sign(&mut self, keypair: &KeyPair, network: &Network) -> Result<(), TransactionError> {
        let hash = self.hash(network);
        let signature = keypair.sign_decorated(&hash)?;
        self.add_signature(signature)?;
        debug!(
            signer = %keypair.account_id(),
            hash = %hex::encode(hash),
            network = %network,
            "signed transaction"
        );
        Ok(())
    }

    /// Attach the preimage of a hash(x) signer. The "signature" is the
    /// preimage itself, so it is limited to 64 bytes.
    fn sign_hash_x(&mut self, preimage: &[u8]) -> Result<(), TransactionError> {
        if preimage.len() > SIGNATURE_MAX_BYTES {
            return Err(TransactionError::PreimageTooLong {
                len: preimage.len(),
            });
        }
        let signature = DecoratedSignature::new(hash_x_hint(preimage), preimage.to_vec())
            .map_err(|_| TransactionError::PreimageTooLong {
                len: preimage.len(),
            })?;
        self.add_signature(signature)
    }

    /// Whether a valid ed25519 signature by `public_key` over the hash for
    /// `network` is attached.
    fn is_signed_by(&self, public_key: &[u8; 32], network: &Network) -> bool {
        let hint = ed25519_hint(public_key);
        let hash = self.hash(network);
        self.signatures()
            .iter()
            .any(|sig| sig.hint() == hint && verify(public_key, &hash, sig.signature()))
    }

    /// Binary `TransactionEnvelope`.
    fn to_envelope_xdr(&self) -> Vec<u8> {
        self.to_envelope().to_xdr()
    }

    /// Base64 `TransactionEnvelope`, ready for submission.
    fn to_envelope_xdr_base64(&self) -> String {
        self.to_envelope().to_xdr_base64()
    }
}

fn signature_base_with(network: &Network, tag: i32, write_body: impl FnOnce(&mut XdrWriter)) -> Vec<u8> {
    let mut w = XdrWriter::with_capacity(256);
    w.write_fixed_opaque(&network.network_id());
    w.write_discriminant(tag);
    write_body(&mut w);
    w.into_bytes()
}

impl private::Sealed for Transaction {
    fn signature_list(&mut self) -> &mut Vec<DecoratedSignature> {
        &mut self.signatures
    }
}

impl Signable for Transaction {
    /// V0 transactions are hashed in their V1 form.
    fn signature_base(&self, network: &Network) -> Vec<u8> {
        signature_base_with(network, ENVELOPE_TYPE_TX, |w| self.write_v1(w))
    }

    fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    fn to_envelope(&self) -> AnyTransaction {
        AnyTransaction::Transaction(self.clone())
    }
}

impl private::Sealed for FeeBumpTransaction {
    fn signature_list(&mut self) -> &mut Vec<DecoratedSignature> {
        &mut self.signatures
    }
}

impl Signable for FeeBumpTransaction {
    fn signature_base(&self, network: &Network) -> Vec<u8> {
        signature_base_with(network, ENVELOPE_TYPE_TX_FEE_BUMP, |w| self.write_body(w))
    }

    fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    fn to_envelope(&self) -> AnyTransaction {
        AnyTransaction::FeeBump(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
