use crate::keys::PublicKey;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, Secp256k1, VerifyOnly};

/// The capability the validator needs from a signature scheme: a pure
/// yes-or-no check of a signature over a message digest.
///
/// Keeping the validator behind this seam means its correctness does not
/// depend on any particular scheme's internals, and tests can substitute a
/// trivial implementation.
pub trait SignatureVerifier {
    /// Returns true if `signature` is a valid signature of `message` under
    /// `public_key`.
    ///
    /// Implementations must treat every internal failure (malformed key,
    /// malformed signature, scheme error) as a failed verification. A hostile
    /// input must never be able to crash the caller.
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool;
}

/// ECDSA over secp256k1 with compact 64-byte signatures, verifying against
/// the SHA-256 digest of the message.
pub struct EcdsaVerifier {
    context: Secp256k1<VerifyOnly>,
}

impl EcdsaVerifier {
    pub fn new() -> Self {
        Self {
            context: Secp256k1::verification_only(),
        }
    }
}

impl Default for EcdsaVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureVerifier for EcdsaVerifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let public_key = match secp256k1::PublicKey::from_slice(public_key.as_slice()) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = match Signature::from_compact(signature) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        let digest = crate::hash::Sha256::digest(message);
        let message = match Message::from_slice(digest.as_slice()) {
            Ok(message) => message,
            Err(_) => return false,
        };
        self.context
            .verify_ecdsa(&message, &signature, &public_key)
            .is_ok()
    }
}
