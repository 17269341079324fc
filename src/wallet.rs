use crate::hash::Sha256;
use crate::keys::PublicKey;
use crate::transaction::{Transaction, TransactionInput, TransactionOutput};
use crate::utxo_pool::Utxo;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use secp256k1::{All, Message, Secp256k1, SecretKey};

/// A keypair that can authorize spending the outputs it owns.
///
/// Signing happens outside the validation core: the validator only ever sees
/// public keys and signature bytes. The wallet exists for the CLI simulation
/// and for tests, which need to produce genuinely verifiable transactions.
pub struct Wallet {
    context: Secp256k1<All>,
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Wallet {
    /// Derives a keypair deterministically from a seed. Useful for tests and
    /// reproducible simulations.
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    /// Derives a keypair from operating system randomness.
    pub fn random() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    fn from_rng<R: RngCore>(rng: &mut R) -> Self {
        let context = Secp256k1::new();
        // Rejection-sample until the bytes land within the curve order, as
        // SecretKey::from_slice requires.
        let secret_key = loop {
            let candidate: [u8; 32] = rng.gen();
            if let Ok(secret_key) = SecretKey::from_slice(&candidate) {
                break secret_key;
            }
        };
        let public_key = secp256k1::PublicKey::from_secret_key(&context, &secret_key).into();
        Self {
            context,
            secret_key,
            public_key,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Signs the SHA-256 digest of `message`, returning the compact 64-byte
    /// signature encoding that `EcdsaVerifier` expects.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let digest = Sha256::digest(message);
        let message = Message::from_slice(digest.as_slice())
            .expect("a SHA-256 digest is always a valid message");
        let signature = self.context.sign_ecdsa(&message, &self.secret_key);
        signature.serialize_compact().to_vec()
    }

    /// Builds a transaction that spends the given coordinates (all owned by
    /// this wallet) into `outputs`, signing every input.
    pub fn create_transfer(
        &self,
        claims: &[Utxo],
        outputs: Vec<TransactionOutput>,
    ) -> Result<Transaction, String> {
        let mut inputs = claims
            .iter()
            .map(|utxo| TransactionInput::unsigned(*utxo.transaction_id(), *utxo.output_index()))
            .collect::<Vec<TransactionInput>>();
        for index in 0..inputs.len() {
            let digest = Transaction::signable_digest_for(&inputs, &outputs, index);
            let signature = self.sign(digest.as_slice());
            inputs[index].attach_signature(signature);
        }
        Transaction::new(inputs, outputs)
    }

    pub fn secret_key_hex(&self) -> String {
        format!("{}", self.secret_key.display_secret())
    }
}
