use crate::amount::Amount;
use crate::hash::Sha256;
use crate::keys::PublicKey;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the transaction data, excluding signatures.
/// Outputs of the transaction are referenced by this id and their index.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl TransactionId {
    pub const fn new(hash: Sha256) -> Self {
        Self(hash)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The index of a transaction output, the first one is 0.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A claim on an unspent output of a previous transaction, together with the
/// owner's signature over this transaction's signable digest.
///
/// The signature bytes are opaque to the data model. They are produced by an
/// external signer and only interpreted by the signature verifier.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    // A pointer to the transaction containing the UTXO to be spent.
    utxo_id: TransactionId,
    // The number of the UTXO to be spent within that transaction.
    output_index: OutputIndex,
    // Compact ECDSA signature bytes; empty until the input is signed.
    signature: Vec<u8>,
}

impl TransactionInput {
    pub fn new(utxo_id: TransactionId, output_index: OutputIndex, signature: Vec<u8>) -> Self {
        Self {
            utxo_id,
            output_index,
            signature,
        }
    }

    /// An input without a signature yet, used while assembling a transaction.
    pub fn unsigned(utxo_id: TransactionId, output_index: OutputIndex) -> Self {
        Self::new(utxo_id, output_index, vec![])
    }

    pub fn attach_signature(&mut self, signature: Vec<u8>) {
        self.signature = signature;
    }

    pub fn utxo_id(&self) -> &TransactionId {
        &self.utxo_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.utxo_id, self.output_index)
    }
}

/// A quantity of coins locked to the recipient's public key.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionOutput {
    amount: Amount,
    recipient: PublicKey,
}

impl TransactionOutput {
    pub fn new(amount: Amount, recipient: PublicKey) -> Self {
        Self { amount, recipient }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.amount, self.recipient)
    }
}

/// A value transfer: a list of claims on unspent outputs and a list of newly
/// created outputs. Immutable once constructed; the id is derived from the
/// canonical encoding of the inputs' coordinates and the outputs.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

// Serialization views used for the canonical digests. Signatures never appear
// here: the id must not change when a signature is attached, and a signature
// cannot cover itself.
#[derive(Serialize)]
struct OutpointData<'a> {
    utxo_id: &'a TransactionId,
    output_index: OutputIndex,
}

#[derive(Serialize)]
struct OutputData<'a> {
    amount: Amount,
    recipient: &'a [u8],
}

#[derive(Serialize)]
struct TransactionData<'a> {
    inputs: Vec<OutpointData<'a>>,
    outputs: Vec<OutputData<'a>>,
}

#[derive(Serialize)]
struct SignableData<'a> {
    signed_input_index: u64,
    other_inputs: Vec<OutpointData<'a>>,
    outputs: Vec<OutputData<'a>>,
}

impl Transaction {
    /// Creates a transaction and computes its id.
    ///
    /// Returns an error if the structural preconditions do not hold: a
    /// transaction must have at least one input and at least one output.
    /// Violations are caller bugs and are reported eagerly rather than being
    /// folded into "invalid transaction".
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, String> {
        if inputs.is_empty() {
            return Err("A transaction must have at least one input.".to_string());
        }
        if outputs.is_empty() {
            return Err("A transaction must have at least one output.".to_string());
        }
        let id = Self::hash_transaction_data(&inputs, &outputs);
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    /// The total amount this transaction declares in its outputs.
    pub fn output_total(&self) -> Amount {
        self.outputs.iter().map(TransactionOutput::amount).sum()
    }

    /// The message that the owner of the output consumed by the input at
    /// `input_index` signs: the index itself, the coordinates of every other
    /// input, and all outputs, in their declared order.
    pub fn signable_digest(&self, input_index: usize) -> Sha256 {
        Self::signable_digest_for(&self.inputs, &self.outputs, input_index)
    }

    /// Same as [`Transaction::signable_digest`], but usable before the
    /// transaction is assembled, while its inputs are still unsigned.
    pub fn signable_digest_for(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
        input_index: usize,
    ) -> Sha256 {
        assert!(
            input_index < inputs.len(),
            "Signable digest requested for input {} but the transaction has {} inputs.",
            input_index,
            inputs.len()
        );
        let data = SignableData {
            signed_input_index: input_index as u64,
            other_inputs: inputs
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != input_index)
                .map(|(_, input)| Self::outpoint_data(input))
                .collect(),
            outputs: outputs.iter().map(Self::output_data).collect(),
        };
        Sha256::double_digest(&Self::encode(&data))
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> TransactionId {
        let data = TransactionData {
            inputs: inputs.iter().map(Self::outpoint_data).collect(),
            outputs: outputs.iter().map(Self::output_data).collect(),
        };
        TransactionId::new(Sha256::double_digest(&Self::encode(&data)))
    }

    fn outpoint_data(input: &TransactionInput) -> OutpointData {
        OutpointData {
            utxo_id: input.utxo_id(),
            output_index: *input.output_index(),
        }
    }

    fn output_data(output: &TransactionOutput) -> OutputData {
        OutputData {
            amount: output.amount(),
            recipient: output.recipient().as_slice(),
        }
    }

    fn encode<T: Serialize>(data: &T) -> Vec<u8> {
        // The views above contain only integers, fixed arrays and sequences,
        // for which bincode encoding cannot fail.
        bincode::serialize(data).expect("Failed to encode canonical transaction data.")
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
