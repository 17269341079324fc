use crate::amount::Amount;
use crate::crypto::SignatureVerifier;
use crate::transaction::{OutputIndex, Transaction};
use crate::utxo_pool::{Utxo, UtxoPool};
use crate::validation::TransactionValidator;

/// The result of applying one batch: the transactions that were accepted, in
/// acceptance order, the pool reflecting exactly those transactions, and the
/// sum of their fees.
#[derive(Debug)]
pub struct BatchOutcome {
    pub accepted: Vec<Transaction>,
    pub pool: UtxoPool,
    pub total_fees: Amount,
}

/// Applies a batch of candidate transactions to a pool snapshot.
///
/// Candidates are evaluated in the order given, each against the working pool
/// as left by the previously accepted ones. An accepted transaction
/// atomically removes its claimed UTXOs and adds its own outputs; a rejected
/// one is skipped for good. The outcome is therefore order-dependent on
/// purpose: two candidates claiming the same UTXO are resolved in favor of
/// whichever the caller put first, and a candidate may spend an output
/// created earlier in the same batch but never one created later. Callers
/// that care about the ordering policy choose the order; see `MaxFeeSelector`
/// for one that does.
///
/// The caller's pool is never mutated; the returned pool is the only state
/// transition.
pub struct BatchProcessor<'a> {
    validator: TransactionValidator<'a>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(verifier: &'a dyn SignatureVerifier) -> Self {
        Self {
            validator: TransactionValidator::new(verifier),
        }
    }

    pub fn validator(&self) -> &TransactionValidator<'a> {
        &self.validator
    }

    pub fn apply(&self, candidates: &[Transaction], pool: &UtxoPool) -> BatchOutcome {
        let mut working_pool = pool.clone();
        let mut accepted = Vec::with_capacity(candidates.len());
        let mut total_fees = Amount::zero();
        for candidate in candidates {
            if !self.validator.is_valid(candidate, &working_pool) {
                tracing::debug!(transaction = %candidate.id(), "rejected candidate");
                continue;
            }
            // The fee must be computed before the inputs are spent.
            let fee = Self::realized_fee(candidate, &working_pool);
            Self::spend_inputs(&mut working_pool, candidate);
            Self::add_outputs(&mut working_pool, candidate);
            tracing::debug!(transaction = %candidate.id(), %fee, "accepted candidate");
            total_fees = total_fees + fee;
            accepted.push(candidate.clone());
        }
        BatchOutcome {
            accepted,
            pool: working_pool,
            total_fees,
        }
    }

    /// The fee of a transaction whose inputs are all present in `pool`.
    /// Only meaningful for a transaction that just passed validation.
    fn realized_fee(transaction: &Transaction, pool: &UtxoPool) -> Amount {
        let input_total = transaction
            .inputs()
            .iter()
            .filter_map(|input| pool.output(&Utxo::from(input)))
            .map(|output| output.amount())
            .sum::<Amount>();
        input_total - transaction.output_total()
    }

    fn spend_inputs(pool: &mut UtxoPool, transaction: &Transaction) {
        for input in transaction.inputs() {
            pool.remove(&Utxo::from(input));
        }
    }

    fn add_outputs(pool: &mut UtxoPool, transaction: &Transaction) {
        for (index, output) in transaction.outputs().iter().enumerate() {
            let utxo = Utxo::new(*transaction.id(), OutputIndex::new(index as u32));
            pool.insert(utxo, output.clone());
        }
    }
}
