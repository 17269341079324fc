use crate::amount::Amount;
use crate::crypto::SignatureVerifier;
use crate::transaction::Transaction;
use crate::utxo_pool::{Utxo, UtxoPool};
use std::collections::HashSet;

/// Decides whether a single transaction may spend from a given pool.
///
/// A transaction is valid when all of the following hold:
///   1. every claimed output exists in the pool,
///   2. every input signature verifies against the claimed output's recipient,
///   3. no UTXO is claimed more than once by the transaction,
///   4. every output amount is non-negative,
///   5. the claimed input total is at least the declared output total.
///
/// The predicate has no side effects and reports only accept or reject:
/// callers never learn which rule failed, since an invalid transaction is an
/// expected outcome, not an error.
pub struct TransactionValidator<'a> {
    verifier: &'a dyn SignatureVerifier,
}

impl<'a> TransactionValidator<'a> {
    pub fn new(verifier: &'a dyn SignatureVerifier) -> Self {
        Self { verifier }
    }

    pub fn is_valid(&self, transaction: &Transaction, pool: &UtxoPool) -> bool {
        Self::claimed_outputs_exist(transaction, pool)
            && self.signatures_are_valid(transaction, pool)
            && Self::no_utxo_claimed_twice(transaction)
            && Self::output_amounts_are_non_negative(transaction)
            && Self::no_coins_minted(transaction, pool)
    }

    /// Rule 1: every output claimed by the transaction is in the pool.
    fn claimed_outputs_exist(transaction: &Transaction, pool: &UtxoPool) -> bool {
        transaction
            .inputs()
            .iter()
            .all(|input| pool.contains(&Utxo::from(input)))
    }

    /// Rule 2: the signature on each input verifies against the recipient of
    /// the claimed output, over this transaction's per-input signable digest.
    fn signatures_are_valid(&self, transaction: &Transaction, pool: &UtxoPool) -> bool {
        for (index, input) in transaction.inputs().iter().enumerate() {
            let claimed_output = match pool.output(&Utxo::from(input)) {
                Some(output) => output,
                None => return false,
            };
            let digest = transaction.signable_digest(index);
            if !self.verifier.verify(
                claimed_output.recipient(),
                digest.as_slice(),
                input.signature(),
            ) {
                return false;
            }
        }
        true
    }

    /// Rule 3: no UTXO is claimed multiple times by the transaction.
    fn no_utxo_claimed_twice(transaction: &Transaction) -> bool {
        let mut claimed = HashSet::with_capacity(transaction.inputs().len());
        transaction
            .inputs()
            .iter()
            .all(|input| claimed.insert(Utxo::from(input)))
    }

    /// Rule 4: all output amounts are non-negative.
    fn output_amounts_are_non_negative(transaction: &Transaction) -> bool {
        transaction
            .outputs()
            .iter()
            .all(|output| !output.amount().is_negative())
    }

    /// Rule 5: the transaction does not create coins, i.e. the sum of claimed
    /// input amounts is greater than or equal to the sum of output amounts.
    /// The difference is the transaction's fee.
    fn no_coins_minted(transaction: &Transaction, pool: &UtxoPool) -> bool {
        let mut input_total = Amount::zero();
        for input in transaction.inputs() {
            match pool.output(&Utxo::from(input)) {
                Some(output) => input_total = input_total + output.amount(),
                None => return false,
            }
        }
        input_total >= transaction.output_total()
    }
}
