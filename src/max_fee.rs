use crate::amount::Amount;
use crate::batch::{BatchOutcome, BatchProcessor};
use crate::crypto::SignatureVerifier;
use crate::transaction::{OutputIndex, Transaction};
use crate::utxo_pool::{Utxo, UtxoPool};
use std::collections::HashMap;

/// How the selector searches for a high-fee subset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SelectionPolicy {
    /// Stable-sort the candidates by descending optimistic fee and run the
    /// single-pass greedy acceptance on that order. Fast, but not guaranteed
    /// to find the maximum total fee: a single expensive transaction can
    /// shadow two cheaper ones it conflicts with.
    GreedyByFee,
    /// Branch-and-bound search over include/exclude decisions, taken in
    /// candidate order. Finds the true maximum among all subsets whose
    /// chained transactions appear after their producers in the given order.
    /// Worst case exponential in the batch size; meant for small batches.
    Exhaustive,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::GreedyByFee
    }
}

/// Chooses the candidate order (and, for the exhaustive policy, the subset)
/// that maximizes the total fee collected by the batch, then delegates the
/// actual acceptance to [`BatchProcessor`]. Per-transaction validity rules
/// are exactly the batch processor's; the selector only controls ordering.
pub struct MaxFeeSelector<'a> {
    processor: BatchProcessor<'a>,
    policy: SelectionPolicy,
}

impl<'a> MaxFeeSelector<'a> {
    pub fn new(verifier: &'a dyn SignatureVerifier, policy: SelectionPolicy) -> Self {
        Self {
            processor: BatchProcessor::new(verifier),
            policy,
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn select(&self, candidates: &[Transaction], pool: &UtxoPool) -> BatchOutcome {
        match self.policy {
            SelectionPolicy::GreedyByFee => self.select_greedy(candidates, pool),
            SelectionPolicy::Exhaustive => self.select_exhaustive(candidates, pool),
        }
    }

    fn select_greedy(&self, candidates: &[Transaction], pool: &UtxoPool) -> BatchOutcome {
        let fees = Self::optimistic_fees(candidates, pool);
        let mut order = (0..candidates.len()).collect::<Vec<usize>>();
        // A stable sort keeps the caller's relative order among equal fees,
        // which keeps the outcome deterministic.
        order.sort_by_key(|index| std::cmp::Reverse(fees[*index]));
        let reordered = order
            .iter()
            .map(|index| candidates[*index].clone())
            .collect::<Vec<Transaction>>();
        tracing::debug!(batch_size = candidates.len(), "greedy fee order chosen");
        self.processor.apply(&reordered, pool)
    }

    fn select_exhaustive(&self, candidates: &[Transaction], pool: &UtxoPool) -> BatchOutcome {
        let fees = Self::optimistic_fees(candidates, pool);
        // An admissible bound on the fee still collectable from candidate
        // `index` onwards: the sum of the remaining non-negative fees.
        let mut remaining_bound = vec![Amount::zero(); candidates.len() + 1];
        for index in (0..candidates.len()).rev() {
            let fee = if fees[index] > Amount::zero() {
                fees[index]
            } else {
                Amount::zero()
            };
            remaining_bound[index] = remaining_bound[index + 1] + fee;
        }

        let mut best = BestSelection {
            total_fee: Amount::zero(),
            chosen: vec![],
        };
        let mut chosen = vec![];
        self.search(
            candidates,
            0,
            pool,
            Amount::zero(),
            &mut chosen,
            &remaining_bound,
            &mut best,
        );
        tracing::debug!(
            batch_size = candidates.len(),
            selected = best.chosen.len(),
            total_fee = %best.total_fee,
            "exhaustive search finished"
        );

        let selection = best
            .chosen
            .iter()
            .map(|index| candidates[*index].clone())
            .collect::<Vec<Transaction>>();
        // Replaying the chosen sequence through the processor rebuilds the
        // final pool and accepts every chosen transaction by construction.
        self.processor.apply(&selection, pool)
    }

    /// Depth-first include/exclude search over the candidates, pruned by the
    /// optimistic remaining-fee bound.
    fn search(
        &self,
        candidates: &[Transaction],
        index: usize,
        pool: &UtxoPool,
        collected: Amount,
        chosen: &mut Vec<usize>,
        remaining_bound: &[Amount],
        best: &mut BestSelection,
    ) {
        if collected + remaining_bound[index] <= best.total_fee && !best.chosen.is_empty() {
            return;
        }
        if index == candidates.len() {
            if collected > best.total_fee || best.chosen.is_empty() {
                best.total_fee = collected;
                best.chosen = chosen.clone();
            }
            return;
        }

        let candidate = &candidates[index];
        if self.processor.validator().is_valid(candidate, pool) {
            let mut next_pool = pool.clone();
            let fee = Self::pool_fee(candidate, &next_pool);
            Self::advance_pool(&mut next_pool, candidate);
            chosen.push(index);
            self.search(
                candidates,
                index + 1,
                &next_pool,
                collected + fee,
                chosen,
                remaining_bound,
                best,
            );
            chosen.pop();
        }

        self.search(
            candidates,
            index + 1,
            pool,
            collected,
            chosen,
            remaining_bound,
            best,
        );
    }

    /// The fee of each candidate, looked up against the initial pool extended
    /// with every candidate's own outputs. The extension makes chained
    /// candidates fee-computable up front; whether their inputs actually
    /// materialize is only decided at acceptance time. A candidate whose
    /// inputs cannot be resolved at all is priced at zero.
    fn optimistic_fees(candidates: &[Transaction], pool: &UtxoPool) -> Vec<Amount> {
        let mut produced = HashMap::new();
        for candidate in candidates {
            for (index, output) in candidate.outputs().iter().enumerate() {
                let utxo = Utxo::new(*candidate.id(), OutputIndex::new(index as u32));
                produced.insert(utxo, output.amount());
            }
        }
        candidates
            .iter()
            .map(|candidate| {
                let mut input_total = Amount::zero();
                for input in candidate.inputs() {
                    let utxo = Utxo::from(input);
                    match pool.output(&utxo) {
                        Some(output) => input_total = input_total + output.amount(),
                        None => match produced.get(&utxo) {
                            Some(amount) => input_total = input_total + *amount,
                            None => return Amount::zero(),
                        },
                    }
                }
                input_total - candidate.output_total()
            })
            .collect()
    }

    /// The definite fee of a transaction that is valid against `pool`.
    fn pool_fee(transaction: &Transaction, pool: &UtxoPool) -> Amount {
        let input_total = transaction
            .inputs()
            .iter()
            .filter_map(|input| pool.output(&Utxo::from(input)))
            .map(|output| output.amount())
            .sum::<Amount>();
        input_total - transaction.output_total()
    }

    fn advance_pool(pool: &mut UtxoPool, transaction: &Transaction) {
        for input in transaction.inputs() {
            pool.remove(&Utxo::from(input));
        }
        for (index, output) in transaction.outputs().iter().enumerate() {
            pool.insert(
                Utxo::new(*transaction.id(), OutputIndex::new(index as u32)),
                output.clone(),
            );
        }
    }
}

struct BestSelection {
    total_fee: Amount,
    chosen: Vec<usize>,
}
