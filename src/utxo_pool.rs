use crate::transaction::{OutputIndex, TransactionId, TransactionInput, TransactionOutput};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// The coordinate of an unspent transaction output: the transaction that
/// created it and the output's index within that transaction.
#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct Utxo {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl Utxo {
    pub fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }
}

impl From<&TransactionInput> for Utxo {
    fn from(input: &TransactionInput) -> Self {
        Self::new(*input.utxo_id(), *input.output_index())
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

/// The ledger's current spendable state: unspent transaction outputs, indexed
/// by their coordinate.
///
/// This is a passive store with no validation of its own. `Clone` yields an
/// independent copy, which is how the batch processor tries a batch without
/// touching the caller's pool.
#[derive(Debug, Clone, Default)]
pub struct UtxoPool {
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    pub fn output(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    pub fn insert(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    pub fn remove(&mut self, utxo: &Utxo) {
        self.utxos.remove(utxo);
    }

    /// All coordinates currently in the pool, in no particular order.
    pub fn all_utxos(&self) -> Vec<Utxo> {
        self.utxos.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::hash::Sha256;
    use crate::keys::PublicKey;

    fn utxo(tag: u8, index: u32) -> Utxo {
        Utxo::new(
            TransactionId::new(Sha256::digest(&[tag])),
            OutputIndex::new(index),
        )
    }

    fn some_output() -> TransactionOutput {
        TransactionOutput::new(Amount::new(25), PublicKey::from_raw([1; 33]))
    }

    #[test]
    fn insert_then_lookup() {
        let mut pool = UtxoPool::new();
        let coordinate = utxo(1, 0);
        assert!(!pool.contains(&coordinate));
        pool.insert(coordinate, some_output());
        assert!(pool.contains(&coordinate));
        assert_eq!(pool.output(&coordinate), Some(&some_output()));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn remove_makes_utxo_absent() {
        let mut pool = UtxoPool::new();
        let coordinate = utxo(1, 0);
        pool.insert(coordinate, some_output());
        pool.remove(&coordinate);
        assert!(!pool.contains(&coordinate));
        assert!(pool.is_empty());
    }

    #[test]
    fn outputs_of_the_same_transaction_have_distinct_coordinates() {
        let mut pool = UtxoPool::new();
        pool.insert(utxo(1, 0), some_output());
        pool.insert(utxo(1, 1), some_output());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn clone_is_independent_of_the_original() {
        let mut pool = UtxoPool::new();
        let first = utxo(1, 0);
        let second = utxo(2, 0);
        pool.insert(first, some_output());

        let mut copy = pool.clone();
        copy.remove(&first);
        copy.insert(second, some_output());

        assert!(pool.contains(&first));
        assert!(!pool.contains(&second));
        assert!(copy.contains(&second));
    }

    #[test]
    fn all_utxos_lists_every_coordinate() {
        let mut pool = UtxoPool::new();
        pool.insert(utxo(1, 0), some_output());
        pool.insert(utxo(2, 3), some_output());
        let mut all = pool.all_utxos();
        all.sort();
        let mut expected = vec![utxo(1, 0), utxo(2, 3)];
        expected.sort();
        assert_eq!(all, expected);
    }
}
