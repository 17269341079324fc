//! Fixtures shared by the validation, batch and selection tests: a funded
//! genesis pool and properly signed transfer transactions.

use crate::amount::Amount;
use crate::hash::Sha256;
use crate::keys::PublicKey;
use crate::transaction::{OutputIndex, Transaction, TransactionId, TransactionOutput};
use crate::utxo_pool::{Utxo, UtxoPool};
use crate::wallet::Wallet;

/// A deterministic coordinate for an output that exists "before" the epoch
/// under test, i.e. one the pool is seeded with.
pub fn genesis_utxo(tag: u8, index: u32) -> Utxo {
    Utxo::new(
        TransactionId::new(Sha256::digest(&[b'g', tag])),
        OutputIndex::new(index),
    )
}

/// Seeds `pool` with an output of `amount` coins owned by `owner` and returns
/// its coordinate.
pub fn fund(pool: &mut UtxoPool, tag: u8, owner: &Wallet, amount: i64) -> Utxo {
    let utxo = genesis_utxo(tag, 0);
    pool.insert(
        utxo,
        TransactionOutput::new(Amount::new(amount), owner.public_key()),
    );
    utxo
}

/// Builds a transaction that spends `claims` (all owned by `owner`) into the
/// given `(amount, recipient)` outputs, with every input properly signed.
pub fn transfer(owner: &Wallet, claims: &[Utxo], outputs: &[(i64, PublicKey)]) -> Transaction {
    let outputs = outputs
        .iter()
        .map(|(amount, recipient)| TransactionOutput::new(Amount::new(*amount), *recipient))
        .collect::<Vec<TransactionOutput>>();
    owner.create_transfer(claims, outputs).unwrap()
}
