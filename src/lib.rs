pub mod amount;
pub mod batch;
pub mod commands;
pub mod crypto;
pub mod hash;
pub mod keys;
pub mod max_fee;
pub mod transaction;
pub mod utxo_pool;
pub mod validation;
pub mod wallet;

#[cfg(test)]
mod testkit;

pub use self::{
    amount::Amount, batch::*, crypto::*, hash::Sha256, keys::PublicKey, max_fee::*,
    transaction::*, utxo_pool::*, validation::*, wallet::Wallet,
};
