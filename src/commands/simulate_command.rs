use crate::amount::Amount;
use crate::batch::{BatchOutcome, BatchProcessor};
use crate::crypto::EcdsaVerifier;
use crate::hash::Sha256;
use crate::keys::PublicKey;
use crate::max_fee::{MaxFeeSelector, SelectionPolicy};
use crate::transaction::{OutputIndex, Transaction, TransactionId, TransactionOutput};
use crate::utxo_pool::{Utxo, UtxoPool};
use crate::wallet::Wallet;
use clap::{App, Arg, ArgMatches};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::error::Error;

struct SimulateCliOptions {
    coins: usize,
    seed: u64,
    policy: SelectionPolicy,
    payout: Option<PublicKey>,
}

impl SimulateCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let policy = match matches.value_of("policy").unwrap() {
            "greedy" => SelectionPolicy::GreedyByFee,
            "exhaustive" => SelectionPolicy::Exhaustive,
            other => return Err(format!("Unknown selection policy: {}", other).into()),
        };
        let payout = matches
            .value_of("payout")
            .map(PublicKey::from_hex)
            .transpose()?;
        Ok(Self {
            coins: matches.value_of("coins").unwrap().parse::<usize>()?,
            seed: matches.value_of("seed").unwrap().parse::<u64>()?,
            policy,
            payout,
        })
    }
}

pub fn simulate_command() -> App<'static> {
    App::new("simulate")
        .version("0.1")
        .about(
            "Builds a randomized epoch of conflicting, chained and plain transfers, \
             processes it in arrival order and with the max-fee selector, and prints \
             a JSON report comparing the two.",
        )
        .arg(
            Arg::new("coins")
                .short('c')
                .long("coins")
                .value_name("COUNT")
                .about("Number of spendable coins seeded into the pool.")
                .takes_value(true)
                .default_value("8"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .about("RNG seed, making the simulation reproducible.")
                .takes_value(true)
                .default_value("0"),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .value_name("POLICY")
                .about("Fee selection policy, either 'greedy' or 'exhaustive'.")
                .takes_value(true)
                .default_value("greedy"),
        )
        .arg(
            Arg::new("payout")
                .long("payout")
                .value_name("PUBLIC_KEY")
                .about("Hex-encoded public key that receives the chained spend.")
                .takes_value(true)
                .required(false),
        )
}

pub fn run_simulate_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SimulateCliOptions::parse(matches)?;
    let (pool, candidates) = generate_epoch(options.seed, options.coins, options.payout);

    let verifier = EcdsaVerifier::new();
    let processor = BatchProcessor::new(&verifier);
    let selector = MaxFeeSelector::new(&verifier, options.policy);

    let arrival_order = processor.apply(&candidates, &pool);
    let max_fee = selector.select(&candidates, &pool);

    let report = EpochReport {
        seed: options.seed,
        candidate_count: candidates.len(),
        initial_pool_size: pool.len(),
        policy: match options.policy {
            SelectionPolicy::GreedyByFee => "greedy".to_string(),
            SelectionPolicy::Exhaustive => "exhaustive".to_string(),
        },
        arrival_order: OutcomeReport::from(&arrival_order),
        max_fee: OutcomeReport::from(&max_fee),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Seeds a pool with `coin_count` coins and builds a candidate batch around
/// them: a transfer per coin, a competing claim on every third coin, and one
/// spend chained onto the first transfer's output. The chained spend pays out
/// to `payout` when given, otherwise back into the simulated wallets.
/// Deterministic in `seed`.
pub fn generate_epoch(
    seed: u64,
    coin_count: usize,
    payout: Option<PublicKey>,
) -> (UtxoPool, Vec<Transaction>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let wallets = (0..4)
        .map(|offset| Wallet::generate(seed.wrapping_add(offset)))
        .collect::<Vec<Wallet>>();

    let mut pool = UtxoPool::new();
    let mut candidates = vec![];
    let mut first_transfer: Option<(Transaction, usize, i64)> = None;

    for index in 0..coin_count {
        let owner = &wallets[index % wallets.len()];
        let recipient_index = (index + 1) % wallets.len();
        let amount: i64 = rng.gen_range(20..120);
        let fee: i64 = rng.gen_range(0..10);

        let coin = Utxo::new(
            TransactionId::new(Sha256::digest(format!("epoch-coin-{}", index).as_bytes())),
            OutputIndex::new(0),
        );
        pool.insert(
            coin,
            TransactionOutput::new(Amount::new(amount), owner.public_key()),
        );

        let transfer = owner
            .create_transfer(
                &[coin],
                vec![TransactionOutput::new(
                    Amount::new(amount - fee),
                    wallets[recipient_index].public_key(),
                )],
            )
            .expect("generated transfers are structurally well-formed");
        if first_transfer.is_none() {
            first_transfer = Some((transfer.clone(), recipient_index, amount - fee));
        }
        candidates.push(transfer);

        if index % 3 == 0 {
            // A competing claim on the same coin with its own fee, so that
            // the batch always contains genuine conflicts.
            let competing_fee: i64 = rng.gen_range(0..10);
            let competing = owner
                .create_transfer(
                    &[coin],
                    vec![TransactionOutput::new(
                        Amount::new(amount - competing_fee),
                        wallets[(index + 2) % wallets.len()].public_key(),
                    )],
                )
                .expect("generated transfers are structurally well-formed");
            candidates.push(competing);
        }
    }

    if let Some((transfer, recipient_index, produced_amount)) = first_transfer {
        if produced_amount > 1 {
            // A spend chained onto an output that only exists if the first
            // transfer is accepted.
            let chained = wallets[recipient_index]
                .create_transfer(
                    &[Utxo::new(*transfer.id(), OutputIndex::new(0))],
                    vec![TransactionOutput::new(
                        Amount::new(produced_amount - 1),
                        payout.unwrap_or_else(|| wallets[0].public_key()),
                    )],
                )
                .expect("generated transfers are structurally well-formed");
            candidates.push(chained);
        }
    }

    (pool, candidates)
}

#[derive(Serialize)]
struct OutcomeReport {
    accepted: Vec<String>,
    total_fees: Amount,
    pool_size: usize,
}

impl From<&BatchOutcome> for OutcomeReport {
    fn from(outcome: &BatchOutcome) -> Self {
        Self {
            accepted: outcome
                .accepted
                .iter()
                .map(|transaction| transaction.id().to_hex())
                .collect(),
            total_fees: outcome.total_fees,
            pool_size: outcome.pool.len(),
        }
    }
}

#[derive(Serialize)]
struct EpochReport {
    seed: u64,
    candidate_count: usize,
    initial_pool_size: usize,
    policy: String,
    arrival_order: OutcomeReport,
    max_fee: OutcomeReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_epochs_are_deterministic_in_the_seed() {
        let (_, first) = generate_epoch(5, 6, None);
        let (_, second) = generate_epoch(5, 6, None);
        let first_ids = first.iter().map(Transaction::id).collect::<Vec<_>>();
        let second_ids = second.iter().map(Transaction::id).collect::<Vec<_>>();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn generated_epochs_contain_conflicts() {
        let (pool, candidates) = generate_epoch(0, 6, None);
        // More candidates than coins means at least one coin is contested
        // (the chained spend claims a candidate output, not a pool coin).
        assert!(candidates.len() > pool.len() + 1);
    }

    #[test]
    fn max_fee_selection_never_collects_less_than_arrival_order_on_generated_epochs() {
        let verifier = EcdsaVerifier::new();
        let processor = BatchProcessor::new(&verifier);
        let exhaustive = MaxFeeSelector::new(&verifier, SelectionPolicy::Exhaustive);
        for seed in 0..5 {
            let (pool, candidates) = generate_epoch(seed, 5, None);
            let arrival = processor.apply(&candidates, &pool);
            let selected = exhaustive.select(&candidates, &pool);
            assert!(selected.total_fees >= arrival.total_fees);
        }
    }

    #[test]
    fn payout_key_receives_the_chained_spend() {
        let payout = Wallet::generate(99).public_key();
        let (_, candidates) = generate_epoch(0, 3, Some(payout));
        assert!(candidates.iter().any(|transaction| {
            transaction
                .outputs()
                .iter()
                .any(|output| *output.recipient() == payout)
        }));
    }

    #[test]
    fn rejects_malformed_payout_key() {
        let matches =
            simulate_command().get_matches_from(vec!["simulate", "--payout", "not-hex"]);
        assert!(SimulateCliOptions::parse(&matches).is_err());
    }
}
