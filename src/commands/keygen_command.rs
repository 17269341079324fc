use crate::wallet::Wallet;
use clap::{App, Arg, ArgMatches};
use std::error::Error;

pub fn keygen_command() -> App<'static> {
    App::new("keygen")
        .version("0.1")
        .about("Generates a secp256k1 keypair and prints it as hex.")
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .about("Derives the keypair deterministically from this seed.")
                .takes_value(true)
                .required(false),
        )
}

pub fn run_keygen_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let wallet = match matches.value_of("seed") {
        Some(seed) => Wallet::generate(seed.parse::<u64>()?),
        None => Wallet::random(),
    };
    println!("public key: {}", wallet.public_key());
    println!("secret key: {}", wallet.secret_key_hex());
    Ok(())
}
