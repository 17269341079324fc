use clap::{App, AppSettings};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let matches = App::new("epochcoin")
        .about("Epochcoin transaction batch validation CLI tools.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(epochcoin_lib::commands::keygen_command())
        .subcommand(epochcoin_lib::commands::simulate_command())
        .get_matches();

    if let Some(ref matches) = matches.subcommand_matches("keygen") {
        epochcoin_lib::commands::run_keygen_command(&matches)
    } else if let Some(ref matches) = matches.subcommand_matches("simulate") {
        epochcoin_lib::commands::run_simulate_command(&matches)
    } else {
        panic!("Should report help.");
    }
}
