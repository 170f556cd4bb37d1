//! mmr-settings
//!
//! Validates randomizer settings given on the command line and prints the
//! shareable settings string and/or the full settings as JSON.

mod args;

use anyhow::{Context, Result};
use args::Output;
use mmr_settings::{build_registry, Codec, ProviderTables};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    tracing::info!("mmr-settings v{}", mmr_settings::VERSION);

    let stock = build_registry(&ProviderTables::default())
        .context("failed to build the settings registry")?;
    let matches = args::build_command(&stock).get_matches();

    let registry = if matches.contains_id(args::TABLES) {
        let tables = args::load_tables(&matches)?;
        build_registry(&tables).context("provider tables do not fit the settings catalog")?
    } else {
        stock
    };

    let settings = args::resolve_settings(&registry, &matches)?;
    let codec = Codec::current(&registry);

    match args::output(&matches) {
        Output::SettingsString => {
            println!("{}", codec.encode_string(&settings)?);
        }
        Output::Json => {
            println!("{}", settings.to_json_pretty()?);
        }
        Output::Both => {
            println!("{}", codec.encode_string(&settings)?);
            println!("{}", settings.to_json_pretty()?);
        }
    }

    Ok(())
}
