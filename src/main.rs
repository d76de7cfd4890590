mod cli;
mod config;
mod convert;
mod data_file;
mod error;
mod fingerprint;
mod index;
mod loader;
mod postal_list;
mod record;
mod store;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use crate::cli::{Cli, Command};
use crate::store::{IndexStore, RecordLookup};

fn main() -> ExitCode {
    // Logs go to stderr, stdout carries only lookup and table output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = match cli.command {
        Some(Command::List { csv, sort }) => {
            let list = loader::load(&csv).with_context(|| format!("loading {}", csv.display()))?;
            cli::handle_list_command(&list, sort)
        }
        Some(Command::Find { csv, zip }) => {
            let list = loader::load(&csv).with_context(|| format!("loading {}", csv.display()))?;
            cli::handle_find_command(&list, zip)
        }
        Some(Command::Extremes { csv }) => {
            let list = loader::load(&csv).with_context(|| format!("loading {}", csv.display()))?;
            cli::handle_extremes_command(&list)
        }
        Some(Command::Convert { input, output }) => {
            convert::write_length_indicated(&input, &output)
                .with_context(|| format!("converting {}", input.display()))?;
            String::new()
        }
        None => {
            let config = cli.lookup.config();
            let store = IndexStore::open(&config).with_context(|| {
                format!(
                    "opening index {} over {}",
                    config.index_path.display(),
                    config.data_path.display()
                )
            })?;
            debug!(source = ?store.source(), "index ready");

            let mut lookup = RecordLookup::open(store.index(), &config)
                .with_context(|| format!("unable to open {}", config.data_path.display()))?;
            let mut stdout = std::io::stdout().lock();
            cli::handle_lookup_command(&cli.lookup.zips, &mut lookup, &mut stdout)?;
            String::new()
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
