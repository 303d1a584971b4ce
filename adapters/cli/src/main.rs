#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays recorded Zooscape snapshots through the
//! decision engine and prints one command per tick.

mod replay;
mod tuning_file;

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;
use zooscape_core::AnimalId;
use zooscape_system_decision::{Engine, Tuning};

#[derive(Debug, Parser)]
#[command(name = "zooscape-bot")]
#[command(about = "Replays Zooscape world snapshots through the bot's decision engine", version)]
struct Cli {
    /// Identity of the animal to control.
    #[arg(long, value_name = "UUID")]
    bot_id: Uuid,

    /// Versioned TOML file overriding the engine tunables.
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Seed for the random loop escape. Entropy is used when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON-lines snapshot file. Standard input is read when omitted.
    input: Option<PathBuf>,
}

/// Entry point for the Zooscape bot command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let tuning = match &cli.tuning {
        Some(path) => tuning_file::load(path)?,
        None => Tuning::default(),
    };
    let mut engine = Engine::new(AnimalId::new(cli.bot_id)).with_tuning(tuning);
    if let Some(seed) = cli.seed {
        engine = engine.with_seed(seed);
    }

    let mut stdout = io::stdout().lock();
    let ticks = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open snapshot file {}", path.display()))?;
            replay::run(&mut engine, BufReader::new(file), &mut stdout)?
        }
        None => replay::run(&mut engine, io::stdin().lock(), &mut stdout)?,
    };

    info!(
        ticks,
        power_ups_used = engine.state().power_ups_used(),
        "replay finished"
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn flags_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bot_id_is_required() {
        assert!(Cli::try_parse_from(["zooscape-bot"]).is_err());
    }

    #[test]
    fn parses_a_full_invocation() {
        let cli = Cli::try_parse_from([
            "zooscape-bot",
            "--bot-id",
            "00000000-0000-0000-0000-00000000002a",
            "--seed",
            "7",
            "-v",
            "snapshots.jsonl",
        ])
        .expect("valid arguments");

        assert_eq!(cli.bot_id, Uuid::from_u128(42));
        assert_eq!(cli.seed, Some(7));
        assert!(cli.verbose);
        assert_eq!(cli.tuning, None);
        assert_eq!(cli.input, Some(PathBuf::from("snapshots.jsonl")));
    }

    #[test]
    fn rejects_a_malformed_bot_id() {
        assert!(Cli::try_parse_from(["zooscape-bot", "--bot-id", "not-a-uuid"]).is_err());
    }
}
