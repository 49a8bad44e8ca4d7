// Entry point: reads two sequences, runs the search and prints the result.
mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mass_nn::config::AppConfig;
use mass_nn::input::read_sequence_file;
use mass_nn::{arg_min, extract_matches, Mass, MassError, Result};

use crate::cli::{render_json, render_text, Args};

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Read a sequence, insisting on exactly `expected` values when given.
fn load(path: &Path, expected: Option<usize>, what: &str) -> Result<Vec<f64>> {
    let values = read_sequence_file(path, expected)?;
    if let Some(expected) = expected {
        if values.len() < expected {
            return Err(MassError::InvalidInput(format!(
                "{what} file {} holds {} values, expected {expected}",
                path.display(),
                values.len()
            )));
        }
    }
    Ok(values)
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let (Some(db_path), Some(query_path)) = (&args.database, &args.query) else {
        return Err(MassError::InvalidInput(
            "database and query files are required".to_string(),
        ));
    };

    let database = load(db_path, args.n, "database")?;
    let query = load(query_path, args.m, "query")?;
    info!(n = database.len(), m = query.len(), "sequences loaded");

    let mass = Mass::new(config.search.clone());
    let profile = mass.distance_profile(&database, &query)?;
    let nn = arg_min(&profile)?;
    let matches = args
        .wants_matches()
        .then(|| extract_matches(&profile, args.max_distance, args.exclusion_zone));

    if args.json {
        let value = render_json(
            &nn,
            matches.as_deref(),
            database.len(),
            query.len(),
            &config.output,
        );
        println!("{value}");
    } else {
        print!("{}", render_text(&nn, matches.as_deref(), &config.output));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.init_config {
        init_tracing("info");
        return match AppConfig::write_default(&args.config) {
            Ok(()) => {
                info!(path = %args.config.display(), "wrote default config");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    let config = match AppConfig::load_or_default(&args.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            init_tracing("info");
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging.level);

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
