use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use mass_nn::config::OutputConfig;
use mass_nn::{Match, NearestNeighbor};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Find the nearest neighbor of a query in a long series")]
pub struct Args {
    /// Database sequence file (numbers separated by whitespace or commas)
    #[arg(value_name = "DATABASE", required_unless_present = "init_config")]
    pub database: Option<PathBuf>,

    /// Query sequence file
    #[arg(value_name = "QUERY", required_unless_present = "init_config")]
    pub query: Option<PathBuf>,

    /// Use exactly the first N database values
    #[arg(short = 'n', long)]
    pub n: Option<usize>,

    /// Use exactly the first M query values
    #[arg(short = 'm', long)]
    pub m: Option<usize>,

    /// Path to config TOML (defaults apply when missing)
    #[arg(long, default_value = "findnn.toml")]
    pub config: PathBuf,

    /// Also list every match below the threshold
    #[arg(long, default_value_t = false)]
    pub matches: bool,

    /// Match threshold (implies --matches)
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Exclusion zone radius between matches (default ceil(m/4))
    #[arg(long)]
    pub exclusion_zone: Option<usize>,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write the default config to --config and exit
    #[arg(long, default_value_t = false)]
    pub init_config: bool,
}

impl Args {
    pub fn wants_matches(&self) -> bool {
        self.matches || self.max_distance.is_some()
    }
}

fn location(index: usize, output: &OutputConfig) -> usize {
    if output.one_based {
        index + 1
    } else {
        index
    }
}

/// Human-readable report.
pub fn render_text(nn: &NearestNeighbor, matches: Option<&[Match]>, output: &OutputConfig) -> String {
    let prec = output.precision;
    let base = if output.one_based { 1 } else { 0 };
    let mut out = String::new();
    let _ = writeln!(out, "Nearest neighbor distance is {:.prec$}", nn.distance);
    let _ = writeln!(
        out,
        "Nearest neighbor location is {} (starting at {base})",
        location(nn.index, output)
    );
    if let Some(matches) = matches {
        let _ = writeln!(out, "Found {} matches", matches.len());
        for m in matches {
            let _ = writeln!(
                out,
                "  location {:>8}  distance {:.prec$}",
                location(m.index, output),
                m.distance
            );
        }
    }
    out
}

/// JSON report. Locations follow the same base as the text output.
pub fn render_json(
    nn: &NearestNeighbor,
    matches: Option<&[Match]>,
    n: usize,
    m: usize,
    output: &OutputConfig,
) -> serde_json::Value {
    let mut value = json!({
        "n": n,
        "m": m,
        "one_based": output.one_based,
        "nearest_neighbor": {
            "location": location(nn.index, output),
            "distance": nn.distance,
        },
    });
    if let Some(matches) = matches {
        value["matches"] = matches
            .iter()
            .map(|mt| json!({ "location": location(mt.index, output), "distance": mt.distance }))
            .collect();
    }
    value
}
