//! Nearest neighbor and pattern matching with MASS.
//!
//! Embeds a pulse four times in low-amplitude noise, uses one occurrence
//! (rescaled and shifted) as the query, and reports the nearest neighbor and
//! all matches.
//!
//! Run with: cargo run --release --example nearest_neighbor

use mass_nn::{Mass, ProfileConfig};

fn main() -> mass_nn::Result<()> {
    let n = 1000;
    let mut ts = vec![0.0; n];

    // Base: low-amplitude noise
    for (i, val) in ts.iter_mut().enumerate() {
        let t = i as f64;
        *val = ((t * 7.1).sin() * (t * 11.3).cos()) * 0.1;
    }

    // Embed a Gaussian pulse at 4 positions
    let pulse_starts = [100, 350, 600, 850];
    for &start in &pulse_starts {
        for j in 0..50 {
            let offset = j as f64 - 25.0;
            ts[start + j] += 2.0 * (-offset * offset / 30.0).exp();
        }
    }

    // Z-normalized distance ignores scale and offset
    let query: Vec<f64> = ts[350..400].iter().map(|v| v * 10.0 - 3.0).collect();

    let mass = Mass::new(ProfileConfig::default());
    let profile = mass.distance_profile(&ts, &query)?;
    let nn = mass.nearest_neighbor(&ts, &query)?;

    println!("MASS nearest neighbor");
    println!("=====================");
    println!("Database length: {n}");
    println!("Query length: {}", query.len());
    println!("Distance profile length: {}", profile.len());
    println!(
        "Nearest neighbor: index {} (0-based), distance {:.6}",
        nn.index, nn.distance
    );

    let matches = mass.find_matches(&ts, &query, None, None)?;
    println!("\nfind_matches (auto threshold, default exclusion zone):");
    println!("  Found {} matches", matches.len());
    for m in &matches {
        let near_pulse = pulse_starts.iter().any(|&c| m.index.abs_diff(c) < 30);
        let label = if near_pulse { "pulse" } else { "other" };
        println!("    index {:>4}, distance {:.6} ({label})", m.index, m.distance);
    }

    Ok(())
}
