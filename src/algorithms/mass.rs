use std::borrow::Cow;

use tracing::{debug, warn};

use crate::algorithms::correlate::sliding_dot_product;
use crate::algorithms::normalize::z_normalize_with;
use crate::algorithms::select::{apply_exclusion_zone, arg_min, first_finite_min};
use crate::core::profile::{DistanceProfile, Match, NearestNeighbor, ProfileConfig};
use crate::core::stats::{ConstantRuns, PrefixSums, SequenceStats};
use crate::core::transform::TransformEngine;
use crate::error::{MassError, Result};

/// Check `n >= m >= 1` and that every value is finite.
///
/// Runs before any buffer is allocated, so invalid inputs are never
/// partially processed.
pub fn validate_inputs(database: &[f64], query: &[f64]) -> Result<()> {
    if database.is_empty() {
        return Err(MassError::InvalidInput("database is empty".to_string()));
    }
    if query.is_empty() {
        return Err(MassError::InvalidInput("query is empty".to_string()));
    }
    if database.len() < query.len() {
        return Err(MassError::InvalidInput(format!(
            "database length {} is shorter than query length {}",
            database.len(),
            query.len()
        )));
    }
    for (name, values) in [("database", database), ("query", query)] {
        if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(MassError::InvalidInput(format!(
                "{name}[{i}] is not a finite number ({v})"
            )));
        }
    }
    Ok(())
}

/// How far a window's denominator must clear its rounding scale before the
/// prefix-sum/FFT path is trusted; below it the window is recomputed directly.
const RELIABLE_MARGIN: f64 = 1e9;

/// Compute the z-normalized distance profile of `query` against `database`.
///
/// Implements MASS (Mueen's Algorithm for Similarity Search):
/// 1. Z-normalize the query, keeping the original mean/std
/// 2. Optionally z-normalize the database, then build prefix sums over the
///    same values that are fed to the correlator
/// 3. Sliding dot products via FFT cross-correlation
/// 4. Per window: `c = (QT - m*mu_x*mu_y) / (m*sigma_x*sigma_y)`,
///    `d = sqrt(2*m*(1 - c))`, with `c` clamped to `[-1, 1]`
///
/// Constant windows and a constant query never go through the formula: both
/// constant gives 0, exactly one constant gives the policy sentinel. Window
/// constancy is decided on the raw database from runs of equal values, so it
/// does not depend on prefix-sum rounding or on database normalization.
///
/// Windows whose variance or dot product is too close to the rounding scale
/// of the prefix sums or the FFT (tiny local variation next to large values)
/// are recomputed directly from the raw window in O(m).
///
/// # Returns
/// A distance profile of length `database.len() - query.len() + 1`.
pub fn distance_profile<E: TransformEngine>(
    engine: &E,
    database: &[f64],
    query: &[f64],
    config: &ProfileConfig,
) -> Result<DistanceProfile> {
    validate_inputs(database, query)?;

    let m = query.len();
    let n_subs = database.len() - m + 1;
    let tol = config.constant_tolerance;
    debug!(
        n = database.len(),
        m,
        engine = engine.name(),
        "computing distance profile"
    );

    // Formula stats must describe the sequence handed to the correlator
    let zq = z_normalize_with(query, tol);
    let query_constant = zq.constant;
    if query_constant {
        warn!(m, mean = zq.stats.mean, "query is constant");
    }
    let query_stats = SequenceStats::of(&zq.values);

    // Raw variance = series variance * scale^2
    let (series, scale): (Cow<'_, [f64]>, f64) = if config.normalize_database {
        let z = z_normalize_with(database, tol);
        if z.constant {
            warn!(n = database.len(), "database is constant");
            (Cow::Owned(z.values), 1.0)
        } else {
            (Cow::Owned(z.values), z.stats.std)
        }
    } else {
        (Cow::Borrowed(database), 1.0)
    };
    let scale_sq = scale * scale;
    let prefix = PrefixSums::build(&series);
    let runs = ConstantRuns::build(database);

    // A constant query never reaches the correlation formula
    let (qt, qt_noise) = if query_constant {
        (Vec::new(), 0.0)
    } else {
        let qt = sliding_dot_product(engine, &series, &zq.values)?;
        (qt, dot_product_noise(&series, &zq.values))
    };

    let m_f = m as f64;
    let sentinel = config.constant_policy.sentinel(m);
    let assemble = |j: usize| -> f64 {
        if runs.is_constant(j, m) {
            return if query_constant { 0.0 } else { sentinel };
        }
        let window = prefix.window_stats(j, m);
        let unreliable = window.variance <= RELIABLE_MARGIN * prefix.variance_noise(j, m)
            || (!query_constant
                && m_f * window.std * query_stats.std <= RELIABLE_MARGIN * qt_noise);

        if unreliable {
            let raw = &database[j..j + m];
            let exact = SequenceStats::of(raw);
            return match (exact.variance <= tol, query_constant) {
                (true, true) => 0.0,
                (true, false) | (false, true) => sentinel,
                (false, false) => direct_distance(raw, &exact, &zq.values, &query_stats),
            };
        }

        match (window.variance * scale_sq <= tol, query_constant) {
            (true, true) => 0.0,
            (true, false) | (false, true) => sentinel,
            (false, false) => {
                let c = (qt[j] - m_f * window.mean * query_stats.mean)
                    / (m_f * window.std * query_stats.std);
                (2.0 * m_f * (1.0 - c.clamp(-1.0, 1.0))).max(0.0).sqrt()
            }
        }
    };

    let mut distances = vec![0.0; n_subs];
    fill_windows(&mut distances, config.parallel_threshold, assemble);

    Ok(DistanceProfile {
        distances,
        m,
        policy: config.constant_policy,
    })
}

/// Rounding scale of the FFT dot products: `eps * |x| * |y| * log2(2n)`.
fn dot_product_noise(series: &[f64], query: &[f64]) -> f64 {
    let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();
    let len = (2 * series.len()) as f64;
    f64::EPSILON * norm(series) * norm(query) * len.log2().max(1.0)
}

/// Z-normalized distance of one window from centered sums, without prefix
/// sums or FFT. Requires a non-constant window and query.
fn direct_distance(
    window: &[f64],
    window_stats: &SequenceStats,
    query: &[f64],
    query_stats: &SequenceStats,
) -> f64 {
    let m = window.len() as f64;
    let cov: f64 = window
        .iter()
        .zip(query)
        .map(|(&x, &y)| (x - window_stats.mean) * (y - query_stats.mean))
        .sum();
    let c = cov / (m * window_stats.std * query_stats.std);
    (2.0 * m * (1.0 - c.clamp(-1.0, 1.0))).max(0.0).sqrt()
}

#[cfg(feature = "parallel")]
fn fill_windows<F>(out: &mut [f64], threshold: usize, f: F)
where
    F: Fn(usize) -> f64 + Sync,
{
    use rayon::prelude::*;

    if out.len() >= threshold {
        out.par_iter_mut().enumerate().for_each(|(j, d)| *d = f(j));
    } else {
        out.iter_mut().enumerate().for_each(|(j, d)| *d = f(j));
    }
}

#[cfg(not(feature = "parallel"))]
fn fill_windows<F>(out: &mut [f64], _threshold: usize, f: F)
where
    F: Fn(usize) -> f64,
{
    out.iter_mut().enumerate().for_each(|(j, d)| *d = f(j));
}

/// Distance profile followed by arg-min: the window closest to `query`.
pub fn nearest_neighbor<E: TransformEngine>(
    engine: &E,
    database: &[f64],
    query: &[f64],
    config: &ProfileConfig,
) -> Result<NearestNeighbor> {
    let dp = distance_profile(engine, database, query, config)?;
    let nn = arg_min(&dp)?;
    debug!(index = nn.index, distance = nn.distance, "nearest neighbor");
    Ok(nn)
}

/// Default match threshold over the finite entries: `max(mean(D) - 2*std(D), min(D))`.
fn default_threshold(dp: &[f64]) -> Option<f64> {
    let finite_vals: Vec<f64> = dp.iter().copied().filter(|d| d.is_finite()).collect();
    if finite_vals.is_empty() {
        return None;
    }
    let stats = SequenceStats::of(&finite_vals);
    let min_d = finite_vals.iter().copied().fold(f64::INFINITY, f64::min);
    Some((stats.mean - 2.0 * stats.std).max(min_d))
}

/// Find all windows that match a query within a distance threshold.
///
/// 1. Compute the distance profile
/// 2. Determine the threshold (default: `max(mean(D) - 2*std(D), min(D))`)
/// 3. Repeatedly take the smallest remaining distance under the threshold,
///    record it and exclude its neighbourhood
///
/// # Arguments
/// * `max_distance` - Maximum distance threshold. If `None`, uses the default above.
/// * `exclusion_zone` - Exclusion zone radius. If `None`, uses `ceil(m / 4)`.
///
/// # Returns
/// Matches sorted by distance (ascending).
pub fn find_matches<E: TransformEngine>(
    engine: &E,
    database: &[f64],
    query: &[f64],
    max_distance: Option<f64>,
    exclusion_zone: Option<usize>,
    config: &ProfileConfig,
) -> Result<Vec<Match>> {
    let dp = distance_profile(engine, database, query, config)?;
    Ok(extract_matches(&dp, max_distance, exclusion_zone))
}

/// Steps 2 and 3 of [`find_matches`] on an already computed profile.
pub fn extract_matches(
    dp: &DistanceProfile,
    max_distance: Option<f64>,
    exclusion_zone: Option<usize>,
) -> Vec<Match> {
    let n_subs = dp.len();
    let ez = exclusion_zone.unwrap_or((dp.m as f64 / 4.0).ceil() as usize);

    let max_dist = match max_distance.or_else(|| default_threshold(dp.as_slice())) {
        Some(d) => d,
        None => return Vec::new(),
    };

    let mut working = dp.distances.clone();
    let mut matches = Vec::new();

    while let Some((index, distance)) = first_finite_min(&working) {
        if distance > max_dist {
            break;
        }
        matches.push(Match { index, distance });
        apply_exclusion_zone(&mut working, index, ez.max(1).min(n_subs));
    }

    debug!(count = matches.len(), threshold = max_dist, "matches extracted");
    matches
}
