//! Nearest-neighbor subsequence search under z-normalized Euclidean distance.
//!
//! The distance profile of a query against every equal-length window of a
//! longer series is computed with MASS: prefix-sum window statistics plus one
//! FFT cross-correlation, O(n log n) overall.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod engines;
pub mod error;
pub mod input;

pub use crate::algorithms::correlate::{
    cross_correlate, sliding_dot_product, sliding_dot_product_naive,
};
pub use crate::algorithms::mass::{
    distance_profile, extract_matches, find_matches, nearest_neighbor,
};
pub use crate::algorithms::normalize::{z_normalize, ZNormalized};
pub use crate::algorithms::select::arg_min;
pub use crate::core::profile::{
    ConstantPolicy, DistanceProfile, Match, NearestNeighbor, ProfileConfig,
};
pub use crate::core::stats::{PrefixSums, SequenceStats};
pub use crate::core::transform::{InverseNormalization, TransformEngine};
pub use crate::engines::{DirectDft, RustFftEngine};
pub use crate::error::{MassError, Result, TransformError};

/// High-level facade for distance-profile search, generic over the DFT engine.
///
/// # Examples
///
/// ```
/// use mass_nn::{Mass, ProfileConfig};
///
/// let db: Vec<f64> = (0..64).map(|i| (i as f64 * 0.4).sin()).collect();
/// let query = db[20..28].to_vec();
/// let mass = Mass::new(ProfileConfig::default());
/// let nn = mass.nearest_neighbor(&db, &query).unwrap();
/// assert_eq!(nn.index, 20);
/// ```
#[derive(Debug)]
pub struct Mass<E: TransformEngine = RustFftEngine> {
    engine: E,
    config: ProfileConfig,
}

impl Mass<RustFftEngine> {
    /// Create a searcher backed by `rustfft`.
    pub fn new(config: ProfileConfig) -> Self {
        Self::with_engine(RustFftEngine::new(), config)
    }
}

impl Default for Mass<RustFftEngine> {
    fn default() -> Self {
        Self::new(ProfileConfig::default())
    }
}

impl<E: TransformEngine> Mass<E> {
    /// Create a searcher over a caller-supplied engine.
    pub fn with_engine(engine: E, config: ProfileConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Distance between `query` and every window of `database`.
    pub fn distance_profile(&self, database: &[f64], query: &[f64]) -> Result<DistanceProfile> {
        distance_profile(&self.engine, database, query, &self.config)
    }

    /// The closest window (0-based index, first occurrence on ties).
    pub fn nearest_neighbor(&self, database: &[f64], query: &[f64]) -> Result<NearestNeighbor> {
        nearest_neighbor(&self.engine, database, query, &self.config)
    }

    /// All windows within `max_distance`, separated by an exclusion zone.
    ///
    /// See [`find_matches`] for the default threshold and zone.
    pub fn find_matches(
        &self,
        database: &[f64],
        query: &[f64],
        max_distance: Option<f64>,
        exclusion_zone: Option<usize>,
    ) -> Result<Vec<Match>> {
        find_matches(
            &self.engine,
            database,
            query,
            max_distance,
            exclusion_zone,
            &self.config,
        )
    }
}
