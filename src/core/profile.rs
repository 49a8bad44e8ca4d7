use serde::{Deserialize, Serialize};

/// What a window gets when exactly one of (window, query) is constant.
///
/// Both constant always yields distance 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstantPolicy {
    /// `f64::INFINITY`; such windows never win the nearest-neighbor search.
    #[default]
    Infinite,
    /// `sqrt(2*m)`, the distance of an uncorrelated shape. Competes normally.
    MaxDistance,
}

impl ConstantPolicy {
    /// Distance assigned to a one-sided constant comparison for query length `m`.
    #[inline]
    pub fn sentinel(self, m: usize) -> f64 {
        match self {
            ConstantPolicy::Infinite => f64::INFINITY,
            ConstantPolicy::MaxDistance => (2.0 * m as f64).sqrt(),
        }
    }

    /// Whether sentinel entries take part in arg-min.
    #[inline]
    pub fn sentinels_compete(self) -> bool {
        matches!(self, ConstantPolicy::MaxDistance)
    }
}

/// Configuration for distance profile computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Policy for constant windows or a constant query.
    pub constant_policy: ConstantPolicy,
    /// Absolute variance floor, in the units of the raw data, at or below
    /// which a window or the query counts as constant. Sequences of a single
    /// repeated value are constant regardless.
    pub constant_tolerance: f64,
    /// Globally z-normalize the database before correlation and prefix sums.
    pub normalize_database: bool,
    /// Window count at which the per-window loop goes parallel.
    pub parallel_threshold: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            constant_policy: ConstantPolicy::Infinite,
            constant_tolerance: 0.0,
            normalize_database: true,
            parallel_threshold: 4096,
        }
    }
}

impl ProfileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constant_policy(mut self, policy: ConstantPolicy) -> Self {
        self.constant_policy = policy;
        self
    }

    pub fn with_constant_tolerance(mut self, tolerance: f64) -> Self {
        self.constant_tolerance = tolerance;
        self
    }

    pub fn with_normalize_database(mut self, normalize: bool) -> Self {
        self.normalize_database = normalize;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

/// Z-normalized Euclidean distances between a query and every window.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceProfile {
    /// `distances[j]` compares the query with `database[j..j + m]`.
    pub distances: Vec<f64>,
    /// Query length.
    pub m: usize,
    /// Policy the sentinel entries were produced under.
    pub policy: ConstantPolicy,
}

impl DistanceProfile {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.distances
    }

    /// Largest distance a comparable window can have: `2*sqrt(m)`.
    pub fn max_distance(&self) -> f64 {
        2.0 * (self.m as f64).sqrt()
    }

    /// Whether entry `j` is a sentinel that does not compete in arg-min.
    #[inline]
    pub fn is_undefined(&self, j: usize) -> bool {
        !self.policy.sentinels_compete() && !self.distances[j].is_finite()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.distances
    }
}

/// Closest window to the query. `index` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestNeighbor {
    pub index: usize,
    pub distance: f64,
}

/// A single match result from pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Match {
    /// Index of the matching window in the database.
    pub index: usize,
    /// Z-normalized Euclidean distance between query and this window.
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert!(ConstantPolicy::Infinite.sentinel(9).is_infinite());
        assert!((ConstantPolicy::MaxDistance.sentinel(8) - 4.0).abs() < 1e-12);
        assert!(!ConstantPolicy::Infinite.sentinels_compete());
        assert!(ConstantPolicy::MaxDistance.sentinels_compete());
    }

    #[test]
    fn test_config_builder() {
        let cfg = ProfileConfig::new()
            .with_constant_policy(ConstantPolicy::MaxDistance)
            .with_normalize_database(false)
            .with_parallel_threshold(1);
        assert_eq!(cfg.constant_policy, ConstantPolicy::MaxDistance);
        assert!(!cfg.normalize_database);
        assert_eq!(cfg.parallel_threshold, 1);
        assert_eq!(cfg.constant_tolerance, 0.0);
    }

    #[test]
    fn test_profile_max_distance() {
        let dp = DistanceProfile {
            distances: vec![0.0, f64::INFINITY],
            m: 16,
            policy: ConstantPolicy::Infinite,
        };
        assert!((dp.max_distance() - 8.0).abs() < 1e-12);
        assert!(!dp.is_undefined(0));
        assert!(dp.is_undefined(1));
    }
}
