use crate::core::stats::{is_flat, SequenceStats};

/// Default variance floor below which a sequence counts as constant. Zero
/// means only sequences of one repeated value (or whose spread underflows).
pub const DEFAULT_CONSTANT_TOLERANCE: f64 = 0.0;

/// A z-normalized copy of a sequence together with the statistics of the
/// original values.
#[derive(Debug, Clone, PartialEq)]
pub struct ZNormalized {
    pub values: Vec<f64>,
    /// Mean/std of the input, before normalization.
    pub stats: SequenceStats,
    /// The input was constant; `values` is all zeros.
    pub constant: bool,
}

/// Z-normalize `data` with the default constant tolerance.
pub fn z_normalize(data: &[f64]) -> ZNormalized {
    z_normalize_with(data, DEFAULT_CONSTANT_TOLERANCE)
}

/// Z-normalize `data`: `(x - mean) / std` with the population std.
///
/// The input counts as constant when all values are equal or its centered
/// variance is at most `tolerance` (an absolute floor, independent of the
/// mean). A constant input maps to all zeros rather than dividing by zero,
/// and is flagged in the result.
pub fn z_normalize_with(data: &[f64], tolerance: f64) -> ZNormalized {
    let stats = SequenceStats::of(data);
    if is_flat(data) || stats.variance <= tolerance {
        return ZNormalized {
            values: vec![0.0; data.len()],
            stats,
            constant: true,
        };
    }
    let inv_std = 1.0 / stats.std;
    ZNormalized {
        values: data.iter().map(|&x| (x - stats.mean) * inv_std).collect(),
        stats,
        constant: false,
    }
}
