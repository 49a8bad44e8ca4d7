use rustfft::num_complex::Complex64;
use tracing::trace;

use crate::core::transform::TransformEngine;
use crate::error::{MassError, Result};

/// Complex time/frequency buffer of a fixed transform length.
///
/// Buffers are owned by the correlator call that creates them and are dropped
/// on every exit path, including engine failures.
#[derive(Debug, Clone)]
pub struct SpectralBuffer {
    data: Vec<Complex64>,
}

impl SpectralBuffer {
    /// `values` followed by zeros up to `len`.
    pub fn padded(values: &[f64], len: usize) -> Self {
        debug_assert!(values.len() <= len);
        let mut data = vec![Complex64::new(0.0, 0.0); len];
        for (slot, &v) in data.iter_mut().zip(values) {
            slot.re = v;
        }
        Self { data }
    }

    /// `values` reversed, followed by zeros up to `len`.
    pub fn reversed_padded(values: &[f64], len: usize) -> Self {
        debug_assert!(values.len() <= len);
        let mut data = vec![Complex64::new(0.0, 0.0); len];
        for (slot, &v) in data.iter_mut().zip(values.iter().rev()) {
            slot.re = v;
        }
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    /// Pointwise complex product, in place.
    fn multiply_assign(&mut self, other: &SpectralBuffer) {
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a *= b;
        }
    }

    /// Real parts times `scale`.
    fn into_real(self, scale: f64) -> Vec<f64> {
        self.data.into_iter().map(|c| c.re * scale).collect()
    }
}

fn check_lengths(database: &[f64], query: &[f64]) -> Result<()> {
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
    Ok(())
}

/// Linear cross-correlation of `database` (length n) with `query` (length m)
/// through the convolution theorem.
///
/// Both inputs are zero-padded to `L = 2n`, the query reversed; the two
/// forward transforms are multiplied pointwise and inverse-transformed. The
/// returned `2n` values are real parts scaled by whatever the engine's inverse
/// convention requires. Index `m - 1 + j` holds `dot(query, database[j..j+m])`
/// for `j` in `0..=n-m`; the other indices are padding artifacts.
pub fn cross_correlate<E: TransformEngine>(
    engine: &E,
    database: &[f64],
    query: &[f64],
) -> Result<Vec<f64>> {
    check_lengths(database, query)?;
    let len = 2 * database.len();
    trace!(engine = engine.name(), len, "cross-correlating");

    let mut x = SpectralBuffer::padded(database, len);
    let mut y = SpectralBuffer::reversed_padded(query, len);

    forward_both(engine, &mut x, &mut y)?;
    x.multiply_assign(&y);
    drop(y);
    engine.inverse(x.as_mut_slice())?;

    let scale = engine.inverse_normalization().caller_scale(len);
    Ok(x.into_real(scale))
}

#[cfg(feature = "parallel")]
fn forward_both<E: TransformEngine>(
    engine: &E,
    x: &mut SpectralBuffer,
    y: &mut SpectralBuffer,
) -> Result<()> {
    let (rx, ry) = rayon::join(
        || engine.forward(x.as_mut_slice()),
        || engine.forward(y.as_mut_slice()),
    );
    rx?;
    ry?;
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn forward_both<E: TransformEngine>(
    engine: &E,
    x: &mut SpectralBuffer,
    y: &mut SpectralBuffer,
) -> Result<()> {
    engine.forward(x.as_mut_slice())?;
    engine.forward(y.as_mut_slice())?;
    Ok(())
}

/// Sliding dot products `dot(query, database[j..j+m])` for every window,
/// extracted from [`cross_correlate`].
///
/// Returns a vector of length `n - m + 1`.
pub fn sliding_dot_product<E: TransformEngine>(
    engine: &E,
    database: &[f64],
    query: &[f64],
) -> Result<Vec<f64>> {
    let m = query.len();
    let n_subs = database.len().saturating_sub(m) + 1;
    let mut full = cross_correlate(engine, database, query)?;
    full.truncate(m - 1 + n_subs);
    full.drain(..m - 1);
    Ok(full)
}

/// Naive O(n*m) sliding dot product, same layout as [`sliding_dot_product`].
pub fn sliding_dot_product_naive(database: &[f64], query: &[f64]) -> Result<Vec<f64>> {
    check_lengths(database, query)?;
    let m = query.len();
    let n_subs = database.len() - m + 1;

    Ok((0..n_subs)
        .map(|i| query.iter().zip(&database[i..i + m]).map(|(a, b)| a * b).sum())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::InverseNormalization;
    use crate::engines::{DirectDft, RustFftEngine};
    use crate::error::TransformError;

    /// Wraps `rustfft` but scales its inverse by `1/L` itself.
    struct SelfScaling(RustFftEngine);

    impl TransformEngine for SelfScaling {
        fn name(&self) -> &'static str {
            "self-scaling"
        }
        fn forward(&self, buffer: &mut [Complex64]) -> std::result::Result<(), TransformError> {
            self.0.forward(buffer)
        }
        fn inverse(&self, buffer: &mut [Complex64]) -> std::result::Result<(), TransformError> {
            self.0.inverse(buffer)?;
            let s = 1.0 / buffer.len() as f64;
            for v in buffer.iter_mut() {
                *v *= s;
            }
            Ok(())
        }
        fn inverse_normalization(&self) -> InverseNormalization {
            InverseNormalization::Normalized
        }
    }

    struct Failing;

    impl TransformEngine for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn forward(&self, _: &mut [Complex64]) -> std::result::Result<(), TransformError> {
            Err(TransformError::Engine("out of memory".to_string()))
        }
        fn inverse(&self, _: &mut [Complex64]) -> std::result::Result<(), TransformError> {
            Ok(())
        }
    }

    #[test]
    fn test_sliding_dot_product_simple() {
        // dot([1,2], [1,2]) = 5, dot([1,2], [2,3]) = 8, dot([1,2], [3,4]) = 11
        let q = vec![1.0, 2.0];
        let ts = vec![1.0, 2.0, 3.0, 4.0];
        let result = sliding_dot_product(&RustFftEngine::new(), &ts, &q).unwrap();
        assert_eq!(result.len(), 3);
        assert!((result[0] - 5.0).abs() < 1e-10);
        assert!((result[1] - 8.0).abs() < 1e-10);
        assert!((result[2] - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_sliding_dot_product_single_window() {
        let q = vec![3.0, 4.0, 5.0];
        let result = sliding_dot_product(&RustFftEngine::new(), &q, &q).unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0] - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_cross_correlate_layout() {
        let ts = vec![1.0, 2.0, 3.0, 4.0];
        let q = vec![1.0, 2.0];
        let full = cross_correlate(&RustFftEngine::new(), &ts, &q).unwrap();
        assert_eq!(full.len(), 8);
        // Reversed query [2,1] convolved with ts: [2, 5, 8, 11, 4, 0, 0, 0]
        let expected = [2.0, 5.0, 8.0, 11.0, 4.0, 0.0, 0.0, 0.0];
        for (a, b) in full.iter().zip(expected) {
            assert!((a - b).abs() < 1e-10, "got {full:?}");
        }
    }

    #[test]
    fn test_fft_vs_naive_equivalence() {
        let engine = RustFftEngine::new();
        for (n, m) in [(100, 10), (1000, 50), (777, 1), (64, 64)] {
            let ts: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
            let q: Vec<f64> = (0..m).map(|i| (i as f64 * 0.7).cos() + 0.2).collect();
            let naive = sliding_dot_product_naive(&ts, &q).unwrap();
            let fft = sliding_dot_product(&engine, &ts, &q).unwrap();
            assert_eq!(naive.len(), fft.len());
            for (i, (a, b)) in naive.iter().zip(fft.iter()).enumerate() {
                assert!(
                    (a - b).abs() < 1e-8,
                    "Mismatch at {i} (n={n}, m={m}): naive={a}, fft={b}"
                );
            }
        }
    }

    #[test]
    fn test_engines_agree() {
        let ts: Vec<f64> = (0..40).map(|i| (i as f64 * 0.45).sin() * 2.0).collect();
        let q = &ts[5..12];
        let a = sliding_dot_product(&RustFftEngine::new(), &ts, q).unwrap();
        let b = sliding_dot_product(&DirectDft, &ts, q).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-8);
        }
    }

    #[test]
    fn test_normalized_engine_convention_is_honoured() {
        let ts: Vec<f64> = (0..30).map(|i| i as f64 * 0.5 - 3.0).collect();
        let q = vec![1.0, -1.0, 2.0];
        let expected = sliding_dot_product_naive(&ts, &q).unwrap();
        let got = sliding_dot_product(&SelfScaling(RustFftEngine::new()), &ts, &q).unwrap();
        for (x, y) in expected.iter().zip(&got) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_all_zero_inputs() {
        let ts = vec![0.0; 20];
        let q = vec![0.0; 4];
        let got = sliding_dot_product(&RustFftEngine::new(), &ts, &q).unwrap();
        assert_eq!(got.len(), 17);
        assert!(got.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_engine_failure_propagates() {
        let err = cross_correlate(&Failing, &[1.0, 2.0, 3.0], &[1.0]).unwrap_err();
        assert!(matches!(err, MassError::Transform(TransformError::Engine(_))));
    }

    #[test]
    fn test_query_longer_than_database() {
        let err = sliding_dot_product(&RustFftEngine::new(), &[1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(err, Err(MassError::InvalidInput(_))));
        assert!(sliding_dot_product_naive(&[1.0], &[]).is_err());
    }

    #[test]
    fn test_spectral_buffer_reversal() {
        let mut b = SpectralBuffer::reversed_padded(&[1.0, 2.0, 3.0], 6);
        let re: Vec<f64> = b.as_mut_slice().iter().map(|c| c.re).collect();
        assert_eq!(re, vec![3.0, 2.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(b.len(), 6);
    }
}
