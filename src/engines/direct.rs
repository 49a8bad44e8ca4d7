use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

use crate::core::transform::{InverseNormalization, TransformEngine};
use crate::error::TransformError;

/// Textbook O(L^2) DFT.
///
/// Only useful as a reference: it shares no code with `rustfft`, so agreement
/// between the two checks the correlator's use of the engine contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectDft;

impl DirectDft {
    fn transform(buffer: &mut [Complex64], sign: f64) -> Result<(), TransformError> {
        let len = buffer.len();
        if len == 0 {
            return Err(TransformError::UnsupportedLength { len });
        }
        let step = sign * 2.0 * PI / len as f64;
        let out: Vec<Complex64> = (0..len)
            .map(|k| {
                buffer
                    .iter()
                    .enumerate()
                    .map(|(t, &x)| {
                        // k*t mod len keeps the angle small for large L
                        let angle = step * ((k * t) % len) as f64;
                        x * Complex64::new(angle.cos(), angle.sin())
                    })
                    .sum()
            })
            .collect();
        buffer.copy_from_slice(&out);
        Ok(())
    }
}

impl TransformEngine for DirectDft {
    fn name(&self) -> &'static str {
        "direct-dft"
    }

    fn forward(&self, buffer: &mut [Complex64]) -> Result<(), TransformError> {
        Self::transform(buffer, -1.0)
    }

    fn inverse(&self, buffer: &mut [Complex64]) -> Result<(), TransformError> {
        Self::transform(buffer, 1.0)
    }

    fn inverse_normalization(&self) -> InverseNormalization {
        InverseNormalization::Unnormalized
    }
}
