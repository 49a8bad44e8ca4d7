use rustfft::num_complex::Complex64;

use crate::error::TransformError;

/// How an engine scales its inverse transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseNormalization {
    /// Inverse is unscaled; the caller divides by `L` exactly once.
    Unnormalized,
    /// Inverse already divides by `L`.
    Normalized,
}

impl InverseNormalization {
    /// Factor the caller must apply after an inverse transform of length `len`.
    #[inline]
    pub fn caller_scale(self, len: usize) -> f64 {
        match self {
            InverseNormalization::Unnormalized => 1.0 / len as f64,
            InverseNormalization::Normalized => 1.0,
        }
    }
}

/// Trait for complex-to-complex DFT engines used by the cross-correlator.
///
/// Transforms are in place over the whole buffer. Forward transforms apply no
/// scaling. The inverse convention is declared by [`inverse_normalization`],
/// and the correlator picks its scale factor from it: mixing up conventions
/// silently scales every sliding dot product, so engines must report theirs
/// honestly.
///
/// Engines are `Send + Sync` so the two forward transforms can run on
/// separate rayon workers.
///
/// [`inverse_normalization`]: TransformEngine::inverse_normalization
pub trait TransformEngine: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Forward DFT, `X[k] = sum_t x[t] * exp(-2*pi*i*k*t/L)`.
    fn forward(&self, buffer: &mut [Complex64]) -> Result<(), TransformError>;

    /// Inverse DFT, `x[t] = s * sum_k X[k] * exp(2*pi*i*k*t/L)` where `s` is 1
    /// or `1/L` depending on [`TransformEngine::inverse_normalization`].
    fn inverse(&self, buffer: &mut [Complex64]) -> Result<(), TransformError>;

    /// Scaling convention of [`TransformEngine::inverse`].
    fn inverse_normalization(&self) -> InverseNormalization {
        InverseNormalization::Unnormalized
    }
}

impl<E: TransformEngine + ?Sized> TransformEngine for &E {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn forward(&self, buffer: &mut [Complex64]) -> Result<(), TransformError> {
        (**self).forward(buffer)
    }

    fn inverse(&self, buffer: &mut [Complex64]) -> Result<(), TransformError> {
        (**self).inverse(buffer)
    }

    fn inverse_normalization(&self) -> InverseNormalization {
        (**self).inverse_normalization()
    }
}
