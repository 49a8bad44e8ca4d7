use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use tracing::trace;

use crate::core::transform::{InverseNormalization, TransformEngine};
use crate::error::TransformError;

type PlanKey = (usize, bool);

/// Plans kept by [`RustFftEngine::new`].
pub const DEFAULT_PLAN_CAPACITY: usize = 16;

/// Mixed-radix FFT engine backed by `rustfft`.
///
/// Plans are cached per `(length, direction)` so repeated searches against
/// databases of the same length skip planning. The cache holds at most
/// `capacity` plans and evicts the least recently used one. `rustfft` leaves
/// both directions unscaled, which is the contract the correlator expects.
pub struct RustFftEngine {
    plans: Mutex<LruCache<PlanKey, Arc<dyn Fft<f64>>>>,
}

impl Default for RustFftEngine {
    fn default() -> Self {
        Self::with_plan_capacity(DEFAULT_PLAN_CAPACITY)
    }
}

impl RustFftEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine caching at most `capacity` plans (at least one).
    pub fn with_plan_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            plans: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn plan(&self, len: usize, forward: bool) -> Result<Arc<dyn Fft<f64>>, TransformError> {
        if len == 0 {
            return Err(TransformError::UnsupportedLength { len });
        }
        let mut plans = self
            .plans
            .lock()
            .map_err(|_| TransformError::Engine("plan cache lock poisoned".to_string()))?;

        if let Some(plan) = plans.get(&(len, forward)) {
            return Ok(Arc::clone(plan));
        }

        trace!(len, forward, "planning fft");
        let mut planner = FftPlanner::<f64>::new();
        let plan = if forward {
            planner.plan_fft_forward(len)
        } else {
            planner.plan_fft_inverse(len)
        };
        if let Some(((old_len, old_forward), _)) = plans.push((len, forward), Arc::clone(&plan)) {
            trace!(len = old_len, forward = old_forward, "evicted fft plan");
        }
        Ok(plan)
    }

    fn run(&self, buffer: &mut [Complex64], forward: bool) -> Result<(), TransformError> {
        let fft = self.plan(buffer.len(), forward)?;
        if fft.len() != buffer.len() {
            return Err(TransformError::LengthMismatch {
                expected: fft.len(),
                actual: buffer.len(),
            });
        }
        fft.process(buffer);
        Ok(())
    }

    /// Number of cached plans.
    pub fn cached_plans(&self) -> usize {
        self.plans.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Maximum number of cached plans.
    pub fn plan_capacity(&self) -> usize {
        self.plans.lock().map(|p| p.cap().get()).unwrap_or(0)
    }

    /// Drop every cached plan.
    pub fn clear_plans(&self) {
        if let Ok(mut plans) = self.plans.lock() {
            plans.clear();
        }
    }
}

impl std::fmt::Debug for RustFftEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustFftEngine")
            .field("cached_plans", &self.cached_plans())
            .field("capacity", &self.plan_capacity())
            .finish()
    }
}

impl TransformEngine for RustFftEngine {
    fn name(&self) -> &'static str {
        "rustfft"
    }

    fn forward(&self, buffer: &mut [Complex64]) -> Result<(), TransformError> {
        self.run(buffer, true)
    }

    fn inverse(&self, buffer: &mut [Complex64]) -> Result<(), TransformError> {
        self.run(buffer, false)
    }

    fn inverse_normalization(&self) -> InverseNormalization {
        InverseNormalization::Unnormalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_scaled_by_len() {
        let engine = RustFftEngine::new();
        let original: Vec<Complex64> = (0..12)
            .map(|i| Complex64::new(i as f64 * 0.5 - 2.0, 0.0))
            .collect();
        let mut buf = original.clone();
        engine.forward(&mut buf).unwrap();
        engine.inverse(&mut buf).unwrap();
        for (a, b) in buf.iter().zip(&original) {
            assert!((a.re / 12.0 - b.re).abs() < 1e-10);
            assert!((a.im / 12.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_impulse_spectrum_is_flat() {
        let engine = RustFftEngine::new();
        let mut buf = vec![Complex64::new(0.0, 0.0); 8];
        buf[0] = Complex64::new(1.0, 0.0);
        engine.forward(&mut buf).unwrap();
        for v in &buf {
            assert!((v.re - 1.0).abs() < 1e-12);
            assert!(v.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_length_rejected() {
        let engine = RustFftEngine::new();
        let mut buf: Vec<Complex64> = Vec::new();
        assert_eq!(
            engine.forward(&mut buf),
            Err(TransformError::UnsupportedLength { len: 0 })
        );
    }

    #[test]
    fn test_plans_are_cached() {
        let engine = RustFftEngine::new();
        let mut buf = vec![Complex64::new(1.0, 0.0); 16];
        engine.forward(&mut buf).unwrap();
        engine.forward(&mut buf).unwrap();
        engine.inverse(&mut buf).unwrap();
        assert_eq!(engine.cached_plans(), 2);
    }

    #[test]
    fn test_plan_cache_is_bounded() {
        let engine = RustFftEngine::with_plan_capacity(2);
        for len in [8, 9, 10, 11] {
            let mut buf = vec![Complex64::new(1.0, 0.0); len];
            engine.forward(&mut buf).unwrap();
            assert!(engine.cached_plans() <= 2);
        }
        assert_eq!(engine.cached_plans(), 2);

        engine.clear_plans();
        assert_eq!(engine.cached_plans(), 0);
    }

    #[test]
    fn test_plan_cache_evicts_least_recently_used() {
        let engine = RustFftEngine::with_plan_capacity(2);
        let mut a = vec![Complex64::new(1.0, 0.0); 8];
        let mut b = vec![Complex64::new(1.0, 0.0); 12];
        let mut c = vec![Complex64::new(1.0, 0.0); 16];
        engine.forward(&mut a).unwrap();
        engine.forward(&mut b).unwrap();
        engine.forward(&mut a).unwrap();
        // Evicts the 12-point plan, which was used least recently
        engine.forward(&mut c).unwrap();
        let plans = engine.plans.lock().unwrap();
        assert!(plans.contains(&(8, true)));
        assert!(plans.contains(&(16, true)));
        assert!(!plans.contains(&(12, true)));
    }
}
