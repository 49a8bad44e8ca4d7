/// Mean and population standard deviation of a sequence or window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStats {
    pub len: usize,
    pub mean: f64,
    /// Population variance, clamped to be non-negative.
    pub variance: f64,
    pub std: f64,
}

impl SequenceStats {
    /// Derive stats from `(sum, sum_sq, len)`.
    ///
    /// Variance via `E[X^2] - E[X]^2`, clamped to 0 since cancellation can
    /// push it slightly negative.
    #[inline]
    pub fn from_sums(sum: f64, sum_sq: f64, len: usize) -> Self {
        let len_f = len as f64;
        let mean = sum / len_f;
        let variance = (sum_sq / len_f - mean * mean).max(0.0);
        Self {
            len,
            mean,
            variance,
            std: variance.sqrt(),
        }
    }

    /// Two passes over `values`: the mean, then the centered sum of squares.
    ///
    /// Centering first keeps small variations on a large offset exact, where
    /// `E[X^2] - E[X]^2` would cancel them away.
    pub fn of(values: &[f64]) -> Self {
        let len = values.len();
        if len == 0 {
            return Self {
                len,
                mean: 0.0,
                variance: 0.0,
                std: 0.0,
            };
        }
        let len_f = len as f64;
        let mean = values.iter().sum::<f64>() / len_f;
        let variance = values
            .iter()
            .map(|&x| {
                let d = x - mean;
                d * d
            })
            .sum::<f64>()
            / len_f;
        Self {
            len,
            mean,
            variance,
            std: variance.sqrt(),
        }
    }
}

/// Whether every value equals the first. Empty and single-value sequences
/// are flat.
#[inline]
pub fn is_flat(values: &[f64]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|&x| x == first),
        None => true,
    }
}

/// Run lengths of equal consecutive values, for exact constant-window tests.
///
/// `run_len[i]` counts how many values ending at `i` equal `values[i]`, so
/// a window is constant iff the run ending at its last element covers it.
#[derive(Debug, Clone)]
pub struct ConstantRuns {
    run_len: Vec<usize>,
}

impl ConstantRuns {
    pub fn build(values: &[f64]) -> Self {
        let mut run_len: Vec<usize> = Vec::with_capacity(values.len());
        for (i, &x) in values.iter().enumerate() {
            let len = match i.checked_sub(1) {
                Some(prev) if values[prev] == x => run_len[prev] + 1,
                _ => 1,
            };
            run_len.push(len);
        }
        Self { run_len }
    }

    /// Whether `values[start..start + len]` holds a single repeated value.
    ///
    /// # Panics
    /// Panics if `start + len` exceeds the sequence length.
    #[inline]
    pub fn is_constant(&self, start: usize, len: usize) -> bool {
        len == 0 || self.run_len[start + len - 1] >= len
    }
}

/// Cumulative sums and sums-of-squares over a sequence.
///
/// `cum_sum[0] = cum_sum_sq[0] = 0` and `cum_sum[i] = cum_sum[i-1] + x[i-1]`,
/// so any window sum is one subtraction.
#[derive(Debug, Clone)]
pub struct PrefixSums {
    cum_sum: Vec<f64>,
    cum_sum_sq: Vec<f64>,
}

impl PrefixSums {
    /// Build both prefix arrays in one linear pass.
    pub fn build(values: &[f64]) -> Self {
        let n = values.len();
        let mut cum_sum = vec![0.0; n + 1];
        let mut cum_sum_sq = vec![0.0; n + 1];
        for (i, &x) in values.iter().enumerate() {
            cum_sum[i + 1] = cum_sum[i] + x;
            cum_sum_sq[i + 1] = cum_sum_sq[i] + x * x;
        }
        Self {
            cum_sum,
            cum_sum_sq,
        }
    }

    /// Length of the underlying sequence (one less than the prefix arrays).
    pub fn len(&self) -> usize {
        self.cum_sum.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cum_sum(&self) -> &[f64] {
        &self.cum_sum
    }

    pub fn cum_sum_sq(&self) -> &[f64] {
        &self.cum_sum_sq
    }

    /// `(sum, sum_sq)` of `values[start..start + len]` in O(1).
    ///
    /// # Panics
    /// Panics if `start + len` exceeds the sequence length.
    #[inline]
    pub fn window_sums(&self, start: usize, len: usize) -> (f64, f64) {
        let end = start + len;
        (
            self.cum_sum[end] - self.cum_sum[start],
            self.cum_sum_sq[end] - self.cum_sum_sq[start],
        )
    }

    /// Mean/std of `values[start..start + len]`.
    #[inline]
    pub fn window_stats(&self, start: usize, len: usize) -> SequenceStats {
        let (sum, sum_sq) = self.window_sums(start, len);
        SequenceStats::from_sums(sum, sum_sq, len)
    }

    /// Rounding scale of `window_stats(start, len).variance`.
    ///
    /// The window sums are differences of running totals, so their error
    /// tracks the size of the totals at `start + len`, not the window's own
    /// spread. A variance within a few orders of magnitude of this value
    /// carries no reliable digits.
    #[inline]
    pub fn variance_noise(&self, start: usize, len: usize) -> f64 {
        let end = start + len;
        let mean = (self.cum_sum[end] - self.cum_sum[start]) / len as f64;
        let level = self.cum_sum_sq[end]
            + 2.0 * mean.abs() * self.cum_sum[start].abs().max(self.cum_sum[end].abs());
        f64::EPSILON * level / (len as f64).sqrt()
    }
}
