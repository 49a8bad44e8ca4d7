use crate::core::profile::{DistanceProfile, NearestNeighbor};
use crate::error::{MassError, Result};

/// First index holding the smallest finite value, if any.
///
/// Strict `<` keeps the earliest index on ties. Infinite entries (sentinels
/// and excluded zones) never win.
#[inline]
pub fn first_finite_min(values: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &d) in values.iter().enumerate() {
        if !d.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if d >= b => {}
            _ => best = Some((i, d)),
        }
    }
    best
}

/// Nearest neighbor of the query: the minimum of the profile and the first
/// index attaining it.
///
/// Fails with [`MassError::EmptyProfile`] on an empty profile, and with
/// [`MassError::NoComparableWindow`] when every entry is an undefined
/// sentinel.
pub fn arg_min(profile: &DistanceProfile) -> Result<NearestNeighbor> {
    if profile.is_empty() {
        return Err(MassError::EmptyProfile);
    }
    first_finite_min(profile.as_slice())
        .map(|(index, distance)| NearestNeighbor { index, distance })
        .ok_or(MassError::NoComparableWindow { len: profile.len() })
}

/// Apply an exclusion zone around index `idx`, setting entries within the zone to infinity.
///
/// The zone covers indices `[idx - zone, idx + zone]` (clamped to bounds).
#[inline]
pub fn apply_exclusion_zone(profile: &mut [f64], idx: usize, zone: usize) {
    let start = idx.saturating_sub(zone);
    let end = (idx + zone + 1).min(profile.len());
    for val in &mut profile[start..end] {
        *val = f64::INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::ConstantPolicy;

    fn profile(distances: Vec<f64>) -> DistanceProfile {
        DistanceProfile {
            distances,
            m: 4,
            policy: ConstantPolicy::Infinite,
        }
    }

    #[test]
    fn test_arg_min_basic() {
        let nn = arg_min(&profile(vec![3.0, 1.5, 2.0, 0.5, 4.0])).unwrap();
        assert_eq!(nn.index, 3);
        assert_eq!(nn.distance, 0.5);
    }

    #[test]
    fn test_arg_min_first_occurrence() {
        let nn = arg_min(&profile(vec![2.0, 1.0, 3.0, 1.0, 1.0])).unwrap();
        assert_eq!(nn.index, 1);
    }

    #[test]
    fn test_arg_min_skips_sentinels() {
        let nn = arg_min(&profile(vec![f64::INFINITY, 2.5, f64::INFINITY, 1.25])).unwrap();
        assert_eq!(nn.index, 3);
        assert_eq!(nn.distance, 1.25);
    }

    #[test]
    fn test_arg_min_empty() {
        assert!(matches!(arg_min(&profile(vec![])), Err(MassError::EmptyProfile)));
    }

    #[test]
    fn test_arg_min_all_undefined() {
        let err = arg_min(&profile(vec![f64::INFINITY; 3])).unwrap_err();
        assert!(matches!(err, MassError::NoComparableWindow { len: 3 }));
    }

    #[test]
    fn test_exclusion_zone_middle() {
        let mut profile = vec![1.0; 10];
        apply_exclusion_zone(&mut profile, 5, 2);
        for (i, &val) in profile.iter().enumerate() {
            if (3..=7).contains(&i) {
                assert!(val.is_infinite());
            } else {
                assert!((val - 1.0).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_exclusion_zone_edge() {
        let mut profile = vec![1.0; 5];
        apply_exclusion_zone(&mut profile, 0, 2);
        assert!(profile[..3].iter().all(|v| v.is_infinite()));
        assert!(profile[3..].iter().all(|v| (v - 1.0).abs() < 1e-10));
    }
}
