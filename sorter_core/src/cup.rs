//! Acceptance ranges for wheel cups.

use crate::error::{Result, SorterError};

/// What a catch-all cup accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatchAllPolicy {
    /// Every value, regardless of bounds.
    #[default]
    AcceptAll,
    /// Its own bounds plus values that truncate to exactly 0 (the "open
    /// circuit" reading). Matches older mainboard firmware.
    ZeroSentinel,
}

/// Inclusive `[min, max]` acceptance range of one cup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeClassifier {
    min: f64,
    max: f64,
    catch_all: bool,
    policy: CatchAllPolicy,
}

impl RangeClassifier {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(eyre::Report::new(SorterError::InvalidArgument(format!(
                "cup bounds must be finite, got [{min}, {max}]"
            ))));
        }
        if min > max {
            return Err(eyre::Report::new(SorterError::InvalidArgument(format!(
                "cup min {min} exceeds max {max}"
            ))));
        }
        Ok(Self {
            min,
            max,
            catch_all: false,
            policy: CatchAllPolicy::AcceptAll,
        })
    }

    /// `nominal ± nominal * tolerance_pct / 100`.
    pub fn from_nominal(nominal: f64, tolerance_pct: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&tolerance_pct) {
            return Err(eyre::Report::new(SorterError::InvalidArgument(format!(
                "tolerance {tolerance_pct}% outside 0..=100"
            ))));
        }
        let delta = nominal * (tolerance_pct / 100.0);
        let (a, b) = (nominal - delta, nominal + delta);
        Self::new(a.min(b), a.max(b))
    }

    /// Reject bin with empty `[0, 0]` bounds.
    pub fn catch_all() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            catch_all: true,
            policy: CatchAllPolicy::AcceptAll,
        }
    }

    pub fn with_policy(mut self, policy: CatchAllPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn accepts(&self, value: f64) -> bool {
        if self.catch_all {
            match self.policy {
                CatchAllPolicy::AcceptAll => return true,
                CatchAllPolicy::ZeroSentinel => {
                    if value.is_finite() && value.trunc() == 0.0 {
                        return true;
                    }
                }
            }
        }
        self.min <= value && value <= self.max
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn set_catch_all(&mut self, state: bool) {
        self.catch_all = state;
    }

    pub fn is_catch_all(&self) -> bool {
        self.catch_all
    }

    pub fn policy(&self) -> CatchAllPolicy {
        self.policy
    }
}

/// Ordered cups of one wheel; cup `n` sits at wheel slot `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct CupTable {
    cups: Vec<RangeClassifier>,
}

impl CupTable {
    pub fn new(cups: Vec<RangeClassifier>) -> Self {
        if let Some(first) = cups.iter().position(RangeClassifier::is_catch_all)
            && cups[first + 1..].iter().any(|c| !c.is_catch_all())
        {
            tracing::warn!(
                cup = first + 1,
                "catch-all cup precedes specific cups; later cups may never fill"
            );
        }
        Self { cups }
    }

    /// First cup (1-based) whose range accepts `value`.
    pub fn classify(&self, value: f64) -> Option<u32> {
        self.cups
            .iter()
            .position(|c| c.accepts(value))
            .and_then(|i| u32::try_from(i + 1).ok())
    }

    /// Cup by 1-based number.
    pub fn get(&self, cup: u32) -> Option<&RangeClassifier> {
        let idx = usize::try_from(cup).ok()?.checked_sub(1)?;
        self.cups.get(idx)
    }

    pub fn get_mut(&mut self, cup: u32) -> Option<&mut RangeClassifier> {
        let idx = usize::try_from(cup).ok()?.checked_sub(1)?;
        self.cups.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.cups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RangeClassifier> {
        self.cups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let c = RangeClassifier::new(95.0, 105.0).unwrap();
        assert!(c.accepts(95.0));
        assert!(c.accepts(105.0));
        assert!(c.accepts(100.0));
        assert!(!c.accepts(94.999));
        assert!(!c.accepts(105.001));
        assert!(!c.accepts(f64::NAN));
    }

    #[test]
    fn nominal_tolerance_bounds() {
        let c = RangeClassifier::from_nominal(4700.0, 5.0).unwrap();
        let (lo, hi) = c.bounds();
        assert!((lo - 4465.0).abs() < 1e-9);
        assert!((hi - 4935.0).abs() < 1e-9);
        let zero_tol = RangeClassifier::from_nominal(220.0, 0.0).unwrap();
        assert_eq!(zero_tol.bounds(), (220.0, 220.0));
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(RangeClassifier::new(2.0, 1.0).is_err());
        assert!(RangeClassifier::new(f64::NAN, 1.0).is_err());
        assert!(RangeClassifier::from_nominal(100.0, -1.0).is_err());
        assert!(RangeClassifier::from_nominal(100.0, 101.0).is_err());
    }

    #[test]
    fn toggling_catch_all_keeps_bounds() {
        let mut c = RangeClassifier::new(10.0, 20.0).unwrap();
        c.set_catch_all(true);
        assert!(c.accepts(1e9));
        assert!(c.accepts(f64::NAN));
        assert_eq!(c.bounds(), (10.0, 20.0));
        c.set_catch_all(false);
        assert!(!c.accepts(1e9));
    }

    #[test]
    fn zero_sentinel_catch_all() {
        let c = RangeClassifier::catch_all().with_policy(CatchAllPolicy::ZeroSentinel);
        assert!(c.accepts(0.0));
        assert!(c.accepts(0.7));
        assert!(c.accepts(-0.4));
        assert!(!c.accepts(1.0));
        assert!(!c.accepts(4700.0));
        assert!(!c.accepts(f64::NAN));
    }

    #[test]
    fn table_prefers_earlier_cups() {
        let table = CupTable::new(vec![
            RangeClassifier::new(90.0, 110.0).unwrap(),
            RangeClassifier::new(100.0, 200.0).unwrap(),
            RangeClassifier::catch_all(),
        ]);
        assert_eq!(table.classify(100.0), Some(1));
        assert_eq!(table.classify(150.0), Some(2));
        assert_eq!(table.classify(1e6), Some(3));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn table_without_catch_all_can_miss() {
        let table = CupTable::new(vec![RangeClassifier::new(1.0, 2.0).unwrap()]);
        assert_eq!(table.classify(3.0), None);
        assert!(table.get(0).is_none());
        assert!(table.get(2).is_none());
        assert!(table.get(1).is_some());
    }
}
