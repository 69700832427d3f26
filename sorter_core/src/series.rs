//! IEC 60063 preferred-value series for resistors.
//!
//! Tables hold the three-digit mantissas of one decade (`100` = 1.00).

use crate::cup::{CatchAllPolicy, CupTable, RangeClassifier};
use crate::error::{BuildError, Result};

/// 1% series.
pub const E96: [u16; 96] = [
    100, 102, 105, 107, 110, 113, 115, 118, 121, 124, 127, 130, 133, 137, 140, 143, 147, 150, 154,
    158, 162, 165, 169, 174, 178, 182, 187, 191, 196, 200, 205, 210, 215, 221, 226, 232, 237, 243,
    249, 255, 261, 267, 274, 280, 287, 294, 301, 309, 316, 324, 332, 340, 348, 357, 365, 374, 383,
    392, 402, 412, 422, 432, 442, 453, 464, 475, 487, 499, 511, 523, 536, 549, 562, 576, 590, 604,
    619, 634, 649, 665, 681, 698, 715, 732, 750, 768, 787, 806, 825, 845, 866, 887, 909, 931, 953,
    976,
];

/// 2% and 5% series.
pub const E24: [u16; 24] = [
    100, 110, 120, 130, 150, 160, 180, 200, 220, 240, 270, 300, 330, 360, 390, 430, 470, 510, 560,
    620, 680, 750, 820, 910,
];

/// 10% series.
pub const E12: [u16; 12] = [100, 120, 150, 180, 220, 270, 330, 390, 470, 560, 680, 820];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResistorSeries {
    E12,
    E24,
    E96,
}

impl ResistorSeries {
    pub fn values(self) -> &'static [u16] {
        match self {
            ResistorSeries::E12 => &E12,
            ResistorSeries::E24 => &E24,
            ResistorSeries::E96 => &E96,
        }
    }

    pub fn tolerance_pct(self) -> f64 {
        match self {
            ResistorSeries::E12 => 10.0,
            ResistorSeries::E24 => 5.0,
            ResistorSeries::E96 => 1.0,
        }
    }

    /// Closest preferred value to `value`, in whichever decade it falls.
    ///
    /// Non-positive and non-finite inputs have no neighbour.
    pub fn nearest_standard(self, value: f64) -> Option<f64> {
        if !(value.is_finite() && value > 0.0) {
            return None;
        }
        // scale so the mantissa lands in [100, 1000)
        #[allow(clippy::cast_possible_truncation)]
        let exp = value.log10().floor() as i32 - 2;
        let scale = 10f64.powi(exp);
        let mantissa = value / scale;
        if !mantissa.is_finite() {
            return None;
        }
        let best = self
            .values()
            .iter()
            .map(|&v| f64::from(v))
            .chain(std::iter::once(1000.0))
            .min_by(|a, b| (a - mantissa).abs().total_cmp(&(b - mantissa).abs()))?;
        // rounding up can leave the f64 range at the top end
        Some(best * scale).filter(|v| v.is_finite())
    }

    /// Cup table for a ranged sort: consecutive preferred values starting at
    /// index `start`, scaled so that mantissa `100` equals `decade`, each
    /// with the series tolerance, followed by one catch-all cup.
    ///
    /// Holds at most `slots` cups; a shorter table results when the series
    /// runs out.
    pub fn cup_table(
        self,
        decade: f64,
        start: usize,
        slots: u32,
        policy: CatchAllPolicy,
    ) -> Result<CupTable> {
        if !(decade.is_finite() && decade > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "series decade must be > 0",
            )));
        }
        if start >= self.values().len() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "series start beyond the end of the series",
            )));
        }
        if slots == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "wheel has no slots",
            )));
        }
        let specific = slots as usize - 1;
        let mut cups = self.values()[start..]
            .iter()
            .take(specific)
            .map(|&v| {
                RangeClassifier::from_nominal(decade / 100.0 * f64::from(v), self.tolerance_pct())
            })
            .collect::<Result<Vec<_>>>()?;
        cups.push(RangeClassifier::catch_all().with_policy(policy));
        Ok(CupTable::new(cups))
    }
}

impl From<sorter_config::SeriesName> for ResistorSeries {
    fn from(n: sorter_config::SeriesName) -> Self {
        match n {
            sorter_config::SeriesName::E12 => ResistorSeries::E12,
            sorter_config::SeriesName::E24 => ResistorSeries::E24,
            sorter_config::SeriesName::E96 => ResistorSeries::E96,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn tables_are_sorted_mantissas() {
        for s in [ResistorSeries::E12, ResistorSeries::E24, ResistorSeries::E96] {
            let v = s.values();
            assert!(v.windows(2).all(|w| w[0] < w[1]));
            assert!(v.iter().all(|&x| (100..1000).contains(&x)));
        }
    }

    #[test]
    fn nearest_standard_within_decade() {
        let near = ResistorSeries::E24.nearest_standard(4650.0).unwrap();
        assert!(close(near, 4700.0), "{near}");
        let near = ResistorSeries::E12.nearest_standard(2.3).unwrap();
        assert!(close(near, 2.2), "{near}");
    }

    #[test]
    fn nearest_standard_wraps_to_next_decade() {
        let near = ResistorSeries::E12.nearest_standard(98.0).unwrap();
        assert!(close(near, 100.0), "{near}");
        let near = ResistorSeries::E96.nearest_standard(9_990.0).unwrap();
        assert!(close(near, 10_000.0), "{near}");
    }

    #[test]
    fn nearest_standard_rejects_non_positive() {
        assert_eq!(ResistorSeries::E12.nearest_standard(0.0), None);
        assert_eq!(ResistorSeries::E12.nearest_standard(-5.0), None);
        assert_eq!(ResistorSeries::E12.nearest_standard(f64::NAN), None);
    }

    #[test]
    fn nearest_standard_stays_finite_at_range_edges() {
        // 1.797e308 rounds up to 1.8e308, past f64::MAX
        assert_eq!(ResistorSeries::E12.nearest_standard(f64::MAX), None);
        for s in [ResistorSeries::E12, ResistorSeries::E24, ResistorSeries::E96] {
            for v in [f64::MAX, 1.0e308, f64::MIN_POSITIVE, 5e-324] {
                if let Some(near) = s.nearest_standard(v) {
                    assert!(near.is_finite() && near > 0.0, "{s:?} {v} -> {near}");
                }
            }
        }
    }

    #[test]
    fn ranged_cup_table() {
        let table = ResistorSeries::E12
            .cup_table(1000.0, 2, 4, CatchAllPolicy::AcceptAll)
            .unwrap();
        assert_eq!(table.len(), 4);
        // 1k5, 1k8, 2k2 at 10%, then the reject bin
        assert_eq!(table.classify(1500.0), Some(1));
        assert_eq!(table.classify(1800.0), Some(2));
        assert_eq!(table.classify(2200.0), Some(3));
        assert_eq!(table.classify(10_000.0), Some(4));
        assert!(table.get(4).unwrap().is_catch_all());
    }

    #[test]
    fn ranged_cup_table_stops_at_series_end() {
        let table = ResistorSeries::E12
            .cup_table(100.0, 10, 9, CatchAllPolicy::AcceptAll)
            .unwrap();
        // 680, 820 and the catch-all
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn ranged_cup_table_near_f64_max() {
        // decade * mantissa alone would overflow
        let table = ResistorSeries::E24
            .cup_table(1e306, 0, 9, CatchAllPolicy::AcceptAll)
            .unwrap();
        assert_eq!(table.len(), 9);
        let (lo, hi) = table.get(8).unwrap().bounds();
        assert!(lo.is_finite() && hi.is_finite());
        assert_eq!(table.classify(1e306), Some(1));
    }

    #[test]
    fn ranged_cup_table_rejects_bad_input() {
        let s = ResistorSeries::E24;
        assert!(s.cup_table(0.0, 0, 9, CatchAllPolicy::AcceptAll).is_err());
        assert!(s.cup_table(100.0, 24, 9, CatchAllPolicy::AcceptAll).is_err());
        assert!(s.cup_table(100.0, 0, 0, CatchAllPolicy::AcceptAll).is_err());
    }
}
