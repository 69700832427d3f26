//! Bridges from `sorter_config` types to `sorter_core` types.

use eyre::WrapErr;
use sorter_config::{CatchAllMode, Config, CupSpec, Encoding};

use crate::cup::{CatchAllPolicy, CupTable, RangeClassifier};
use crate::error::Result;
use crate::series::ResistorSeries;
use crate::wire::WireEncoding;

// ── Enums ────────────────────────────────────────────────────────────────────

impl From<Encoding> for WireEncoding {
    fn from(e: Encoding) -> Self {
        match e {
            Encoding::Offset => WireEncoding::Offset,
            Encoding::DirectionBit => WireEncoding::DirectionBit,
        }
    }
}

impl From<CatchAllMode> for CatchAllPolicy {
    fn from(m: CatchAllMode) -> Self {
        match m {
            CatchAllMode::AcceptAll => CatchAllPolicy::AcceptAll,
            CatchAllMode::ZeroSentinel => CatchAllPolicy::ZeroSentinel,
        }
    }
}

// ── Cups ─────────────────────────────────────────────────────────────────────

pub fn classifier_from_spec(spec: &CupSpec, policy: CatchAllPolicy) -> Result<RangeClassifier> {
    let mut c = match *spec {
        CupSpec::Range { min, max, catch_all } => {
            let mut c = RangeClassifier::new(min, max)?;
            c.set_catch_all(catch_all);
            c
        }
        CupSpec::Nominal {
            nominal,
            tolerance_pct,
            catch_all,
        } => {
            let mut c = RangeClassifier::from_nominal(nominal, tolerance_pct)?;
            c.set_catch_all(catch_all);
            c
        }
        CupSpec::CatchAll { catch_all } => {
            let mut c = RangeClassifier::catch_all();
            c.set_catch_all(catch_all);
            c
        }
    };
    c = c.with_policy(policy);
    Ok(c)
}

pub fn cup_table_from_specs(specs: &[CupSpec], policy: CatchAllPolicy) -> Result<CupTable> {
    let cups = specs
        .iter()
        .enumerate()
        .map(|(i, s)| classifier_from_spec(s, policy).wrap_err_with(|| format!("cup {}", i + 1)))
        .collect::<Result<Vec<_>>>()?;
    Ok(CupTable::new(cups))
}

/// Cup table described by `cfg`: the `[series]` section when present,
/// otherwise the explicit `[[cups]]` list.
pub fn cup_table_from_config(cfg: &Config) -> Result<CupTable> {
    let policy = CatchAllPolicy::from(cfg.classifier.catch_all);
    match &cfg.series {
        Some(series) => ResistorSeries::from(series.name)
            .cup_table(series.decade, series.start, cfg.wheel.cups, policy)
            .wrap_err("building series cup table"),
        None => cup_table_from_specs(&cfg.cups, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sentinel_policy_reaches_every_cup() {
        let specs = [
            CupSpec::Range {
                min: 1.0,
                max: 2.0,
                catch_all: false,
            },
            CupSpec::CatchAll { catch_all: true },
        ];
        let table = cup_table_from_specs(&specs, CatchAllPolicy::ZeroSentinel).unwrap();
        assert!(
            table
                .iter()
                .all(|c| c.policy() == CatchAllPolicy::ZeroSentinel)
        );
        assert_eq!(table.classify(0.2), Some(2));
        assert_eq!(table.classify(50.0), None);
    }

    #[test]
    fn bad_spec_names_the_cup() {
        let specs = [
            CupSpec::Range {
                min: 1.0,
                max: 2.0,
                catch_all: false,
            },
            CupSpec::Range {
                min: 5.0,
                max: 1.0,
                catch_all: false,
            },
        ];
        let err = cup_table_from_specs(&specs, CatchAllPolicy::AcceptAll).unwrap_err();
        assert_eq!(err.to_string(), "cup 2");
    }
}
