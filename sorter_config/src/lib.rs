#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and cup-table parsing for the sorting machine.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The cup-table CSV loader enforces headers and rejects inverted ranges.
use serde::Deserialize;

/// Cup-table CSV schema.
///
/// Expected headers:
/// min,max
///
/// Example:
/// min,max
/// 95.0,105.0
/// 4465.0,4935.0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CupRow {
    pub min: f64,
    pub max: f64,
}

impl From<CupRow> for CupSpec {
    fn from(r: CupRow) -> Self {
        CupSpec::Range {
            min: r.min,
            max: r.max,
            catch_all: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Bus {
    /// Linux I2C bus number (`/dev/i2c-N`)
    pub i2c_bus: u8,
    /// 7-bit address of the sort wheel controller
    pub wheel_channel: u8,
    /// 7-bit address of the step feeder controller
    pub feed_channel: u8,
}

impl Default for Bus {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            wheel_channel: 0x01,
            feed_channel: 0x02,
        }
    }
}

/// Byte format for wheel move commands.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Counter-clockwise moves are sent as `steps + 100` (existing wheel firmware)
    #[default]
    Offset,
    /// Bit 7 carries the direction, bits 0-6 the step count
    DirectionBit,
}

impl Encoding {
    /// Largest wheel the encoding can address: the shortest path never
    /// exceeds `cups / 2` steps.
    pub const fn max_cups(self) -> u32 {
        match self {
            Encoding::Offset => 199,
            Encoding::DirectionBit => 255,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Wheel {
    /// Number of cups (stopping positions) on the wheel.
    pub cups: u32,
    #[serde(default)]
    pub encoding: Encoding,
}

/// What a catch-all cup accepts.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatchAllMode {
    /// Every value
    #[default]
    AcceptAll,
    /// Only values that truncate to 0 (plus its own bounds)
    ZeroSentinel,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Classifier {
    pub catch_all: CatchAllMode,
}

/// One cup entry. Accepts either:
/// - explicit bounds: { min = 95.0, max = 105.0 }
/// - nominal with tolerance: { nominal = 4700.0, tolerance_pct = 5.0 }
/// - reject bin: { catch_all = true }
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum CupSpec {
    Range {
        min: f64,
        max: f64,
        #[serde(default)]
        catch_all: bool,
    },
    Nominal {
        nominal: f64,
        tolerance_pct: f64,
        #[serde(default)]
        catch_all: bool,
    },
    CatchAll {
        catch_all: bool,
    },
}

impl CupSpec {
    fn validate(&self, cup: usize) -> eyre::Result<()> {
        match *self {
            CupSpec::Range { min, max, .. } => {
                if !min.is_finite() || !max.is_finite() {
                    eyre::bail!("cups[{cup}]: min/max must be finite");
                }
                if min > max {
                    eyre::bail!("cups[{cup}]: min ({min}) must be <= max ({max})");
                }
            }
            CupSpec::Nominal {
                nominal,
                tolerance_pct,
                ..
            } => {
                if !nominal.is_finite() {
                    eyre::bail!("cups[{cup}]: nominal must be finite");
                }
                if !(0.0..=100.0).contains(&tolerance_pct) {
                    eyre::bail!("cups[{cup}]: tolerance_pct must be in [0.0, 100.0]");
                }
                if !(nominal + nominal * (tolerance_pct / 100.0)).is_finite() {
                    eyre::bail!("cups[{cup}]: nominal ± tolerance overflows");
                }
            }
            CupSpec::CatchAll { catch_all } => {
                if !catch_all {
                    eyre::bail!("cups[{cup}]: entry without bounds must set catch_all = true");
                }
            }
        }
        Ok(())
    }
}

/// Preferred-number series used to generate a cup table.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeriesName {
    E12,
    E24,
    E96,
}

impl SeriesName {
    pub const fn len(self) -> usize {
        match self {
            SeriesName::E12 => 12,
            SeriesName::E24 => 24,
            SeriesName::E96 => 96,
        }
    }

    /// Cup tolerance of a generated table, in percent.
    pub const fn tolerance_pct(self) -> f64 {
        match self {
            SeriesName::E12 => 10.0,
            SeriesName::E24 => 5.0,
            SeriesName::E96 => 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SeriesCfg {
    pub name: SeriesName,
    /// Nominal value of the series' first entry (e.g. 1000.0 for 1k, 1k2, 1k5, ...)
    pub decade: f64,
    /// Index of the first series value placed in cup 1
    #[serde(default)]
    pub start: usize,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bus: Bus,
    pub wheel: Wheel,
    #[serde(default)]
    pub classifier: Classifier,
    /// Explicit cup table, cup 1 first
    #[serde(default)]
    pub cups: Vec<CupSpec>,
    /// Generated cup table; exclusive with `cups`
    #[serde(default)]
    pub series: Option<SeriesCfg>,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

pub fn load_cups_csv(path: &std::path::Path) -> eyre::Result<Vec<CupSpec>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open cup CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["min", "max"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "cup CSV must have headers 'min,max', got: {}",
            actual.join(",")
        );
    }

    let mut cups = Vec::new();
    for (idx, rec) in rdr.deserialize::<CupRow>().enumerate() {
        match rec {
            Ok(row) => {
                if !(row.min.is_finite() && row.max.is_finite()) || row.min > row.max {
                    eyre::bail!(
                        "invalid CSV row {}: need finite min <= max, got {},{}",
                        idx + 2,
                        row.min,
                        row.max
                    );
                }
                cups.push(CupSpec::from(row));
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if cups.is_empty() {
        eyre::bail!("cup CSV {:?} has no rows", path);
    }
    Ok(cups)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Bus
        for (name, addr) in [
            ("bus.wheel_channel", self.bus.wheel_channel),
            ("bus.feed_channel", self.bus.feed_channel),
        ] {
            if !(0x01..=0x7f).contains(&addr) {
                eyre::bail!("{name} must be a 7-bit address in [0x01, 0x7f]");
            }
        }
        if self.bus.wheel_channel == self.bus.feed_channel {
            eyre::bail!("bus.wheel_channel and bus.feed_channel must differ");
        }

        // Wheel
        if self.wheel.cups == 0 {
            eyre::bail!("wheel.cups must be >= 1");
        }
        let max_cups = self.wheel.encoding.max_cups();
        if self.wheel.cups > max_cups {
            eyre::bail!(
                "wheel.cups must be <= {max_cups} for encoding {:?}",
                self.wheel.encoding
            );
        }

        // Cups
        if !self.cups.is_empty() && self.series.is_some() {
            eyre::bail!("configure either [[cups]] or [series], not both");
        }
        if self.cups.len() > self.wheel.cups as usize {
            eyre::bail!(
                "{} cups configured but the wheel only has {}",
                self.cups.len(),
                self.wheel.cups
            );
        }
        for (idx, cup) in self.cups.iter().enumerate() {
            cup.validate(idx)?;
        }

        // Series
        if let Some(series) = &self.series {
            if !(series.decade.is_finite() && series.decade > 0.0) {
                eyre::bail!("series.decade must be > 0");
            }
            // upper bound of the widest cup a decade can produce
            let top = series.decade / 100.0 * 1000.0;
            if !(top + top * (series.name.tolerance_pct() / 100.0)).is_finite() {
                eyre::bail!("series.decade {} is too large", series.decade);
            }
            if series.start >= series.name.len() {
                eyre::bail!(
                    "series.start must be < {} for {:?}",
                    series.name.len(),
                    series.name
                );
            }
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_mainboard_wiring() {
        let cfg = load_toml("[wheel]\ncups = 9\n").unwrap();
        assert_eq!(cfg.bus.wheel_channel, 0x01);
        assert_eq!(cfg.bus.feed_channel, 0x02);
        assert_eq!(cfg.wheel.encoding, Encoding::Offset);
        assert_eq!(cfg.classifier.catch_all, CatchAllMode::AcceptAll);
        cfg.validate().unwrap();
    }

    #[test]
    fn encoding_limits() {
        assert_eq!(Encoding::Offset.max_cups() / 2, 99);
        assert_eq!(Encoding::DirectionBit.max_cups() / 2, 127);
    }
}
