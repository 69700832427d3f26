#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Mechanical coordination core of the resistor sorter (hardware-agnostic).
//!
//! All bus traffic goes through `sorter_traits::Transport`.
//!
//! ## Architecture
//!
//! - **Wheel**: last commanded cup and shortest-path moves (`wheel` module)
//! - **Wire**: one-byte move encodings (`wire` module)
//! - **Cups**: inclusive acceptance ranges and the ordered cup table (`cup`)
//! - **Feed**: open-loop occupancy of the five feeder platforms (`feed`)
//! - **Series**: E12/E24/E96 preferred values and ranged-sort tables
//! - **Machine**: one wheel, one cup table and one feeder on a shared bus
//!
//! Every command is a single blocking write. No component retries; failed
//! writes leave tracked state unchanged.

pub mod builder;
pub mod conversions;
pub mod cup;
pub mod error;
pub mod feed;
pub mod hw_error;
pub mod machine;
pub mod series;
pub mod wheel;
pub mod wire;

pub use builder::MachineBuilder;
pub use cup::{CatchAllPolicy, CupTable, RangeClassifier};
pub use error::{BuildError, Result, SorterError};
pub use feed::{Occupancy, QueueTracker};
pub use machine::{Machine, Routed};
pub use series::ResistorSeries;
pub use wheel::{PositionTracker, shortest_path};
pub use wire::{Direction, Move, WireEncoding};
