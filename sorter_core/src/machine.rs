//! The trackers and cup table of one sorting machine.

use sorter_config::Config;
use sorter_traits::{ChannelId, Transport};

use crate::builder::MachineBuilder;
use crate::conversions::cup_table_from_config;
use crate::cup::CupTable;
use crate::error::Result;
use crate::feed::QueueTracker;
use crate::wheel::PositionTracker;
use crate::wire::{Move, WireEncoding};

/// Where a measured value went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Routed {
    pub value: f64,
    pub cup: u32,
    pub mv: Move,
}

/// Owns the wheel tracker, the cup table and the feeder tracker.
///
/// Sequencing (when to measure, dispense or advance) stays with the caller.
#[derive(Debug)]
pub struct Machine<T: Transport> {
    pub(crate) wheel: PositionTracker<T>,
    pub(crate) cups: CupTable,
    pub(crate) feed: QueueTracker<T>,
}

impl<T: Transport + Clone> Machine<T> {
    pub fn builder() -> MachineBuilder<T> {
        MachineBuilder::default()
    }

    /// Assemble from a validated config; both trackers share `transport`.
    pub fn from_config(cfg: &Config, transport: T) -> Result<Self> {
        Self::builder()
            .with_transport(transport)
            .with_wheel_channel(ChannelId::new(cfg.bus.wheel_channel))
            .with_feed_channel(ChannelId::new(cfg.bus.feed_channel))
            .with_slots(cfg.wheel.cups)
            .with_encoding(WireEncoding::from(cfg.wheel.encoding))
            .with_cups(cup_table_from_config(cfg)?)
            .try_build()
    }
}

impl<T: Transport> Machine<T> {
    pub fn wheel(&self) -> &PositionTracker<T> {
        &self.wheel
    }

    pub fn wheel_mut(&mut self) -> &mut PositionTracker<T> {
        &mut self.wheel
    }

    pub fn cups(&self) -> &CupTable {
        &self.cups
    }

    pub fn cups_mut(&mut self) -> &mut CupTable {
        &mut self.cups
    }

    pub fn feed(&self) -> &QueueTracker<T> {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut QueueTracker<T> {
        &mut self.feed
    }

    /// Classify `value` and turn the wheel to the first accepting cup.
    ///
    /// `Ok(None)` when no cup accepts it; the wheel stays put.
    pub fn route(&mut self, value: f64) -> Result<Option<Routed>> {
        let Some(cup) = self.cups.classify(value) else {
            tracing::warn!(value, "no cup accepts value");
            return Ok(None);
        };
        let mv = self.wheel.move_to(cup)?;
        Ok(Some(Routed { value, cup, mv }))
    }

    pub fn into_parts(self) -> (PositionTracker<T>, CupTable, QueueTracker<T>) {
        (self.wheel, self.cups, self.feed)
    }
}
