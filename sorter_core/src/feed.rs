//! Step feeder occupancy tracking (`QueueTracker`).
//!
//! The feeder has five tracked platforms. Items enter at the load platform
//! (slot 0) and reach the measurement platform (slot 4) after four advances.
//! Tracking is open loop: occupancy follows the commanded advances, nothing
//! is sensed.

use bitflags::bitflags;
use eyre::WrapErr;
use sorter_traits::{ChannelId, Transport};

use crate::error::{Result, SorterError};
use crate::hw_error::map_transport_error;

bitflags! {
    /// Occupied feeder platforms, bit `i` for slot `i`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Occupancy: u8 {
        const LOAD = 1 << 0;
        const TRANSIT_1 = 1 << 1;
        const TRANSIT_2 = 1 << 2;
        const TRANSIT_3 = 1 << 3;
        const MEASURE = 1 << 4;
    }
}

impl Occupancy {
    /// Every item moves `count` platforms toward the measurement end; items
    /// pushed past it fall out of the tracked window.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn shifted(self, count: u32) -> Self {
        let bits = u32::from(self.bits()).checked_shl(count).unwrap_or(0);
        Self::from_bits_truncate((bits & u32::from(Self::all().bits())) as u8)
    }
}

pub struct QueueTracker<T: Transport> {
    transport: T,
    channel: ChannelId,
    occupancy: Occupancy,
}

impl<T: Transport> core::fmt::Debug for QueueTracker<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QueueTracker")
            .field("channel", &self.channel)
            .field("occupancy", &self.occupancy)
            .finish()
    }
}

impl<T: Transport> QueueTracker<T> {
    /// Number of tracked platforms.
    pub const SLOTS: usize = 5;
    /// Largest advance the feeder controller accepts in one command.
    pub const MAX_ADVANCE: u32 = 4;

    pub fn new(transport: T, channel: ChannelId) -> Self {
        Self {
            transport,
            channel,
            occupancy: Occupancy::empty(),
        }
    }

    /// Cycle the feeder `count` times (`1..=4`) and shift the occupancy.
    ///
    /// Out-of-range counts fail with `InvalidArgument` before anything is
    /// written. A failed write leaves the occupancy untouched.
    pub fn advance(&mut self, count: u32) -> Result<()> {
        if !(1..=Self::MAX_ADVANCE).contains(&count) {
            return Err(eyre::Report::new(SorterError::InvalidArgument(format!(
                "feed advance {count} outside 1..={}",
                Self::MAX_ADVANCE
            ))));
        }
        #[allow(clippy::cast_possible_truncation)] // count <= 4
        let byte = count as u8;
        self.transport
            .write(self.channel, byte)
            .map_err(|e| eyre::Report::new(map_transport_error(&*e)))
            .wrap_err("commanding step feeder")?;
        let before = self.occupancy;
        self.occupancy = before.shifted(count);
        tracing::info!(
            count,
            before = before.bits(),
            after = self.occupancy.bits(),
            "feed advance"
        );
        Ok(())
    }

    pub fn input_empty(&self) -> bool {
        !self.occupancy.contains(Occupancy::LOAD)
    }

    pub fn measurement_empty(&self) -> bool {
        !self.occupancy.contains(Occupancy::MEASURE)
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    /// Out-of-range slots read as empty.
    pub fn is_occupied(&self, slot: usize) -> bool {
        slot < Self::SLOTS && self.occupancy.bits() & (1 << slot) != 0
    }

    /// A new item was placed on the load platform.
    pub fn load(&mut self) {
        self.occupancy.insert(Occupancy::LOAD);
        tracing::debug!(occupancy = self.occupancy.bits(), "feed load");
    }

    /// The item on the measurement platform was taken off. Driving the
    /// dispense arm is up to the caller.
    pub fn dispense(&mut self) {
        self.occupancy.remove(Occupancy::MEASURE);
        tracing::debug!(occupancy = self.occupancy.bits(), "feed dispense");
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
