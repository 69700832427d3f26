//! Builder for `Machine`.
//!
//! Every field is checked in `try_build()`; missing or inconsistent parts
//! surface as typed `BuildError`s inside the returned `eyre::Report`.

use sorter_traits::{ChannelId, Transport};

use crate::cup::CupTable;
use crate::error::{BuildError, Result};
use crate::feed::QueueTracker;
use crate::machine::Machine;
use crate::wheel::PositionTracker;
use crate::wire::WireEncoding;

/// Mainboard defaults: wheel controller at 0x01, feeder at 0x02.
pub const DEFAULT_WHEEL_CHANNEL: ChannelId = ChannelId::new(0x01);
pub const DEFAULT_FEED_CHANNEL: ChannelId = ChannelId::new(0x02);

pub struct MachineBuilder<T> {
    transport: Option<T>,
    wheel_channel: ChannelId,
    feed_channel: ChannelId,
    slots: Option<u32>,
    encoding: WireEncoding,
    cups: Option<CupTable>,
}

impl<T> Default for MachineBuilder<T> {
    fn default() -> Self {
        Self {
            transport: None,
            wheel_channel: DEFAULT_WHEEL_CHANNEL,
            feed_channel: DEFAULT_FEED_CHANNEL,
            slots: None,
            encoding: WireEncoding::default(),
            cups: None,
        }
    }
}

impl<T: Transport + Clone> MachineBuilder<T> {
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_wheel_channel(mut self, channel: ChannelId) -> Self {
        self.wheel_channel = channel;
        self
    }

    pub fn with_feed_channel(mut self, channel: ChannelId) -> Self {
        self.feed_channel = channel;
        self
    }

    /// Wheel size; defaults to the number of cups.
    pub fn with_slots(mut self, slots: u32) -> Self {
        self.slots = Some(slots);
        self
    }

    pub fn with_encoding(mut self, encoding: WireEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_cups(mut self, cups: CupTable) -> Self {
        self.cups = Some(cups);
        self
    }

    pub fn try_build(self) -> Result<Machine<T>> {
        let transport = self
            .transport
            .ok_or_else(|| eyre::Report::new(BuildError::MissingTransport))?;
        let cups = self
            .cups
            .ok_or_else(|| eyre::Report::new(BuildError::MissingCups))?;
        if self.wheel_channel == self.feed_channel {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "wheel and feeder must be on different channels",
            )));
        }
        let slots = match self.slots {
            Some(s) => s,
            None => u32::try_from(cups.len()).map_err(|_| {
                eyre::Report::new(BuildError::InvalidConfig("cup table too large"))
            })?,
        };
        if cups.len() > slots as usize {
            return Err(eyre::Report::new(BuildError::TooManyCups {
                cups: cups.len(),
                slots,
            }));
        }

        let wheel =
            PositionTracker::with_encoding(transport.clone(), self.wheel_channel, slots, self.encoding)?;
        let feed = QueueTracker::new(transport, self.feed_channel);
        tracing::debug!(
            slots,
            cups = cups.len(),
            wheel_channel = %self.wheel_channel,
            feed_channel = %self.feed_channel,
            encoding = %self.encoding,
            "machine assembled"
        );
        Ok(Machine { wheel, cups, feed })
    }
}
