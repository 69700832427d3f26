pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod i2c;

use sorter_traits::{ChannelId, Transport};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use i2c::I2cBus;

/// One byte as it went out on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub channel: ChannelId,
    pub byte: u8,
}

/// Simulated bus that records every frame.
///
/// Clones share the same frame log, mirroring several trackers sitting on
/// one physical bus.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBus {
    frames: Rc<RefCell<Vec<Frame>>>,
    fail_next: Rc<Cell<bool>>,
}

impl SimulatedBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames written so far, oldest first.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }

    /// Bytes written to one channel, oldest first.
    pub fn bytes_for(&self, channel: ChannelId) -> Vec<u8> {
        self.frames
            .borrow()
            .iter()
            .filter(|f| f.channel == channel)
            .map(|f| f.byte)
            .collect()
    }

    pub fn clear(&self) {
        self.frames.borrow_mut().clear();
    }

    /// Make the next write fail as if the peripheral NACKed it. One-shot.
    pub fn fail_next_write(&self) {
        self.fail_next.set(true);
    }
}

impl Transport for SimulatedBus {
    fn write(
        &mut self,
        channel: ChannelId,
        byte: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_next.replace(false) {
            tracing::warn!(channel = %channel, byte, "simulated write rejected");
            return Err(Box::new(error::HwError::Rejected {
                channel: channel.get(),
            }));
        }
        tracing::debug!(channel = %channel, byte, "bus write (simulated)");
        self.frames.borrow_mut().push(Frame { channel, byte });
        Ok(())
    }
}
