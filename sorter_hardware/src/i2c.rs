use std::cell::RefCell;
use std::rc::Rc;

use rppal::i2c::I2c;
use sorter_traits::{ChannelId, Transport};
use tracing::trace;

use crate::error::{HwError, Result};

/// Shared handle to the mainboard I2C master.
///
/// Cloning yields another handle to the same bus, so the wheel and the
/// feeder trackers can each own one. The handle is not `Send`; the bus has a
/// single writer.
#[derive(Clone)]
pub struct I2cBus {
    inner: Rc<RefCell<I2c>>,
}

impl I2cBus {
    /// Open `/dev/i2c-<bus>`.
    pub fn open(bus: u8) -> Result<Self> {
        let i2c = I2c::with_bus(bus).map_err(|e| HwError::Bus(format!("open i2c-{bus}: {e}")))?;
        Ok(Self {
            inner: Rc::new(RefCell::new(i2c)),
        })
    }

    fn write_byte(&self, channel: ChannelId, byte: u8) -> Result<()> {
        let mut i2c = self.inner.borrow_mut();
        i2c.set_slave_address(u16::from(channel.get()))
            .map_err(|e| HwError::Bus(e.to_string()))?;
        let written = i2c.write(&[byte]).map_err(|e| match e {
            rppal::i2c::Error::Io(io) => HwError::Io(io),
            other => HwError::Bus(other.to_string()),
        })?;
        if written != 1 {
            return Err(HwError::ShortWrite {
                channel: channel.get(),
                written,
            });
        }
        trace!(channel = %channel, byte, "i2c write");
        Ok(())
    }
}

impl Transport for I2cBus {
    fn write(
        &mut self,
        channel: ChannelId,
        byte: u8,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write_byte(channel, byte).map_err(|e| {
            tracing::error!("i2c write to {} failed: {}", channel, e);
            Box::new(e) as Box<dyn std::error::Error + Send + Sync>
        })
    }
}
