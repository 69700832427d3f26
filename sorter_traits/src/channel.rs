use std::fmt;

/// Address of a peripheral controller on the shared bus.
///
/// On the mainboard this is the 7-bit I2C slave address of the wheel or
/// feeder controller. Trackers are bound to one channel at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u8);

impl ChannelId {
    #[inline]
    pub const fn new(addr: u8) -> Self {
        Self(addr)
    }

    /// Raw address byte.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for ChannelId {
    fn from(addr: u8) -> Self {
        Self(addr)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_hex_address() {
        assert_eq!(ChannelId::new(0x1).to_string(), "0x01");
        assert_eq!(ChannelId::from(0x7f).to_string(), "0x7f");
    }

    #[test]
    fn raw_address_round_trips() {
        assert_eq!(ChannelId::new(42).get(), 42);
    }
}
