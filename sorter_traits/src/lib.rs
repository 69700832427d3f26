pub mod channel;

pub use channel::ChannelId;

/// Byte-oriented, fire-and-forget command channel to peripheral controllers.
///
/// A successful return means the byte left the mainboard; no acknowledgment
/// from the peripheral is modeled.
pub trait Transport {
    fn write(
        &mut self,
        channel: ChannelId,
        byte: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(
        &mut self,
        channel: ChannelId,
        byte: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).write(channel, byte)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(
        &mut self,
        channel: ChannelId,
        byte: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).write(channel, byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Capture(Vec<(ChannelId, u8)>);

    impl Transport for Capture {
        fn write(
            &mut self,
            channel: ChannelId,
            byte: u8,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.0.push((channel, byte));
            Ok(())
        }
    }

    fn send<T: Transport>(mut t: T, channel: u8, byte: u8) {
        t.write(ChannelId::new(channel), byte).unwrap();
    }

    #[test]
    fn boxed_transport_forwards_writes() {
        let boxed: Box<dyn Transport> = Box::new(Capture::default());
        send(boxed, 1, 5);
    }

    #[test]
    fn borrowed_transport_forwards_writes() {
        let mut cap = Capture::default();
        send(&mut cap, 2, 3);
        send(&mut cap, 2, 103);
        assert_eq!(cap.0, vec![(ChannelId::new(2), 3), (ChannelId::new(2), 103)]);
    }
}
