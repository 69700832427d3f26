//! Sort wheel position tracking (`PositionTracker`).
//!
//! The wheel has `slot_count` cups numbered `1..=slot_count` on a ring. The
//! tracker remembers the last commanded cup and turns every absolute target
//! into the shortest relative move, which is sent to the wheel controller as
//! one byte.

use eyre::WrapErr;
use sorter_traits::{ChannelId, Transport};

use crate::error::{Result, SorterError};
use crate::hw_error::map_transport_error;
use crate::wire::{Move, WireEncoding};

/// Shortest move from `from` to `to` on a ring of `slot_count` slots.
///
/// Ties go clockwise. Inputs must already be in `1..=slot_count`.
pub fn shortest_path(slot_count: u32, from: u32, to: u32) -> Move {
    let forward = if to >= from {
        to - from
    } else {
        slot_count - from + to
    };
    let backward = slot_count - forward;
    if forward <= backward {
        Move::clockwise(forward)
    } else {
        Move::counter_clockwise(backward)
    }
}

pub struct PositionTracker<T: Transport> {
    transport: T,
    channel: ChannelId,
    slot_count: u32,
    current: u32,
    encoding: WireEncoding,
}

impl<T: Transport> core::fmt::Debug for PositionTracker<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PositionTracker")
            .field("channel", &self.channel)
            .field("slot_count", &self.slot_count)
            .field("current", &self.current)
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl<T: Transport> PositionTracker<T> {
    /// Tracker using the offset encoding of the deployed wheel firmware.
    pub fn new(transport: T, channel: ChannelId, slot_count: u32) -> Result<Self> {
        Self::with_encoding(transport, channel, slot_count, WireEncoding::Offset)
    }

    /// Fails when `slot_count` is zero or when the longest shortest path
    /// (`slot_count / 2`) does not fit `encoding`.
    pub fn with_encoding(
        transport: T,
        channel: ChannelId,
        slot_count: u32,
        encoding: WireEncoding,
    ) -> Result<Self> {
        if slot_count == 0 {
            return Err(eyre::Report::new(SorterError::InvalidArgument(
                "wheel needs at least one slot".into(),
            )));
        }
        if slot_count / 2 > encoding.max_steps() {
            return Err(eyre::Report::new(SorterError::Unencodable {
                steps: slot_count / 2,
                encoding: encoding.name(),
            }))
            .wrap_err_with(|| format!("a {slot_count}-slot wheel needs longer moves"));
        }
        Ok(Self {
            transport,
            channel,
            slot_count,
            current: 1,
            encoding,
        })
    }

    /// Last commanded cup, `1..=slot_count`.
    pub fn current_position(&self) -> u32 {
        self.current
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn encoding(&self) -> WireEncoding {
        self.encoding
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    fn check_target(&self, target: u32) -> Result<()> {
        if !(1..=self.slot_count).contains(&target) {
            return Err(eyre::Report::new(SorterError::InvalidArgument(format!(
                "wheel target {target} outside 1..={}",
                self.slot_count
            ))));
        }
        Ok(())
    }

    /// Move that `move_to(target)` would issue. No side effects.
    pub fn plan(&self, target: u32) -> Result<Move> {
        self.check_target(target)?;
        Ok(shortest_path(self.slot_count, self.current, target))
    }

    /// Turn the wheel to `target` along the shortest path.
    ///
    /// Out-of-range targets are rejected before anything is written. The
    /// position only changes once the command byte was written.
    pub fn move_to(&mut self, target: u32) -> Result<Move> {
        let mv = self.plan(target)?;
        let byte = self.encoding.encode(mv).map_err(eyre::Report::new)?;
        self.transport
            .write(self.channel, byte)
            .map_err(|e| eyre::Report::new(map_transport_error(&*e)))
            .wrap_err("commanding sort wheel")?;
        tracing::info!(
            from = self.current,
            to = target,
            steps = mv.signed(),
            byte,
            "wheel move"
        );
        self.current = target;
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sorter_hardware::SimulatedBus;

    const WHEEL: ChannelId = ChannelId::new(0x01);

    fn wheel_at(slots: u32, start: u32) -> (SimulatedBus, PositionTracker<SimulatedBus>) {
        let bus = SimulatedBus::new();
        let mut w = PositionTracker::new(bus.clone(), WHEEL, slots).unwrap();
        if start != 1 {
            w.move_to(start).unwrap();
        }
        bus.clear();
        (bus, w)
    }

    #[test]
    fn starts_at_cup_one() {
        let (_bus, w) = wheel_at(9, 1);
        assert_eq!(w.current_position(), 1);
    }

    #[test]
    fn half_turn_breaks_tie_clockwise() {
        let (bus, mut w) = wheel_at(10, 1);
        assert_eq!(w.move_to(6).unwrap(), Move::clockwise(5));
        assert_eq!(bus.bytes_for(WHEEL), vec![5]);
        assert_eq!(w.current_position(), 6);
    }

    #[test]
    fn goes_backwards_when_shorter() {
        let (bus, mut w) = wheel_at(10, 2);
        assert_eq!(w.move_to(9).unwrap(), Move::counter_clockwise(3));
        assert_eq!(bus.bytes_for(WHEEL), vec![103]);
        assert_eq!(w.current_position(), 9);
    }

    #[test]
    fn wraps_forward_past_last_cup() {
        let (bus, mut w) = wheel_at(9, 8);
        assert_eq!(w.move_to(2).unwrap(), Move::clockwise(3));
        assert_eq!(bus.bytes_for(WHEEL), vec![3]);
    }

    #[test]
    fn same_cup_sends_zero() {
        let (bus, mut w) = wheel_at(9, 4);
        assert_eq!(w.move_to(4).unwrap(), Move::NONE);
        assert_eq!(bus.bytes_for(WHEEL), vec![0]);
    }

    #[test]
    fn out_of_range_target_writes_nothing() {
        let (bus, mut w) = wheel_at(9, 3);
        for bad in [0, 10, 1000] {
            let err = w.move_to(bad).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SorterError>(),
                Some(SorterError::InvalidArgument(_))
            ));
        }
        assert!(bus.frames().is_empty());
        assert_eq!(w.current_position(), 3);
    }

    #[test]
    fn failed_write_keeps_position() {
        let (bus, mut w) = wheel_at(9, 3);
        bus.fail_next_write();
        let err = w.move_to(7).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SorterError>(),
            Some(SorterError::TransportFault(_))
        ));
        assert_eq!(w.current_position(), 3);
    }

    #[test]
    fn direction_bit_encoding_on_the_wire() {
        let bus = SimulatedBus::new();
        let mut w =
            PositionTracker::with_encoding(bus.clone(), WHEEL, 10, WireEncoding::DirectionBit)
                .unwrap();
        w.move_to(2).unwrap();
        w.move_to(9).unwrap();
        assert_eq!(bus.bytes_for(WHEEL), vec![1, 0x83]);
    }

    #[test]
    fn rejects_wheels_the_encoding_cannot_address() {
        assert!(PositionTracker::new(SimulatedBus::new(), WHEEL, 199).is_ok());
        let err = PositionTracker::new(SimulatedBus::new(), WHEEL, 200).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SorterError>(),
            Some(SorterError::Unencodable { steps: 100, .. })
        ));
        assert!(
            PositionTracker::with_encoding(
                SimulatedBus::new(),
                WHEEL,
                255,
                WireEncoding::DirectionBit
            )
            .is_ok()
        );
        assert!(PositionTracker::new(SimulatedBus::new(), WHEEL, 0).is_err());
    }

    #[test]
    fn plan_has_no_side_effects() {
        let (bus, w) = wheel_at(10, 2);
        assert_eq!(w.plan(9).unwrap(), Move::counter_clockwise(3));
        assert!(bus.frames().is_empty());
        assert_eq!(w.current_position(), 2);
    }
}
