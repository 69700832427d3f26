#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use sorter_core::{PositionTracker, WireEncoding};
use sorter_hardware::SimulatedBus;
use sorter_traits::ChannelId;

#[derive(Debug, Arbitrary)]
struct Input {
    slots: u8,
    direction_bit: bool,
    targets: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let encoding = if input.direction_bit {
        WireEncoding::DirectionBit
    } else {
        WireEncoding::Offset
    };
    let bus = SimulatedBus::new();
    let Ok(mut wheel) = PositionTracker::with_encoding(
        bus.clone(),
        ChannelId::new(1),
        u32::from(input.slots),
        encoding,
    ) else {
        return;
    };
    for t in input.targets {
        let target = u32::from(t);
        let before = wheel.current_position();
        match wheel.move_to(target) {
            Ok(mv) => {
                assert!(mv.steps() <= wheel.slot_count() / 2);
                assert_eq!(wheel.current_position(), target);
                let byte = *bus.bytes_for(ChannelId::new(1)).last().unwrap();
                assert_eq!(encoding.decode(byte).unwrap(), mv);
            }
            Err(_) => assert_eq!(wheel.current_position(), before),
        }
    }
});
