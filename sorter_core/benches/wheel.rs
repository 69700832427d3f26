use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sorter_core::{CupTable, Move, PositionTracker, RangeClassifier, ResistorSeries, WireEncoding};
use sorter_hardware::SimulatedBus;
use sorter_traits::ChannelId;

fn bench_shortest_path(c: &mut Criterion) {
    c.bench_function("shortest_path_199", |b| {
        b.iter(|| {
            let mut acc = 0i32;
            for to in 1..=199 {
                acc += sorter_core::shortest_path(black_box(199), black_box(57), to).signed();
            }
            acc
        });
    });
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_offset", |b| {
        b.iter(|| WireEncoding::Offset.encode(black_box(Move::counter_clockwise(42))));
    });
}

fn bench_move_to(c: &mut Criterion) {
    c.bench_function("move_to_sim", |b| {
        let bus = SimulatedBus::new();
        let mut wheel = PositionTracker::new(bus.clone(), ChannelId::new(1), 9).unwrap();
        let mut target = 1;
        b.iter(|| {
            target = target % 9 + 1;
            wheel.move_to(black_box(target)).unwrap();
            bus.clear();
        });
    });
}

fn bench_classify(c: &mut Criterion) {
    let table: CupTable = ResistorSeries::E96
        .cup_table(100.0, 0, 96, sorter_core::CatchAllPolicy::AcceptAll)
        .unwrap();
    let narrow = CupTable::new(vec![RangeClassifier::new(95.0, 105.0).unwrap()]);
    c.bench_function("classify_e96", |b| b.iter(|| table.classify(black_box(887.0))));
    c.bench_function("classify_single", |b| b.iter(|| narrow.classify(black_box(100.0))));
}

criterion_group!(benches, bench_shortest_path, bench_encode, bench_move_to, bench_classify);
criterion_main!(benches);
