//! Subcommand execution against an assembled machine.

use serde_json::json;
use sorter_core::{Direction, Machine, Move, ResistorSeries, Routed, WireEncoding};
use sorter_traits::Transport;

use crate::cli::json_mode;

fn direction_name(d: Direction) -> &'static str {
    match d {
        Direction::Clockwise => "cw",
        Direction::CounterClockwise => "ccw",
    }
}

fn emit(line: &serde_json::Value, human: impl FnOnce() -> String) {
    if json_mode() {
        println!("{line}");
    } else {
        println!("{}", human());
    }
}

fn move_json(mv: Move, encoding: WireEncoding) -> serde_json::Value {
    json!({
        "steps": mv.steps(),
        "direction": direction_name(mv.direction()),
        "byte": encoding.encode(mv).ok(),
    })
}

fn describe_move(mv: Move, encoding: WireEncoding) -> String {
    match encoding.encode(mv) {
        Ok(b) => format!("{} {} (byte {b:#04x})", direction_name(mv.direction()), mv.steps()),
        Err(_) => format!("{} {}", direction_name(mv.direction()), mv.steps()),
    }
}

pub fn run_sort<T: Transport>(m: &mut Machine<T>, values: &[f64]) -> eyre::Result<()> {
    let encoding = m.wheel().encoding();
    for &value in values {
        match m.route(value)? {
            Some(Routed { cup, mv, .. }) => emit(
                &json!({
                    "value": value,
                    "cup": cup,
                    "position": m.wheel().current_position(),
                    "move": move_json(mv, encoding),
                }),
                || format!("{value} -> cup {cup}: {}", describe_move(mv, encoding)),
            ),
            None => emit(
                &json!({
                    "value": value,
                    "cup": null,
                    "position": m.wheel().current_position(),
                    "move": null,
                }),
                || format!("{value} -> no cup accepts it; wheel stays at {}", m.wheel().current_position()),
            ),
        }
    }
    Ok(())
}

pub fn run_wheel<T: Transport>(m: &mut Machine<T>, targets: &[u32]) -> eyre::Result<()> {
    let encoding = m.wheel().encoding();
    for &target in targets {
        let from = m.wheel().current_position();
        let mv = m.wheel_mut().move_to(target)?;
        emit(
            &json!({ "from": from, "to": target, "move": move_json(mv, encoding) }),
            || format!("{from} -> {target}: {}", describe_move(mv, encoding)),
        );
    }
    Ok(())
}

pub fn run_feed<T: Transport>(m: &mut Machine<T>, cycles: u32, count: u32) -> eyre::Result<()> {
    let mut dispensed = 0u32;
    for cycle in 1..=cycles {
        let loaded = m.feed().input_empty();
        if loaded {
            m.feed_mut().load();
        }
        m.feed_mut().advance(count)?;
        let at_measurement = !m.feed().measurement_empty();
        if at_measurement {
            m.feed_mut().dispense();
            dispensed += 1;
        }
        let occupancy = m.feed().occupancy().bits();
        emit(
            &json!({
                "cycle": cycle,
                "loaded": loaded,
                "dispensed": at_measurement,
                "occupancy": occupancy,
            }),
            || {
                format!(
                    "cycle {cycle}: occupancy {occupancy:05b}{}",
                    if at_measurement { ", dispensed" } else { "" }
                )
            },
        );
    }
    emit(&json!({ "cycles": cycles, "dispensed": dispensed }), || {
        format!("{dispensed} item(s) reached the measurement platform in {cycles} cycle(s)")
    });
    Ok(())
}

pub fn run_nearest(value: f64, series: ResistorSeries) -> eyre::Result<()> {
    let Some(nearest) = series.nearest_standard(value) else {
        return Err(eyre::Report::new(sorter_core::SorterError::InvalidArgument(
            format!("{value} has no preferred value; expected a positive, finite resistance"),
        )));
    };
    emit(
        &json!({
            "value": value,
            "series": format!("{series:?}"),
            "nearest": nearest,
            "tolerance_pct": series.tolerance_pct(),
        }),
        || format!("{value} -> {nearest} ({series:?}, ±{}%)", series.tolerance_pct()),
    );
    Ok(())
}

pub fn self_check<T: Transport>(m: &Machine<T>, backend: &str) -> eyre::Result<()> {
    let wheel = m.wheel();
    let catch_all = m.cups().iter().filter(|c| c.is_catch_all()).count();
    emit(
        &json!({
            "backend": backend,
            "slots": wheel.slot_count(),
            "cups": m.cups().len(),
            "catch_all_cups": catch_all,
            "wheel_channel": wheel.channel().get(),
            "feed_channel": m.feed().channel().get(),
            "encoding": wheel.encoding().name(),
        }),
        || {
            format!(
                "OK ({backend}): {}-slot wheel at {}, feeder at {}, {} cups ({catch_all} catch-all), {} encoding",
                wheel.slot_count(),
                wheel.channel(),
                m.feed().channel(),
                m.cups().len(),
                wheel.encoding()
            )
        },
    );
    Ok(())
}
