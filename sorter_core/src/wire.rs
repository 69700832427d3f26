//! Wheel move commands and their one-byte wire encodings.
//!
//! The wheel controller receives exactly one byte per move. Two encodings
//! exist:
//!
//! - `Offset`: `0..=99` clockwise steps, `100..=199` counter-clockwise
//!   steps plus 100. This is what the deployed wheel firmware decodes.
//! - `DirectionBit`: bit 7 set for counter-clockwise, bits 0-6 carry the
//!   step count (`0..=127`).
//!
//! Encoding never truncates: magnitudes outside the encoding's range are an
//! error.

use crate::error::SorterError;

/// Rotation direction, viewed from above the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// A relative wheel move: step count and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    steps: u32,
    direction: Direction,
}

impl Move {
    pub const NONE: Move = Move::clockwise(0);

    #[inline]
    pub const fn new(steps: u32, direction: Direction) -> Self {
        Self { steps, direction }
    }

    #[inline]
    pub const fn clockwise(steps: u32) -> Self {
        Self::new(steps, Direction::Clockwise)
    }

    #[inline]
    pub const fn counter_clockwise(steps: u32) -> Self {
        Self::new(steps, Direction::CounterClockwise)
    }

    /// Build from a signed magnitude: positive clockwise, negative
    /// counter-clockwise.
    pub fn from_signed(signed: i32) -> Self {
        if signed < 0 {
            Self::counter_clockwise(signed.unsigned_abs())
        } else {
            Self::clockwise(signed.unsigned_abs())
        }
    }

    /// Signed magnitude, saturating at the `i32` range.
    pub fn signed(&self) -> i32 {
        let mag = i32::try_from(self.steps).unwrap_or(i32::MAX);
        match self.direction {
            Direction::Clockwise => mag,
            Direction::CounterClockwise => -mag,
        }
    }

    #[inline]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WireEncoding {
    #[default]
    Offset,
    DirectionBit,
}

impl WireEncoding {
    /// Added to counter-clockwise magnitudes by the offset encoding.
    pub const CCW_OFFSET: u8 = 100;
    /// Direction flag of the direction-bit encoding.
    pub const CCW_BIT: u8 = 0x80;

    /// Largest step count representable in either direction.
    pub const fn max_steps(self) -> u32 {
        match self {
            WireEncoding::Offset => Self::CCW_OFFSET as u32 - 1,
            WireEncoding::DirectionBit => !Self::CCW_BIT as u32,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            WireEncoding::Offset => "offset",
            WireEncoding::DirectionBit => "direction-bit",
        }
    }

    pub fn encode(self, mv: Move) -> Result<u8, SorterError> {
        if mv.steps() > self.max_steps() {
            return Err(SorterError::Unencodable {
                steps: mv.steps(),
                encoding: self.name(),
            });
        }
        // steps <= 127 here, the cast is lossless
        #[allow(clippy::cast_possible_truncation)]
        let steps = mv.steps() as u8;
        Ok(match (self, mv.direction()) {
            (_, Direction::Clockwise) => steps,
            (WireEncoding::Offset, Direction::CounterClockwise) => steps + Self::CCW_OFFSET,
            (WireEncoding::DirectionBit, Direction::CounterClockwise) => steps | Self::CCW_BIT,
        })
    }

    pub fn decode(self, byte: u8) -> Result<Move, SorterError> {
        match self {
            WireEncoding::Offset => match byte {
                0..=99 => Ok(Move::clockwise(u32::from(byte))),
                100..=199 => Ok(Move::counter_clockwise(u32::from(
                    byte - Self::CCW_OFFSET,
                ))),
                _ => Err(SorterError::InvalidWireByte(byte)),
            },
            WireEncoding::DirectionBit => {
                let steps = u32::from(byte & !Self::CCW_BIT);
                if byte & Self::CCW_BIT != 0 {
                    Ok(Move::counter_clockwise(steps))
                } else {
                    Ok(Move::clockwise(steps))
                }
            }
        }
    }
}

impl std::fmt::Display for WireEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
