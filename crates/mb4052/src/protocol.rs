use embedded_hal::digital::PinState;

use crate::timing::{CLOCK_HIGH_US, CLOCK_LOW_US, CS_HIGH_US, CS_HOLD_US};

/// The three protocol lines plus a time source, as seen by the engine.
pub(crate) trait Wire {
    type Error;

    fn chip_select(&mut self, state: PinState) -> Result<(), Self::Error>;

    fn clock(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Level of the data line, `true` for high.
    fn sample(&mut self) -> Result<bool, Self::Error>;

    fn now_micros(&mut self) -> u32;

    /// Busy-wait for at least `us` microseconds.
    fn hold_us(&mut self, us: u32);
}

/// When chip-select last went high, used to enforce the CS high pulse width
/// between two conversions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeadTime {
    last_deselect: Option<u32>,
}

impl DeadTime {
    /// No conversion has happened yet, so the next one may start immediately.
    pub const fn new() -> Self {
        Self {
            last_deselect: None,
        }
    }

    pub(crate) const fn at(last_deselect: Option<u32>) -> Self {
        Self { last_deselect }
    }

    /// Timestamp of the last deselect, if any.
    pub fn last_deselect(&self) -> Option<u32> {
        self.last_deselect
    }

    /// Microseconds still to wait at `now` before chip-select may fall again.
    pub fn remaining(&self, now: u32) -> u32 {
        match self.last_deselect {
            None => 0,
            Some(at) => CS_HIGH_US.saturating_sub(now.wrapping_sub(at)),
        }
    }
}

/// Runs one full conversion and returns the 8 data bits, MSB first.
///
/// Chip-select is always raised again before returning, even when a pin
/// fails part way through, and `dead_time` is updated to that moment.
pub(crate) fn convert<W: Wire>(wire: &mut W, dead_time: &mut DeadTime) -> Result<u8, W::Error> {
    let remaining = dead_time.remaining(wire.now_micros());
    if remaining > 0 {
        wire.hold_us(remaining);
    }

    let result = clock_frame(wire);

    let deselect = if result.is_ok() {
        wire.chip_select(PinState::High)
    } else {
        // Best effort, the first error is the one reported.
        let _ = wire.clock(PinState::Low);
        let _ = wire.chip_select(PinState::High);
        Ok(())
    };

    dead_time.last_deselect = Some(wire.now_micros());

    let value = result?;
    deselect?;

    Ok(value)
}

fn clock_frame<W: Wire>(wire: &mut W) -> Result<u8, W::Error> {
    wire.chip_select(PinState::Low)?;
    wire.hold_us(CS_HOLD_US);

    // Start bit, not sampled.
    pulse(wire)?;
    wire.hold_us(CLOCK_LOW_US);

    let mut value = 0u8;

    for _ in 0..8 {
        pulse(wire)?;
        value <<= 1;
        value |= u8::from(wire.sample()?);
        wire.hold_us(CLOCK_LOW_US);
    }

    // Stop bit. CS rises straight after, so no low hold.
    pulse(wire)?;

    Ok(value)
}

fn pulse<W: Wire>(wire: &mut W) -> Result<(), W::Error> {
    wire.clock(PinState::High)?;
    wire.hold_us(CLOCK_HIGH_US);
    wire.clock(PinState::Low)
}
