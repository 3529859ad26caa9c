//! Conversion timing in microseconds, from the MB4052 datasheet.
//!
//! These are minimums. The engine never shortens them, a slow host only
//! stretches them.

/// ADC CLK high level pulse width (t<sub>WACH</sub>).
pub const CLOCK_HIGH_US: u32 = 5;

/// ADC CLK low level pulse width (t<sub>WACL</sub>).
pub const CLOCK_LOW_US: u32 = 6;

/// CS high level pulse width (t<sub>WCS</sub>), the dead-time between conversions.
pub const CS_HIGH_US: u32 = 2;

/// CS set-up time (t<sub>SCS</sub>).
pub const CS_SETUP_US: u32 = 2;

/// CS hold time (t<sub>HCS</sub>), from CS falling to the first clock edge.
pub const CS_HOLD_US: u32 = 2;

/// Channel hold time (t<sub>HCH</sub>), from C0/C1 settling to CS falling.
pub const CHANNEL_HOLD_US: u32 = 2;

/// Propagation delay time (t<sub>PD</sub>) of the data output after a clock edge.
pub const PROPAGATION_US: u32 = 2;

/// Clock pulses per conversion: start bit, eight data bits, stop bit.
pub const PULSES_PER_CONVERSION: usize = 10;
