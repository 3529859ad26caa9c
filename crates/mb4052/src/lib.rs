//! Provides a bit-banged driver for a Fujitsu MB4052 4-channel 8-bit ADC via the `embedded-hal` ecosystem.
//!
//! The MB4052 has no SPI framing of its own: the host lowers chip-select, clocks
//! out a start bit, eight data bits (MSB first) and a stop bit, then raises
//! chip-select again. Every edge has a minimum width taken from the datasheet,
//! see [`timing`].
//!
//! Three shapes share one protocol engine:
//!
//! * [`Mb4052`], owning chip-select, clock, data and both channel-select pins.
//! * [`Mb4052Hardwired`], for boards with C0/C1 strapped to a fixed channel.
//! * [`StaticMb4052`], with pin numbers fixed at build time over a [`Platform`].
//!
//! ```no_run
//! # fn demo<CS, CLK, DATA, C0, C1, T, D>(cs: CS, clk: CLK, data: DATA, c0: C0, c1: C1, clock: T, delay: D) -> Result<(), mb4052::Error>
//! # where
//! #     CS: embedded_hal::digital::OutputPin,
//! #     CLK: embedded_hal::digital::OutputPin,
//! #     DATA: embedded_hal::digital::InputPin,
//! #     C0: embedded_hal::digital::OutputPin,
//! #     C1: embedded_hal::digital::OutputPin,
//! #     T: mb4052::MicrosClock,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//! use mb4052::{Channel, Mb4052};
//!
//! let mut adc = Mb4052::new(cs, clk, data, c0, c1, clock, delay);
//! adc.initialize()?;
//!
//! let sample = adc.convert(Channel::CH2)?;
//! # let _ = sample;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
        #[cfg(not(feature = "log"))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
        #[cfg(not(feature = "log"))]
        let _ = format_args!($($arg)*);
    }};
}

pub mod timing;

mod clock;
mod device;
mod error;
mod platform;
mod protocol;

#[cfg(test)]
mod sim;

pub use clock::MicrosClock;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use device::{ChannelPins, ChannelSelect, Hardwired, Mb4052, Mb4052Hardwired};
pub use error::Error;
pub use platform::{DeadTimeSlot, PinMode, Platform, SharedDeadTime, StaticMb4052};
pub use protocol::DeadTime;

/// Channel list for MB4052
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    CH0 = 0,
    CH1 = 1,
    CH2 = 2,
    CH3 = 3,
}

impl Channel {
    /// Iterate over all channels.
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::CH0, Self::CH1, Self::CH2, Self::CH3].into_iter()
    }

    /// Level for the C0 line.
    pub fn c0(self) -> bool {
        self as u8 & 0b01 != 0
    }

    /// Level for the C1 line.
    pub fn c1(self) -> bool {
        self as u8 & 0b10 != 0
    }
}

/// Only the low two bits select a channel, anything above is ignored.
impl From<u8> for Channel {
    fn from(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::CH0,
            1 => Self::CH1,
            2 => Self::CH2,
            _ => Self::CH3,
        }
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> Self {
        channel as u8
    }
}
