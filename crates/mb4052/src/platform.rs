//! MB4052 access with pin numbers fixed at build time.
//!
//! [`StaticMb4052`] holds no state of its own. Its pins are const generics
//! and the dead-time timestamp lives in a `'static` [`SharedDeadTime`] chosen
//! by a marker type. Every caller naming the same marker shares that one
//! timestamp, which is exactly right when they all drive the same chip and
//! wrong if two chips are given the same marker.

use core::convert::Infallible;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::digital::PinState;

use crate::protocol::{self, DeadTime, Wire};
use crate::timing::CHANNEL_HOLD_US;
use crate::Channel;

/// Direction a numbered pin is configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Input with the internal pull-up enabled.
    InputPullUp,
    Output,
}

/// GPIO and timing services addressed by pin number, without any instance.
///
/// Invalid pin numbers are the platform's problem; these calls cannot fail.
pub trait Platform {
    fn configure_pin(pin: u8, mode: PinMode);

    fn write_pin(pin: u8, state: PinState);

    fn read_pin(pin: u8) -> PinState;

    /// Free-running microsecond counter, wrapping at `u32::MAX`.
    fn now_micros() -> u32;

    /// Block for at least `us` microseconds.
    fn busy_wait_micros(us: u32);
}

/// A dead-time timestamp that can live in a `static`.
#[derive(Debug, Default)]
pub struct SharedDeadTime {
    armed: AtomicBool,
    at: AtomicU32,
}

impl SharedDeadTime {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
            at: AtomicU32::new(0),
        }
    }

    pub fn load(&self) -> DeadTime {
        if self.armed.load(Ordering::Acquire) {
            DeadTime::at(Some(self.at.load(Ordering::Relaxed)))
        } else {
            DeadTime::new()
        }
    }

    pub fn store(&self, dead_time: DeadTime) {
        match dead_time.last_deselect() {
            Some(at) => {
                self.at.store(at, Ordering::Relaxed);
                self.armed.store(true, Ordering::Release);
            }
            None => self.armed.store(false, Ordering::Release),
        }
    }
}

/// Names the [`SharedDeadTime`] a [`StaticMb4052`] uses.
///
/// Declare implementors with [`shared_dead_time!`](crate::shared_dead_time).
pub trait DeadTimeSlot {
    fn slot() -> &'static SharedDeadTime;
}

/// Declares a marker type owning one `static` [`SharedDeadTime`].
///
/// ```
/// mb4052::shared_dead_time!(pub BoilerAdc);
/// ```
#[macro_export]
macro_rules! shared_dead_time {
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        $(#[$meta])*
        $vis struct $name;

        impl $crate::DeadTimeSlot for $name {
            fn slot() -> &'static $crate::SharedDeadTime {
                static SLOT: $crate::SharedDeadTime = $crate::SharedDeadTime::new();
                &SLOT
            }
        }
    };
}

/// MB4052 driver with no instance state.
///
/// `P` supplies GPIO and timing, `S` the shared dead-time timestamp, and the
/// const parameters are the pin numbers for chip-select, clock, data, C0 and C1.
/// Callers on more than one thread must serialise access themselves.
pub struct StaticMb4052<
    P,
    S,
    const CS: u8,
    const CLK: u8,
    const DATA: u8,
    const C0: u8,
    const C1: u8,
> {
    _marker: PhantomData<fn() -> (P, S)>,
}

impl<P, S, const CS: u8, const CLK: u8, const DATA: u8, const C0: u8, const C1: u8>
    StaticMb4052<P, S, CS, CLK, DATA, C0, C1>
where
    P: Platform,
    S: DeadTimeSlot,
{
    /// Configures pin directions and puts the lines in their idle state.
    pub fn initialize() {
        P::configure_pin(DATA, PinMode::InputPullUp);
        P::configure_pin(CS, PinMode::Output);
        P::configure_pin(CLK, PinMode::Output);
        P::write_pin(CS, PinState::High);
        P::write_pin(CLK, PinState::Low);
        P::configure_pin(C0, PinMode::Output);
        P::configure_pin(C1, PinMode::Output);

        debug!("MB4052 idle on CS {} CLK {} DATA {}", CS, CLK, DATA);
    }

    /// Converts `channel` and returns the 8 bit result.
    pub fn convert(channel: Channel) -> u8 {
        P::write_pin(C0, PinState::from(channel.c0()));
        P::write_pin(C1, PinState::from(channel.c1()));
        P::busy_wait_micros(CHANNEL_HOLD_US);

        let slot = S::slot();
        let mut dead_time = slot.load();

        let result = protocol::convert(&mut PlatformWire::<P, CS, CLK, DATA>::new(), &mut dead_time);

        slot.store(dead_time);

        match result {
            Ok(value) => {
                trace!("MB4052 {:?} = {}", channel, value);
                value
            }
            Err(never) => match never {},
        }
    }

    /// The timestamp shared by everything using `S`.
    pub fn dead_time() -> DeadTime {
        S::slot().load()
    }
}

struct PlatformWire<P, const CS: u8, const CLK: u8, const DATA: u8> {
    _platform: PhantomData<P>,
}

impl<P, const CS: u8, const CLK: u8, const DATA: u8> PlatformWire<P, CS, CLK, DATA> {
    fn new() -> Self {
        Self {
            _platform: PhantomData,
        }
    }
}

impl<P: Platform, const CS: u8, const CLK: u8, const DATA: u8> Wire
    for PlatformWire<P, CS, CLK, DATA>
{
    type Error = Infallible;

    fn chip_select(&mut self, state: PinState) -> Result<(), Infallible> {
        P::write_pin(CS, state);
        Ok(())
    }

    fn clock(&mut self, state: PinState) -> Result<(), Infallible> {
        P::write_pin(CLK, state);
        Ok(())
    }

    fn sample(&mut self) -> Result<bool, Infallible> {
        Ok(P::read_pin(DATA) == PinState::High)
    }

    fn now_micros(&mut self) -> u32 {
        P::now_micros()
    }

    fn hold_us(&mut self, us: u32) {
        P::busy_wait_micros(us);
    }
}
