use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, InputPin, OutputPin, PinState};

use crate::protocol::{self, DeadTime, Wire};
use crate::timing::CHANNEL_HOLD_US;
use crate::{Channel, Error, MicrosClock};

/// How a device's C0/C1 inputs are driven.
pub trait ChannelSelect {
    /// Hold after [`select`](Self::select) before chip-select may fall.
    const SETTLE_US: u32;

    /// Drive the channel lines for `channel`.
    fn select(&mut self, channel: Channel) -> Result<(), Error>;
}

/// C0 and C1 wired to host outputs.
pub struct ChannelPins<C0, C1> {
    c0: C0,
    c1: C1,
}

impl<C0: OutputPin, C1: OutputPin> ChannelSelect for ChannelPins<C0, C1> {
    const SETTLE_US: u32 = CHANNEL_HOLD_US;

    fn select(&mut self, channel: Channel) -> Result<(), Error> {
        self.c0
            .set_state(PinState::from(channel.c0()))
            .map_err(|e| Error::ChannelSelect(e.kind()))?;
        self.c1
            .set_state(PinState::from(channel.c1()))
            .map_err(|e| Error::ChannelSelect(e.kind()))
    }
}

/// C0 and C1 strapped on the board. Nothing to drive, nothing to wait for.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hardwired;

impl ChannelSelect for Hardwired {
    const SETTLE_US: u32 = 0;

    fn select(&mut self, _channel: Channel) -> Result<(), Error> {
        Ok(())
    }
}

/// MB4052 driver
///
/// Owns its pins, so it is the only thing clocking this chip. There is no
/// locking inside; wrap the driver in a mutex if more than one thread needs
/// readings.
pub struct Mb4052<CS, CLK, DATA, SEL, T, D> {
    cs: CS,
    clk: CLK,
    data: DATA,
    select: SEL,
    clock: T,
    delay: D,
    dead_time: DeadTime,
}

impl<CS, CLK, DATA, C0, C1, T, D> Mb4052<CS, CLK, DATA, ChannelPins<C0, C1>, T, D>
where
    CS: OutputPin,
    CLK: OutputPin,
    DATA: InputPin,
    C0: OutputPin,
    C1: OutputPin,
    T: MicrosClock,
    D: DelayNs,
{
    /// Creates a new driver from its five pins, a microsecond clock and a delay.
    /// Please ensure `data` is configured as an input with its pull-up enabled.
    pub fn new(cs: CS, clk: CLK, data: DATA, c0: C0, c1: C1, clock: T, delay: D) -> Self {
        Self::with_select(cs, clk, data, ChannelPins { c0, c1 }, clock, delay)
    }

    /// Gives back the pins, clock and delay.
    pub fn release(self) -> (CS, CLK, DATA, C0, C1, T, D) {
        let ChannelPins { c0, c1 } = self.select;
        (self.cs, self.clk, self.data, c0, c1, self.clock, self.delay)
    }
}

impl<CS, CLK, DATA, SEL, T, D> Mb4052<CS, CLK, DATA, SEL, T, D>
where
    CS: OutputPin,
    CLK: OutputPin,
    DATA: InputPin,
    SEL: ChannelSelect,
    T: MicrosClock,
    D: DelayNs,
{
    /// Creates a new driver with any [`ChannelSelect`] strategy.
    pub fn with_select(cs: CS, clk: CLK, data: DATA, select: SEL, clock: T, delay: D) -> Self {
        Self {
            cs,
            clk,
            data,
            select,
            clock,
            delay,
            dead_time: DeadTime::new(),
        }
    }

    /// Puts the lines in their idle state: chip-select high, clock low.
    ///
    /// Channel lines are left alone, every conversion drives them first.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.cs
            .set_high()
            .map_err(|e| Error::ChipSelect(e.kind()))?;
        self.clk.set_low().map_err(|e| Error::Clock(e.kind()))?;

        debug!("MB4052 idle");

        Ok(())
    }

    /// Converts `channel` and returns the 8 bit result.
    ///
    /// Blocks for roughly 100µs, plus whatever is left of the dead-time since
    /// the previous conversion.
    pub fn convert(&mut self, channel: Channel) -> Result<u8, Error> {
        self.select.select(channel)?;

        if SEL::SETTLE_US > 0 {
            self.delay.delay_us(SEL::SETTLE_US);
        }

        let mut lines = Lines {
            cs: &mut self.cs,
            clk: &mut self.clk,
            data: &mut self.data,
            clock: &mut self.clock,
            delay: &mut self.delay,
        };

        let result = protocol::convert(&mut lines, &mut self.dead_time);

        match result {
            Ok(value) => trace!("MB4052 {:?} = {}", channel, value),
            Err(error) => debug!("MB4052 {:?} aborted: {}", channel, error),
        }

        result
    }

    /// Converts every channel in order, CH0 first.
    pub fn convert_all(&mut self) -> Result<[u8; 4], Error> {
        let mut values = [0; 4];

        for (value, channel) in values.iter_mut().zip(Channel::all()) {
            *value = self.convert(channel)?;
        }

        Ok(values)
    }

    /// Dead-time bookkeeping from the last conversion.
    pub fn dead_time(&self) -> DeadTime {
        self.dead_time
    }
}

/// Single channel MB4052 driver, for boards with C0/C1 tied to fixed levels.
pub struct Mb4052Hardwired<CS, CLK, DATA, T, D> {
    adc: Mb4052<CS, CLK, DATA, Hardwired, T, D>,
    channel: Channel,
}

impl<CS, CLK, DATA, T, D> Mb4052Hardwired<CS, CLK, DATA, T, D>
where
    CS: OutputPin,
    CLK: OutputPin,
    DATA: InputPin,
    T: MicrosClock,
    D: DelayNs,
{
    /// Creates a new driver for a chip whose C0/C1 are strapped to `channel`.
    /// Please ensure `data` is configured as an input with its pull-up enabled.
    pub fn new(cs: CS, clk: CLK, data: DATA, channel: Channel, clock: T, delay: D) -> Self {
        Self {
            adc: Mb4052::with_select(cs, clk, data, Hardwired, clock, delay),
            channel,
        }
    }

    /// See [`Mb4052::initialize`].
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.adc.initialize()
    }

    /// Converts the wired channel and returns the 8 bit result.
    pub fn convert(&mut self) -> Result<u8, Error> {
        self.adc.convert(self.channel)
    }

    /// The channel the board is wired to.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn dead_time(&self) -> DeadTime {
        self.adc.dead_time()
    }

    /// Gives back the pins, clock and delay.
    pub fn release(self) -> (CS, CLK, DATA, T, D) {
        let adc = self.adc;
        (adc.cs, adc.clk, adc.data, adc.clock, adc.delay)
    }
}

struct Lines<'a, CS, CLK, DATA, T, D> {
    cs: &'a mut CS,
    clk: &'a mut CLK,
    data: &'a mut DATA,
    clock: &'a mut T,
    delay: &'a mut D,
}

impl<CS, CLK, DATA, T, D> Wire for Lines<'_, CS, CLK, DATA, T, D>
where
    CS: OutputPin,
    CLK: OutputPin,
    DATA: InputPin,
    T: MicrosClock,
    D: DelayNs,
{
    type Error = Error;

    fn chip_select(&mut self, state: PinState) -> Result<(), Error> {
        self.cs
            .set_state(state)
            .map_err(|e| Error::ChipSelect(e.kind()))
    }

    fn clock(&mut self, state: PinState) -> Result<(), Error> {
        self.clk.set_state(state).map_err(|e| Error::Clock(e.kind()))
    }

    fn sample(&mut self) -> Result<bool, Error> {
        self.data.is_high().map_err(|e| Error::Data(e.kind()))
    }

    fn now_micros(&mut self) -> u32 {
        self.clock.now_micros()
    }

    fn hold_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
