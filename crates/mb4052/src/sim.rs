//! Simulated GPIO, clock and delay recording every line transition.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, PinState};

use crate::MicrosClock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    ChipSelect,
    Clock,
    Data,
    C0,
    C1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    Write { role: Role, state: PinState, at: u32 },
    Read { high: bool, at: u32 },
    Delay { us: u32, at: u32 },
}

#[derive(Debug, PartialEq)]
pub(crate) struct SimError;

impl digital::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Default)]
struct State {
    now: u32,
    events: Vec<Event>,
    data: VecDeque<bool>,
    fail: Option<(Role, usize)>,
}

impl State {
    fn touch(&mut self, role: Role) -> Result<(), SimError> {
        match self.fail {
            Some((failing, 0)) if failing == role => {
                self.fail = None;
                Err(SimError)
            }
            Some((failing, left)) if failing == role => {
                self.fail = Some((failing, left - 1));
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct Sim(Rc<RefCell<State>>);

impl Sim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, role: Role) -> SimPin {
        SimPin {
            sim: self.clone(),
            role,
        }
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Queue a byte on the data line, MSB first.
    pub fn feed(&self, byte: u8) {
        let mut state = self.0.borrow_mut();
        state.data.extend((0..8).rev().map(|bit| byte >> bit & 1 == 1));
    }

    pub fn feed_bits(&self, bits: &[bool]) {
        self.0.borrow_mut().data.extend(bits.iter().copied());
    }

    pub fn advance(&self, us: u32) {
        let mut state = self.0.borrow_mut();
        state.now = state.now.wrapping_add(us);
    }

    pub fn set_now(&self, now: u32) {
        self.0.borrow_mut().now = now;
    }

    pub fn now(&self) -> u32 {
        self.0.borrow().now
    }

    /// Fail the operation on `role` after `after` successful ones.
    pub fn fail_on(&self, role: Role, after: usize) {
        self.0.borrow_mut().fail = Some((role, after));
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }

    /// Last level written to an output, `None` if never driven.
    pub fn level(&self, role: Role) -> Option<PinState> {
        self.0.borrow().events.iter().rev().find_map(|event| match *event {
            Event::Write { role: r, state, .. } if r == role => Some(state),
            _ => None,
        })
    }

    pub fn writes(&self, role: Role) -> Vec<(PinState, u32)> {
        self.0
            .borrow()
            .events
            .iter()
            .filter_map(|event| match *event {
                Event::Write { role: r, state, at } if r == role => Some((state, at)),
                _ => None,
            })
            .collect()
    }

    /// Number of complete high-then-low clock cycles.
    pub fn clock_cycles(&self) -> usize {
        self.writes(Role::Clock)
            .windows(2)
            .filter(|pair| pair[0].0 == PinState::High && pair[1].0 == PinState::Low)
            .count()
    }

    pub fn reads(&self) -> usize {
        self.0
            .borrow()
            .events
            .iter()
            .filter(|event| matches!(event, Event::Read { .. }))
            .count()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.0
            .borrow()
            .events
            .iter()
            .filter_map(|event| match *event {
                Event::Delay { us, .. } => Some(us),
                _ => None,
            })
            .collect()
    }

    /// Position of the n-th write of `state` to `role` in the event log.
    pub fn position(&self, role: Role, state: PinState, nth: usize) -> Option<usize> {
        self.0
            .borrow()
            .events
            .iter()
            .enumerate()
            .filter(|(_, event)| {
                matches!(event, Event::Write { role: r, state: s, .. } if *r == role && *s == state)
            })
            .map(|(index, _)| index)
            .nth(nth)
    }
}

pub(crate) struct SimPin {
    sim: Sim,
    role: Role,
}

impl ErrorType for SimPin {
    type Error = SimError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High)
    }
}

impl SimPin {
    fn write(&mut self, state: PinState) -> Result<(), SimError> {
        let mut inner = self.sim.0.borrow_mut();
        inner.touch(self.role)?;
        let at = inner.now;
        inner.events.push(Event::Write {
            role: self.role,
            state,
            at,
        });
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut inner = self.sim.0.borrow_mut();
        inner.touch(self.role)?;
        // Pulled up when nothing drives it.
        let high = inner.data.pop_front().unwrap_or(true);
        let at = inner.now;
        inner.events.push(Event::Read { high, at });
        Ok(high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub(crate) struct SimClock(Sim);

impl MicrosClock for SimClock {
    fn now_micros(&mut self) -> u32 {
        self.0.now()
    }
}

pub(crate) struct SimDelay(Sim);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        let mut inner = self.0 .0.borrow_mut();
        let at = inner.now;
        inner.events.push(Event::Delay { us, at });
        inner.now = inner.now.wrapping_add(us);
    }
}
