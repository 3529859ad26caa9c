/// A free-running microsecond counter.
///
/// The value wraps at `u32::MAX`; the driver only ever looks at differences
/// between two readings, taken with wrapping arithmetic.
pub trait MicrosClock {
    /// Microseconds since an arbitrary, fixed epoch.
    fn now_micros(&mut self) -> u32;
}

impl<T: MicrosClock + ?Sized> MicrosClock for &mut T {
    fn now_micros(&mut self) -> u32 {
        (**self).now_micros()
    }
}

/// [`MicrosClock`] backed by [`std::time::Instant`], counting from creation.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    epoch: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MicrosClock for StdClock {
    fn now_micros(&mut self) -> u32 {
        // Truncation is the wrap.
        self.epoch.elapsed().as_micros() as u32
    }
}
