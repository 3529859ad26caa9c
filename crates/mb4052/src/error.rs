use core::fmt;

use embedded_hal::digital::ErrorKind;

/// A pin refused a read or write during a conversion.
///
/// The MB4052 itself never reports failure: a missing or miswired chip reads
/// back as whatever level the data line floats to. Only the host's GPIO layer
/// can fail, and the variant names which pin role it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Writing the chip-select line failed.
    ChipSelect(ErrorKind),
    /// Writing the clock line failed.
    Clock(ErrorKind),
    /// Reading the data line failed.
    Data(ErrorKind),
    /// Writing C0 or C1 failed.
    ChannelSelect(ErrorKind),
}

impl Error {
    /// The underlying GPIO error kind.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Self::ChipSelect(kind)
            | Self::Clock(kind)
            | Self::Data(kind)
            | Self::ChannelSelect(kind) => kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Self::ChipSelect(_) => "chip-select",
            Self::Clock(_) => "clock",
            Self::Data(_) => "data",
            Self::ChannelSelect(_) => "channel-select",
        };

        write!(f, "{role} pin: {}", self.kind())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
