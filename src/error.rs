use core::fmt::{Display, Formatter};

use embedded_hal::{digital, spi};

/// Epd error type
///
/// Keeps the embedded-hal error kind of whichever peripheral failed, so the
/// driver doesn't have to be generic over every pin's error type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// Encountered an SPI error
    Spi(spi::ErrorKind),

    /// Encountered an error on the panel chip select GPIO
    ChipSelect(digital::ErrorKind),

    /// Encountered an error on DC GPIO
    DataCommand(digital::ErrorKind),

    /// Encountered an error on RST GPIO
    Reset(digital::ErrorKind),

    /// Encountered an error on Busy GPIO
    Busy(digital::ErrorKind),

    /// Encountered an error on the external SRAM chip select GPIO
    MemorySelect(digital::ErrorKind),

    /// The busy line didn't report ready within the configured bound
    BusyTimeout,

    /// The pixel store doesn't match the panel geometry
    BufferSize {
        /// Bytes per plane required by the geometry
        expected: usize,
        /// Bytes per plane offered by the store
        actual: usize,
    },

    /// Width is zero or height is not a non-zero multiple of 8
    InvalidGeometry,
}

impl ErrorKind {
    pub(crate) fn spi<E: spi::Error>(err: E) -> Self {
        Self::Spi(err.kind())
    }

    pub(crate) fn chip_select<E: digital::Error>(err: E) -> Self {
        Self::ChipSelect(err.kind())
    }

    pub(crate) fn data_command<E: digital::Error>(err: E) -> Self {
        Self::DataCommand(err.kind())
    }

    pub(crate) fn reset<E: digital::Error>(err: E) -> Self {
        Self::Reset(err.kind())
    }

    pub(crate) fn busy<E: digital::Error>(err: E) -> Self {
        Self::Busy(err.kind())
    }

    pub(crate) fn memory_select<E: digital::Error>(err: E) -> Self {
        Self::MemorySelect(err.kind())
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(err) => write!(f, "spi: {}", err),
            Self::ChipSelect(err) => write!(f, "chip select: {}", err),
            Self::DataCommand(err) => write!(f, "data/command pin: {}", err),
            Self::Reset(err) => write!(f, "reset pin: {}", err),
            Self::Busy(err) => write!(f, "busy pin: {}", err),
            Self::MemorySelect(err) => write!(f, "sram chip select: {}", err),
            Self::BusyTimeout => write!(f, "display stayed busy"),
            Self::BufferSize { expected, actual } => write!(
                f,
                "plane buffer holds {} bytes but the panel needs {}",
                actual, expected
            ),
            Self::InvalidGeometry => write!(
                f,
                "width must be non-zero and height a non-zero multiple of 8"
            ),
        }
    }
}
