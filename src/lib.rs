//! A Driver for IL0373 based tri-color E-Ink Displays via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0.0
//!
//! The panels carry two one-bit planes: black/white and red. Both planes can
//! live in local memory ([`storage::LocalStore`]) or in an SPI SRAM on the
//! same bus ([`storage::ExternalStore`]), which keeps the MCU footprint to a
//! few bytes on small targets.
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is only needed for the external SRAM
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - The chip selects are driven by the driver, hand it a raw [`SpiBus`](embedded_hal::spi::SpiBus)
//!
//! ### Other....
//!
//! - Plane size: always `width * height / 8` bytes, see [`buffer_len`]
//! - Without a busy line use [`busy::FixedDelay`]
//!
//! # Examples
//!
//! ```ignore
//! use epd_il0373::{il0373::Il0373, prelude::*};
//!
//! let store = LocalStore::<{ buffer_len(128, 296) }>::default();
//! let mut epd = Il0373::new(cs, dc, rst, BusyPin::new(busy), store, 128, 296)?;
//! epd.init(&mut spi, &mut delay, true)?;
//!
//! // draw something into the planes
//! epd.clear_buffer(&mut spi)?;
//! epd.draw_pixel(&mut spi, 5, 10, Color::Black)?;
//!
//! epd.display(&mut spi, &mut delay)?;
//!
//! // wipe the panel, refreshing twice against ghosting
//! epd.clear_display(&mut spi, &mut delay)?;
//! ```
//!
#![no_std]

#[cfg(feature = "graphics")]
pub mod graphics;

mod traits;

pub mod busy;

pub mod color;

mod error;

pub mod geometry;

/// Interface for the physical connection between display and the controlling device
mod interface;

pub mod il0373;

pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::error::ErrorKind;
pub use crate::traits::{PixelStore, TriColorDisplay, WaitReady};

pub mod prelude {
    pub use crate::busy::{BusyPin, BusyPinTimeout, FixedDelay};
    pub use crate::color::Color;
    pub use crate::error::ErrorKind;
    pub use crate::geometry::{DisplayRotation, Plane};
    pub use crate::storage::{ExternalStore, LocalStore};
    pub use crate::traits::{PixelStore, TriColorDisplay, WaitReady};
    pub use crate::{buffer_len, SPI_MODE};

    #[cfg(feature = "graphics")]
    pub use crate::graphics::Canvas;
}

/// Computes the byte length of one plane
///
/// Each pixel takes one bit, the height has to be a multiple of 8.
pub const fn buffer_len(width: usize, height: usize) -> usize {
    width * height / 8
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
