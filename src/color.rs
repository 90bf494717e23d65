//! B/W/Red Color for IL0373 tri-color panels

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::{BinaryColor, PixelColor};

use crate::geometry::Plane;

/// Drawing color for the tri-color panels
///
/// `White` is the background: drawing it leaves the planes untouched, only
/// clearing the buffer brings pixels back to white.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Background
    #[default]
    White,
    /// Black pixel on the primary plane
    Black,
    /// Red pixel on the secondary plane
    Red,
    /// Gray shares the secondary plane with red
    Gray,
    /// Flips the primary plane bit, ignoring polarity
    Inverse,
}

impl Color {
    /// The plane this color draws into, `None` for the background
    pub fn plane(self) -> Option<Plane> {
        match self {
            Color::White => None,
            Color::Black | Color::Inverse => Some(Plane::Primary),
            Color::Red | Color::Gray => Some(Plane::Secondary),
        }
    }

    /// Gets the byte a plane is filled with when cleared
    ///
    /// An inverted plane marks colored pixels with cleared bits, so its blank
    /// state is all ones.
    pub fn blank_byte(inverted: bool) -> u8 {
        if inverted {
            0xFF
        } else {
            0x00
        }
    }
}

#[cfg(feature = "graphics")]
impl PixelColor for Color {
    type Raw = ();
}

#[cfg(feature = "graphics")]
impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}
