//! Panel geometry and the mapping from canvas coordinates to plane addresses

use crate::error::ErrorKind;

/// One of the two binary image layers of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Black/white layer
    Primary,
    /// Red (or gray) layer
    Secondary,
}

impl Plane {
    pub(crate) fn index(self) -> usize {
        match self {
            Plane::Primary => 0,
            Plane::Secondary => 1,
        }
    }
}

/// Display rotation, only 90° increments supported
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl DisplayRotation {
    /// Rotation from a quarter-turn count, taken modulo 4
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => DisplayRotation::Rotate0,
            1 => DisplayRotation::Rotate90,
            2 => DisplayRotation::Rotate180,
            _ => DisplayRotation::Rotate270,
        }
    }

    /// Quarter-turn count of this rotation
    pub fn index(self) -> u8 {
        match self {
            DisplayRotation::Rotate0 => 0,
            DisplayRotation::Rotate90 => 1,
            DisplayRotation::Rotate180 => 2,
            DisplayRotation::Rotate270 => 3,
        }
    }

    fn swaps_axes(self) -> bool {
        matches!(
            self,
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270
        )
    }
}

/// Byte offset and bit position of a pixel inside a plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelAddress {
    /// Byte offset from the start of the plane
    pub offset: usize,
    /// Bit position inside the byte, 0 being the least significant bit
    pub bit: u8,
}

/// Physical (unrotated) panel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    width: u32,
    height: u32,
}

impl Geometry {
    /// Height is the packed dimension and has to be a multiple of 8
    ///
    /// The pixel count has to fit into a `u32`, so the plane length can't
    /// overflow on any target.
    pub fn new(width: u32, height: u32) -> Result<Self, ErrorKind> {
        if width == 0 || height == 0 || height % 8 != 0 || width.checked_mul(height).is_none() {
            return Err(ErrorKind::InvalidGeometry);
        }
        Ok(Geometry { width, height })
    }

    /// Physical width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Physical height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes needed for one plane
    pub fn plane_len(&self) -> usize {
        crate::buffer_len(self.width as usize, self.height as usize)
    }

    /// Canvas size as seen by a caller drawing with `rotation`
    pub fn logical_size(&self, rotation: DisplayRotation) -> (u32, u32) {
        if rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Maps a canvas coordinate to its place in a plane
    ///
    /// Returns `None` for coordinates outside the rotated canvas.
    ///
    /// After rotating, physical column 0 is folded onto column 1: the
    /// controller's scan order leaves column 0 without its own bytes in this
    /// packing, so both columns share an address.
    pub fn locate(&self, x: i32, y: i32, rotation: DisplayRotation) -> Option<PixelAddress> {
        let (logical_width, logical_height) = self.logical_size(rotation);
        if x < 0 || y < 0 || x as u32 >= logical_width || y as u32 >= logical_height {
            return None;
        }

        let (width, height) = (self.width as usize, self.height as usize);
        let (x, y) = (x as usize, y as usize);
        let (x, y) = match rotation {
            DisplayRotation::Rotate0 => (x, y),
            DisplayRotation::Rotate90 => (width - y - 1, x),
            DisplayRotation::Rotate180 => (width - x - 1, height - y - 1),
            DisplayRotation::Rotate270 => (y, height - x - 1),
        };

        let x = if x == 0 { 1 } else { x };

        Some(PixelAddress {
            offset: ((width - x) * height + y) / 8,
            bit: 7 - (y % 8) as u8,
        })
    }
}
