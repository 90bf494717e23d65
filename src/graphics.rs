//! Graphics Support for IL0373 panels
//!
//! [`Canvas`] borrows a driver together with the bus so embedded-graphics
//! primitives can draw straight into the pixel store. Coordinates are in the
//! rotated canvas, exactly like [`TriColorDisplay::draw_pixel`].

use embedded_graphics_core::prelude::*;
use embedded_hal::{digital::OutputPin, spi::SpiBus};

use crate::color::Color;
use crate::error::ErrorKind;
use crate::il0373::Il0373;
use crate::traits::{PixelStore, TriColorDisplay, WaitReady};

/// Draw target over an [`Il0373`] and its bus
pub struct Canvas<'a, SPI, CS, DC, RST, W, S> {
    epd: &'a mut Il0373<SPI, CS, DC, RST, W, S>,
    spi: &'a mut SPI,
}

impl<'a, SPI, CS, DC, RST, W, S> Canvas<'a, SPI, CS, DC, RST, W, S>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    W: WaitReady,
    S: PixelStore<SPI>,
{
    /// Draws into `epd`, using `spi` whenever the store needs the bus
    pub fn new(epd: &'a mut Il0373<SPI, CS, DC, RST, W, S>, spi: &'a mut SPI) -> Self {
        Canvas { epd, spi }
    }
}

impl<SPI, CS, DC, RST, W, S> DrawTarget for Canvas<'_, SPI, CS, DC, RST, W, S>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    W: WaitReady,
    S: PixelStore<SPI>,
{
    type Color = Color;
    type Error = ErrorKind;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.epd.draw_pixel(self.spi, point.x, point.y, color)?;
        }
        Ok(())
    }

    /// Blanks both planes, then paints every pixel unless `color` is white
    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.epd.clear_buffer(self.spi)?;
        if color == Color::White {
            return Ok(());
        }
        let area = self.bounding_box();
        self.fill_solid(&area, color)
    }
}

impl<SPI, CS, DC, RST, W, S> OriginDimensions for Canvas<'_, SPI, CS, DC, RST, W, S>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    W: WaitReady,
    S: PixelStore<SPI>,
{
    fn size(&self) -> Size {
        Size::new(self.epd.width(), self.epd.height())
    }
}
