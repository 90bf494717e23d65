use embedded_hal::{delay::DelayNs, spi::SpiBus};

use crate::color::Color;
use crate::error::ErrorKind;
use crate::geometry::{DisplayRotation, Plane};

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;
}

/// Storage strategy for the two image planes
///
/// Planes are addressed by a linear byte offset and a bit index (0 = LSB).
/// Offsets are not re-validated here, the driver only hands in offsets
/// below [`plane_len`](PixelStore::plane_len).
///
/// Streaming is a pull model shared by all stores: after
/// [`begin_stream`](PixelStore::begin_stream) every call to
/// [`shift`](PixelStore::shift) clocks one byte out on the bus and yields the
/// next byte of the plane. Whatever is selected on the bus at that moment
/// (usually the panel in data mode) receives the outgoing byte. A stream is
/// consumed once and has to be closed with [`end_stream`](PixelStore::end_stream).
pub trait PixelStore<SPI>
where
    SPI: SpiBus,
{
    /// Bytes per plane
    fn plane_len(&self) -> usize;

    /// Brings the storage device into a usable state
    ///
    /// Called from the driver's `init`. Local storage has nothing to do.
    fn init(&mut self, _spi: &mut SPI) -> Result<(), ErrorKind> {
        Ok(())
    }

    /// Reads a single bit
    fn read_bit(
        &mut self,
        spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
    ) -> Result<bool, ErrorKind>;

    /// Sets or clears a single bit
    fn write_bit(
        &mut self,
        spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
        value: bool,
    ) -> Result<(), ErrorKind>;

    /// Flips a single bit
    fn toggle_bit(
        &mut self,
        spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
    ) -> Result<(), ErrorKind>;

    /// Overwrites a whole plane with `value`
    fn fill(&mut self, spi: &mut SPI, plane: Plane, value: u8) -> Result<(), ErrorKind>;

    /// Opens a plane for one sequential pass
    fn begin_stream(&mut self, spi: &mut SPI, plane: Plane) -> Result<(), ErrorKind>;

    /// Sends `outgoing` and returns the next plane byte
    ///
    /// Past the end of the plane the returned value is meaningless.
    fn shift(&mut self, spi: &mut SPI, outgoing: u8) -> Result<u8, ErrorKind>;

    /// Closes the stream opened by [`begin_stream`](PixelStore::begin_stream)
    fn end_stream(&mut self, spi: &mut SPI) -> Result<(), ErrorKind>;
}

/// Backend used to wait for the controller to finish an operation
pub trait WaitReady {
    /// Blocks until the controller accepts the next command
    fn wait_until_ready<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<(), ErrorKind>;
}

/// All the blocking operations of a tri-color panel driver
///
/// Drawing only touches the pixel store. Nothing reaches the panel before
/// [`display`](TriColorDisplay::display) (or [`power_up`](TriColorDisplay::power_up)
/// followed by [`update`](TriColorDisplay::update)).
///
/// # Example
///
///```rust, ignore
///use epd_il0373::{il0373::Il0373, prelude::*};
///
///let mut epd = Il0373::new(cs, dc, rst, FixedDelay::default(), store, 128, 296)?;
///epd.init(&mut spi, &mut delay, true)?;
///
///epd.clear_buffer(&mut spi)?;
///epd.draw_pixel(&mut spi, 5, 10, Color::Red)?;
///epd.display(&mut spi, &mut delay)?;
///```
pub trait TriColorDisplay<SPI>
where
    SPI: SpiBus,
{
    /// Resets the controller (if `reset`), prepares the store and sends the
    /// power and booster settings
    ///
    /// Also restores the default polarity: both planes inverted.
    fn init<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        reset: bool,
    ) -> Result<(), ErrorKind>;

    /// Width of the canvas as seen with the current rotation
    fn width(&self) -> u32;

    /// Height of the canvas as seen with the current rotation
    fn height(&self) -> u32;

    /// Set the display rotation.
    ///
    /// This only concerns future drawing. Anything already drawn stays as it
    /// is in the planes.
    fn set_rotation(&mut self, rotation: DisplayRotation);

    /// Get current rotation
    fn rotation(&self) -> DisplayRotation;

    /// Draws one pixel into the store
    ///
    /// Pixels outside the canvas and `Color::White` are ignored.
    fn draw_pixel(&mut self, spi: &mut SPI, x: i32, y: i32, color: Color) -> Result<(), ErrorKind>;

    /// Blanks both planes according to their polarity
    fn clear_buffer(&mut self, spi: &mut SPI) -> Result<(), ErrorKind>;

    /// Powers the controller on and writes the panel registers
    ///
    /// The controller stays powered until [`update`](TriColorDisplay::update).
    fn power_up<DELAY: DelayNs>(&mut self, spi: &mut SPI, delay: &mut DELAY)
        -> Result<(), ErrorKind>;

    /// Refreshes the panel from controller memory and powers it down
    fn update<DELAY: DelayNs>(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), ErrorKind>;

    /// Shows the stored planes: one full power up, transfer, refresh and
    /// power down cycle
    ///
    /// Blocks until the controller is powered down again.
    fn display<DELAY: DelayNs>(&mut self, spi: &mut SPI, delay: &mut DELAY)
        -> Result<(), ErrorKind>;

    /// Clears the planes and refreshes twice to remove ghosting
    fn clear_display<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind>;
}
