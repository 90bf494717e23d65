//! A Driver for IL0373 based tri-color E-Ink Displays via SPI
//!
//! Covers the flexible 2.13" (212x104) and 2.9" (296x128) black/white/red
//! panels. Pixels are drawn into a [`PixelStore`], [`TriColorDisplay::display`] then
//! powers the controller up, sends both planes, refreshes and powers down.
//!
//! # Example for the 2.9" tri-color panel
//!
//!```rust, ignore
//!use epd_il0373::{il0373::*, prelude::*};
//!
//!// Planes in local memory, busy line wired
//!let store = LocalStore::<{ buffer_len(128, 296) }>::default();
//!let mut epd = Il0373::new(cs, dc, rst, BusyPin::new(busy), store, 128, 296)?;
//!epd.init(&mut spi, &mut delay, true)?;
//!
//!epd.clear_buffer(&mut spi)?;
//!epd.set_rotation(DisplayRotation::Rotate90);
//!epd.draw_pixel(&mut spi, 10, 20, Color::Black)?;
//!epd.draw_pixel(&mut spi, 11, 20, Color::Red)?;
//!
//!epd.display(&mut spi, &mut delay)?;
//!```
use core::marker::PhantomData;

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
use log::debug;

use crate::color::Color;
use crate::error::ErrorKind;
use crate::geometry::{DisplayRotation, Geometry, PixelAddress, Plane};
use crate::interface::DisplayInterface;
use crate::traits::{Command as _, PixelStore, TriColorDisplay, WaitReady};

pub(crate) mod command;
pub(crate) mod config;

use self::command::Command;
use self::config::Step;

/// Where the controller is within a refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No cycle running, controller powered off
    #[default]
    Idle,
    /// Power on command sent, waiting for the charge pump
    PoweringUp,
    /// Writing panel registers
    Configuring,
    /// Sending the black/white plane
    TransmittingPrimary,
    /// Sending the red plane
    TransmittingSecondary,
    /// Refresh command sent
    Refreshing,
    /// Waiting for the refresh to finish
    AwaitingNotBusy,
    /// Shutting the controller down
    PoweringDown,
}

/// What a pixel write does to its bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    /// Set to 1
    Set,
    /// Set to 0
    Clear,
    /// Flip
    Toggle,
}

/// A pixel write resolved to its physical location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWrite {
    /// Target plane
    pub plane: Plane,
    /// Byte and bit inside the plane
    pub address: PixelAddress,
    /// Change applied to the bit
    pub op: BitOp,
}

/// Il0373 driver
///
/// - `W` decides how to wait for the controller, see [`crate::busy`]
/// - `S` holds the two planes, see [`crate::storage`]
pub struct Il0373<SPI, CS, DC, RST, W, S> {
    _spi: PhantomData<SPI>,
    interface: DisplayInterface<CS, DC, RST>,
    ready: W,
    store: S,
    geometry: Geometry,
    rotation: DisplayRotation,
    /// Per plane: a set bit means white/uncolored
    inverted: [bool; 2],
    state: SessionState,
}

impl<SPI, CS, DC, RST, W, S> Il0373<SPI, CS, DC, RST, W, S>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    W: WaitReady,
    S: PixelStore<SPI>,
{
    /// Creates a new driver for a panel of `width` x `height` physical pixels
    ///
    /// Nothing is sent yet, call [`init`](TriColorDisplay::init) before the
    /// first refresh. Fails if the height isn't a multiple of 8 or the store's
    /// planes don't have `width * height / 8` bytes.
    pub fn new(
        cs: CS,
        dc: DC,
        rst: RST,
        ready: W,
        store: S,
        width: u32,
        height: u32,
    ) -> Result<Self, ErrorKind> {
        let geometry = Geometry::new(width, height)?;
        if store.plane_len() != geometry.plane_len() {
            return Err(ErrorKind::BufferSize {
                expected: geometry.plane_len(),
                actual: store.plane_len(),
            });
        }

        Ok(Il0373 {
            _spi: PhantomData,
            interface: DisplayInterface::new(cs, dc, rst),
            ready,
            store,
            geometry,
            rotation: DisplayRotation::default(),
            inverted: [true, true],
            state: SessionState::Idle,
        })
    }

    /// Physical panel dimensions
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Same as [`set_rotation`](TriColorDisplay::set_rotation), counted in quarter turns
    pub fn set_rotation_index(&mut self, index: u8) {
        self.rotation = DisplayRotation::from_index(index);
    }

    /// Chooses whether a set bit on `plane` means uncolored
    ///
    /// Affects future drawing and clearing, not the stored bits.
    pub fn set_inverted(&mut self, plane: Plane, inverted: bool) {
        self.inverted[plane.index()] = inverted;
    }

    /// Polarity of `plane`
    pub fn is_inverted(&self, plane: Plane) -> bool {
        self.inverted[plane.index()]
    }

    /// Current step of the refresh cycle
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The pixel store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Works out which bit a pixel write touches and how
    ///
    /// `None` for background pixels and coordinates outside the canvas.
    pub fn resolve(&self, x: i32, y: i32, color: Color) -> Option<PixelWrite> {
        let address = self.geometry.locate(x, y, self.rotation)?;
        let plane = color.plane()?;
        let op = match color {
            Color::Inverse => BitOp::Toggle,
            _ if self.inverted[plane.index()] => BitOp::Clear,
            _ => BitOp::Set,
        };
        Some(PixelWrite { plane, address, op })
    }

    /// Reads the stored bit behind a canvas pixel, `None` outside the canvas
    pub fn pixel_bit(
        &mut self,
        spi: &mut SPI,
        x: i32,
        y: i32,
        plane: Plane,
    ) -> Result<Option<bool>, ErrorKind> {
        match self.geometry.locate(x, y, self.rotation) {
            Some(PixelAddress { offset, bit }) => {
                self.store.read_bit(spi, plane, offset, bit).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Gives back pins, readiness backend and store
    pub fn release(self) -> (CS, DC, RST, W, S) {
        let (cs, dc, rst) = self.interface.release();
        (cs, dc, rst, self.ready, self.store)
    }

    fn display_steps<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind> {
        self.power_up_steps(spi, delay)?;

        self.enter(SessionState::TransmittingPrimary);
        self.transmit_plane(spi, Plane::Primary)?;
        delay.delay_ms(config::PLANE_GAP_MS);

        self.enter(SessionState::TransmittingSecondary);
        self.transmit_plane(spi, Plane::Secondary)?;

        self.update_steps(spi, delay)
    }

    fn power_up_steps<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind> {
        self.enter(SessionState::PoweringUp);
        self.run(spi, delay, config::POWER_ON_SEQUENCE)?;

        self.enter(SessionState::Configuring);
        self.run(spi, delay, config::CONFIGURE_SEQUENCE)
    }

    fn update_steps<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind> {
        self.enter(SessionState::Refreshing);
        self.run(spi, delay, config::REFRESH_SEQUENCE)?;

        self.enter(SessionState::AwaitingNotBusy);
        self.ready.wait_until_ready(delay)?;

        self.enter(SessionState::PoweringDown);
        self.run(spi, delay, config::POWER_OFF_SEQUENCE)?;

        self.enter(SessionState::Idle);
        Ok(())
    }

    // Streams one plane from the store into controller memory. Panel and
    // store are released even when the transfer failed halfway.
    fn transmit_plane(&mut self, spi: &mut SPI, plane: Plane) -> Result<(), ErrorKind> {
        let command = match plane {
            Plane::Primary => Command::DataStartTransmission1,
            Plane::Secondary => Command::DataStartTransmission2,
        };

        let sent = self
            .store
            .begin_stream(spi, plane)
            .and_then(|()| self.stream_to_panel(spi, command));
        let deselected = self.interface.deselect(spi);
        let ended = self.store.end_stream(spi);
        sent.and(deselected).and(ended)
    }

    // The opcode is exchanged for the first plane byte, every data byte for
    // the byte after it.
    fn stream_to_panel(&mut self, spi: &mut SPI, command: Command) -> Result<(), ErrorKind> {
        let len = self.store.plane_len();

        self.interface.command_mode()?;
        self.interface.select()?;

        let mut byte = self.store.shift(spi, command.address())?;
        spi.flush().map_err(ErrorKind::spi)?;
        self.interface.data_mode()?;
        for _ in 0..len {
            byte = self.store.shift(spi, byte)?;
        }
        Ok(())
    }

    fn run<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        steps: &[Step],
    ) -> Result<(), ErrorKind> {
        for step in steps {
            match *step {
                Step::Cmd(command) => self.interface.cmd(spi, command)?,
                Step::CmdData(command, data) => {
                    self.interface.cmd_with_data(spi, command, data)?
                }
                Step::Resolution => {
                    let data = config::resolution(self.geometry.width(), self.geometry.height());
                    self.interface
                        .cmd_with_data(spi, Command::ResolutionSetting, &data)?
                }
                Step::WaitReady => self.ready.wait_until_ready(delay)?,
                Step::DelayMs(ms) => delay.delay_ms(ms),
            }
        }
        Ok(())
    }

    fn enter(&mut self, state: SessionState) {
        debug!("il0373 {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn idle_on_error<T>(&mut self, result: Result<T, ErrorKind>) -> Result<T, ErrorKind> {
        if result.is_err() {
            self.enter(SessionState::Idle);
        }
        result
    }
}

impl<SPI, CS, DC, RST, W, S> TriColorDisplay<SPI> for Il0373<SPI, CS, DC, RST, W, S>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    W: WaitReady,
    S: PixelStore<SPI>,
{
    fn init<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
        reset: bool,
    ) -> Result<(), ErrorKind> {
        debug!("initialising il0373 {}x{}", self.geometry.width(), self.geometry.height());

        if reset {
            self.interface.reset(delay, config::RESET_HOLD_MS)?;
        }
        self.store.init(spi)?;
        self.inverted = [true, true];
        self.run(spi, delay, config::INIT_SEQUENCE)
    }

    fn width(&self) -> u32 {
        self.geometry.logical_size(self.rotation).0
    }

    fn height(&self) -> u32 {
        self.geometry.logical_size(self.rotation).1
    }

    fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    fn draw_pixel(&mut self, spi: &mut SPI, x: i32, y: i32, color: Color) -> Result<(), ErrorKind> {
        let Some(PixelWrite { plane, address, op }) = self.resolve(x, y, color) else {
            return Ok(());
        };
        let PixelAddress { offset, bit } = address;
        match op {
            BitOp::Set => self.store.write_bit(spi, plane, offset, bit, true),
            BitOp::Clear => self.store.write_bit(spi, plane, offset, bit, false),
            BitOp::Toggle => self.store.toggle_bit(spi, plane, offset, bit),
        }
    }

    fn clear_buffer(&mut self, spi: &mut SPI) -> Result<(), ErrorKind> {
        for plane in [Plane::Primary, Plane::Secondary] {
            let blank = Color::blank_byte(self.inverted[plane.index()]);
            self.store.fill(spi, plane, blank)?;
        }
        Ok(())
    }

    fn power_up<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind> {
        let result = self.power_up_steps(spi, delay);
        self.idle_on_error(result)
    }

    fn update<DELAY: DelayNs>(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<(), ErrorKind> {
        let result = self.update_steps(spi, delay);
        self.idle_on_error(result)
    }

    fn display<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind> {
        let result = self.display_steps(spi, delay);
        self.idle_on_error(result)
    }

    fn clear_display<DELAY: DelayNs>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(), ErrorKind> {
        self.clear_buffer(spi)?;
        self.display(spi, delay)?;
        delay.delay_ms(config::CLEAR_GAP_MS);
        self.display(spi, delay)
    }
}
