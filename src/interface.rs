use crate::{error::ErrorKind, traits::Command};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
use log::trace;

/// The Connection Interface of the IL0373 panel
///
/// The SPI bus isn't owned, it is handed in on every call so the same bus can
/// also reach an external SRAM behind its own chip select. That's also why
/// chip select is driven by hand here instead of going through a `SpiDevice`:
/// plane transfers from SRAM keep both chips selected at once.
pub(crate) struct DisplayInterface<CS, DC, RST> {
    /// Chip select of the panel (low for selected)
    cs: CS,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
}

impl<CS, DC, RST> DisplayInterface<CS, DC, RST>
where
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Creates a new `DisplayInterface` struct
    pub fn new(cs: CS, dc: DC, rst: RST) -> Self {
        DisplayInterface { cs, dc, rst }
    }

    /// Basic function for sending [Commands](Command) without parameters.
    pub(crate) fn cmd<SPI: SpiBus, T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
    ) -> Result<(), ErrorKind> {
        self.cmd_with_data(spi, command, &[])
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    ///
    /// Opcode and parameters share one chip select window, the parameters go
    /// out with the data/command pin switched to data.
    pub(crate) fn cmd_with_data<SPI: SpiBus, T: Command>(
        &mut self,
        spi: &mut SPI,
        command: T,
        data: &[u8],
    ) -> Result<(), ErrorKind> {
        trace!("command {:#04x} with {} data bytes", command.address(), data.len());

        self.command_mode()?;
        self.with_cs(spi, |interface, spi| {
            write(spi, &[command.address()])?;
            if !data.is_empty() {
                spi.flush().map_err(ErrorKind::spi)?;
                interface.data_mode()?;
                write(spi, data)?;
            }
            Ok(())
        })
    }

    /// Low on the data/command pin
    pub(crate) fn command_mode(&mut self) -> Result<(), ErrorKind> {
        self.dc.set_low().map_err(ErrorKind::data_command)
    }

    /// High on the data/command pin
    pub(crate) fn data_mode(&mut self) -> Result<(), ErrorKind> {
        self.dc.set_high().map_err(ErrorKind::data_command)
    }

    /// Pulls chip select low
    pub(crate) fn select(&mut self) -> Result<(), ErrorKind> {
        self.cs.set_low().map_err(ErrorKind::chip_select)
    }

    /// Waits for the bus to drain and releases chip select
    pub(crate) fn deselect<SPI: SpiBus>(&mut self, spi: &mut SPI) -> Result<(), ErrorKind> {
        let flushed = spi.flush().map_err(ErrorKind::spi);
        let released = self.cs.set_high().map_err(ErrorKind::chip_select);
        flushed.and(released)
    }

    // chip select helper, releases the panel even if `f` failed
    fn with_cs<SPI, F>(&mut self, spi: &mut SPI, f: F) -> Result<(), ErrorKind>
    where
        SPI: SpiBus,
        F: FnOnce(&mut Self, &mut SPI) -> Result<(), ErrorKind>,
    {
        self.select()?;
        let result = f(self, spi);
        let released = self.deselect(spi);
        result.and(released)
    }

    /// Resets the device.
    ///
    /// Holds the reset line low for `duration` ms between two `duration` ms
    /// high phases.
    pub(crate) fn reset<DELAY: DelayNs>(
        &mut self,
        delay: &mut DELAY,
        duration: u32,
    ) -> Result<(), ErrorKind> {
        self.rst.set_high().map_err(ErrorKind::reset)?;
        delay.delay_ms(duration);

        self.rst.set_low().map_err(ErrorKind::reset)?;
        delay.delay_ms(duration);

        self.rst.set_high().map_err(ErrorKind::reset)?;
        delay.delay_ms(duration);
        Ok(())
    }

    /// Gives back the pins
    pub(crate) fn release(self) -> (CS, DC, RST) {
        (self.cs, self.dc, self.rst)
    }
}

// spi write helper/abstraction function
fn write<SPI: SpiBus>(spi: &mut SPI, data: &[u8]) -> Result<(), ErrorKind> {
    spi.write(data).map_err(ErrorKind::spi)
}
