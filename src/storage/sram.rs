//! Driver for the Microchip 23K256-style serial SRAM used as external framebuffer
//!
//! 16 bit addresses, sequential mode so one chip select window can read or
//! write any number of consecutive bytes.

use embedded_hal::{digital::OutputPin, spi::SpiBus};

use crate::error::ErrorKind;

/// Read data from memory starting at the given address
const READ: u8 = 0x03;
/// Write data to memory starting at the given address
const WRITE: u8 = 0x02;
/// Write the mode register
const WRSR: u8 = 0x01;
/// Leave dual/quad IO mode, ignored by plain SPI parts
const RSTIO: u8 = 0xFF;
/// Mode register value for sequential access
const SEQUENTIAL_MODE: u8 = 0x40;

/// Addressable bytes
pub const CAPACITY: usize = 0x1_0000;

// bytes per bus write while erasing
const ERASE_CHUNK: usize = 32;

/// Serial SRAM behind its own chip select on a shared bus
pub struct Sram<CS> {
    cs: CS,
}

impl<CS> Sram<CS>
where
    CS: OutputPin,
{
    /// Creates the driver, nothing is sent until [`init`](Sram::init)
    pub fn new(cs: CS) -> Self {
        Sram { cs }
    }

    /// Puts the chip into SPI sequential mode
    pub fn init<SPI: SpiBus>(&mut self, spi: &mut SPI) -> Result<(), ErrorKind> {
        self.with_cs(spi, |spi| write(spi, &[RSTIO]))?;
        self.with_cs(spi, |spi| write(spi, &[WRSR, SEQUENTIAL_MODE]))
    }

    /// Reads the byte at `addr`
    pub fn read_byte<SPI: SpiBus>(&mut self, spi: &mut SPI, addr: u16) -> Result<u8, ErrorKind> {
        let mut value = [0];
        self.with_cs(spi, |spi| {
            write(spi, &header(READ, addr))?;
            spi.read(&mut value).map_err(ErrorKind::spi)
        })?;
        Ok(value[0])
    }

    /// Writes `value` to `addr`
    pub fn write_byte<SPI: SpiBus>(
        &mut self,
        spi: &mut SPI,
        addr: u16,
        value: u8,
    ) -> Result<(), ErrorKind> {
        self.with_cs(spi, |spi| {
            write(spi, &header(WRITE, addr))?;
            write(spi, &[value])
        })
    }

    /// Sets `len` bytes starting at `addr` to `value` in one sequential write
    pub fn erase<SPI: SpiBus>(
        &mut self,
        spi: &mut SPI,
        addr: u16,
        len: usize,
        value: u8,
    ) -> Result<(), ErrorKind> {
        let chunk = [value; ERASE_CHUNK];
        self.with_cs(spi, |spi| {
            write(spi, &header(WRITE, addr))?;
            let mut remaining = len;
            while remaining > 0 {
                let n = remaining.min(ERASE_CHUNK);
                write(spi, &chunk[..n])?;
                remaining -= n;
            }
            Ok(())
        })
    }

    /// Starts a sequential read at `addr` and leaves the chip selected
    ///
    /// Every following byte exchanged on the bus returns the next memory
    /// byte until [`end`](Sram::end) is called.
    pub(crate) fn begin_read<SPI: SpiBus>(
        &mut self,
        spi: &mut SPI,
        addr: u16,
    ) -> Result<(), ErrorKind> {
        self.select()?;
        write(spi, &header(READ, addr))
    }

    /// Ends the sequence started with [`begin_read`](Sram::begin_read)
    pub(crate) fn end<SPI: SpiBus>(&mut self, spi: &mut SPI) -> Result<(), ErrorKind> {
        let flushed = spi.flush().map_err(ErrorKind::spi);
        let released = self.cs.set_high().map_err(ErrorKind::memory_select);
        flushed.and(released)
    }

    /// Gives back the chip select
    pub fn release(self) -> CS {
        self.cs
    }

    fn select(&mut self) -> Result<(), ErrorKind> {
        self.cs.set_low().map_err(ErrorKind::memory_select)
    }

    // chip select helper, releases the chip even if `f` failed
    fn with_cs<SPI, F>(&mut self, spi: &mut SPI, f: F) -> Result<(), ErrorKind>
    where
        SPI: SpiBus,
        F: FnOnce(&mut SPI) -> Result<(), ErrorKind>,
    {
        self.select()?;
        let result = f(spi);
        let released = self.end(spi);
        result.and(released)
    }
}

fn header(instruction: u8, addr: u16) -> [u8; 3] {
    let [high, low] = addr.to_be_bytes();
    [instruction, high, low]
}

fn write<SPI: SpiBus>(spi: &mut SPI, data: &[u8]) -> Result<(), ErrorKind> {
    spi.write(data).map_err(ErrorKind::spi)
}
