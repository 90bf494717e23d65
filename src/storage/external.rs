use bit_field::BitField;
use embedded_hal::{digital::OutputPin, spi::SpiBus};

use super::sram::{self, Sram};
use crate::error::ErrorKind;
use crate::geometry::Plane;
use crate::traits::PixelStore;

/// Both planes kept in an SPI SRAM
///
/// The primary plane starts at address 0, the secondary plane directly
/// behind it. Single pixel writes cost a read and a write transaction on the
/// bus, clearing a plane is one sequential write.
///
/// Streaming keeps the SRAM selected in sequential read mode while the panel
/// is selected for data: each byte clocked out to the panel clocks in the
/// next plane byte, so no local copy of a plane is ever needed.
pub struct ExternalStore<CS> {
    sram: Sram<CS>,
    plane_len: usize,
}

impl<CS> ExternalStore<CS>
where
    CS: OutputPin,
{
    /// Uses the SRAM selected by `cs` for two planes of `plane_len` bytes
    ///
    /// Fails if both planes don't fit into the 16 bit address space.
    pub fn new(cs: CS, plane_len: usize) -> Result<Self, ErrorKind> {
        if plane_len * 2 > sram::CAPACITY {
            return Err(ErrorKind::BufferSize {
                expected: plane_len * 2,
                actual: sram::CAPACITY,
            });
        }
        Ok(ExternalStore {
            sram: Sram::new(cs),
            plane_len,
        })
    }

    /// Gives back the SRAM chip select
    pub fn release(self) -> CS {
        self.sram.release()
    }

    fn address(&self, plane: Plane, offset: usize) -> u16 {
        (plane.index() * self.plane_len + offset) as u16
    }

    fn modify<SPI, F>(
        &mut self,
        spi: &mut SPI,
        plane: Plane,
        offset: usize,
        f: F,
    ) -> Result<(), ErrorKind>
    where
        SPI: SpiBus,
        F: FnOnce(&mut u8),
    {
        let addr = self.address(plane, offset);
        let mut byte = self.sram.read_byte(spi, addr)?;
        f(&mut byte);
        self.sram.write_byte(spi, addr, byte)
    }
}

impl<SPI, CS> PixelStore<SPI> for ExternalStore<CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn plane_len(&self) -> usize {
        self.plane_len
    }

    fn init(&mut self, spi: &mut SPI) -> Result<(), ErrorKind> {
        self.sram.init(spi)
    }

    fn read_bit(
        &mut self,
        spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
    ) -> Result<bool, ErrorKind> {
        let addr = self.address(plane, offset);
        Ok(self.sram.read_byte(spi, addr)?.get_bit(bit as usize))
    }

    fn write_bit(
        &mut self,
        spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
        value: bool,
    ) -> Result<(), ErrorKind> {
        self.modify(spi, plane, offset, |byte| {
            byte.set_bit(bit as usize, value);
        })
    }

    fn toggle_bit(
        &mut self,
        spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
    ) -> Result<(), ErrorKind> {
        self.modify(spi, plane, offset, |byte| *byte ^= 1 << bit)
    }

    fn fill(&mut self, spi: &mut SPI, plane: Plane, value: u8) -> Result<(), ErrorKind> {
        let addr = self.address(plane, 0);
        self.sram.erase(spi, addr, self.plane_len, value)
    }

    fn begin_stream(&mut self, spi: &mut SPI, plane: Plane) -> Result<(), ErrorKind> {
        let addr = self.address(plane, 0);
        self.sram.begin_read(spi, addr)
    }

    fn shift(&mut self, spi: &mut SPI, outgoing: u8) -> Result<u8, ErrorKind> {
        let mut word = [outgoing];
        spi.transfer_in_place(&mut word).map_err(ErrorKind::spi)?;
        Ok(word[0])
    }

    fn end_stream(&mut self, spi: &mut SPI) -> Result<(), ErrorKind> {
        self.sram.end(spi)
    }
}
