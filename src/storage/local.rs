use bit_field::BitField;
use embedded_hal::spi::SpiBus;

use crate::error::ErrorKind;
use crate::geometry::Plane;
use crate::traits::PixelStore;

/// Both planes kept in local memory
///
/// `N` is the byte length of one plane, use [`buffer_len`](crate::buffer_len)
/// to compute it from the panel size.
pub struct LocalStore<const N: usize> {
    planes: [[u8; N]; 2],
    stream: Option<Cursor>,
}

#[derive(Clone, Copy)]
struct Cursor {
    plane: Plane,
    next: usize,
}

impl<const N: usize> Default for LocalStore<N> {
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    fn default() -> Self {
        LocalStore {
            planes: [[0u8; N]; 2],
            stream: None,
        }
    }
}

impl<const N: usize> LocalStore<N> {
    /// Raw bytes of a plane
    pub fn plane(&self, plane: Plane) -> &[u8] {
        &self.planes[plane.index()]
    }

    fn byte_mut(&mut self, plane: Plane, offset: usize) -> &mut u8 {
        &mut self.planes[plane.index()][offset]
    }
}

impl<SPI, const N: usize> PixelStore<SPI> for LocalStore<N>
where
    SPI: SpiBus,
{
    fn plane_len(&self) -> usize {
        N
    }

    fn read_bit(
        &mut self,
        _spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
    ) -> Result<bool, ErrorKind> {
        Ok(self.planes[plane.index()][offset].get_bit(bit as usize))
    }

    fn write_bit(
        &mut self,
        _spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
        value: bool,
    ) -> Result<(), ErrorKind> {
        self.byte_mut(plane, offset).set_bit(bit as usize, value);
        Ok(())
    }

    fn toggle_bit(
        &mut self,
        _spi: &mut SPI,
        plane: Plane,
        offset: usize,
        bit: u8,
    ) -> Result<(), ErrorKind> {
        *self.byte_mut(plane, offset) ^= 1 << bit;
        Ok(())
    }

    fn fill(&mut self, _spi: &mut SPI, plane: Plane, value: u8) -> Result<(), ErrorKind> {
        self.planes[plane.index()].fill(value);
        Ok(())
    }

    fn begin_stream(&mut self, _spi: &mut SPI, plane: Plane) -> Result<(), ErrorKind> {
        self.stream = Some(Cursor { plane, next: 0 });
        Ok(())
    }

    fn shift(&mut self, spi: &mut SPI, outgoing: u8) -> Result<u8, ErrorKind> {
        spi.write(&[outgoing]).map_err(ErrorKind::spi)?;

        let Some(cursor) = self.stream.as_mut() else {
            return Ok(0);
        };
        let byte = self.planes[cursor.plane.index()]
            .get(cursor.next)
            .copied()
            .unwrap_or(0);
        cursor.next += 1;
        Ok(byte)
    }

    fn end_stream(&mut self, _spi: &mut SPI) -> Result<(), ErrorKind> {
        self.stream = None;
        Ok(())
    }
}
