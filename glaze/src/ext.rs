use crate::{Error, Region, Result};
use byteorder::{ReadBytesExt, BE};
use std::io::Cursor;

/// Borrowing reads over an in-memory payload.
pub(crate) trait ReadExt<'a> {
    fn read_len(&mut self, len: usize) -> Option<&'a [u8]>;
    fn read_region(&mut self, region: Region) -> Result<&'a [u8]>;
}

impl<'a> ReadExt<'a> for Cursor<&'a [u8]> {
    fn read_len(&mut self, len: usize) -> Option<&'a [u8]> {
        let data: &'a [u8] = *self.get_ref();
        let start = usize::try_from(self.position()).ok()?;
        let end = start.checked_add(len)?;
        let slice = data.get(start..end)?;
        self.set_position(end as u64);
        Some(slice)
    }

    /// Reads a big-endian 32-bit length followed by that many bytes.
    fn read_region(&mut self, region: Region) -> Result<&'a [u8]> {
        let len = self
            .read_u32::<BE>()
            .map_err(|_| Error::RegionTooLarge(region))?;
        self.read_len(len as usize)
            .ok_or(Error::RegionTooLarge(region))
    }
}
