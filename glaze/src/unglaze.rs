//! Glaze ("Gust Lempel-Ziv") decompression.
//!
//! The payload is made of three streams: a prefix-coded table of opcodes and
//! small operands, a dictionary of literal bytes and distance bytes, and a
//! table of lengths for long literal runs:
//!
//! ```text
//! u32 decompressed size
//! u32 bitstream length | bitstream (see code::build_code_table)
//! u32 dictionary length | dictionary
//! u32 lengths length | lengths
//! ```
use crate::{
    code::build_code_table, error::try_with_capacity, ext::ReadExt, Error, Region, Result,
    Stream,
};
use byteorder::{ReadBytesExt, BE};
use log::debug;
use std::io::Cursor;

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display, strum::FromRepr)]
pub enum Opcode {
    /// One dictionary byte.
    Literal = 1,
    /// One byte from `code` bytes back.
    Repeat = 2,
    /// `code` distance and `code` length.
    ShortMatch = 3,
    /// `code` length and dictionary distance.
    NearMatch = 4,
    /// 16-bit distance split across `code` and dictionary, `code` length.
    FarMatch = 5,
    /// `code + 8` dictionary bytes.
    LiteralRun = 6,
    /// `lengths + 14` dictionary bytes.
    LongLiteralRun = 7,
}

struct Source<'a> {
    data: &'a [u8],
    pos: usize,
    stream: Stream,
}

impl<'a> Source<'a> {
    fn new(data: &'a [u8], stream: Stream) -> Self {
        Self {
            data,
            pos: 0,
            stream,
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + len)
            .ok_or(Error::DecodeOverflow(self.stream))?;
        self.pos += len;
        Ok(bytes)
    }

    fn next(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn next_usize(&mut self) -> Result<usize> {
        self.next().map(usize::from)
    }
}

struct Output {
    buf: Vec<u8>,
    limit: usize,
}

impl Output {
    fn new(limit: usize) -> Result<Self> {
        Ok(Self {
            buf: try_with_capacity(limit)?,
            limit,
        })
    }

    fn is_full(&self) -> bool {
        self.buf.len() >= self.limit
    }

    fn reserve(&self, len: usize) -> Result<()> {
        match self.buf.len() + len <= self.limit {
            true => Ok(()),
            false => Err(Error::DecodeOverflow(Stream::Output)),
        }
    }

    fn literal(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Copies `length` bytes starting `distance` bytes back from the current
    /// end, one at a time so that a short distance repeats freshly written bytes.
    fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        if distance == 0 || distance > self.buf.len() {
            return Err(Error::DecodeOverflow(Stream::Output));
        }
        self.reserve(length)?;
        for _ in 0..length {
            let byte = self.buf[self.buf.len() - distance];
            self.buf.push(byte);
        }
        Ok(())
    }
}

/// Decompresses a Glaze payload that must expand to exactly `expected_size`
/// bytes. Bytes after the length table are ignored.
pub fn unglaze(src: &[u8], expected_size: u32) -> Result<Vec<u8>> {
    let mut reader = Cursor::new(src);
    let declared = reader.read_u32::<BE>().map_err(|_| Error::BufferTooSmall {
        size: src.len(),
        needed: 4,
    })?;
    if declared != expected_size {
        return Err(Error::SizeMismatch {
            declared,
            expected: expected_size,
        });
    }

    let bitstream = reader.read_region(Region::Bitstream)?;
    if bitstream.len() <= 4 {
        return Err(Error::RegionTooLarge(Region::Bitstream));
    }
    let table = build_code_table(bitstream)?;
    let dictionary = reader.read_region(Region::Dictionary)?;
    let lengths = reader.read_region(Region::Lengths)?;
    debug!(
        "glaze: {:#x} codes, {:#x} dictionary bytes, {:#x} lengths, {declared:#x} bytes out",
        table.len(),
        dictionary.len(),
        lengths.len()
    );

    // literals come from the dictionary, and every back-reference takes at
    // least two table entries for at most 0x100 bytes
    let reachable = (table.len() / 2)
        .saturating_mul(0x100)
        .saturating_add(dictionary.len());
    if declared as usize > reachable {
        return Err(Error::DecodeOverflow(Stream::Code));
    }

    let mut code = Source::new(&table, Stream::Code);
    let mut dict = Source::new(dictionary, Stream::Dictionary);
    let mut lengths = Source::new(lengths, Stream::Lengths);
    let mut out = Output::new(declared as usize)?;

    while !out.is_full() {
        let byte = code.next()?;
        match Opcode::from_repr(byte).ok_or(Error::InvalidOpcode(byte))? {
            Opcode::Literal => out.literal(dict.take(1)?)?,
            Opcode::Repeat => {
                let d = code.next_usize()?;
                out.copy_match(d, 1)?;
            }
            Opcode::ShortMatch => {
                let d = code.next_usize()?;
                let l = code.next_usize()?;
                out.copy_match(d + l, l + 1)?;
            }
            Opcode::NearMatch => {
                let l = code.next_usize()?;
                let d = dict.next_usize()?;
                out.copy_match(d + l, l + 1)?;
            }
            Opcode::FarMatch => {
                let hi = code.next_usize()?;
                let lo = dict.next_usize()?;
                let l = code.next_usize()?;
                out.copy_match(((hi << 8) | lo) + l, l + 1)?;
            }
            Opcode::LiteralRun => {
                let l = code.next_usize()? + 8;
                out.literal(dict.take(l)?)?;
            }
            Opcode::LongLiteralRun => {
                let l = lengths.next_usize()? + 14;
                out.literal(dict.take(l)?)?;
            }
        }
    }
    Ok(out.buf)
}
