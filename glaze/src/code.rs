use crate::{bits::BitReader, error::try_with_capacity, Error, Region, Result};
use byteorder::{ByteOrder, BE};
use log::debug;

/// Longest unary prefix; a prefix this long without a terminating `1` codes `0`.
const MAX_PREFIX: u32 = 8;

/// Expands the prefix-coded bitstream region into the flat code table.
///
/// The region starts with the big-endian entry count. Each entry is either a
/// single `1` bit (code `0x01`) or a `0` followed by a unary length `k` and
/// `k` payload bits (code `1 << k | payload`). Input that ends early yields a
/// short table.
pub fn build_code_table(region: &[u8]) -> Result<Vec<u8>> {
    if region.len() < 4 {
        return Err(Error::RegionTooLarge(Region::Bitstream));
    }
    let declared = BE::read_u32(region) as usize;
    let packed = &region[4..];
    // every entry takes at least one bit
    let len = declared.min(packed.len().saturating_mul(8));
    debug!("code table: {declared:#x} entries declared, {:#x} packed bytes", packed.len());

    let mut table = try_with_capacity(len)?;
    let mut bits = BitReader::new(packed);
    while table.len() < len {
        match next_code(&mut bits) {
            Some(code) => table.push(code),
            None => break,
        }
    }
    Ok(table)
}

fn next_code(bits: &mut BitReader) -> Option<u8> {
    if bits.read_bit()? == 1 {
        return Some(0x01);
    }
    let mut code_len = 0;
    loop {
        code_len += 1;
        if code_len >= MAX_PREFIX {
            return Some(0);
        }
        if bits.read_bit()? == 1 {
            break;
        }
    }
    let payload = bits.read_bits(code_len)?;
    Some(((1 << code_len) | payload) as u8)
}
