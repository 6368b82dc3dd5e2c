use crate::{error::try_with_capacity, rng::Lcg, Error, Result};

/// Swaps pairs of bits within consecutive `slice_size` byte slices.
///
/// `buffer` starts at the first slice and may extend past `total_size`: a
/// partial trailing slice still draws a full-size order and can address bits
/// beyond `total_size`, which must then exist in `buffer`. The generator state
/// carries over from one slice to the next, so running this twice with
/// identically seeded generators restores the input.
pub fn permute_chunks(
    buffer: &mut [u8],
    total_size: usize,
    rng: &mut Lcg,
    slice_size: usize,
) -> Result<()> {
    let table_size = slice_size
        .checked_mul(8)
        .filter(|&size| size >= 4 && size <= u32::MAX as usize)
        .ok_or(Error::BufferTooSmall {
            size: slice_size,
            needed: 1,
        })?;
    if total_size > buffer.len() {
        return Err(Error::BufferTooSmall {
            size: buffer.len(),
            needed: total_size,
        });
    }

    let mut pool: Vec<u32> = try_with_capacity(table_size)?;
    let mut order: Vec<u32> = try_with_capacity(table_size)?;

    let mut offset = 0;
    while offset < total_size {
        pool.clear();
        pool.extend(0..table_size as u32);
        order.clear();
        for remaining in (1..=table_size).rev() {
            let x = rng.next_value() as usize % remaining;
            // ordered removal, the draw indexes into the compacted pool
            order.push(pool.remove(x));
        }

        let bits = table_size.min((total_size - offset).saturating_mul(8));
        let slice = &mut buffer[offset..];
        for pair in order[..bits].chunks_exact(2) {
            swap_bits(slice, pair[0], pair[1])?;
        }
        offset += slice_size;
    }
    Ok(())
}

fn swap_bits(slice: &mut [u8], a: u32, b: u32) -> Result<()> {
    let (p0, b0) = ((a >> 3) as usize, a & 7);
    let (p1, b1) = ((b >> 3) as usize, b & 7);
    if p0.max(p1) >= slice.len() {
        return Err(Error::BufferTooSmall {
            size: slice.len(),
            needed: p0.max(p1) + 1,
        });
    }
    let v0 = (slice[p0] >> b0) & 1;
    let v1 = (slice[p1] >> b1) & 1;
    slice[p0] = (slice[p0] & !(1 << b0)) | (v1 << b0);
    slice[p1] = (slice[p1] & !(1 << b1)) | (v0 << b1);
    Ok(())
}
