use crate::{rng::Lcg, scramble::permute_chunks, Error, Result, Seeds, SEED_CONSTANT};
use byteorder::{ByteOrder, BE};
use log::{debug, trace};

/// Size of the region covered by the bit permutation of either layer.
const PERMUTED_SIZE: usize = 0x800;
const STAGE1_SLICE: usize = 0x100;
const STAGE2_SLICE: usize = 0x80;
const END_MARKER: u8 = 0xFF;

/// Undoes the outer scrambling layer in place.
///
/// The trailing (up to) 0x800 bytes get their bits unshuffled, then every
/// big-endian 16-bit word of the buffer is unmasked.
pub fn descramble_stage1(buffer: &mut [u8], seeds: &Seeds) -> Result<()> {
    if seeds.fence == 0 {
        return Err(Error::InvalidSeeds("fence must not be zero"));
    }
    if buffer.len() % 2 != 0 {
        return Err(Error::BufferTooSmall {
            size: buffer.len(),
            needed: buffer.len() + 1,
        });
    }

    let chunk_size = buffer.len().min(PERMUTED_SIZE);
    let tail = buffer.len() - chunk_size;
    let mut rng = Lcg::new(SEED_CONSTANT, seeds.main[0]);
    permute_chunks(&mut buffer[tail..], chunk_size, &mut rng, STAGE1_SLICE)?;

    let mut rng = Lcg::new(SEED_CONSTANT, seeds.main[1]);
    for word in buffer.chunks_exact_mut(2) {
        let x = rng.next_value();
        let mut w = BE::read_u16(word);
        if x % seeds.fence >= seeds.fence / 2 {
            w ^= x as u16;
        }
        BE::write_u16(word, w.wrapping_sub(x as u16));
    }
    debug!("stage 1: descrambled {:#x} bytes", buffer.len());
    Ok(())
}

/// Rotating key material of the inner scrambling layer.
///
/// Every `length[index] + fudge` bytes the generator state is parked in
/// `table[index]` and the next slot takes over; `fudge` grows by one each
/// time the ring wraps around.
#[derive(Clone, Debug)]
pub struct KeyRing {
    table: [u32; 3],
    length: [u32; 3],
    index: usize,
    fudge: u32,
    processed: u32,
}

impl KeyRing {
    pub fn new(seeds: &Seeds) -> Self {
        Self {
            table: seeds.table,
            length: seeds.length,
            index: 0,
            fudge: 0,
            processed: 0,
        }
    }

    /// Accumulator the generator starts from.
    pub fn initial(&self) -> u32 {
        self.table[0]
    }

    /// Unmasks `data` in place, switching keys as the byte count dictates.
    pub fn apply(&mut self, rng: &mut Lcg, data: &mut [u8]) {
        for byte in data {
            *byte ^= (rng.next() >> 16) as u8;
            self.processed += 1;
            if self.processed >= self.length[self.index].wrapping_add(self.fudge) {
                self.table[self.index] = rng.accumulator();
                self.index += 1;
                if self.index >= self.table.len() {
                    self.index = 0;
                    self.fudge += 1;
                }
                trace!("key ring: switch to slot {} (fudge {})", self.index, self.fudge);
                rng.reseed(self.table[self.index]);
                self.processed = 0;
            }
        }
    }
}

/// Complement-xor and subtractive folds over big-endian 32-bit words.
pub fn checksum(data: &[u8]) -> [u32; 2] {
    data.chunks_exact(4)
        .map(BE::read_u32)
        .fold([0, 0], |[xor, sub], w| [xor ^ !w, sub.wrapping_sub(w)])
}

/// Undoes the inner scrambling layer in place.
///
/// The buffer ends with three big-endian words: the second checksum, the
/// first checksum and an auxiliary seed. The masked region runs from the
/// start up to the last `0xFF` marker before them. Returns the length
/// covered by the checksum.
pub fn descramble_stage2(buffer: &mut [u8], seeds: &Seeds) -> Result<usize> {
    let size = buffer.len();
    if size % 4 != 0 || size < 16 {
        return Err(Error::BufferTooSmall {
            size,
            needed: size.max(16).next_multiple_of(4),
        });
    }

    let aux = BE::read_u32(&buffer[size - 4..]);
    let expected = [
        BE::read_u32(&buffer[size - 8..]),
        BE::read_u32(&buffer[size - 12..]),
    ];

    let marker = buffer[..size - 12]
        .iter()
        .rposition(|&b| b == END_MARKER)
        .filter(|&pos| pos >= 4)
        .ok_or(Error::MissingEndMarker)?;
    debug!("stage 2: aux seed {aux:#010x}, end marker at {marker:#x}");

    let mut ring = KeyRing::new(seeds);
    let mut rng = Lcg::new(aux.wrapping_add(SEED_CONSTANT), ring.initial());
    ring.apply(&mut rng, &mut buffer[..marker]);

    buffer[marker] = 0;
    let checked = marker & !3;
    let computed = checksum(&buffer[..checked]);
    if computed != expected {
        return Err(Error::ChecksumMismatch { expected, computed });
    }
    debug!("stage 2: checksum {computed:08x?} over {checked:#x} bytes");

    // the multiplier derived from the auxiliary seed stays in effect
    rng.reseed(seeds.main[2]);
    permute_chunks(buffer, checked.min(PERMUTED_SIZE), &mut rng, STAGE2_SLICE)?;
    Ok(checked)
}
