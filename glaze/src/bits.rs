/// MSB-first bit cursor over a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    current: u8,
    mask: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            current: 0,
            mask: 0,
        }
    }

    /// Returns `None` once the underlying bytes are exhausted.
    pub fn read_bit(&mut self) -> Option<u32> {
        if self.mask == 0 {
            self.current = *self.data.get(self.pos)?;
            self.pos += 1;
            self.mask = 0x80;
        }
        let bit = (self.current & self.mask != 0) as u32;
        self.mask >>= 1;
        Some(bit)
    }

    /// Reads `n` bits, most significant first. Running out of input part way
    /// through yields `None` and the bits read so far are lost.
    pub fn read_bits(&mut self, n: u32) -> Option<u32> {
        (0..n).try_fold(0, |acc, _| Some((acc << 1) | self.read_bit()?))
    }

    /// Number of bytes pulled from the input so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}
