use crate::SEED_INCREMENT;

/// 32-bit linear congruential generator driving every keyed transform.
///
/// Only the upper half of each output carries usable entropy; see
/// [`Lcg::next_value`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lcg {
    multiplier: u32,
    accumulator: u32,
}

impl Lcg {
    pub fn new(multiplier: u32, accumulator: u32) -> Self {
        Self {
            multiplier,
            accumulator,
        }
    }

    /// Advances the generator and returns the new accumulator.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        self.accumulator = self
            .multiplier
            .wrapping_mul(self.accumulator)
            .wrapping_add(SEED_INCREMENT);
        self.accumulator
    }

    /// Advances the generator and returns bits 16..31 of the new accumulator.
    pub fn next_value(&mut self) -> u32 {
        (self.next() >> 16) & 0x7FFF
    }

    /// Replaces the accumulator, keeping the multiplier.
    pub fn reseed(&mut self, accumulator: u32) {
        self.accumulator = accumulator;
    }

    pub fn accumulator(&self) -> u32 {
        self.accumulator
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }
}
