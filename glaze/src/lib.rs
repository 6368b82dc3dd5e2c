//! Decoder for Gust `.e` containers.
//!
//! A container is a small big-endian header followed by a payload that went
//! through two scrambling layers and a custom LZ scheme ("Glaze"). Decoding
//! runs the layers in reverse: [`descramble::descramble_stage1`],
//! [`descramble::descramble_stage2`], then [`unglaze::unglaze`].
//!
//! ```no_run
//! let seeds = glaze::Seeds::new([1, 2, 3], [4, 5, 6], [7, 8, 9], 10);
//! let input = std::fs::read("file.e").unwrap();
//! let xml = glaze::Decoder::new(seeds).decode(&input).unwrap();
//! ```
pub mod bits;
pub mod code;
pub mod container;
pub mod descramble;
mod error;
mod ext;
pub mod rng;
pub mod scramble;
pub mod unglaze;

pub use {container::*, error::*};

/// Value the type tag at the start of every container must hold.
pub const TYPE_TAG: u32 = 2;

/// Multiplier shared by every keyed transform.
pub const SEED_CONSTANT: u32 = 0x3B9A_73C9;

/// Increment of the linear congruential generator.
pub const SEED_INCREMENT: u32 = 0x2F09;

/// Per-title key material.
///
/// `table` is rotated while the second scrambling layer is undone, but only
/// on a copy owned by that decode call: a `Seeds` value can be reused for any
/// number of files.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Seeds {
    pub main: [u32; 3],
    pub table: [u32; 3],
    pub length: [u32; 3],
    /// Opaque constant gating the conditional xor of the first layer.
    pub fence: u32,
}

impl Seeds {
    pub fn new(main: [u32; 3], table: [u32; 3], length: [u32; 3], fence: u32) -> Self {
        Self {
            main,
            table,
            length,
            fence,
        }
    }
}

/// Sub-regions of the Glaze payload, in the order they are stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display)]
pub enum Region {
    Bitstream,
    Dictionary,
    Lengths,
}

/// Cursors advanced while expanding a Glaze payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display)]
pub enum Stream {
    Code,
    Dictionary,
    Lengths,
    Output,
}
