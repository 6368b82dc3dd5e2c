use crate::{Region, Stream};

#[derive(thiserror::Error)]
pub enum Error {
    // std errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // crate errors
    #[error("found type tag {0:#x} instead of {:#x}", super::TYPE_TAG)]
    InvalidHeader(u32),

    #[error("buffer of {size:#x} bytes is too small, need {needed:#x}")]
    BufferTooSmall { size: usize, needed: usize },

    #[error("end marker of the second scrambling layer was not found")]
    MissingEndMarker,

    #[error("checksum mismatch: expected {expected:08x?}, computed {computed:08x?}")]
    ChecksumMismatch { expected: [u32; 2], computed: [u32; 2] },

    #[error("glaze payload declares {declared:#x} bytes but container expects {expected:#x}")]
    SizeMismatch { declared: u32, expected: u32 },

    #[error("{0} region is larger than the remaining input")]
    RegionTooLarge(Region),

    #[error("{0} stream overflowed during decompression")]
    DecodeOverflow(Stream),

    #[error("failed to allocate {0:#x} bytes")]
    AllocationFailure(usize),

    #[error("unknown glaze opcode {0:#04x}")]
    InvalidOpcode(u8),

    #[error("invalid seeds: {0}")]
    InvalidSeeds(&'static str),

    #[error("declared size {size:#x} exceeds the limit of {limit:#x}")]
    SizeLimit { size: u32, limit: u32 },
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

/// Reserves `len` elements up front without aborting on allocation failure.
pub(crate) fn try_with_capacity<T>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure(len.saturating_mul(std::mem::size_of::<T>())))?;
    Ok(buf)
}
