use crate::{
    descramble::{descramble_stage1, descramble_stage2},
    error::try_with_capacity,
    unglaze::unglaze,
    Error, Result, Seeds, TYPE_TAG,
};
use byteorder::{ReadBytesExt, BE};
use log::debug;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Size of the fixed container header.
pub const HEADER_SIZE: usize = 16;

/// Extension of scrambled containers.
pub const INPUT_SUFFIX: &str = ".e";

/// Appended to the container name to form the decoded file name.
pub const OUTPUT_SUFFIX: &str = ".xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub type_tag: u32,
    pub decompressed_size: u32,
    pub reserved: [u32; 2],
}

impl Header {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let type_tag = reader.read_u32::<BE>()?;
        let decompressed_size = reader.read_u32::<BE>()?;
        let reserved = [reader.read_u32::<BE>()?, reader.read_u32::<BE>()?];
        if type_tag != TYPE_TAG {
            return Err(Error::InvalidHeader(type_tag));
        }
        Ok(Self {
            type_tag,
            decompressed_size,
            reserved,
        })
    }
}

/// Runs the full pipeline over whole containers.
#[derive(Debug, Clone)]
pub struct Decoder {
    seeds: Seeds,
    max_size: u32,
}

impl Decoder {
    pub fn new(seeds: Seeds) -> Self {
        Self {
            seeds,
            max_size: 0x1000_0000,
        }
    }

    /// Largest decompressed size accepted from a header. Defaults to 256 MiB.
    pub fn max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn seeds(&self) -> &Seeds {
        &self.seeds
    }

    /// Decodes a complete container. Nothing is returned unless every stage
    /// succeeds.
    pub fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.len() < HEADER_SIZE {
            return Err(Error::BufferTooSmall {
                size: input.len(),
                needed: HEADER_SIZE,
            });
        }
        let (mut header_bytes, body) = input.split_at(HEADER_SIZE);
        let header = Header::read(&mut header_bytes)?;
        debug!(
            "container: {:#x} payload bytes, {:#x} bytes decompressed",
            body.len(),
            header.decompressed_size
        );
        if header.decompressed_size > self.max_size {
            return Err(Error::SizeLimit {
                size: header.decompressed_size,
                limit: self.max_size,
            });
        }

        let mut payload = try_with_capacity(body.len())?;
        payload.extend_from_slice(body);
        descramble_stage1(&mut payload, &self.seeds)?;
        descramble_stage2(&mut payload, &self.seeds)?;
        unglaze(&payload, header.decompressed_size)
    }

    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Vec<u8>> {
        let mut input = vec![];
        reader.read_to_end(&mut input)?;
        self.decode(&input)
    }
}

/// Decodes a container with the default limits.
pub fn decode(input: &[u8], seeds: &Seeds) -> Result<Vec<u8>> {
    Decoder::new(*seeds).decode(input)
}

/// Name of the decoded file for a container, `None` when the name does not
/// look like one.
pub fn output_path(input: &Path) -> Option<PathBuf> {
    let name = input.file_name()?.to_str()?;
    if !name.contains(INPUT_SUFFIX) {
        return None;
    }
    Some(input.with_file_name(format!("{name}{OUTPUT_SUFFIX}")))
}
