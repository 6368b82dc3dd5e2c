//! Builds containers from plaintext by running every layer backwards.
#![allow(dead_code)]
use byteorder::{ByteOrder, BE};
use glaze::{
    descramble::{checksum, KeyRing},
    rng::Lcg,
    scramble::permute_chunks,
    Seeds, SEED_CONSTANT,
};

pub fn seeds() -> Seeds {
    Seeds::new(
        [0x5E7A_0001, 0x0BAD_F00D, 0x1337_C0DE],
        [0x0000_ABCD, 0x0F0F_0F0F, 0x7654_3210],
        [0x10, 0x20, 0x08],
        0x3E,
    )
}

/// Bit-packs a code table, count prefix included.
pub fn pack_codes(codes: &[u8]) -> Vec<u8> {
    let mut bits: Vec<u8> = vec![];
    for &code in codes {
        match code {
            0 => bits.extend([0; 8]),
            1 => bits.push(1),
            _ => {
                let k = 7 - code.leading_zeros();
                bits.extend(std::iter::repeat(0).take(k as usize));
                bits.push(1);
                bits.extend((0..k).rev().map(|i| (code >> i) & 1));
            }
        }
    }
    let mut region = (codes.len() as u32).to_be_bytes().to_vec();
    region.extend(
        bits.chunks(8)
            .map(|c| c.iter().enumerate().fold(0u8, |acc, (i, &b)| acc | (b << (7 - i)))),
    );
    region
}

/// Glaze payload from raw streams.
pub fn glaze_payload(size: u32, codes: &[u8], dict: &[u8], lengths: &[u8]) -> Vec<u8> {
    let bitstream = pack_codes(codes);
    let mut data = size.to_be_bytes().to_vec();
    for region in [&bitstream[..], dict, lengths] {
        data.extend((region.len() as u32).to_be_bytes());
        data.extend_from_slice(region);
    }
    data
}

/// Glaze payload storing `plain` as long literal runs followed by single literals.
pub fn literal_payload(plain: &[u8]) -> Vec<u8> {
    let mut codes = vec![];
    let mut lengths = vec![];
    let mut rest = plain.len();
    while rest >= 14 {
        let run = rest.min(255 + 14);
        codes.push(7);
        lengths.push((run - 14) as u8);
        rest -= run;
    }
    codes.extend(std::iter::repeat(1).take(rest));
    glaze_payload(plain.len() as u32, &codes, plain, &lengths)
}

/// Inner layer: the buffer as the outer layer leaves it. Returns the buffer
/// and the offset of its end marker.
pub fn inner_layer(glaze: &[u8], seeds: &Seeds, aux: u32) -> (Vec<u8>, usize) {
    // keep the permuted region made of whole slices
    let marker = glaze.len().next_multiple_of(0x80).max(0x80);
    let size = (marker + 13).next_multiple_of(0x100);

    let mut buf = glaze.to_vec();
    buf.resize(marker, 0);
    let multiplier = aux.wrapping_add(SEED_CONSTANT);
    permute_chunks(&mut buf, marker.min(0x800), &mut Lcg::new(multiplier, seeds.main[2]), 0x80)
        .unwrap();
    let [check0, check1] = checksum(&buf);
    KeyRing::new(seeds).apply(&mut Lcg::new(multiplier, seeds.table[0]), &mut buf);

    buf.push(0xFF);
    buf.resize(size - 12, 0);
    buf.extend(check1.to_be_bytes());
    buf.extend(check0.to_be_bytes());
    buf.extend(aux.to_be_bytes());
    (buf, marker)
}

/// Outer layer applied on top of [`inner_layer`], header included.
pub fn outer_layer(mut buf: Vec<u8>, decompressed_size: u32, seeds: &Seeds) -> Vec<u8> {
    let mut rng = Lcg::new(SEED_CONSTANT, seeds.main[1]);
    for word in buf.chunks_exact_mut(2) {
        let x = rng.next_value();
        let mut w = BE::read_u16(word).wrapping_add(x as u16);
        if x % seeds.fence >= seeds.fence / 2 {
            w ^= x as u16;
        }
        BE::write_u16(word, w);
    }
    let chunk = buf.len().min(0x800);
    let tail = buf.len() - chunk;
    permute_chunks(&mut buf[tail..], chunk, &mut Lcg::new(SEED_CONSTANT, seeds.main[0]), 0x100)
        .unwrap();

    let mut container = vec![0, 0, 0, 2];
    container.extend(decompressed_size.to_be_bytes());
    container.extend([0xC0, 0xFF, 0xEE, 0x00, 0, 0, 0, 0]);
    container.extend(buf);
    container
}

pub fn container(glaze: &[u8], decompressed_size: u32, seeds: &Seeds, aux: u32) -> Vec<u8> {
    let (inner, _) = inner_layer(glaze, seeds, aux);
    outer_layer(inner, decompressed_size, seeds)
}

/// Deterministic filler text.
pub fn text(len: usize) -> Vec<u8> {
    const WORDS: [&str; 6] = ["atelier ", "alchemy ", "synthesis ", "gust ", "ryza ", "sophie "];
    WORDS.iter().cycle().flat_map(|w| w.bytes()).take(len).collect()
}
