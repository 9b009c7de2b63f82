//! Bit level access to MSB-first packed SPARTN data

use crate::error::OutOfRange;

fn check_range(buf: &[u8], position: usize, length: usize) -> Result<(), OutOfRange> {
    let available = buf.len() * 8;
    match position.checked_add(length) {
        Some(end) if end <= available => Ok(()),
        _ => Err(OutOfRange {
            position,
            length,
            available,
        }),
    }
}

/// Read `length` bits (at most 64) starting at bit `position`,
/// where bit 0 is the most significant bit of `buf[0]`.
pub fn extract_bits(buf: &[u8], position: usize, length: usize) -> Result<u64, OutOfRange> {
    debug_assert!(length <= 64);
    check_range(buf, position, length)?;

    let mut value = 0u64;
    let mut pos = position;
    let end = position + length;
    while pos < end {
        let byte = buf[pos / 8];
        let bit_in_byte = pos % 8;
        let take = (8 - bit_in_byte).min(end - pos);
        let shift = 8 - bit_in_byte - take;
        let bits = (byte >> shift) & ((1u16 << take) - 1) as u8;
        value = (value << take) | u64::from(bits);
        pos += take;
    }
    Ok(value)
}

/// Read a field of arbitrary width as big-endian bytes, right-aligned
/// so the result reads as the unsigned integer the bits encode.
pub fn extract_wide(buf: &[u8], position: usize, length: usize) -> Result<Vec<u8>, OutOfRange> {
    check_range(buf, position, length)?;

    let mut out = vec![0u8; length.div_ceil(8)];
    let lead = out.len() * 8 - length;
    for i in 0..length {
        let src = position + i;
        if buf[src / 8] & (0x80 >> (src % 8)) != 0 {
            let dst = lead + i;
            out[dst / 8] |= 0x80 >> (dst % 8);
        }
    }
    Ok(out)
}

/// Convert an encoded integer into its physical value
#[inline]
pub fn decode_scaled_float(raw: u64, resolution: f64, range_min: f64) -> f64 {
    raw as f64 * resolution + range_min
}

/// Zero-based positions of the set bits in the `width` least significant
/// bits of `mask`, counted from the most significant of those bits.
pub(crate) fn set_bit_positions(mask: u64, width: usize) -> Vec<u16> {
    (0..width)
        .filter(|i| (mask >> (width - 1 - i)) & 1 == 1)
        .map(|i| i as u16)
        .collect()
}

/// Number of set bits in a wide, big-endian field
pub(crate) fn count_ones_wide(bytes: &[u8]) -> u32 {
    bytes.iter().map(|b| b.count_ones()).sum()
}
