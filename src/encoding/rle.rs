use super::uleb128;

/// Bits needed to store levels up to `max_level`
pub fn bit_width(max_level: i16) -> u8 {
    (16 - (max_level.max(0) as u16).leading_zeros()) as u8
}

/// Append levels to `out` as RLE/bit-packed hybrid runs
///
/// Only RLE runs are emitted: each run of equal levels becomes a varint header
/// `run_len << 1` followed by the level in `ceil(bit_width / 8)` little-endian
/// bytes. Nothing is written when `max_level` is zero.
pub fn encode_levels(levels: &[i16], max_level: i16, out: &mut Vec<u8>) {
    let width = bit_width(max_level);
    if width == 0 {
        return;
    }
    let value_bytes = (usize::from(width) + 7) / 8;
    let mut header = [0u8; 10];

    let mut i = 0;
    while i < levels.len() {
        let level = levels[i];
        let run = levels[i..].iter().take_while(|&&l| l == level).count();

        let n = uleb128::encode((run as u64) << 1, &mut header);
        out.extend_from_slice(&header[..n]);
        out.extend_from_slice(&(level as u16).to_le_bytes()[..value_bytes]);
        i += run;
    }
}
