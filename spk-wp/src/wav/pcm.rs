//! Integer PCM sample decoding

/// Bit depths the decoder understands; anything else decodes to silence
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

pub fn is_supported_bit_depth(bits_per_sample: u16) -> bool {
    SUPPORTED_BIT_DEPTHS.contains(&bits_per_sample)
}

/// Container width of one sample, `ceil(bits / 8)`: 12-bit samples occupy 2 bytes
pub fn bytes_per_sample(bits_per_sample: u16) -> usize {
    (bits_per_sample as usize).div_ceil(8)
}

/// Magnitude of a full-scale sample, `2^(bits - 1)`
pub fn full_scale(bits_per_sample: u16) -> f64 {
    2f64.powi(bits_per_sample as i32 - 1)
}

/// Decode the signed little-endian sample at the start of `bytes`
///
/// Returns 0 for unsupported depths or when `bytes` is too short.
pub fn decode_sample(bytes: &[u8], bits_per_sample: u16) -> i32 {
    match (bits_per_sample, bytes) {
        (16, [b0, b1, ..]) => i16::from_le_bytes([*b0, *b1]) as i32,
        // High byte carries the sign
        (24, [lo, mid, hi, ..]) => (*lo as i32) | ((*mid as i32) << 8) | ((*hi as i8 as i32) << 16),
        (32, [b0, b1, b2, b3, ..]) => i32::from_le_bytes([*b0, *b1, *b2, *b3]),
        _ => 0,
    }
}

/// `|sample| / 2^(bits - 1)`, not clamped
pub fn normalize(sample: i32, bits_per_sample: u16) -> f64 {
    (sample as f64).abs() / full_scale(bits_per_sample)
}
