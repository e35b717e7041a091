//! Conversions from raw float pixels (as reported by most UI toolkits) to the integer pixels the
//! engine works in.
//!
//! Negative and NaN inputs clamp to zero and oversized values saturate. Fractions are truncated.

/// Converts a raw scroll offset to engine pixels.
pub fn offset_from_f64(px: f64) -> u64 {
    // `!(px > 0.0)` also catches NaN.
    if !(px > 0.0) {
        if px != 0.0 {
            vwarn!(px, "clamping invalid scroll offset to 0");
        }
        return 0;
    }
    if px >= u64::MAX as f64 {
        return u64::MAX;
    }
    px as u64
}

/// Converts a raw item/viewport size to engine pixels.
pub fn size_from_f64(px: f64) -> u32 {
    if !(px > 0.0) {
        if px != 0.0 {
            vwarn!(px, "clamping invalid size to 0");
        }
        return 0;
    }
    if px >= u32::MAX as f64 {
        return u32::MAX;
    }
    px as u32
}
