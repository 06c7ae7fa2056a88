//! The Comet wire encoding for temperatures.
//!
//! Devices exchange temperatures as `"#" + hex` where the hex digits are the
//! unsigned half-degree code `round(2 * celsius)`. `"#28"` is 0x28 = 40 half
//! degrees = 20.0 °C. Both directions are pure and total over their inputs.

use comet_common::error::CodecError;

const MARKER: char = '#';

/// Decodes a wire payload into degrees Celsius.
pub fn decode_temperature(wire: &str) -> Result<f64, CodecError> {
    let digits = wire
        .strip_prefix(MARKER)
        .ok_or_else(|| CodecError::MissingMarker(wire.to_string()))?;
    // u64 covers everything the encoder can emit.
    let raw = u64::from_str_radix(digits, 16)
        .map_err(|_| CodecError::InvalidHex(wire.to_string()))?;
    Ok(raw as f64 / 2.0)
}

/// Encodes degrees Celsius into a wire payload, lowercase hex.
pub fn encode_temperature(value: f64) -> Result<String, CodecError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CodecError::Unencodable(value));
    }
    let raw = (value * 2.0).trunc() as u64;
    Ok(format!("{MARKER}{raw:x}"))
}
