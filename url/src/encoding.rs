//! UTF transcoders (§4.9). Inputs that arrive as UTF-16 or UTF-32 code
//! units are converted to UTF-8 before the parser ever sees them; ill-formed
//! input (unpaired surrogates, overlong UTF-8, out-of-range scalars) is
//! rejected rather than replaced.

use alloc::string::String;
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeError {
    IllegalByteSequence,
    Overflow,
}

/// Decode UTF-16 code units, rejecting unpaired surrogates.
pub fn utf16_to_string(units: &[u16]) -> Result<String, TranscodeError> {
    let mut out = String::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        match unit {
            0xD800..=0xDBFF => {
                let low = *units.get(i + 1).ok_or(TranscodeError::IllegalByteSequence)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(TranscodeError::IllegalByteSequence);
                }
                let c = 0x10000
                    + ((unit as u32 - 0xD800) << 10)
                    + (low as u32 - 0xDC00);
                out.push(char::from_u32(c).ok_or(TranscodeError::IllegalByteSequence)?);
                i += 2;
            }
            0xDC00..=0xDFFF => return Err(TranscodeError::IllegalByteSequence),
            _ => {
                out.push(char::from_u32(unit as u32).ok_or(TranscodeError::IllegalByteSequence)?);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Decode UTF-32 scalar values, rejecting surrogate code points and values
/// beyond U+10FFFF.
pub fn utf32_to_string(units: &[u32]) -> Result<String, TranscodeError> {
    let mut out = String::with_capacity(units.len());
    for &unit in units {
        if unit > 0x10FFFF {
            return Err(TranscodeError::Overflow);
        }
        out.push(char::from_u32(unit).ok_or(TranscodeError::IllegalByteSequence)?);
    }
    Ok(out)
}

/// Validate and pass through a UTF-8 byte buffer, rejecting overlong
/// sequences and truncated multi-byte sequences.
pub fn utf8_to_string(bytes: &[u8]) -> Result<String, TranscodeError> {
    core::str::from_utf8(bytes)
        .map(|s| s.into())
        .map_err(|_| TranscodeError::IllegalByteSequence)
}

/// Encode code points back to UTF-16 code units (used by platform-wide
/// string collaborators; the parser itself never needs this direction).
pub fn string_to_utf16(input: &str) -> Vec<u16> {
    input.encode_utf16().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_surrogate_pair() {
        // U+1F310 GLOBE WITH MERIDIANS
        let units = [0xD83C, 0xDF10];
        assert_eq!(utf16_to_string(&units).unwrap(), "\u{1F310}");
    }

    #[test]
    fn rejects_unpaired_surrogate() {
        assert!(utf16_to_string(&[0xD800]).is_err());
        assert!(utf16_to_string(&[0xDC00]).is_err());
    }

    #[test]
    fn utf32_round_trip() {
        let s = "héllo\u{1F310}";
        let units: Vec<u32> = s.chars().map(|c| c as u32).collect();
        assert_eq!(utf32_to_string(&units).unwrap(), s);
    }

    #[test]
    fn rejects_out_of_range_scalar() {
        assert_eq!(utf32_to_string(&[0x110000]), Err(TranscodeError::Overflow));
    }
}
