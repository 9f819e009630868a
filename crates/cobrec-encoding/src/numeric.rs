//! Numeric text normalisation and big-endian integer storage.
//!
//! Mainframe numeric fields store a scaled integer: the decimal point is
//! implied by the field definition rather than present in the data.
//! [`canonical_number`] turns user input like `"12.3"` into the scaled
//! digit string that gets written, and [`add_decimal_point`] performs the
//! reverse insertion when reading.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::EncodingError;
use crate::Result;

/// Validates a numeric value and rescales it to an implied-decimal digit
/// string, so `"12.3"` at scale 2 becomes `"1230"` and `"-0.05"` becomes
/// `"-5"`. Empty and sign-only input canonicalises to an empty string.
pub fn canonical_number(value: &str, scale: u32) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "+" || trimmed == "-" {
        return Ok(String::new());
    }
    let parsed = Decimal::from_str(trimmed).map_err(|_| EncodingError::InvalidNumber {
        value: trimmed.to_string(),
    })?;
    let mut rescaled = parsed;
    rescaled.rescale(scale);
    if rescaled != parsed {
        return Err(EncodingError::TooManyDecimalPlaces {
            value: trimmed.to_string(),
            scale,
        });
    }
    Ok(rescaled.mantissa().to_string())
}

/// Inserts an implied decimal point `scale` digits from the right, so
/// `"1050"` at scale 2 becomes `"10.50"`. Empty input stays empty.
pub fn add_decimal_point(num: &str, scale: u32) -> String {
    if num.is_empty() || scale == 0 {
        return num.to_string();
    }
    let scale = scale as usize;
    let (sign, digits) = match num.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", num),
    };
    if !digits.is_ascii() {
        return num.to_string();
    }
    if digits.len() <= scale {
        format!("{sign}0.{digits:0>scale$}")
    } else {
        let split = digits.len() - scale;
        format!("{sign}{}.{}", &digits[..split], &digits[split..])
    }
}

/// Reads a big-endian twos-complement integer of up to eight bytes,
/// sign-extending from the leading bit. An empty slice reads as zero.
pub fn decode_be_int(bytes: &[u8]) -> i64 {
    if bytes.is_empty() {
        return 0;
    }
    let negative = bytes[0] & 0x80 != 0;
    let mut value: i64 = 0;
    for &byte in bytes {
        value = (value << 8) | i64::from(byte);
    }
    if negative && bytes.len() < 8 {
        value |= -1i64 << (bytes.len() * 8);
    }
    value
}

/// Writes `value` big-endian into `target`, keeping the low-order bytes
/// and sign-filling any leading excess.
pub fn encode_be_int(value: i64, target: &mut [u8]) {
    let bytes = value.to_be_bytes();
    let n = target.len().min(bytes.len());
    let split = target.len() - n;
    target[split..].copy_from_slice(&bytes[bytes.len() - n..]);
    let fill = if value < 0 { 0xFF } else { 0x00 };
    for b in &mut target[..split] {
        *b = fill;
    }
}

/// True when `value` is representable as a twos-complement integer of
/// `len` bytes.
pub fn int_fits(value: i64, len: usize) -> bool {
    if len == 0 {
        return false;
    }
    if len >= 8 {
        return true;
    }
    let bits = (len * 8 - 1) as u32;
    let max = (1i64 << bits) - 1;
    let min = -(1i64 << bits);
    (min..=max).contains(&value)
}
