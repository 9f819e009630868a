//! Field storage types and their codecs.
//!
//! Every field names one [`FieldType`] variant, and the variant carries
//! the codec: [`FieldType::decode`] turns the field's raw bytes into
//! text, [`FieldType::encode`] writes text back into a fixed-width
//! record, and [`FieldType::format_for_record`] produces the cell text
//! used when the field lives in a delimited line instead.
//!
//! Decoding is deliberately total. Legacy files are full of short
//! records and blank numeric fields, and reading one of those yields an
//! empty string rather than an error. Writing validates: numeric input
//! must parse, fit the declared scale and fit the field width.

use cobrec_encoding::{
    add_decimal_point, canonical_number, decode_be_int, encode_be_int, from_zoned, int_fits,
    to_zoned, Charset,
};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::field::Field;
use crate::Result;

/// Where the separate sign character sits relative to the digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignPosition {
    Leading,
    Trailing,
}

/// The storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Fixed-width text, space padded on the right.
    FixedChar,
    /// Digits with the sign overpunched on the final one.
    Zoned,
    /// Digits with an explicit sign character at one end.
    SignSeparate(SignPosition),
    /// Big-endian twos-complement binary.
    BinaryComp,
    /// Free text in a delimited line, stored exactly as given.
    CsvString,
}

impl FieldType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Zoned | FieldType::SignSeparate(_) | FieldType::BinaryComp
        )
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, FieldType::BinaryComp)
    }

    /// Reads the field's window of `data` as text.
    pub fn decode(&self, data: &[u8], field: &Field) -> String {
        let charset = Charset::resolve(field.font_name());
        let window = field.window(data);
        match self {
            FieldType::FixedChar => charset.decode(window).trim_end_matches(' ').to_string(),
            FieldType::CsvString => charset.decode(window),
            FieldType::Zoned => {
                add_decimal_point(&from_zoned(&charset.decode(window)), field.scale())
            }
            FieldType::SignSeparate(pos) => add_decimal_point(
                &strip_separate_sign(&charset.decode(window), *pos),
                field.scale(),
            ),
            FieldType::BinaryComp => {
                if window.is_empty() {
                    String::new()
                } else {
                    add_decimal_point(&decode_be_int(window).to_string(), field.scale())
                }
            }
        }
    }

    /// Writes `value` into the field's window of `record`, growing the
    /// record if it is too short to reach the field.
    pub fn encode(&self, record: &mut Vec<u8>, field: &Field, value: &str) -> Result<()> {
        let charset = Charset::resolve(field.font_name());
        match self {
            FieldType::FixedChar | FieldType::CsvString => {
                let bytes = charset.encode(value)?;
                let space = space_pattern(charset);
                let slot = window_mut(record, field, &space);
                let n = slot.len().min(bytes.len());
                slot[..n].copy_from_slice(&bytes[..n]);
                fill_pattern(&mut slot[n..], &space);
                Ok(())
            }
            FieldType::Zoned => {
                let digits = canonical_number(value, field.scale())?;
                let bytes = charset.encode(&to_zoned(&digits))?;
                let zero = zero_pattern(charset);
                let space = space_pattern(charset);
                let slot = window_mut(record, field, &space);
                if bytes.len() > slot.len() {
                    return Err(SchemaError::ValueTooLarge { value: digits });
                }
                right_justify(slot, &bytes, &zero);
                Ok(())
            }
            FieldType::SignSeparate(pos) => {
                let text = sign_separate_text(field, value, *pos, true)?;
                let bytes = charset.encode(&text)?;
                let zero = zero_pattern(charset);
                let space = space_pattern(charset);
                let slot = window_mut(record, field, &space);
                if bytes.len() > slot.len() {
                    return Err(SchemaError::ValueTooLarge { value: text });
                }
                right_justify(slot, &bytes, &zero);
                Ok(())
            }
            FieldType::BinaryComp => {
                let digits = canonical_number(value, field.scale())?;
                let int: i64 = if digits.is_empty() {
                    0
                } else {
                    digits
                        .parse()
                        .map_err(|_| SchemaError::ValueTooLarge { value: digits.clone() })?
                };
                let slot = window_mut(record, field, &[0]);
                if !int_fits(int, slot.len()) {
                    return Err(SchemaError::ValueTooLarge { value: digits });
                }
                encode_be_int(int, slot);
                Ok(())
            }
        }
    }

    /// Produces the cell text written when this field sits in a
    /// delimited line. Text passes through; numeric values are validated
    /// and sign-separate values take their full padded form.
    pub fn format_for_record(&self, field: &Field, value: &str) -> Result<String> {
        match self {
            FieldType::FixedChar | FieldType::CsvString => Ok(value.to_string()),
            FieldType::Zoned | FieldType::BinaryComp => {
                canonical_number(value, field.scale())?;
                Ok(value.trim().to_string())
            }
            FieldType::SignSeparate(pos) => sign_separate_text(field, value, *pos, false),
        }
    }
}

fn strip_separate_sign(text: &str, position: SignPosition) -> String {
    if text.is_empty() || text == "-" {
        return String::new();
    }
    let trimmed = text.trim();
    match position {
        SignPosition::Leading => trimmed.strip_prefix('+').unwrap_or(trimmed).to_string(),
        SignPosition::Trailing => {
            if let Some(stripped) = trimmed.strip_suffix('-') {
                format!("-{stripped}")
            } else if let Some(stripped) = trimmed.strip_suffix('+') {
                stripped.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

fn sign_separate_text(
    field: &Field,
    value: &str,
    position: SignPosition,
    check_size: bool,
) -> Result<String> {
    let digits = canonical_number(value, field.scale())?;
    let width = field.length().saturating_sub(1);
    if digits.is_empty() {
        let zeros = "0".repeat(width);
        return Ok(match position {
            SignPosition::Leading => format!("+{zeros}"),
            SignPosition::Trailing => format!("{zeros}+"),
        });
    }
    let negative = digits.starts_with('-');
    let unsigned = digits.trim_start_matches('-');
    if check_size && unsigned.len() >= field.length() {
        return Err(SchemaError::ValueTooLarge {
            value: unsigned.to_string(),
        });
    }
    let sign = if negative { '-' } else { '+' };
    let padded = format!("{unsigned:0>width$}");
    Ok(match position {
        SignPosition::Leading => format!("{sign}{padded}"),
        SignPosition::Trailing => format!("{padded}{sign}"),
    })
}

// The window slice for writing, growing the record with pad bytes when
// the field lies beyond its current end.
fn window_mut<'a>(record: &'a mut Vec<u8>, field: &Field, pad: &[u8]) -> &'a mut [u8] {
    let needed = field.end();
    while record.len() < needed {
        record.push(pad[record.len() % pad.len()]);
    }
    let start = field.position().saturating_sub(1).min(needed);
    &mut record[start..needed]
}

fn right_justify(slot: &mut [u8], bytes: &[u8], pattern: &[u8]) {
    let split = slot.len() - bytes.len();
    fill_pattern(&mut slot[..split], pattern);
    slot[split..].copy_from_slice(bytes);
}

fn fill_pattern(slot: &mut [u8], pattern: &[u8]) {
    if pattern.is_empty() {
        return;
    }
    for (i, b) in slot.iter_mut().enumerate() {
        *b = pattern[i % pattern.len()];
    }
}

fn space_pattern(charset: Charset) -> Vec<u8> {
    charset.encode(" ").unwrap_or_else(|_| vec![b' '])
}

fn zero_pattern(charset: Charset) -> Vec<u8> {
    charset.encode("0").unwrap_or_else(|_| vec![b'0'])
}
