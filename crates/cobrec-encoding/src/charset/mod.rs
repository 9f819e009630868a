//! Character set resolution and string conversion.
//!
//! Record data arrives as raw bytes tagged with a character set name from
//! the schema. Names are resolved leniently: anything unrecognised falls
//! back to [`Charset::Latin1`], which treats every byte as the Unicode
//! code point of the same value. Decoding is therefore total; encoding can
//! fail when a character has no representation in the target set.

mod tables;

pub use tables::{CodePage, CP037, CP1047};

use crate::error::EncodingError;
use crate::Result;

/// A resolved character set.
///
/// `Latin1` doubles as the default single-byte set: ASCII and the various
/// ISO-8859-1/Windows-1252 spellings all resolve to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Latin1,
    Utf8,
    Utf16Be,
    Utf16Le,
    Ebcdic(&'static CodePage),
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Latin1
    }
}

impl Charset {
    /// Resolves a character set name.
    ///
    /// Matching ignores case and the usual punctuation, so `"cp037"`,
    /// `"IBM-037"` and `"ebcdic_037"` all name the same code page. Unknown
    /// or empty names resolve to the default rather than failing, which
    /// mirrors how record schemas are treated in practice: a bad font name
    /// in a copybook still has to yield a usable layout.
    pub fn resolve(name: &str) -> Charset {
        let mut key = String::with_capacity(name.len());
        for ch in name.chars() {
            if !matches!(ch, '-' | '_' | ' ') {
                key.extend(ch.to_uppercase());
            }
        }
        match key.as_str() {
            "UTF8" => Charset::Utf8,
            "UTF16" | "UTF16BE" => Charset::Utf16Be,
            "UTF16LE" => Charset::Utf16Le,
            "CP037" | "IBM037" | "EBCDIC037" | "CP37" => Charset::Ebcdic(&CP037),
            "CP1047" | "IBM1047" | "EBCDIC1047" => Charset::Ebcdic(&CP1047),
            _ => Charset::Latin1,
        }
    }

    /// The canonical name of this character set.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Latin1 => "ISO-8859-1",
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Ebcdic(cp) => cp.name,
        }
    }

    /// True when one character may occupy more than one byte.
    pub fn is_multi_byte(&self) -> bool {
        matches!(self, Charset::Utf8 | Charset::Utf16Be | Charset::Utf16Le)
    }

    pub fn is_ebcdic(&self) -> bool {
        matches!(self, Charset::Ebcdic(_))
    }

    /// Decodes raw record bytes to text. Never fails; malformed multi-byte
    /// sequences decode to the Unicode replacement character.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Charset::Ebcdic(cp) => bytes.iter().map(|&b| char::from(cp.decode_byte(b))).collect(),
        }
    }

    /// Encodes text to raw record bytes in this character set.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for ch in text.chars() {
                    let b = latin1_byte(ch, self.name())?;
                    out.push(b);
                }
                Ok(out)
            }
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Utf16Be => Ok(text
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect()),
            Charset::Utf16Le => Ok(text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect()),
            Charset::Ebcdic(cp) => {
                let mut out = Vec::with_capacity(text.len());
                for ch in text.chars() {
                    let b = latin1_byte(ch, cp.name)?;
                    out.push(cp.encode_byte(b));
                }
                Ok(out)
            }
        }
    }
}

fn latin1_byte(ch: char, charset: &'static str) -> Result<u8> {
    let code = ch as u32;
    if code > 0xFF {
        return Err(EncodingError::unmappable(ch, charset));
    }
    Ok(code as u8)
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect();
    let mut text = String::from_utf16_lossy(&units);
    if bytes.len() % 2 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}
