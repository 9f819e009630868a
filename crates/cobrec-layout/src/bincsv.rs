//! Byte-level splitting of delimited records.
//!
//! Some delimited files use a separator byte with no character
//! equivalent, written in the schema as a hex literal such as `x'6C'`.
//! Those records are split at the byte level, before any character set
//! decoding, so cell boundaries cannot be disturbed by multi-byte or
//! lossy decoding.

use cobrec_encoding::Charset;

use crate::error::SchemaError;
use crate::Result;

/// True when a delimiter string is a hex byte literal (`x'6C'`) rather
/// than literal text.
pub fn is_hex_delimiter(delimiter: &str) -> bool {
    let b = delimiter.as_bytes();
    b.len() > 3 && (b[0] == b'x' || b[0] == b'X') && b[1] == b'\''
}

/// Parses a hex delimiter literal into its bytes.
pub fn parse_hex_delimiter(text: &str) -> Result<Vec<u8>> {
    let invalid = || SchemaError::InvalidHexDelimiter {
        text: text.to_string(),
    };
    if !is_hex_delimiter(text) {
        return Err(invalid());
    }
    let inner = text[2..].strip_suffix('\'').unwrap_or(&text[2..]);
    if inner.is_empty() || inner.len() % 2 != 0 || !inner.is_ascii() {
        return Err(invalid());
    }
    let mut bytes = Vec::with_capacity(inner.len() / 2);
    for pair in inner.as_bytes().chunks(2) {
        let digits = std::str::from_utf8(pair).map_err(|_| invalid())?;
        bytes.push(u8::from_str_radix(digits, 16).map_err(|_| invalid())?);
    }
    Ok(bytes)
}

/// The delimiter as record bytes: hex literals parse directly, anything
/// else is encoded in the record's character set.
pub fn delimiter_to_bytes(delimiter: &str, charset: Charset) -> Result<Vec<u8>> {
    if is_hex_delimiter(delimiter) {
        parse_hex_delimiter(delimiter)
    } else {
        Ok(charset.encode(delimiter)?)
    }
}

/// Splits and rebuilds records around a delimiter byte sequence.
#[derive(Debug, Clone)]
pub struct BinaryCsvTokenizer {
    delimiter: Vec<u8>,
}

impl BinaryCsvTokenizer {
    pub fn new(delimiter: Vec<u8>) -> Self {
        BinaryCsvTokenizer { delimiter }
    }

    pub fn delimiter(&self) -> &[u8] {
        &self.delimiter
    }

    /// Splits `data` into cells. A record always has at least one cell;
    /// a trailing delimiter produces a trailing empty cell.
    pub fn split<'a>(&self, data: &'a [u8]) -> Vec<&'a [u8]> {
        if self.delimiter.is_empty() {
            return vec![data];
        }
        let mut cells = Vec::new();
        let mut start = 0;
        let mut i = 0;
        while i + self.delimiter.len() <= data.len() {
            if data[i..i + self.delimiter.len()] == self.delimiter[..] {
                cells.push(&data[start..i]);
                i += self.delimiter.len();
                start = i;
            } else {
                i += 1;
            }
        }
        cells.push(&data[start..]);
        cells
    }

    pub fn cell_count(&self, data: &[u8]) -> usize {
        self.split(data).len()
    }

    /// The bytes of cell `index`, or `None` past the last delimiter.
    pub fn get<'a>(&self, data: &'a [u8], index: usize) -> Option<&'a [u8]> {
        self.split(data).get(index).copied()
    }

    /// Rebuilds `data` with cell `index` replaced, appending empty cells
    /// as needed to reach the index.
    pub fn set(&self, data: &[u8], index: usize, value: &[u8]) -> Vec<u8> {
        let mut cells: Vec<Vec<u8>> = self.split(data).iter().map(|c| c.to_vec()).collect();
        while cells.len() <= index {
            cells.push(Vec::new());
        }
        cells[index] = value.to_vec();
        let mut out = Vec::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(&self.delimiter);
            }
            out.extend_from_slice(cell);
        }
        out
    }
}
