//! Line separator resolution.
//!
//! Schemas describe the record separator with a symbolic name such as
//! `"<crlf>"` rather than raw bytes, and the resolved separator depends on
//! the character set: the open-systems EBCDIC pages encode a newline as
//! the NEL control 0x15, and files written through them use that single
//! byte no matter what the schema asked for.

use crate::charset::Charset;

pub const DEFAULT_EOL: &str = "<default>";
pub const CRLF_EOL: &str = "<crlf>";
pub const CR_EOL: &str = "<cr>";
pub const LF_EOL: &str = "<lf>";

/// The platform line separator.
pub fn system_eol() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}

/// Resolves a symbolic end-of-line name to the separator text. Names
/// outside the known set pass through as literal separators.
pub fn eol_string(eol: &str, charset: Charset) -> String {
    if uses_nel(charset) {
        return "\n".to_string();
    }
    match eol {
        CRLF_EOL => "\r\n".to_string(),
        CR_EOL => "\r".to_string(),
        LF_EOL => "\n".to_string(),
        "" | DEFAULT_EOL => system_eol().to_string(),
        other => other.to_string(),
    }
}

/// Resolves a symbolic end-of-line name to separator bytes in the given
/// character set. `default_sep` wins over an unrecognised name.
pub fn eol_bytes(default_sep: Option<&[u8]>, eol: &str, charset: Charset) -> Vec<u8> {
    if uses_nel(charset) {
        return vec![0x15];
    }
    match eol {
        CRLF_EOL => encode_eol("\r\n", charset),
        CR_EOL => encode_eol("\r", charset),
        LF_EOL => encode_eol("\n", charset),
        "" | DEFAULT_EOL => encode_eol(system_eol(), charset),
        other => match default_sep {
            Some(bytes) => bytes.to_vec(),
            None => encode_eol(other, charset),
        },
    }
}

// NEL charsets collapse every separator to the single newline byte.
fn uses_nel(charset: Charset) -> bool {
    matches!(charset.encode("\n"), Ok(bytes) if bytes == [0x15])
}

fn encode_eol(eol: &str, charset: Charset) -> Vec<u8> {
    charset
        .encode(eol)
        .unwrap_or_else(|_| eol.as_bytes().to_vec())
}
