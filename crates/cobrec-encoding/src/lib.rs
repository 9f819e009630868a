//! Character set and numeric storage conversions for mainframe record
//! data.
//!
//! # Features
//!
//! - EBCDIC code pages (CP037, CP1047) with compile-time reverse tables
//! - Lenient character set resolution with a Latin-1 default
//! - Zoned decimal overpunch sign handling
//! - Implied-decimal-point normalisation backed by `rust_decimal`
//! - Big-endian twos-complement field storage
//! - Line separator resolution, including the EBCDIC NEL rule
//!
//! # Example
//!
//! ```
//! use cobrec_encoding::{add_decimal_point, from_zoned, Charset};
//!
//! let charset = Charset::resolve("cp037");
//! let text = charset.decode(&[0xF1, 0xF0, 0xF5, 0xD0]);
//! assert_eq!(add_decimal_point(&from_zoned(&text), 2), "-10.50");
//! ```

pub mod charset;
pub mod eol;
pub mod error;
pub mod numeric;
pub mod zoned;

pub use charset::{Charset, CodePage, CP037, CP1047};
pub use eol::{eol_bytes, eol_string, system_eol};
pub use error::EncodingError;
pub use numeric::{add_decimal_point, canonical_number, decode_be_int, encode_be_int, int_fits};
pub use zoned::{from_zoned, to_zoned};

/// Convenience alias for encoding results.
pub type Result<T> = std::result::Result<T, EncodingError>;
