//! Schema definitions for fixed-width and delimited record files.
//!
//! A [`Layout`] describes one file: its records, their fields, the
//! character set and the separators. Everything else follows from the
//! schema: fields decode and encode through their [`FieldType`], record
//! definitions are picked per record through [`RecordSelection`] rules,
//! and delimited lines are split with the quote-aware [`CsvTokenizer`]
//! or the byte-level [`BinaryCsvTokenizer`].
//!
//! # Features
//!
//! - Layouts validated and indexed once at build time
//! - Field codecs for text, zoned decimal, separate-sign and binary storage
//! - Record selection rules with numeric and text comparison
//! - Quote-aware splitting of delimited lines
//! - Byte-level splitting for hex delimiters such as `x'6C'`
//! - Case-insensitive field lookup, plain or `RECORD.FIELD` qualified
//!
//! # Example
//!
//! ```
//! use cobrec_layout::{Field, FieldType, Layout, Record, RecordKind};
//!
//! let layout = Layout::builder("SALES")
//!     .with_record(Record::new(
//!         "DETAIL",
//!         RecordKind::FixedLength,
//!         vec![
//!             Field::new("ITEM", FieldType::FixedChar, 1, 8),
//!             Field::new("PRICE", FieldType::Zoned, 9, 6).with_scale(2),
//!         ],
//!     ))
//!     .build()?;
//!
//! let field = layout.field_by_name("price").unwrap();
//! assert_eq!(layout.get_field_value(b"WIDGET  00105{", field)?, "0010.50");
//! # Ok::<(), cobrec_layout::SchemaError>(())
//! ```

pub mod bincsv;
pub mod csv;
pub mod error;
pub mod field;
pub mod layout;
pub mod lookup;
pub mod record;
pub mod selection;
pub mod types;

pub use bincsv::{delimiter_to_bytes, is_hex_delimiter, parse_hex_delimiter, BinaryCsvTokenizer};
pub use csv::{CsvDefinition, CsvTokenizer};
pub use error::SchemaError;
pub use field::Field;
pub use layout::{FileStructure, Layout, LayoutBuilder, LayoutKind};
pub use lookup::{FieldPosition, LookupIndex};
pub use record::{convert_field_delim, Record, RecordKind};
pub use selection::{RecordSelection, SelectionOperator};
pub use types::{FieldType, SignPosition};

/// Convenience alias for schema results.
pub type Result<T> = std::result::Result<T, SchemaError>;
