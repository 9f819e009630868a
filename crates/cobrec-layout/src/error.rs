//! Error types for layout construction and field access.

use cobrec_encoding::EncodingError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while building a layout or while getting and setting
/// field values through one.
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("only one field delimiter may be used in a layout; found '{first}' and '{second}'")]
    #[diagnostic(
        code(schema::delimiter_conflict),
        help("All delimited records in a layout must share a single delimiter")
    )]
    DelimiterConflict { first: String, second: String },

    #[error("Layout {name} does not accept appended records")]
    #[diagnostic(
        code(schema::append_not_allowed),
        help("Only layouts built record-by-record, such as name-first-line files, may grow after construction")
    )]
    AppendNotAllowed { name: String },

    #[error("No record at index {index}")]
    #[diagnostic(code(schema::record_not_found))]
    RecordNotFound { index: usize },

    #[error("No field found matching {name}")]
    #[diagnostic(code(schema::field_not_found))]
    FieldNotFound { name: String },

    #[error("Found {count} fields named {name}; should be only one")]
    #[diagnostic(
        code(schema::ambiguous_field),
        help("Qualify the field with its record name to pick one")
    )]
    AmbiguousField { name: String, count: usize },

    #[error("Value: {value} is too large to fit field")]
    #[diagnostic(
        code(schema::value_too_large),
        help("Widen the field or reduce the value")
    )]
    ValueTooLarge { value: String },

    #[error("Invalid hex delimiter: {text}")]
    #[diagnostic(
        code(schema::invalid_hex_delimiter),
        help("Binary delimiters use the form x'6C', with two hex digits per byte")
    )]
    InvalidHexDelimiter { text: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Encoding(#[from] EncodingError),
}
