//! Error types for record framing.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while reading or writing variable-length records.
///
/// Framing errors are fatal for the stream that produced them: once a
/// descriptor word is malformed there is no way to find the next record
/// boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum FramerError {
    #[error("Invalid record descriptor word at record {record_number}")]
    #[diagnostic(
        code(framer::invalid_descriptor_word),
        help("Bytes 2 and 3 of a record descriptor word must be zero")
    )]
    InvalidDescriptorWord { record_number: u64 },

    #[error("Record {record_number} is missing its end-of-line length")]
    #[diagnostic(
        code(framer::missing_trailer),
        help("Every record ends with a copy of its 4-byte descriptor word")
    )]
    MissingTrailer { record_number: u64 },

    #[error("Record length {actual} exceeds maximum {max}")]
    #[diagnostic(code(framer::record_too_long))]
    RecordTooLong { actual: usize, max: usize },

    #[error("Unexpected end of file at record {record_number}")]
    #[diagnostic(code(framer::unexpected_eof))]
    UnexpectedEof { record_number: u64 },

    #[error("I/O error: {0}")]
    #[diagnostic(code(framer::io))]
    Io(#[from] std::io::Error),
}
