//! Error types for character set and numeric conversions.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while converting between character sets or while
/// normalising numeric text for storage.
#[derive(Debug, Error, Diagnostic)]
pub enum EncodingError {
    #[error("Character '{character}' (U+{code_point:04X}) cannot be encoded in {charset}")]
    #[diagnostic(
        code(encoding::unmappable_character),
        help("Only characters present in the target character set can be written")
    )]
    UnmappableCharacter {
        character: char,
        code_point: u32,
        charset: &'static str,
    },

    #[error("Invalid numeric value: {value}")]
    #[diagnostic(
        code(encoding::invalid_number),
        help("Numeric values are an optional sign, digits and an optional decimal point")
    )]
    InvalidNumber { value: String },

    #[error("Value {value} has more than {scale} decimal places")]
    #[diagnostic(
        code(encoding::too_many_decimal_places),
        help("Extra decimal digits would be lost; round the value before assigning it")
    )]
    TooManyDecimalPlaces { value: String, scale: u32 },
}

impl EncodingError {
    /// Builds an [`EncodingError::UnmappableCharacter`] for the given
    /// character and target character set name.
    pub fn unmappable(character: char, charset: &'static str) -> Self {
        EncodingError::UnmappableCharacter {
            character,
            code_point: character as u32,
            charset,
        }
    }
}
