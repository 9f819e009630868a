//! Record framing for variable-length mainframe record files.
//!
//! Fixed-width and delimited files need no framing beyond a separator,
//! but variable-length binary files carry a 4-byte record descriptor
//! word before and after every record. This crate reads and writes that
//! framing; what the payload means is the concern of a record layout.
//!
//! # Features
//!
//! - Streaming [`VbReader`] with strict descriptor word validation
//! - Buffered [`VbWriter`] that frames and flushes on drop
//! - Whole-file helpers [`read_all_records`] and [`write_records`]
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use cobrec_io::{VbReader, VbWriter};
//!
//! let mut bytes = Vec::new();
//! {
//!     let mut writer = VbWriter::new(&mut bytes);
//!     writer.write(b"HELLO")?;
//!     writer.flush()?;
//! }
//!
//! let mut reader = VbReader::new(Cursor::new(bytes));
//! assert_eq!(reader.read()?.unwrap(), b"HELLO");
//! assert!(reader.read()?.is_none());
//! # Ok::<(), cobrec_io::FramerError>(())
//! ```

pub mod error;
pub mod vb;

pub use error::FramerError;
pub use vb::{read_all_records, write_records, VbReader, VbWriter, MAX_RECORD_LENGTH};

/// Convenience alias for framing results.
pub type Result<T> = std::result::Result<T, FramerError>;
