//! Variable-length record framing.
//!
//! Variable-length files frame every record with a record descriptor
//! word: two big-endian payload length bytes followed by two zero
//! bytes. The payload is followed by a copy of the same descriptor
//! word, so one record on disk is `[RDW][payload][RDW]`. A zero-length
//! payload is a valid record.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::FramerError;
use crate::Result;

/// The largest payload a record descriptor word may carry.
pub const MAX_RECORD_LENGTH: usize = 64_000;

/// Reads RDW-framed records from a byte stream.
pub struct VbReader<R: Read> {
    reader: BufReader<R>,
    record_number: u64,
    eof: bool,
    record_buffer: Vec<u8>,
}

impl VbReader<File> {
    /// Opens a variable-length file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened variable-length file");
        Ok(VbReader::new(file))
    }
}

impl<R: Read> VbReader<R> {
    pub fn new(inner: R) -> Self {
        VbReader {
            reader: BufReader::new(inner),
            record_number: 0,
            eof: false,
            record_buffer: Vec::new(),
        }
    }

    /// Reads the next record, or `None` at a clean end of the stream.
    ///
    /// The returned slice borrows the reader's record buffer and is only
    /// valid until the next read.
    pub fn read(&mut self) -> Result<Option<&[u8]>> {
        if self.eof {
            return Ok(None);
        }

        let mut rdw = [0u8; 4];
        match read_fully(&mut self.reader, &mut rdw)? {
            0 => {
                self.eof = true;
                return Ok(None);
            }
            4 => {}
            _ => {
                return Err(FramerError::UnexpectedEof {
                    record_number: self.record_number + 1,
                })
            }
        }
        if rdw[2] != 0 || rdw[3] != 0 {
            return Err(FramerError::InvalidDescriptorWord {
                record_number: self.record_number + 1,
            });
        }

        let length = u16::from_be_bytes([rdw[0], rdw[1]]) as usize;
        self.record_buffer.resize(length, 0);
        if length > 0 && read_fully(&mut self.reader, &mut self.record_buffer)? < length {
            return Err(FramerError::UnexpectedEof {
                record_number: self.record_number + 1,
            });
        }

        // The trailing descriptor word is consumed but not checked.
        let mut trailer = [0u8; 4];
        if read_fully(&mut self.reader, &mut trailer)? < 4 {
            return Err(FramerError::MissingTrailer {
                record_number: self.record_number + 1,
            });
        }

        self.record_number += 1;
        Ok(Some(&self.record_buffer))
    }

    /// Records read so far.
    pub fn record_number(&self) -> u64 {
        self.record_number
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

// read_exact would turn a clean end of stream into an error; this keeps
// the byte count so the caller can tell "nothing" from "truncated".
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Writes RDW-framed records to a byte stream.
pub struct VbWriter<W: Write> {
    writer: BufWriter<W>,
    record_number: u64,
}

impl VbWriter<File> {
    /// Creates or truncates a variable-length file for writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "created variable-length file");
        Ok(VbWriter::new(file))
    }
}

impl<W: Write> VbWriter<W> {
    pub fn new(inner: W) -> Self {
        VbWriter {
            writer: BufWriter::new(inner),
            record_number: 0,
        }
    }

    /// Writes one record framed by leading and trailing descriptor words.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > MAX_RECORD_LENGTH {
            return Err(FramerError::RecordTooLong {
                actual: data.len(),
                max: MAX_RECORD_LENGTH,
            });
        }
        let len = (data.len() as u16).to_be_bytes();
        let rdw = [len[0], len[1], 0, 0];
        self.writer.write_all(&rdw)?;
        self.writer.write_all(data)?;
        self.writer.write_all(&rdw)?;
        self.record_number += 1;
        Ok(())
    }

    /// Flushes buffered records to the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Records written so far.
    pub fn record_number(&self) -> u64 {
        self.record_number
    }
}

impl<W: Write> Drop for VbWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Reads every record of a variable-length file.
pub fn read_all_records(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>> {
    let mut reader = VbReader::open(path)?;
    let mut records = Vec::new();
    while let Some(record) = reader.read()? {
        records.push(record.to_vec());
    }
    Ok(records)
}

/// Writes records to a variable-length file, returning the count.
pub fn write_records(path: impl AsRef<Path>, records: &[&[u8]]) -> Result<u64> {
    let mut writer = VbWriter::create(path)?;
    for record in records {
        writer.write(record)?;
    }
    writer.flush()?;
    Ok(writer.record_number())
}
