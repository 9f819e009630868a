//! Layout definitions: the top-level schema for one file.
//!
//! A [`Layout`] owns an ordered list of [`Record`] definitions plus the
//! file-level details that cannot live on a single record: the character
//! set, the record separator, the shared field delimiter and the name
//! index. It is built once through [`LayoutBuilder`], which validates
//! the record set and derives everything derivable; after that the only
//! mutations allowed are appends on the layout shapes that are built
//! record-by-record while a file is read.
//!
//! Properties such as binary-ness and the resolved file structure are
//! recomputed from the current records on every call, so they can never
//! drift out of step with the record list.

use cobrec_encoding::{eol, Charset, EncodingError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::bincsv::{delimiter_to_bytes, is_hex_delimiter, BinaryCsvTokenizer};
use crate::csv::{CsvDefinition, CsvTokenizer};
use crate::error::SchemaError;
use crate::field::Field;
use crate::lookup::{FieldPosition, LookupIndex};
use crate::record::{convert_field_delim, Record};
use crate::Result;

/// How records are framed in the file.
///
/// `Default` and `TextLine` are generic markers that
/// [`Layout::file_structure`] resolves to one of the concrete
/// structures; everything past `TextLine` passes through as declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum FileStructure {
    #[default]
    Default = 0,
    TextLine = 1,
    FixedLength = 2,
    Binary = 3,
    VariableLength = 4,
    BinText = 5,
    UnicodeText = 6,
    NameFirstLine = 7,
    BinNameFirstLine = 8,
    MarkupBuildLayout = 9,
}

/// The overall shape of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutKind {
    /// Several record definitions, selected per record.
    #[default]
    GroupOfRecords,
    /// A single record definition.
    RecordLayout,
    /// Several binary record definitions.
    GroupOfBinaryRecords,
    /// Fixed-width binary records.
    FixedLength,
    /// A single binary record definition.
    BinaryRecord,
}

impl LayoutKind {
    /// Kinds whose records are binary regardless of their field types.
    pub fn is_binary_kind(&self) -> bool {
        matches!(
            self,
            LayoutKind::GroupOfBinaryRecords | LayoutKind::FixedLength | LayoutKind::BinaryRecord
        )
    }
}

/// Builds a [`Layout`], validating the record set on `build`.
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    name: String,
    kind: LayoutKind,
    font_name: String,
    declared_structure: FileStructure,
    eol: String,
    record_sep: Option<Vec<u8>>,
    records: Vec<Record>,
}

impl LayoutBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        LayoutBuilder {
            name: name.into(),
            kind: LayoutKind::default(),
            font_name: String::new(),
            declared_structure: FileStructure::Default,
            eol: String::new(),
            record_sep: None,
            records: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: LayoutKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    pub fn with_file_structure(mut self, structure: FileStructure) -> Self {
        self.declared_structure = structure;
        self
    }

    /// Sets the end-of-line descriptor: `"<crlf>"`, `"<cr>"`, `"<lf>"`,
    /// `"<default>"` or a literal separator.
    pub fn with_eol(mut self, eol: impl Into<String>) -> Self {
        self.eol = eol.into();
        self
    }

    /// Sets the record separator bytes directly, bypassing end-of-line
    /// resolution.
    pub fn with_record_sep(mut self, record_sep: Vec<u8>) -> Self {
        self.record_sep = Some(record_sep);
        self
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = Record>) -> Self {
        self.records.extend(records);
        self
    }

    pub fn build(self) -> Result<Layout> {
        let charset = Charset::resolve(&self.font_name);
        let sep_provided = self.record_sep.is_some();
        let record_sep = match self.record_sep {
            Some(bytes) => bytes,
            None => eol::eol_bytes(None, &self.eol, charset),
        };
        let eol_string = if self.eol == eol::DEFAULT_EOL || !sep_provided {
            let system = eol::system_eol();
            if record_sep.len() < system.len() {
                charset.decode(&record_sep)
            } else {
                system.to_string()
            }
        } else {
            charset.decode(&record_sep)
        };
        let delimiter = resolve_layout_delimiter(&self.records)?;

        let mut records = self.records;
        for (index, record) in records.iter_mut().enumerate() {
            record.default_font(&self.font_name);
            record.attach_to(index);
        }
        let lookup = LookupIndex::rebuild(&mut records);
        debug!(
            layout = %self.name,
            records = records.len(),
            fields = lookup.field_count(),
            delimiter = ?delimiter,
            "built layout"
        );
        Ok(Layout {
            name: self.name,
            kind: self.kind,
            font_name: self.font_name,
            declared_structure: self.declared_structure,
            delimiter,
            record_sep,
            eol_string,
            records,
            lookup,
        })
    }
}

// All delimited records must agree on one delimiter. The tab default
// only counts once a delimited record has diverged from it.
fn resolve_layout_delimiter(records: &[Record]) -> Result<String> {
    let mut delimiter = "\t".to_string();
    let mut first = true;
    for record in records.iter().filter(|r| r.kind().is_delimited()) {
        if record.delimiter() != delimiter {
            if first {
                delimiter = record.delimiter().to_string();
                first = false;
            } else {
                return Err(SchemaError::DelimiterConflict {
                    first: delimiter,
                    second: record.delimiter().to_string(),
                });
            }
        }
    }
    Ok(delimiter)
}

/// A validated file schema.
#[derive(Debug, Clone)]
pub struct Layout {
    name: String,
    kind: LayoutKind,
    font_name: String,
    declared_structure: FileStructure,
    delimiter: String,
    record_sep: Vec<u8>,
    eol_string: String,
    records: Vec<Record>,
    lookup: LookupIndex,
}

impl Layout {
    pub fn builder(name: impl Into<String>) -> LayoutBuilder {
        LayoutBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn charset(&self) -> Charset {
        Charset::resolve(&self.font_name)
    }

    pub fn declared_structure(&self) -> FileStructure {
        self.declared_structure
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn record_sep(&self) -> &[u8] {
        &self.record_sep
    }

    pub fn eol_string(&self) -> &str {
        &self.eol_string
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Finds a record by name, ignoring case.
    pub fn record_index(&self, name: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// The quote in effect for the layout: the first record's.
    pub fn quote(&self) -> &str {
        self.records.first().map(Record::quote).unwrap_or("")
    }

    /// The longest record length in the layout.
    pub fn max_record_length(&self) -> usize {
        self.records.iter().map(Record::length).max().unwrap_or(0)
    }

    pub fn is_multi_byte(&self) -> bool {
        self.charset().is_multi_byte()
    }

    /// True when records hold raw binary data, either because the layout
    /// kind says so or because any field stores a binary type.
    pub fn is_binary(&self) -> bool {
        self.kind.is_binary_kind() || self.records.iter().any(Record::has_binary_field)
    }

    /// True when any record is delimited rather than fixed-width.
    pub fn is_csv_layout(&self) -> bool {
        self.records.iter().any(|r| r.kind().is_delimited())
    }

    /// True when the delimiter is a hex byte literal, meaning records
    /// must be split at the byte level.
    pub fn is_bin_csv(&self) -> bool {
        is_hex_delimiter(&self.delimiter)
    }

    /// True when records form a parent/child tree.
    pub fn has_tree_structure(&self) -> bool {
        self.records.iter().any(|r| r.parent_index().is_some())
    }

    /// True for the layout shapes that grow record-by-record while a
    /// file is read, which are the only ones that accept appends.
    pub fn is_build_layout(&self) -> bool {
        matches!(
            self.declared_structure,
            FileStructure::NameFirstLine | FileStructure::MarkupBuildLayout
        )
    }

    /// Resolves the concrete file structure.
    ///
    /// A concrete declared structure passes through untouched, except
    /// that a name-first-line file over a byte delimiter becomes its
    /// binary variant. The generic markers fall back to what the records
    /// and character set imply.
    pub fn file_structure(&self) -> FileStructure {
        if self.declared_structure == FileStructure::NameFirstLine && self.is_bin_csv() {
            return FileStructure::BinNameFirstLine;
        }
        if self.declared_structure > FileStructure::TextLine {
            return self.declared_structure;
        }
        if self.declared_structure == FileStructure::TextLine {
            return self.check_text_type();
        }
        if self.kind == LayoutKind::GroupOfBinaryRecords && self.records.len() > 1 {
            return FileStructure::Binary;
        }
        if self.is_binary() {
            return FileStructure::FixedLength;
        }
        if self.is_bin_csv() {
            return FileStructure::BinText;
        }
        if !self.font_name.is_empty() {
            return FileStructure::TextLine;
        }
        self.check_text_type()
    }

    fn check_text_type(&self) -> FileStructure {
        if self.is_bin_csv() {
            FileStructure::BinText
        } else if self.is_multi_byte() {
            FileStructure::UnicodeText
        } else if !self.font_name.is_empty() {
            FileStructure::TextLine
        } else {
            FileStructure::BinText
        }
    }

    /// The field delimiter as record bytes.
    pub fn delimiter_bytes(&self) -> Result<Vec<u8>> {
        delimiter_to_bytes(&self.delimiter, self.charset())
    }

    /// Replaces the delimiter on the layout and every record, accepting
    /// the `<tab>`/`<space>` notation.
    pub fn set_delimiter(&mut self, delimiter: &str) {
        let delim = convert_field_delim(Some(delimiter));
        for record in &mut self.records {
            record.set_delimiter(&delim);
        }
        self.delimiter = delim;
    }

    /// Appends a record. Only build layouts accept appends; the record
    /// joins the delimiter agreement and the name index immediately.
    pub fn add_record(&mut self, mut record: Record) -> Result<usize> {
        if !self.is_build_layout() {
            return Err(SchemaError::AppendNotAllowed {
                name: self.name.clone(),
            });
        }
        record.default_font(&self.font_name);
        self.records.push(record);
        match resolve_layout_delimiter(&self.records) {
            Ok(delimiter) => self.delimiter = delimiter,
            Err(err) => {
                self.records.pop();
                return Err(err);
            }
        }
        let index = self.records.len() - 1;
        self.records[index].attach_to(index);
        self.lookup = LookupIndex::rebuild(&mut self.records);
        debug!(layout = %self.name, record = index, "appended record");
        Ok(index)
    }

    /// Appends a field to an existing record of a build layout.
    pub fn add_field(&mut self, record_index: usize, mut field: Field) -> Result<()> {
        if !self.is_build_layout() {
            return Err(SchemaError::AppendNotAllowed {
                name: self.name.clone(),
            });
        }
        let record = self
            .records
            .get_mut(record_index)
            .ok_or(SchemaError::RecordNotFound {
                index: record_index,
            })?;
        field.set_record_index(record_index);
        record.add_field(field);
        self.lookup = LookupIndex::rebuild(&mut self.records);
        Ok(())
    }

    /// Looks up a field by name, ignoring case. Qualified `REC.FIELD`
    /// names address one record; bare names are unique layout-wide via
    /// `~n` suffixes.
    pub fn field_position(&self, name: &str) -> Option<FieldPosition> {
        if name.contains('.') {
            self.lookup.qualified_position(name)
        } else {
            self.lookup.field_position(name)
        }
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        let (r, f) = self.field_position(name)?;
        self.records.get(r)?.field(f)
    }

    pub fn parent_of(&self, record_index: usize) -> Option<usize> {
        self.records.get(record_index)?.parent_index()
    }

    pub fn children_of(&self, record_index: usize) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.parent_index() == Some(record_index))
            .map(|(i, _)| i)
            .collect()
    }

    /// Picks the record definition that applies to `data`: the first
    /// record whose selection matches, else the first record that has no
    /// selection at all.
    pub fn select_record(&self, data: &[u8]) -> Option<usize> {
        let mut default_index = None;
        for (i, record) in self.records.iter().enumerate() {
            match record.selection() {
                Some(selection) => {
                    if let Some(field) = record.field_named(selection.field_name()) {
                        let value = self.get_field_value(data, field).unwrap_or_default();
                        if selection.matches(&value) {
                            return Some(i);
                        }
                    }
                }
                None => {
                    if default_index.is_none() {
                        default_index = Some(i);
                    }
                }
            }
        }
        default_index
    }

    /// Reads one field of a record. Fixed-width fields decode in place;
    /// delimited fields are cut out of the line first and then decoded
    /// as a single-field record.
    pub fn get_field_value(&self, data: &[u8], field: &Field) -> Result<String> {
        let record = field.record_index().and_then(|i| self.records.get(i));
        if record.map_or(true, |r| !r.kind().is_delimited()) {
            return Ok(field.field_type().decode(data, field));
        }
        let index = field.position().saturating_sub(1);
        let cell_text = if self.is_bin_csv() {
            let tokenizer = BinaryCsvTokenizer::new(self.delimiter_bytes()?);
            let cell = tokenizer.get(data, index).unwrap_or(&[]);
            Charset::resolve(field.font_name()).decode(cell)
        } else {
            let line_charset = self.record_charset(record);
            let line = line_charset.decode(data);
            CsvTokenizer::new(self.csv_definition(record))
                .get_field(index, &line)
                .unwrap_or_default()
        };
        self.decode_cell(&cell_text, field)
    }

    /// Writes one field of a record, returning the new record bytes.
    /// The input record may be shorter than the field requires; fixed
    /// records grow and delimited records gain empty cells as needed.
    pub fn set_field_value(&self, data: &[u8], field: &Field, value: &str) -> Result<Vec<u8>> {
        let record = field.record_index().and_then(|i| self.records.get(i));
        if record.map_or(true, |r| !r.kind().is_delimited()) {
            let mut out = data.to_vec();
            field.field_type().encode(&mut out, field, value)?;
            return Ok(out);
        }
        let formatted = field.field_type().format_for_record(field, value)?;
        let index = field.position().saturating_sub(1);
        if self.is_bin_csv() {
            let tokenizer = BinaryCsvTokenizer::new(self.delimiter_bytes()?);
            let cell = Charset::resolve(field.font_name()).encode(&formatted)?;
            return Ok(tokenizer.set(data, index, &cell));
        }
        let line_charset = self.record_charset(record);
        let line = line_charset.decode(data);
        let new_line = CsvTokenizer::new(self.csv_definition(record)).set_field(index, &line, &formatted);
        Ok(line_charset.encode(&new_line)?)
    }

    /// Reads a numeric field as a decimal. Blank fields read as zero.
    pub fn decode_decimal(&self, data: &[u8], field: &Field) -> Result<Decimal> {
        let text = self.get_field_value(data, field)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Decimal::ZERO);
        }
        Decimal::from_str(trimmed).map_err(|_| {
            SchemaError::from(EncodingError::InvalidNumber {
                value: trimmed.to_string(),
            })
        })
    }

    // An empty cell stays empty; anything else is re-encoded and run
    // through the field's codec as a record of its own, so overpunches
    // and separate signs work inside delimited files too.
    fn decode_cell(&self, text: &str, field: &Field) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let charset = Charset::resolve(field.font_name());
        let bytes = charset.encode(text)?;
        let cell_field = Field::new(field.name(), field.field_type(), 1, bytes.len())
            .with_scale(field.scale())
            .with_font_name(field.font_name());
        Ok(field.field_type().decode(&bytes, &cell_field))
    }

    fn record_charset(&self, record: Option<&Record>) -> Charset {
        let font = record
            .map(Record::font_name)
            .filter(|f| !f.is_empty())
            .unwrap_or(&self.font_name);
        Charset::resolve(font)
    }

    fn csv_definition(&self, record: Option<&Record>) -> CsvDefinition {
        match record {
            Some(r) => CsvDefinition::new(r.delimiter(), r.quote()),
            None => CsvDefinition::new(self.delimiter.as_str(), ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use crate::selection::RecordSelection;
    use crate::types::{FieldType, SignPosition};

    fn fixed_record() -> Record {
        Record::new(
            "DETAIL",
            RecordKind::FixedLength,
            vec![
                Field::new("TYPE", FieldType::FixedChar, 1, 2),
                Field::new("ITEM", FieldType::FixedChar, 3, 6),
                Field::new("QTY", FieldType::BinaryComp, 9, 2),
                Field::new("PRICE", FieldType::Zoned, 11, 6).with_scale(2),
            ],
        )
    }

    fn csv_record() -> Record {
        Record::new(
            "ROW",
            RecordKind::DelimitedAndQuote,
            vec![
                Field::new("NAME", FieldType::CsvString, 1, 0),
                Field::new("AMOUNT", FieldType::SignSeparate(SignPosition::Leading), 2, 6)
                    .with_scale(2),
                Field::new("NOTE", FieldType::CsvString, 3, 0),
            ],
        )
        .with_delimiter(",")
        .with_quote("\"")
    }

    #[test]
    fn test_builder_defaults() {
        let layout = Layout::builder("SAMPLE")
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert_eq!(layout.name(), "SAMPLE");
        assert_eq!(layout.delimiter(), "\t");
        assert_eq!(layout.record_sep(), eol::system_eol().as_bytes());
        assert_eq!(layout.eol_string(), eol::system_eol());
        assert_eq!(layout.record_count(), 1);
        assert_eq!(layout.max_record_length(), 16);
    }

    #[test]
    fn test_delimiter_agreement() {
        // One record diverging from the tab default adopts its delimiter.
        let layout = Layout::builder("CSV")
            .with_record(csv_record())
            .build()
            .unwrap();
        assert_eq!(layout.delimiter(), ",");
        assert!(layout.is_csv_layout());

        // A second divergence is a conflict.
        let semi = Record::new("OTHER", RecordKind::Delimited, Vec::new()).with_delimiter(";");
        let err = Layout::builder("CSV")
            .with_record(csv_record())
            .with_record(semi)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DelimiterConflict { .. }));
    }

    #[test]
    fn test_is_binary() {
        let layout = Layout::builder("TEXT")
            .with_record(Record::new(
                "R",
                RecordKind::FixedLength,
                vec![Field::new("A", FieldType::FixedChar, 1, 4)],
            ))
            .build()
            .unwrap();
        assert!(!layout.is_binary());

        let layout = Layout::builder("BIN")
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert!(layout.is_binary());

        let layout = Layout::builder("KIND")
            .with_kind(LayoutKind::FixedLength)
            .with_record(Record::new(
                "R",
                RecordKind::FixedLength,
                vec![Field::new("A", FieldType::FixedChar, 1, 4)],
            ))
            .build()
            .unwrap();
        assert!(layout.is_binary());
    }

    #[test]
    fn test_file_structure_passthrough() {
        let layout = Layout::builder("VB")
            .with_file_structure(FileStructure::VariableLength)
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert_eq!(layout.file_structure(), FileStructure::VariableLength);
    }

    #[test]
    fn test_file_structure_from_records() {
        // Binary fields force a fixed-length structure.
        let layout = Layout::builder("L")
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert_eq!(layout.file_structure(), FileStructure::FixedLength);

        // Text-only fields with a named charset read as text lines.
        let text = Record::new(
            "R",
            RecordKind::FixedLength,
            vec![Field::new("A", FieldType::FixedChar, 1, 4)],
        );
        let layout = Layout::builder("L")
            .with_font_name("cp037")
            .with_record(text.clone())
            .build()
            .unwrap();
        assert_eq!(layout.file_structure(), FileStructure::TextLine);

        // With no charset at all the bytes must be kept as-is.
        let layout = Layout::builder("L").with_record(text).build().unwrap();
        assert_eq!(layout.file_structure(), FileStructure::BinText);
    }

    #[test]
    fn test_file_structure_text_marker() {
        let text = Record::new(
            "R",
            RecordKind::FixedLength,
            vec![Field::new("A", FieldType::FixedChar, 1, 4)],
        );
        let layout = Layout::builder("L")
            .with_file_structure(FileStructure::TextLine)
            .with_font_name("utf-8")
            .with_record(text)
            .build()
            .unwrap();
        assert_eq!(layout.file_structure(), FileStructure::UnicodeText);
    }

    #[test]
    fn test_file_structure_binary_group() {
        let layout = Layout::builder("L")
            .with_kind(LayoutKind::GroupOfBinaryRecords)
            .with_record(fixed_record())
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert_eq!(layout.file_structure(), FileStructure::Binary);

        // A single binary record resolves to fixed-length instead.
        let layout = Layout::builder("L")
            .with_kind(LayoutKind::GroupOfBinaryRecords)
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert_eq!(layout.file_structure(), FileStructure::FixedLength);
    }

    #[test]
    fn test_name_first_line_over_byte_delimiter() {
        let mut rec = csv_record();
        rec.set_delimiter("x'6C'");
        let layout = Layout::builder("L")
            .with_file_structure(FileStructure::NameFirstLine)
            .with_record(rec)
            .build()
            .unwrap();
        assert!(layout.is_bin_csv());
        assert_eq!(layout.file_structure(), FileStructure::BinNameFirstLine);
        assert_eq!(layout.delimiter_bytes().unwrap(), [0x6C]);
    }

    #[test]
    fn test_set_delimiter_propagates() {
        let mut layout = Layout::builder("CSV")
            .with_record(csv_record())
            .build()
            .unwrap();
        layout.set_delimiter("<tab>");
        assert_eq!(layout.delimiter(), "\t");
        assert_eq!(layout.record(0).unwrap().delimiter(), "\t");
    }

    #[test]
    fn test_record_index_ignores_case() {
        let layout = Layout::builder("L")
            .with_record(fixed_record())
            .with_record(csv_record())
            .build()
            .unwrap();
        assert_eq!(layout.record_index("detail"), Some(0));
        assert_eq!(layout.record_index("ROW"), Some(1));
        assert_eq!(layout.record_index("NOPE"), None);
    }

    #[test]
    fn test_quote_comes_from_first_record() {
        let layout = Layout::builder("L").with_record(csv_record()).build().unwrap();
        assert_eq!(layout.quote(), "\"");
        let empty = Layout::builder("L").build().unwrap();
        assert_eq!(empty.quote(), "");
    }

    #[test]
    fn test_field_lookup_through_layout() {
        let layout = Layout::builder("L")
            .with_record(fixed_record())
            .with_record(csv_record())
            .build()
            .unwrap();
        let field = layout.field_by_name("price").unwrap();
        assert_eq!(field.position(), 11);
        let field = layout.field_by_name("row.amount").unwrap();
        assert_eq!(field.position(), 2);
        assert!(layout.field_by_name("nope").is_none());
    }

    #[test]
    fn test_append_gating() {
        let mut layout = Layout::builder("L").with_record(fixed_record()).build().unwrap();
        let err = layout.add_record(csv_record()).unwrap_err();
        assert!(matches!(err, SchemaError::AppendNotAllowed { .. }));

        let mut layout = Layout::builder("L")
            .with_file_structure(FileStructure::NameFirstLine)
            .build()
            .unwrap();
        let index = layout.add_record(csv_record()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(layout.delimiter(), ",");
        assert!(layout.field_by_name("AMOUNT").is_some());

        layout
            .add_field(0, Field::new("EXTRA", FieldType::CsvString, 4, 0))
            .unwrap();
        assert!(layout.field_by_name("EXTRA").is_some());
        assert!(matches!(
            layout.add_field(7, Field::new("X", FieldType::CsvString, 1, 0)),
            Err(SchemaError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_get_and_set_fixed_fields() {
        let layout = Layout::builder("L").with_record(fixed_record()).build().unwrap();
        let record = layout.record(0).unwrap();
        let mut data = b"01WIDGET\x00\x07001050".to_vec();
        assert_eq!(
            layout.get_field_value(&data, record.field(1).unwrap()).unwrap(),
            "WIDGET"
        );
        assert_eq!(
            layout.get_field_value(&data, record.field(2).unwrap()).unwrap(),
            "7"
        );
        assert_eq!(
            layout.get_field_value(&data, record.field(3).unwrap()).unwrap(),
            "0010.50"
        );

        data = layout
            .set_field_value(&data, record.field(3).unwrap(), "-2.25")
            .unwrap();
        assert_eq!(&data[10..16], b"00022N");
        assert_eq!(
            layout.get_field_value(&data, record.field(3).unwrap()).unwrap(),
            "-0002.25"
        );
        assert_eq!(
            layout
                .decode_decimal(&data, record.field(3).unwrap())
                .unwrap()
                .to_string(),
            "-2.25"
        );
    }

    #[test]
    fn test_get_and_set_csv_fields() {
        let layout = Layout::builder("L").with_record(csv_record()).build().unwrap();
        let record = layout.record(0).unwrap();
        let data = b"\"Jones, A\",-00150,ok".to_vec();
        assert_eq!(
            layout.get_field_value(&data, record.field(0).unwrap()).unwrap(),
            "Jones, A"
        );
        assert_eq!(
            layout.get_field_value(&data, record.field(1).unwrap()).unwrap(),
            "-001.50"
        );
        assert_eq!(
            layout.get_field_value(&data, record.field(2).unwrap()).unwrap(),
            "ok"
        );

        let data = layout
            .set_field_value(&data, record.field(1).unwrap(), "2.50")
            .unwrap();
        assert_eq!(data, b"\"Jones, A\",+00250,ok");

        // Writing past the last cell grows the line.
        let short = b"solo".to_vec();
        let grown = layout
            .set_field_value(&short, record.field(2).unwrap(), "note")
            .unwrap();
        assert_eq!(grown, b"solo,,note");
    }

    #[test]
    fn test_missing_csv_cell_reads_empty() {
        let layout = Layout::builder("L").with_record(csv_record()).build().unwrap();
        let record = layout.record(0).unwrap();
        assert_eq!(
            layout.get_field_value(b"only", record.field(2).unwrap()).unwrap(),
            ""
        );
        assert_eq!(
            layout
                .decode_decimal(b"only", record.field(1).unwrap())
                .unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_get_and_set_bin_csv_fields() {
        let mut rec = csv_record();
        rec.set_delimiter("x'6C'");
        let layout = Layout::builder("L")
            .with_font_name("cp037")
            .with_record(rec)
            .build()
            .unwrap();
        let record = layout.record(0).unwrap();
        // "AB" , "-00150" , "C" in cp037 with the 0x6C separator.
        let mut data = vec![0xC1, 0xC2, 0x6C];
        data.extend(Charset::resolve("cp037").encode("-00150").unwrap());
        data.extend([0x6C, 0xC3]);

        assert_eq!(
            layout.get_field_value(&data, record.field(0).unwrap()).unwrap(),
            "AB"
        );
        assert_eq!(
            layout.get_field_value(&data, record.field(1).unwrap()).unwrap(),
            "-001.50"
        );

        let updated = layout
            .set_field_value(&data, record.field(1).unwrap(), "3")
            .unwrap();
        let expected_cell = Charset::resolve("cp037").encode("+00300").unwrap();
        assert_eq!(&updated[3..9], expected_cell.as_slice());
        assert_eq!(
            layout.get_field_value(&updated, record.field(1).unwrap()).unwrap(),
            "003.00"
        );
    }

    #[test]
    fn test_select_record() {
        let header = Record::new(
            "HEADER",
            RecordKind::FixedLength,
            vec![Field::new("TYPE", FieldType::FixedChar, 1, 2)],
        )
        .with_selection(RecordSelection::new("TYPE", "00"));
        let detail = fixed_record().with_selection(RecordSelection::new("TYPE", "01"));
        let other = Record::new(
            "OTHER",
            RecordKind::FixedLength,
            vec![Field::new("BODY", FieldType::FixedChar, 1, 10)],
        );
        let layout = Layout::builder("L")
            .with_record(header)
            .with_record(detail)
            .with_record(other)
            .build()
            .unwrap();

        assert_eq!(layout.select_record(b"00 trailer"), Some(0));
        assert_eq!(layout.select_record(b"01WIDGET"), Some(1));
        // No selection matches: the first rule-less record is the default.
        assert_eq!(layout.select_record(b"99????"), Some(2));
    }

    #[test]
    fn test_select_record_without_default() {
        let header = Record::new(
            "HEADER",
            RecordKind::FixedLength,
            vec![Field::new("TYPE", FieldType::FixedChar, 1, 2)],
        )
        .with_selection(RecordSelection::new("TYPE", "00"));
        let layout = Layout::builder("L").with_record(header).build().unwrap();
        assert_eq!(layout.select_record(b"99"), None);
    }

    #[test]
    fn test_tree_helpers() {
        let parent = Record::new("BATCH", RecordKind::FixedLength, Vec::new());
        let child = Record::new("ITEM", RecordKind::FixedLength, Vec::new()).with_parent_index(0);
        let layout = Layout::builder("L")
            .with_record(parent)
            .with_record(child)
            .build()
            .unwrap();
        assert!(layout.has_tree_structure());
        assert_eq!(layout.parent_of(1), Some(0));
        assert_eq!(layout.parent_of(0), None);
        assert_eq!(layout.children_of(0), vec![1]);
        assert!(layout.children_of(1).is_empty());
    }

    #[test]
    fn test_font_propagates_to_fields() {
        let layout = Layout::builder("L")
            .with_font_name("cp037")
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert_eq!(layout.record(0).unwrap().font_name(), "cp037");
        assert_eq!(layout.record(0).unwrap().field(0).unwrap().font_name(), "cp037");
    }

    #[test]
    fn test_ebcdic_record_separator() {
        let layout = Layout::builder("L")
            .with_font_name("cp1047")
            .with_eol(eol::CRLF_EOL)
            .with_record(fixed_record())
            .build()
            .unwrap();
        assert_eq!(layout.record_sep(), [0x15]);
        assert_eq!(layout.eol_string(), "\n");
    }
}
