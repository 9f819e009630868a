//! Record definitions.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::field::Field;
use crate::selection::RecordSelection;
use crate::types::FieldType;
use crate::Result;

/// How a record's fields sit on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RecordKind {
    #[default]
    FixedLength,
    Delimited,
    DelimitedAndQuote,
}

impl RecordKind {
    pub fn is_delimited(&self) -> bool {
        matches!(self, RecordKind::Delimited | RecordKind::DelimitedAndQuote)
    }
}

/// Normalises the delimiter notation used in schema files: a missing
/// delimiter and `<tab>` both mean tab, `<space>` means a space, and
/// anything else is taken literally.
pub fn convert_field_delim(delim: Option<&str>) -> String {
    match delim {
        None => "\t".to_string(),
        Some(d) if d.trim().eq_ignore_ascii_case("<tab>") => "\t".to_string(),
        Some(d) if d.trim().eq_ignore_ascii_case("<space>") => " ".to_string(),
        Some(d) => d.to_string(),
    }
}

fn default_delimiter() -> String {
    "\t".to_string()
}

/// One record definition: an ordered list of fields plus the formatting
/// details that apply to every field in the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    name: String,
    #[serde(default)]
    kind: RecordKind,
    fields: Vec<Field>,
    #[serde(default = "default_delimiter")]
    delimiter: String,
    #[serde(default)]
    quote: String,
    #[serde(default)]
    font_name: String,
    #[serde(default)]
    selection: Option<RecordSelection>,
    #[serde(default)]
    parent_index: Option<usize>,
}

impl Record {
    pub fn new(name: impl Into<String>, kind: RecordKind, fields: Vec<Field>) -> Self {
        Record {
            name: name.into(),
            kind,
            fields,
            delimiter: default_delimiter(),
            quote: String::new(),
            font_name: String::new(),
            selection: None,
            parent_index: None,
        }
    }

    /// Sets the delimiter, accepting the `<tab>`/`<space>` notation.
    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = convert_field_delim(Some(delimiter));
        self
    }

    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = quote.into();
        self
    }

    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    pub fn with_selection(mut self, selection: RecordSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_parent_index(mut self, parent: usize) -> Self {
        self.parent_index = Some(parent);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn selection(&self) -> Option<&RecordSelection> {
        self.selection.as_ref()
    }

    pub fn parent_index(&self) -> Option<usize> {
        self.parent_index
    }

    /// The record's byte length, derived from its fields rather than
    /// stored: the furthest 1-based end position of any field.
    pub fn length(&self) -> usize {
        self.fields.iter().map(Field::end).max().unwrap_or(0)
    }

    /// Finds a field by name, ignoring case. The first match wins.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.field_index(name).and_then(|i| self.field(i))
    }

    /// Finds the single field with exactly this name. Unlike
    /// [`Record::field_index`] the match is case sensitive, and a name
    /// carried by several fields is an error rather than a first-match.
    pub fn unique_field(&self, name: &str) -> Result<&Field> {
        let mut matches = self.fields.iter().filter(|f| f.name() == name);
        let first = matches.next().ok_or_else(|| SchemaError::FieldNotFound {
            name: name.to_string(),
        })?;
        let extra = matches.count();
        if extra > 0 {
            return Err(SchemaError::AmbiguousField {
                name: name.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    pub fn is_binary_field(&self, index: usize) -> bool {
        self.field(index)
            .map(|f| f.field_type().is_binary())
            .unwrap_or(false)
    }

    pub fn is_numeric_field(&self, index: usize) -> bool {
        self.field(index)
            .map(|f| f.field_type().is_numeric())
            .unwrap_or(false)
    }

    pub fn field_types(&self) -> Vec<FieldType> {
        self.fields.iter().map(Field::field_type).collect()
    }

    pub fn has_binary_field(&self) -> bool {
        self.fields.iter().any(|f| f.field_type().is_binary())
    }

    pub(crate) fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub(crate) fn set_delimiter(&mut self, delimiter: &str) {
        self.delimiter = delimiter.to_string();
    }

    // Fills in the layout font on the record and on any field that has
    // no font of its own.
    pub(crate) fn default_font(&mut self, font_name: &str) {
        if self.font_name.is_empty() {
            self.font_name = font_name.to_string();
        }
        for field in &mut self.fields {
            field.default_font(&self.font_name);
        }
    }

    // Stamps the record's position in its layout onto every field.
    pub(crate) fn attach_to(&mut self, index: usize) {
        for field in &mut self.fields {
            field.set_record_index(index);
        }
    }
}
