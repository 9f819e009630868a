//! Field definitions.

use serde::{Deserialize, Serialize};

use crate::types::FieldType;

/// One field of a record: a name, a 1-based byte position, a byte length
/// and the storage type that interprets the bytes.
///
/// For delimited records the position is the 1-based field number within
/// the line rather than a byte offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    name: String,
    field_type: FieldType,
    position: usize,
    length: usize,
    #[serde(default)]
    scale: u32,
    #[serde(default)]
    font_name: String,
    #[serde(skip)]
    record_index: Option<usize>,
    #[serde(skip)]
    lookup_name: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, position: usize, length: usize) -> Self {
        Field {
            name: name.into(),
            field_type,
            position,
            length,
            scale: 0,
            font_name: String::new(),
            record_index: None,
            lookup_name: None,
        }
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Index of the owning record within its layout, once attached.
    pub fn record_index(&self) -> Option<usize> {
        self.record_index
    }

    /// The name this field is indexed under. Differs from [`Field::name`]
    /// only when duplicate names forced a uniquing suffix.
    pub fn lookup_name(&self) -> &str {
        self.lookup_name.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn set_record_index(&mut self, index: usize) {
        self.record_index = Some(index);
    }

    pub(crate) fn set_lookup_name(&mut self, name: String) {
        self.lookup_name = Some(name);
    }

    pub(crate) fn default_font(&mut self, font_name: &str) {
        if self.font_name.is_empty() {
            self.font_name = font_name.to_string();
        }
    }

    /// The 1-based inclusive end position, which doubles as the number of
    /// bytes a record needs to hold this field.
    pub fn end(&self) -> usize {
        (self.position + self.length).saturating_sub(1)
    }

    /// This field's byte window within a record, clamped to the record:
    /// short records give a truncated or empty slice rather than an error.
    pub fn window<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let start = self.position.saturating_sub(1).min(data.len());
        let end = (start + self.length).min(data.len());
        &data[start..end]
    }
}
