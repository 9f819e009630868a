//! Field lookup by name.

use std::collections::HashMap;
use tracing::debug;

use crate::record::Record;

/// `(record index, field index)` within a layout.
pub type FieldPosition = (usize, usize);

/// Case-insensitive field name index across every record of a layout.
///
/// When the same name occurs in more than one record, the later
/// occurrences are indexed as `NAME~1`, `NAME~2` and so on, and the
/// assigned name is written back onto the field so the name a field
/// answers to is always visible on the field itself. Qualified lookup
/// uses `RECORD.FIELD` with the field's original name, which stays
/// unique because a name only repeats across records, not within one.
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    by_name: HashMap<String, FieldPosition>,
    by_qualified_name: HashMap<String, FieldPosition>,
}

impl LookupIndex {
    /// Builds the index, assigning uniqued lookup names as it goes.
    pub fn rebuild(records: &mut [Record]) -> Self {
        let mut by_name: HashMap<String, FieldPosition> = HashMap::new();
        let mut by_qualified_name: HashMap<String, FieldPosition> = HashMap::new();
        for (r, record) in records.iter_mut().enumerate() {
            let record_name = record.name().to_string();
            for (f, field) in record.fields_mut().iter_mut().enumerate() {
                let base = field.name().to_string();
                let mut lookup = base.clone();
                let mut k = 1;
                while by_name.contains_key(&lookup.to_uppercase()) {
                    lookup = format!("{base}~{k}");
                    k += 1;
                }
                by_name.insert(lookup.to_uppercase(), (r, f));
                field.set_lookup_name(lookup);
                let qualified = format!("{record_name}.{base}").to_uppercase();
                by_qualified_name.entry(qualified).or_insert((r, f));
            }
        }
        debug!(fields = by_name.len(), "rebuilt field name index");
        LookupIndex {
            by_name,
            by_qualified_name,
        }
    }

    /// Looks up an unqualified field name, ignoring case.
    pub fn field_position(&self, name: &str) -> Option<FieldPosition> {
        self.by_name.get(&name.to_uppercase()).copied()
    }

    /// Looks up a `RECORD.FIELD` qualified name, ignoring case.
    pub fn qualified_position(&self, name: &str) -> Option<FieldPosition> {
        self.by_qualified_name.get(&name.to_uppercase()).copied()
    }

    pub fn field_count(&self) -> usize {
        self.by_name.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::record::RecordKind;
    use crate::types::FieldType;

    fn two_records() -> Vec<Record> {
        vec![
            Record::new(
                "HEADER",
                RecordKind::FixedLength,
                vec![
                    Field::new("TYPE", FieldType::FixedChar, 1, 2),
                    Field::new("AMOUNT", FieldType::Zoned, 3, 8),
                ],
            ),
            Record::new(
                "DETAIL",
                RecordKind::FixedLength,
                vec![
                    Field::new("TYPE", FieldType::FixedChar, 1, 2),
                    Field::new("AMOUNT", FieldType::Zoned, 3, 8),
                ],
            ),
        ]
    }

    #[test]
    fn test_duplicate_names_get_suffixes() {
        let mut records = two_records();
        let index = LookupIndex::rebuild(&mut records);
        assert_eq!(index.field_position("TYPE"), Some((0, 0)));
        assert_eq!(index.field_position("TYPE~1"), Some((1, 0)));
        assert_eq!(index.field_position("amount~1"), Some((1, 1)));
        assert_eq!(index.field_count(), 4);
    }

    #[test]
    fn test_lookup_names_written_back() {
        let mut records = two_records();
        LookupIndex::rebuild(&mut records);
        assert_eq!(records[0].field(0).unwrap().lookup_name(), "TYPE");
        assert_eq!(records[1].field(0).unwrap().lookup_name(), "TYPE~1");
        // The original name is untouched.
        assert_eq!(records[1].field(0).unwrap().name(), "TYPE");
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut records = two_records();
        let index = LookupIndex::rebuild(&mut records);
        assert_eq!(index.field_position("type"), Some((0, 0)));
        assert_eq!(index.field_position("Amount"), Some((0, 1)));
        assert_eq!(index.field_position("missing"), None);
    }

    #[test]
    fn test_qualified_lookup_uses_original_names() {
        let mut records = two_records();
        let index = LookupIndex::rebuild(&mut records);
        assert_eq!(index.qualified_position("DETAIL.AMOUNT"), Some((1, 1)));
        assert_eq!(index.qualified_position("header.amount"), Some((0, 1)));
        assert_eq!(index.qualified_position("DETAIL.MISSING"), None);
    }
}
