//! End-to-end schema tests: an EBCDIC fixed-width file, a delimited
//! file, and schema persistence through serde.

use cobrec_layout::{
    Field, FieldType, Layout, Record, RecordKind, RecordSelection, SignPosition,
};

fn sales_layout() -> Layout {
    let header = Record::new(
        "HEADER",
        RecordKind::FixedLength,
        vec![
            Field::new("TYPE", FieldType::FixedChar, 1, 1),
            Field::new("DATE", FieldType::FixedChar, 2, 8),
        ],
    )
    .with_selection(RecordSelection::new("TYPE", "H"));
    let detail = Record::new(
        "DETAIL",
        RecordKind::FixedLength,
        vec![
            Field::new("TYPE", FieldType::FixedChar, 1, 1),
            Field::new("ITEM", FieldType::FixedChar, 2, 8),
            Field::new("QTY", FieldType::BinaryComp, 10, 4),
            Field::new("AMOUNT", FieldType::Zoned, 14, 7).with_scale(2),
        ],
    )
    .with_selection(RecordSelection::new("TYPE", "D"));
    Layout::builder("SALES")
        .with_font_name("cp037")
        .with_record(header)
        .with_record(detail)
        .build()
        .unwrap()
}

#[test]
fn test_ebcdic_fixed_width_round_trip() {
    let layout = sales_layout();

    // Build a detail record field by field, starting from nothing.
    let mut data = Vec::new();
    for (name, value) in [
        ("DETAIL.TYPE", "D"),
        ("DETAIL.ITEM", "WRENCH"),
        ("DETAIL.QTY", "12"),
        ("DETAIL.AMOUNT", "-123.45"),
    ] {
        let field = layout.field_by_name(name).unwrap();
        data = layout.set_field_value(&data, field, value).unwrap();
    }

    let expected = [
        0xC4, // D
        0xE6, 0xD9, 0xC5, 0xD5, 0xC3, 0xC8, 0x40, 0x40, // WRENCH padded
        0x00, 0x00, 0x00, 0x0C, // 12
        0xF0, 0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xD5, // -123.45 overpunched
    ];
    assert_eq!(data, expected);

    assert_eq!(layout.select_record(&data), Some(1));
    let amount = layout.field_by_name("DETAIL.AMOUNT").unwrap();
    assert_eq!(layout.get_field_value(&data, amount).unwrap(), "-00123.45");
    assert_eq!(
        layout.decode_decimal(&data, amount).unwrap().to_string(),
        "-123.45"
    );
    let item = layout.field_by_name("DETAIL.ITEM").unwrap();
    assert_eq!(layout.get_field_value(&data, item).unwrap(), "WRENCH");
    let qty = layout.field_by_name("DETAIL.QTY").unwrap();
    assert_eq!(layout.get_field_value(&data, qty).unwrap(), "12");
}

#[test]
fn test_record_selection_routes_header_and_detail() {
    let layout = sales_layout();

    let mut header = Vec::new();
    for (name, value) in [("HEADER.TYPE", "H"), ("HEADER.DATE", "20240615")] {
        let field = layout.field_by_name(name).unwrap();
        header = layout.set_field_value(&header, field, value).unwrap();
    }
    assert_eq!(layout.select_record(&header), Some(0));

    // Neither selection matches and there is no rule-less record.
    let unknown = layout.charset().encode("X12345678").unwrap();
    assert_eq!(layout.select_record(&unknown), None);
}

#[test]
fn test_delimited_round_trip() {
    let row = Record::new(
        "ROW",
        RecordKind::DelimitedAndQuote,
        vec![
            Field::new("NAME", FieldType::CsvString, 1, 0),
            Field::new("BALANCE", FieldType::SignSeparate(SignPosition::Leading), 2, 6)
                .with_scale(2),
            Field::new("NOTE", FieldType::CsvString, 3, 0),
        ],
    )
    .with_delimiter(",")
    .with_quote("\"");
    let layout = Layout::builder("ACCOUNTS").with_record(row).build().unwrap();

    let mut line = Vec::new();
    let name = layout.field_by_name("NAME").unwrap();
    let balance = layout.field_by_name("BALANCE").unwrap();
    line = layout.set_field_value(&line, name, "Smith, J").unwrap();
    line = layout.set_field_value(&line, balance, "-4.5").unwrap();
    assert_eq!(line, b"\"Smith, J\",-00450");

    assert_eq!(layout.get_field_value(&line, name).unwrap(), "Smith, J");
    assert_eq!(layout.get_field_value(&line, balance).unwrap(), "-004.50");
    assert_eq!(
        layout.decode_decimal(&line, balance).unwrap().to_string(),
        "-4.50"
    );

    // The note cell was never written and reads as empty.
    let note = layout.field_by_name("NOTE").unwrap();
    assert_eq!(layout.get_field_value(&line, note).unwrap(), "");
}

#[test]
fn test_schema_survives_serde() {
    let record = Record::new(
        "DETAIL",
        RecordKind::FixedLength,
        vec![
            Field::new("ITEM", FieldType::FixedChar, 1, 8),
            Field::new("PRICE", FieldType::Zoned, 9, 6).with_scale(2),
        ],
    )
    .with_font_name("cp037")
    .with_selection(RecordSelection::new("ITEM", "BOLT"));

    let json = serde_json::to_string(&record).unwrap();
    // Runtime-only details stay out of the persisted schema.
    assert!(!json.contains("record_index"));
    assert!(!json.contains("lookup_name"));

    let parsed: Record = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.name(), "DETAIL");
    assert_eq!(parsed.field_count(), 2);

    // The record carries its own font, so the rebuilt layout still
    // writes EBCDIC even though the layout itself names none.
    let layout = Layout::builder("SALES").with_record(parsed).build().unwrap();
    let item = layout.field_by_name("ITEM").unwrap();
    let price = layout.field_by_name("PRICE").unwrap();
    let mut data = Vec::new();
    data = layout.set_field_value(&data, item, "BOLT").unwrap();
    data = layout.set_field_value(&data, price, "10.50").unwrap();
    assert_eq!(
        data,
        [0xC2, 0xD6, 0xD3, 0xE3, 0x40, 0x40, 0x40, 0x40, 0xF0, 0xF0, 0xF1, 0xF0, 0xF5, 0xC0]
    );
    assert_eq!(layout.get_field_value(&data, price).unwrap(), "0010.50");
}

#[test]
fn test_schema_defaults_when_fields_are_omitted() {
    let json = r#"{
        "name": "R",
        "kind": "Delimited",
        "fields": [
            {"name": "A", "field_type": "CsvString", "position": 1, "length": 0}
        ]
    }"#;
    let record: Record = serde_json::from_str(json).unwrap();
    assert_eq!(record.delimiter(), "\t");
    assert_eq!(record.quote(), "");
    assert_eq!(record.font_name(), "");
    assert!(record.selection().is_none());
    assert_eq!(record.field(0).unwrap().scale(), 0);
}
