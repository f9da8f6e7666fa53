use quick_xml::escape::escape;
use serde_json::json;
use sheetread_core::reader::read_workbook_from_bytes;
use sheetread_core::reference::column_label;
use sheetread_core::{
    ExcelReader, HeaderAlignment, ReadError, ReadOptions, ReaderConfig, ReaderPlugin,
};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Cell content for fixture worksheets
enum Fx {
    Str(&'static str),
    Num(f64),
    Bool(bool),
    Error(&'static str),
    /// Date serial rendered with a built-in date-time number format
    Date(f64),
    Blank,
}

use Fx::*;

fn cell_xml(reference: &str, cell: &Fx) -> Option<String> {
    match cell {
        Str(s) => Some(format!(
            r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            reference,
            escape(*s)
        )),
        Num(n) => Some(format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n)),
        Bool(b) => Some(format!(
            r#"<c r="{}" t="b"><v>{}</v></c>"#,
            reference,
            if *b { 1 } else { 0 }
        )),
        Error(e) => Some(format!(r#"<c r="{}" t="e"><v>{}</v></c>"#, reference, e)),
        Date(serial) => Some(format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, reference, serial)),
        Blank => None,
    }
}

fn worksheet_xml(rows: &[Vec<Fx>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        let cells: String = row
            .iter()
            .enumerate()
            .filter_map(|(c, cell)| {
                let reference = format!("{}{}", column_label(c as u32 + 1), r + 1);
                cell_xml(&reference, cell)
            })
            .collect();
        if !cells.is_empty() {
            xml.push_str(&format!(r#"<row r="{}">{}</row>"#, r + 1, cells));
        }
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

// Build a minimal valid XLSX container in memory
fn build_xlsx(sheets: &[(&str, Vec<Vec<Fx>>)]) -> anyhow::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options)?;
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
"#,
    );
    for i in 0..sheets.len() {
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i + 1
        ));
    }
    content_types.push_str("</Types>");
    zip.write_all(content_types.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    let mut workbook_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        workbook_xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(*name),
            i + 1,
            i + 1
        ));
    }
    workbook_xml.push_str("</sheets></workbook>");
    zip.write_all(workbook_xml.as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 0..sheets.len() {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }
    rels.push_str(
        r#"<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    );
    rels.push_str("</Relationships>");
    zip.write_all(rels.as_bytes())?;

    // Style 1 uses built-in format 22 (m/d/yy h:mm)
    zip.start_file("xl/styles.xml", options)?;
    zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="22" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#.as_bytes())?;

    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        zip.write_all(worksheet_xml(rows).as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

fn read_json(payload: &[u8], options: &ReadOptions) -> serde_json::Value {
    let records = ExcelReader::new().read(payload, options).unwrap();
    serde_json::to_value(&records).unwrap()
}

#[test]
fn test_reads_workbook_model() {
    let payload = build_xlsx(&[
        ("First", vec![vec![Str("a"), Num(1.0)]]),
        ("Second", vec![vec![Blank, Blank], vec![Blank, Bool(true)]]),
    ])
    .unwrap();

    let workbook = read_workbook_from_bytes(&payload).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["First", "Second"]);

    let second = workbook.get_sheet("Second").unwrap();
    assert_eq!(second.max_row, 2);
    assert_eq!(second.max_column, 2);
    assert!(second.value(1, 1).is_empty());
}

#[test]
fn test_no_header_keys_by_column_label() {
    let mut row: Vec<Fx> = (0..26).map(|_| Blank).collect();
    row[0] = Str("first");
    row[1] = Num(2.0);
    row.push(Str("twenty-seventh"));
    let payload = build_xlsx(&[("Sheet1", vec![row])]).unwrap();

    let records = ExcelReader::new()
        .read(&payload, &ReadOptions::default())
        .unwrap();
    let record = &records["Sheet1"][0];
    assert_eq!(record.len(), 27);
    assert_eq!(record["A"], sheetread_core::Value::String("first".to_string()));
    assert_eq!(record["B"], sheetread_core::Value::Number(2.0));
    assert!(record["Z"].is_null());
    assert_eq!(
        record["AA"],
        sheetread_core::Value::String("twenty-seventh".to_string())
    );
}

#[test]
fn test_header_row_maps_names() {
    let payload = build_xlsx(&[(
        "People",
        vec![
            vec![Str("Name"), Str("Age"), Str("Home Town")],
            vec![Str("Alice"), Num(30.0), Str("Oslo")],
        ],
    )])
    .unwrap();

    // The compat header scan stops before the last column
    assert_eq!(
        read_json(&payload, &ReadOptions::with_header_row(1)),
        json!({ "People": [{ "name": "Alice", "age": 30 }] })
    );

    let positional = ReadOptions {
        header_row: Some(1),
        header_alignment: Some(HeaderAlignment::Positional),
    };
    assert_eq!(
        read_json(&payload, &positional),
        json!({ "People": [{ "name": "Alice", "age": 30, "home_town": "Oslo" }] })
    );
}

#[test]
fn test_rows_up_to_header_are_excluded() {
    let payload = build_xlsx(&[(
        "Report",
        vec![
            vec![Str("Sales export"), Blank, Str("draft")],
            vec![Str("Region"), Str("Units"), Blank],
            vec![Str("North"), Num(12.0), Blank],
            vec![Str("South"), Num(7.5), Blank],
        ],
    )])
    .unwrap();

    assert_eq!(
        read_json(&payload, &ReadOptions::with_header_row(2)),
        json!({ "Report": [
            { "region": "North", "units": 12 },
            { "region": "South", "units": 7.5 }
        ] })
    );
}

#[test]
fn test_empty_rows_are_suppressed() {
    let payload = build_xlsx(&[(
        "Gaps",
        vec![
            vec![Str("top"), Blank],
            vec![Blank, Blank],
            vec![Blank, Bool(false)],
        ],
    )])
    .unwrap();

    assert_eq!(
        read_json(&payload, &ReadOptions::default()),
        json!({ "Gaps": [{ "A": "top", "B": null }, { "A": null, "B": false }] })
    );
}

#[test]
fn test_sheets_without_records_are_omitted() {
    let payload = build_xlsx(&[
        ("Empty", vec![]),
        ("R&D", vec![vec![Str("kept")]]),
        ("HeaderOnly", vec![vec![Str("Id"), Str("Value")]]),
    ])
    .unwrap();

    let options = ReadOptions::default();
    let records = ExcelReader::new().read(&payload, &options).unwrap();
    assert_eq!(records.keys().collect::<Vec<_>>(), vec!["R&D", "HeaderOnly"]);

    // With a header on every sheet nothing survives
    let records = ExcelReader::new()
        .read(&payload, &ReadOptions::with_header_row(1))
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_error_cells_read_as_text() {
    let payload = build_xlsx(&[(
        "Calc",
        vec![
            vec![Str("total"), Error("#DIV/0!"), Num(4.0)],
            vec![Blank, Error("#N/A"), Blank],
        ],
    )])
    .unwrap();

    assert_eq!(
        read_json(&payload, &ReadOptions::default()),
        json!({ "Calc": [
            { "A": "total", "B": "#DIV/0!", "C": 4 },
            { "A": null, "B": "#N/A", "C": null },
        ] })
    );
}

#[test]
fn test_date_formatted_cells_read_as_datetimes() {
    let payload = build_xlsx(&[(
        "Log",
        vec![
            vec![Str("When"), Str("What"), Blank],
            vec![Date(45000.5), Str("launch"), Str("x")],
        ],
    )])
    .unwrap();

    assert_eq!(
        read_json(&payload, &ReadOptions::with_header_row(1)),
        json!({ "Log": [{ "when": "2023-03-15T12:00:00", "what": "launch" }] })
    );
}

#[test]
fn test_empty_header_cell_scenario() {
    let three_columns = build_xlsx(&[(
        "Sheet1",
        vec![
            vec![Str("Name"), Blank, Str("Score")],
            vec![Str("Bob"), Str("x"), Num(95.0)],
        ],
    )])
    .unwrap();

    assert_eq!(
        read_json(&three_columns, &ReadOptions::with_header_row(1)),
        json!({ "Sheet1": [{ "name": "Bob" }] })
    );

    let positional = ReadOptions {
        header_row: Some(1),
        header_alignment: Some(HeaderAlignment::Positional),
    };
    assert_eq!(
        read_json(&three_columns, &positional),
        json!({ "Sheet1": [{ "name": "Bob", "B": "x", "score": 95 }] })
    );

    let four_columns = build_xlsx(&[(
        "Sheet1",
        vec![
            vec![Str("Name"), Blank, Str("Score"), Str("Notes")],
            vec![Str("Bob"), Str("x"), Num(95.0), Str("n")],
        ],
    )])
    .unwrap();

    assert_eq!(
        read_json(&four_columns, &ReadOptions::with_header_row(1)),
        json!({ "Sheet1": [{ "name": "Bob", "score": "x" }] })
    );
}

#[test]
fn test_config_drives_per_sheet_headers() {
    let payload = build_xlsx(&[
        ("Plain", vec![vec![Str("a")]]),
        (
            "Table",
            vec![
                vec![Str("Key"), Blank],
                vec![Str("k1"), Num(1.0)],
            ],
        ),
    ])
    .unwrap();

    let config = ReaderConfig::parse(
        r#"
        [sheets.Table]
        header_row = 1
        "#,
    )
    .unwrap();
    let records = ExcelReader::with_config(config)
        .read(&payload, &ReadOptions::default())
        .unwrap();
    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!({ "Plain": [{ "A": "a" }], "Table": [{ "key": "k1" }] })
    );
}

#[test]
fn test_malformed_payload_fails() {
    let result = ExcelReader::new().read(b"PK\x03\x04 truncated", &ReadOptions::default());
    assert!(matches!(result, Err(ReadError::Parse(_))));
}

#[test]
fn test_read_file_from_disk() {
    let payload = build_xlsx(&[("Sheet1", vec![vec![Str("on disk")]])]).unwrap();
    let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    file.write_all(&payload).unwrap();

    let records = ExcelReader::new()
        .read_file(file.path(), &ReadOptions::default())
        .unwrap();
    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!({ "Sheet1": [{ "A": "on disk" }] })
    );

    let missing = ExcelReader::new().read_file(
        file.path().with_extension("missing"),
        &ReadOptions::default(),
    );
    assert!(matches!(missing, Err(ReadError::Io(_))));
}
