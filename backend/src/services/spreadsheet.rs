//! Spreadsheet export
//!
//! The report is first laid out as plain sheets of cells, then written to an
//! XLSX workbook with `rust_xlsxwriter`.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use crate::error::AppResult;
use crate::services::reporting::{InspectionReport, RESULT_HEADERS, SAMPLE_HEADERS};
use shared::FieldRecord;

/// Number format for the infestation index column
const INDEX_NUM_FORMAT: &str = "0.00";

/// A spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(u32),
    /// Percentage already scaled to 0-100, shown with two decimals
    Percent(f64),
}

/// One worksheet: a header row followed by data rows
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// The three sheets of the inspection workbook
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookLayout {
    pub sheets: Vec<SheetLayout>,
}

impl WorkbookLayout {
    pub fn from_report(report: &InspectionReport) -> Self {
        let field_sheet = SheetLayout {
            name: "Hacienda".to_string(),
            headers: FieldRecord::LABELS.iter().map(|l| l.to_string()).collect(),
            rows: vec![field_record_row(&report.field_record)],
        };

        let sample_sheet = SheetLayout {
            name: "Muestreo".to_string(),
            headers: SAMPLE_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: report
                .samples
                .iter()
                .map(|s| {
                    vec![
                        Cell::Integer(s.sequence),
                        Cell::Integer(s.total_internodes),
                        Cell::Integer(s.damaged_internodes),
                    ]
                })
                .collect(),
        };

        let classification = &report.results.classification;
        let results_sheet = SheetLayout {
            name: "Resultados".to_string(),
            headers: RESULT_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: vec![vec![
                Cell::Percent(report.rounded_index().to_f64().unwrap_or_default()),
                Cell::Text(classification.tier_label.clone()),
                Cell::Text(classification.recommendation.clone()),
            ]],
        };

        Self {
            sheets: vec![field_sheet, sample_sheet, results_sheet],
        }
    }
}

fn field_record_row(record: &FieldRecord) -> Vec<Cell> {
    let values = record.values();
    vec![
        Cell::Text(values[0].clone()),
        Cell::Text(values[1].clone()),
        Cell::Text(values[2].clone()),
        Cell::Text(values[3].clone()),
        Cell::Text(values[4].clone()),
        Cell::Integer(record.cut_age_months),
        Cell::Integer(record.cut_number),
        Cell::Text(values[7].clone()),
        Cell::Text(values[8].clone()),
    ]
}

/// Write the workbook layout to XLSX bytes
pub fn write_xlsx(layout: &WorkbookLayout) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_align(FormatAlign::Center);
    let index_format = Format::new().set_num_format(INDEX_NUM_FORMAT);

    for sheet in &layout.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
            worksheet.set_column_width(col as u16, (header.chars().count() + 4) as f64)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col, text)?;
                    }
                    Cell::Integer(value) => {
                        worksheet.write_number(row_num, col, f64::from(*value))?;
                    }
                    Cell::Percent(value) => {
                        worksheet.write_number_with_format(row_num, col, *value, &index_format)?;
                    }
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(bytes = bytes.len(), "Spreadsheet generated");
    Ok(bytes)
}

/// Lay out and write the inspection workbook
pub fn export_xlsx(report: &InspectionReport) -> AppResult<Vec<u8>> {
    write_xlsx(&WorkbookLayout::from_report(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reporting::tests::sample_report;
    use std::io::{Cursor, Read};

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn find_sheet<'a>(layout: &'a WorkbookLayout, name: &str) -> &'a SheetLayout {
        layout
            .sheets
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("missing sheet {}", name))
    }

    fn archive_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn workbook_has_three_named_sheets() {
        let layout = WorkbookLayout::from_report(&sample_report(&[(10, 1)]));
        let names: Vec<&str> = layout.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Hacienda", "Muestreo", "Resultados"]);
    }

    #[test]
    fn field_sheet_is_single_row_with_every_field() {
        let layout = WorkbookLayout::from_report(&sample_report(&[(10, 1)]));
        let sheet = find_sheet(&layout, "Hacienda");
        assert_eq!(sheet.headers.len(), 9);
        assert_eq!(
            sheet.rows,
            vec![vec![
                text("Hacienda El Paraíso"),
                text("Suerte 7"),
                text("CC 93-4418"),
                text("2024-01-15"),
                text("2025-02-10"),
                Cell::Integer(13),
                Cell::Integer(3),
                text("Ana Gómez"),
                text(""),
            ]]
        );
    }

    #[test]
    fn sample_sheet_keeps_insertion_order() {
        let layout = WorkbookLayout::from_report(&sample_report(&[(10, 2), (7, 7), (12, 0)]));
        let sheet = find_sheet(&layout, "Muestreo");
        assert_eq!(sheet.headers, vec!["Tallo", "Total entrenudos", "Entrenudos barrenados"]);
        assert_eq!(
            sheet.rows,
            vec![
                vec![Cell::Integer(1), Cell::Integer(10), Cell::Integer(2)],
                vec![Cell::Integer(2), Cell::Integer(7), Cell::Integer(7)],
                vec![Cell::Integer(3), Cell::Integer(12), Cell::Integer(0)],
            ]
        );
    }

    #[test]
    fn results_sheet_rounds_index() {
        let layout = WorkbookLayout::from_report(&sample_report(&[(3, 1)]));
        let sheet = find_sheet(&layout, "Resultados");
        match sheet.rows[0][0] {
            Cell::Percent(value) => assert!((value - 33.33).abs() < 1e-9),
            ref other => panic!("expected percent cell, got {:?}", other),
        }
        assert_eq!(sheet.rows[0][1], text("MUY DAÑADO"));
    }

    #[test]
    fn xlsx_bytes_are_a_zip_archive() {
        let bytes = export_xlsx(&sample_report(&[(10, 1)])).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn written_workbook_contains_sheets_and_values() {
        let bytes = export_xlsx(&sample_report(&[(10, 0), (10, 1)])).unwrap();

        let workbook = archive_entry(&bytes, "xl/workbook.xml");
        for name in ["Hacienda", "Muestreo", "Resultados"] {
            assert!(workbook.contains(&format!("name=\"{}\"", name)), "sheet {}", name);
        }

        let strings = archive_entry(&bytes, "xl/sharedStrings.xml");
        for value in [
            "Hacienda El Paraíso",
            "Suerte 7",
            "CC 93-4418",
            "2024-01-15",
            "Ana Gómez",
            "Número de corte",
            "Entrenudos barrenados",
            "Índice de Infestación (%)",
            "DAÑADO",
            "15 Parejas de moscas / Ha - 5 y 7 meses, 50 Pulg de avispas / Ha - 7 meses",
        ] {
            assert!(strings.contains(value), "missing {}", value);
        }

        let samples = archive_entry(&bytes, "xl/worksheets/sheet2.xml");
        assert!(samples.contains("<v>10</v>"));
        let results = archive_entry(&bytes, "xl/worksheets/sheet3.xml");
        assert!(results.contains("<v>5</v>"));
    }
}
