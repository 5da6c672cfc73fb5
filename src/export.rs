use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use crate::data::frame::{CellValue, Frame};

/// MIME type of the exported workbook, for download wiring.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Encode a frame as a single-sheet xlsx workbook: header row of column
/// names, one row per record. Null cells are left blank.
pub fn to_xlsx(frame: &Frame) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").context("naming worksheet")?;

    for (col, name) in frame.names().iter().enumerate() {
        sheet
            .write_string(0, col as u16, name)
            .with_context(|| format!("writing header '{name}'"))?;
    }

    for (col, (name, values)) in frame.columns().enumerate() {
        for (row, cell) in values.iter().enumerate() {
            let (r, c) = (row as u32 + 1, col as u16);
            match cell {
                CellValue::String(s) => sheet.write_string(r, c, s),
                CellValue::Integer(i) => sheet.write_number(r, c, *i as f64),
                CellValue::Float(v) => sheet.write_number(r, c, *v),
                CellValue::Bool(b) => sheet.write_boolean(r, c, *b),
                CellValue::Null => continue,
            }
            .with_context(|| format!("writing '{name}' row {row}"))?;
        }
    }

    workbook.save_to_buffer().context("encoding workbook")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_bytes_are_a_zip_container() {
        let frame = Frame::from_columns(
            vec!["a".into()],
            vec![vec![CellValue::Integer(1), CellValue::Null]],
        )
        .unwrap();
        let bytes = to_xlsx(&frame).unwrap();
        // xlsx is a zip archive; PK magic is enough of a smoke test here,
        // the full read-back lives in tests/pipeline.rs.
        assert_eq!(&bytes[..2], b"PK");
    }
}
