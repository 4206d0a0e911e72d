//! Xero CSV 写出服务 - 业务能力层
//!
//! 只负责"把累积的行写成 Xero 导入文件"能力，不关心流程。
//! 引号、分隔符、换行的转义交给 `csv` crate。

use std::path::Path;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::invoice::{FlatRow, XERO_CSV_HEADER};

/// 把固定表头和所有行写入目标文件
///
/// 先写 16 列固定表头，再按累积顺序写每一行。零行时仍然产出
/// 只有表头的文件，这是一个合法的空导入文件。目标无法创建或
/// 写入失败返回 [`AppError::CsvWrite`]，不影响内存中已提取的数据。
pub fn write_rows(path: &Path, rows: &[FlatRow]) -> AppResult<()> {
    let display_path = path.display().to_string();

    let mut writer =
        csv::Writer::from_path(path).map_err(|e| AppError::csv_write(&display_path, e))?;

    writer
        .write_record(XERO_CSV_HEADER)
        .map_err(|e| AppError::csv_write(&display_path, e))?;

    for row in rows {
        writer
            .write_record(row.iter())
            .map_err(|e| AppError::csv_write(&display_path, e))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::csv_write(&display_path, e))?;

    info!("💾 CSV 已保存至: {} (共 {} 行数据)", display_path, rows.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(description: &str) -> FlatRow {
        let mut row: FlatRow = std::array::from_fn(|_| String::new());
        row[5] = description.to_string();
        row[9] = "200".to_string();
        row[10] = "GST on Income".to_string();
        row
    }

    #[test]
    fn test_zero_rows_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_rows(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("*ContactName,*InvoiceNumber"));
        assert!(header.ends_with("TrackingName2,TrackingOption2,Currency"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_rows_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_rows(&path, &[row_with("第一行"), row_with("第二行")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("第一行"));
        assert!(lines[2].contains("第二行"));
    }

    #[test]
    fn test_values_with_delimiter_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");

        write_rows(&path, &[row_with("Widgets, assorted")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Widgets, assorted\""));

        // 读回来仍然是 16 个单元格
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 16);
        assert_eq!(&record[5], "Widgets, assorted");
    }

    #[test]
    fn test_unwritable_destination_is_csv_write_error() {
        let result = write_rows(Path::new("/不存在的目录/out.csv"), &[]);
        assert!(matches!(result, Err(AppError::CsvWrite { .. })));
    }
}
