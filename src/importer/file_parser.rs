// ==========================================
// 生猪运输排程仿真 - 文件解析器
// ==========================================
// 支持: Excel (.xlsx) / CSV (.csv)
// 输出: 带源行号的原始记录 (表头 → 去空白后的值)
// 规则: 完全空白的行跳过
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始记录 (一行)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub row: usize, // 源文件行号 (表头为第 1 行)
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// 读取非空字段
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
}

/// 解析后的表
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    fn from_rows<I>(headers: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = (usize, Vec<String>)>,
    {
        let mut records = Vec::new();
        for (row, values) in rows {
            let fields: HashMap<String, String> = headers
                .iter()
                .cloned()
                .zip(values.into_iter().map(|v| v.trim().to_string()))
                .collect();

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(RawRecord { row, fields });
        }
        Self { headers, records }
    }
}

// ==========================================
// Trait: FileParser
// ==========================================
pub trait FileParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            rows.push((row, record.iter().map(str::to_string).collect()));
        }

        Ok(RawTable::from_rows(headers, rows))
    }
}

// ==========================================
// Excel Parser 实现 (读取第一个工作表)
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let data = rows
            .enumerate()
            .map(|(idx, cells)| (idx + 2, cells.iter().map(|c| c.to_string()).collect()));

        Ok(RawTable::from_rows(headers, data))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_table(path),
            "xlsx" => ExcelParser.parse_table(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_csv_parser_trims_and_numbers_rows() {
        let file = csv_file("farm_id , name\n F1 , Granja\n\n,\nF2,Altra\n");
        let table = CsvParser.parse_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["farm_id", "name"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].get("farm_id"), Some("F1"));
        assert_eq!(table.records[0].row, 2);
        assert_eq!(table.records[1].get("name"), Some("Altra"));
    }

    #[test]
    fn test_missing_file() {
        let result = UniversalFileParser.parse("/nonexistent/farms.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = UniversalFileParser.parse("farms.txt");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_value_is_none() {
        let file = csv_file("farm_id,name\nF1,\n");
        let table = CsvParser.parse_table(file.path()).unwrap();
        assert_eq!(table.records[0].get("name"), None);
        assert!(table.records[0].has_column("name"));
    }
}
