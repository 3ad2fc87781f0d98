use async_trait::async_trait;
use calamine::{Data, Reader, open_workbook_auto};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::csv_roster::parse_csv_roster;
use super::{LoadError, SheetLoader};
use crate::grades::{CellValue, Roster};

/// Reads the roster from a local `.csv` export or an Excel workbook.
#[derive(Debug, Clone)]
pub struct FileSheetLoader {
    path: PathBuf,
    worksheet: Option<String>,
}

impl FileSheetLoader {
    pub fn new(path: impl Into<PathBuf>, worksheet: Option<String>) -> Self {
        Self {
            path: path.into(),
            worksheet,
        }
    }

    fn read_csv(&self) -> Result<Roster, LoadError> {
        let text = fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_csv_roster(&text)
    }

    fn read_workbook(&self) -> Result<Roster, LoadError> {
        let workbook_error = |source| LoadError::Workbook {
            path: self.path.clone(),
            source,
        };

        let mut workbook = open_workbook_auto(&self.path).map_err(workbook_error)?;
        let available = workbook.sheet_names();

        let name = match &self.worksheet {
            Some(name) if available.contains(name) => name.clone(),
            Some(name) => {
                return Err(LoadError::MissingWorksheet {
                    name: name.clone(),
                    available,
                });
            }
            None => available
                .first()
                .cloned()
                .ok_or_else(|| LoadError::MissingWorksheet {
                    name: "<first sheet>".to_string(),
                    available: Vec::new(),
                })?,
        };
        debug!("Reading worksheet '{}' from {:?}", name, self.path);

        let range = workbook.worksheet_range(&name).map_err(workbook_error)?;
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header) => header.iter().map(|cell| cell.to_string()).collect(),
            None => return Ok(Roster::default()),
        };
        let records = rows.map(|row| row.iter().map(cell_value).collect::<Vec<_>>());

        Ok(Roster::from_records(headers, records))
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(int) => CellValue::Integer(*int),
        Data::Float(float) => CellValue::Float(*float),
        Data::String(text) if text.trim().is_empty() => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

#[async_trait]
impl SheetLoader for FileSheetLoader {
    async fn load(&self) -> Result<Arc<Roster>, LoadError> {
        let roster = match extension(&self.path).as_deref() {
            Some("csv") => self.read_csv()?,
            Some("xlsx" | "xlsm" | "xls") => self.read_workbook()?,
            _ => return Err(LoadError::UnsupportedFile(self.path.clone())),
        };
        debug!("Loaded roster ({} rows) from {:?}", roster.len(), self.path);
        Ok(Arc::new(roster))
    }

    fn describe(&self) -> String {
        match &self.worksheet {
            Some(sheet) => format!("{} [{}]", self.path.display(), sheet),
            None => self.path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    /// Workbook with a roster tab, a second tab, an empty tab and a header-only tab.
    fn write_workbook(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("grades.xlsx");
        let mut workbook = Workbook::new();

        let roster = workbook.add_worksheet();
        roster.set_name("Roster").unwrap();
        roster.write_string(0, 0, "ID Number").unwrap();
        roster.write_string(0, 1, "Quiz 1 Scores").unwrap();
        roster.write_number(1, 0, 202412345.0).unwrap();
        roster.write_number(1, 1, 18.0).unwrap();
        roster.write_string(2, 0, "2023-654321").unwrap();
        roster.write_number(2, 1, 15.5).unwrap();

        let midterm = workbook.add_worksheet();
        midterm.set_name("Midterm").unwrap();
        midterm.write_string(0, 0, "ID Number").unwrap();
        midterm.write_string(0, 1, "Midterm Total").unwrap();
        midterm.write_number(1, 0, 202412345.0).unwrap();
        midterm.write_number(1, 1, 42.5).unwrap();

        workbook.add_worksheet().set_name("Blank").unwrap();

        let headers = workbook.add_worksheet();
        headers.set_name("Headers").unwrap();
        headers.write_string(0, 0, "ID Number").unwrap();
        headers.write_string(0, 1, "Final Exam").unwrap();

        workbook.save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_csv_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("roster.csv");
        fs::write(&path, "ID Number,Quiz 1\n202412345,17\n").unwrap();

        let roster = FileSheetLoader::new(&path, None).load().await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.rows()[0].display("Quiz 1"), "17");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let loader = FileSheetLoader::new(temp_dir.path().join("absent.csv"), None);

        assert!(matches!(loader.load().await, Err(LoadError::Io { .. })));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let loader = FileSheetLoader::new("roster.ods.bak", None);
        assert!(matches!(loader.load().await, Err(LoadError::UnsupportedFile(_))));
    }

    #[tokio::test]
    async fn test_workbook_defaults_to_first_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_workbook(&temp_dir);

        let roster = FileSheetLoader::new(&path, None).load().await.unwrap();
        assert_eq!(roster.columns(), ["ID Number", "Quiz 1 Scores"]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.rows()[0].display("ID Number"), "202412345.0");
        assert_eq!(roster.rows()[0].get("Quiz 1 Scores"), Some(&CellValue::Float(18.0)));
        assert_eq!(roster.rows()[1].display("ID Number"), "2023-654321");
    }

    #[tokio::test]
    async fn test_workbook_named_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_workbook(&temp_dir);

        let loader = FileSheetLoader::new(&path, Some("Midterm".to_string()));
        let roster = loader.load().await.unwrap();
        assert_eq!(roster.columns(), ["ID Number", "Midterm Total"]);
        assert_eq!(roster.rows()[0].display("Midterm Total"), "42.5");
        assert!(loader.describe().ends_with("[Midterm]"));
    }

    #[tokio::test]
    async fn test_workbook_missing_sheet_lists_available() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_workbook(&temp_dir);

        let err = FileSheetLoader::new(&path, Some("Final".to_string()))
            .load()
            .await
            .unwrap_err();
        match err {
            LoadError::MissingWorksheet { name, available } => {
                assert_eq!(name, "Final");
                assert_eq!(available, ["Roster", "Midterm", "Blank", "Headers"]);
            }
            other => panic!("expected a missing worksheet error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_workbook_empty_and_header_only_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_workbook(&temp_dir);

        let blank = FileSheetLoader::new(&path, Some("Blank".to_string()))
            .load()
            .await
            .unwrap();
        assert!(blank.is_empty());
        assert!(blank.columns().iter().all(|c| c.is_empty()));

        let headers = FileSheetLoader::new(&path, Some("Headers".to_string()))
            .load()
            .await
            .unwrap();
        assert!(headers.is_empty());
        assert_eq!(headers.columns(), ["ID Number", "Final Exam"]);
    }

    #[test]
    fn test_workbook_cell_mapping() {
        assert_eq!(cell_value(&Data::Float(202412345.0)), CellValue::Float(202412345.0));
        assert_eq!(cell_value(&Data::String("  ".to_string())), CellValue::Empty);
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Text("true".to_string()));
    }
}
