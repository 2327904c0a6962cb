use crate::error::{FitError, Result};
use calamine::{open_workbook_auto, Reader};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Spreadsheet exports leave carriage returns behind as this literal token.
const CARRIAGE_RETURN_ARTIFACT: &str = "_x000D_";

/// A rectangular, header-normalized view of a tabular data file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table with trimmed, lowercased headers. Blank rows are skipped
    /// and every remaining row is padded or truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers
            .iter()
            .map(|h| normalize_header(h))
            .collect();
        let width = headers.len();

        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| {
                let mut cells: Vec<String> = row
                    .into_iter()
                    .map(|cell| cell.replace(CARRIAGE_RETURN_ARTIFACT, " "))
                    .collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();

        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = normalize_header(name);
        self.headers.iter().position(|h| *h == name)
    }

    /// First column whose header starts with `prefix`.
    pub fn column_with_prefix(&self, prefix: &str) -> Option<usize> {
        let prefix = normalize_header(prefix);
        self.headers.iter().position(|h| h.starts_with(&prefix))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

pub struct TableLoader;

impl TableLoader {
    pub fn new() -> Self {
        Self
    }

    /// Reads a CSV file or the first worksheet of a workbook, picked by extension.
    pub fn load_file(&self, file_path: &Path) -> Result<Table> {
        if !file_path.exists() {
            return Err(FitError::Config(format!(
                "data file not found: {}",
                file_path.display()
            )));
        }

        let extension = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let table = match extension.as_str() {
            "csv" => {
                let content = fs::read_to_string(file_path)?;
                self.parse_csv_content(&content)?
            }
            "xlsx" | "xlsm" | "xls" | "ods" => self.read_workbook(file_path)?,
            other => {
                return Err(FitError::Config(format!(
                    "unsupported data file type '{}': {}",
                    other,
                    file_path.display()
                )))
            }
        };

        if table.is_empty() {
            warn!("No data rows found in {}", file_path.display());
        } else {
            debug!(
                "Loaded {} rows x {} columns from {}",
                table.len(),
                table.headers.len(),
                file_path.display()
            );
        }

        Ok(table)
    }

    pub fn parse_csv_content(&self, content: &str) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::new(headers, rows))
    }

    fn read_workbook(&self, file_path: &Path) -> Result<Table> {
        let mut workbook = open_workbook_auto(file_path).map_err(|e| {
            FitError::Spreadsheet(format!("unable to open {}: {}", file_path.display(), e))
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                FitError::Spreadsheet(format!(
                    "workbook has no worksheets: {}",
                    file_path.display()
                ))
            })?
            .map_err(|e| FitError::Spreadsheet(format!("unable to read worksheet: {}", e)))?;

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
            None => return Ok(Table::default()),
        };

        let rows = rows_iter
            .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
            .collect();

        Ok(Table::new(headers, rows))
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}
