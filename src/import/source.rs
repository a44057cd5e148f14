//! Tabular sources for the importer
//!
//! A [`SheetSource`] hands out named [`Sheet`]s of header-keyed rows.
//! Implementations: Excel workbooks ([`XlsxSource`]), directories of
//! per-sheet CSV files ([`CsvDirSource`]), and in-memory data
//! ([`MemorySource`]).

use std::collections::HashMap;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use chrono::NaiveDate;
use thiserror::Error;

use super::cell::CellValue;

/// Errors opening or reading a source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Could not read workbook: {0}")]
    Workbook(#[from] XlsxError),

    #[error("Could not read CSV sheet {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of a sheet, keyed by normalized header name
#[derive(Debug, Clone)]
pub struct SheetRow {
    cells: HashMap<String, CellValue>,
}

impl SheetRow {
    /// Look up a cell by column name, case-insensitively.
    ///
    /// Missing columns read as [`CellValue::Empty`] so extraction code never
    /// has to distinguish "column absent" from "cell blank".
    pub fn get(&self, column: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells
            .get(&normalize_header(column))
            .unwrap_or(&EMPTY)
    }
}

/// A named sheet of rows
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// Header row as found in the source, trimmed
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Build a sheet from a header row and raw cell rows
    pub fn from_rows(name: &str, headers: Vec<String>, raw_rows: Vec<Vec<CellValue>>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

        let rows = raw_rows
            .into_iter()
            .map(|raw| {
                let mut cells = HashMap::new();
                for (header, cell) in headers.iter().zip(raw) {
                    let key = normalize_header(header);
                    if !key.is_empty() {
                        cells.insert(key, cell);
                    }
                }
                SheetRow { cells }
            })
            .collect();

        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Match sheet names ignoring surrounding whitespace; cover sheets in the
/// field carry trailing spaces in their names
fn name_matches(candidate: &str, wanted: &str) -> bool {
    candidate.trim() == wanted.trim()
}

/// A source of named sheets
pub trait SheetSource {
    /// All sheet names present in the source
    fn sheet_names(&self) -> Vec<String>;

    /// Read one sheet; `Ok(None)` when the sheet does not exist
    fn read_sheet(&mut self, name: &str) -> Result<Option<Sheet>, SourceError>;
}

// =============================================================================
// Excel workbooks
// =============================================================================

/// An `.xlsx`/`.xlsm` workbook source
pub struct XlsxSource {
    workbook: Xlsx<BufReader<std::fs::File>>,
}

impl XlsxSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        let workbook: Xlsx<_> = open_workbook(path)?;
        Ok(Self { workbook })
    }
}

impl SheetSource for XlsxSource {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Option<Sheet>, SourceError> {
        let actual = match self
            .sheet_names()
            .into_iter()
            .find(|candidate| name_matches(candidate, name))
        {
            Some(actual) => actual,
            None => return Ok(None),
        };

        let range = self.workbook.worksheet_range(&actual)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| data_to_cell(cell).as_text().unwrap_or_default())
                .collect(),
            None => Vec::new(),
        };

        let raw_rows: Vec<Vec<CellValue>> = rows
            .map(|row| row.iter().map(data_to_cell).collect())
            .collect();

        Ok(Some(Sheet::from_rows(&actual, headers, raw_rows)))
    }
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Date(ndt.date()),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) => match parse_iso_date(s) {
            Some(d) => CellValue::Date(d),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        // Formula errors read as blanks; row-level defaulting handles them
        Data::Error(_) => CellValue::Empty,
    }
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

// =============================================================================
// CSV directories
// =============================================================================

/// A directory of `<sheet>.csv` files, one file per sheet
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::NotFound(dir.to_path_buf()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn sheet_files(&self) -> Vec<(String, PathBuf)> {
        let mut files: Vec<(String, PathBuf)> = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.extension()
                        .map(|ext| ext.eq_ignore_ascii_case("csv"))
                        .unwrap_or(false)
                })
                .filter_map(|p| {
                    let stem = p.file_stem()?.to_string_lossy().to_string();
                    Some((stem, p))
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        files.sort();
        files
    }
}

impl SheetSource for CsvDirSource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheet_files().into_iter().map(|(name, _)| name).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Option<Sheet>, SourceError> {
        let (actual, path) = match self
            .sheet_files()
            .into_iter()
            .find(|(candidate, _)| name_matches(candidate, name))
        {
            Some(found) => found,
            None => return Ok(None),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| SourceError::Csv {
                path: path.clone(),
                source,
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| SourceError::Csv {
                path: path.clone(),
                source,
            })?
            .iter()
            .map(String::from)
            .collect();

        let mut raw_rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| SourceError::Csv {
                path: path.clone(),
                source,
            })?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect();
            raw_rows.push(row);
        }

        Ok(Some(Sheet::from_rows(&actual, headers, raw_rows)))
    }
}

// =============================================================================
// In-memory sheets
// =============================================================================

/// An in-memory source, for tests and programmatic use
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: Vec<Sheet>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(
        mut self,
        name: &str,
        headers: &[&str],
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        self.sheets.push(Sheet::from_rows(name, headers, rows));
        self
    }
}

impl SheetSource for MemorySource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Option<Sheet>, SourceError> {
        Ok(self
            .sheets
            .iter()
            .find(|s| name_matches(&s.name, name))
            .cloned())
    }
}
