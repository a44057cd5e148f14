//! Tagged cell values read from spreadsheet sources
//!
//! Extraction logic matches on the tag instead of guessing at stringly cell
//! contents; the permissive text coercions live here as explicit, testable
//! branches.

use chrono::NaiveDate;

/// Date formats accepted from text cells, tried in order.
///
/// ISO first, then the day-first forms the source documents use.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// A raw spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    /// True for missing cells and whitespace-only text
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text rendering; `None` for empty cells.
    ///
    /// Integer-valued numbers render without a decimal point so item codes
    /// read from numeric cells stay clean ("5", not "5.0").
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            CellValue::Date(d) => Some(d.to_string()),
        }
    }

    /// Numeric reading; text cells are parsed permissively.
    ///
    /// Accepts a trailing percent sign and comma decimals from Latin-locale
    /// sheets ("25,5", "1.234,56"). Anything unparseable is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => {
                let mut t = s.trim().trim_end_matches('%').trim().to_string();
                if t.is_empty() {
                    return None;
                }
                if t.contains(',') {
                    if t.contains('.') {
                        t = t.replace('.', "").replace(',', ".");
                    } else {
                        t = t.replace(',', ".");
                    }
                }
                t.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Date reading; text cells are tried against [`DATE_FORMATS`].
    ///
    /// Numbers never coerce to dates: bare Excel serials are too ambiguous
    /// to guess at, and properly formatted date cells arrive as `Date`.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => {
                let t = s.trim();
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
            }
            _ => None,
        }
    }
}
