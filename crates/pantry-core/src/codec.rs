//! Reader and writer for the pantry CSV file.
//!
//! The file is a header row `name,quantity,category,expiry` followed by one
//! row per item. Fields containing a comma, a double quote, or a line break
//! are wrapped in double quotes with inner quotes doubled. Lines end in `\n`.
//!
//! The reader is more forgiving than the writer: it accepts `\r\n`, a UTF-8
//! byte-order mark, blank lines, columns in any order, extra columns, and
//! rows shorter than the header. It is strict about two things, since a file
//! that fails them is treated as unreadable by the store: the `expiry`
//! column must be present and every non-blank `expiry` cell must be an ISO
//! date.

use crate::error::ErrorCode;
use crate::model::Item;
use crate::normalize::{RawItem, RawValue, parse_iso_date};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from reading or writing the data file.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("header is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("line {line}: expected at most {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid expiry date '{value}'")]
    InvalidDate { line: usize, value: String },
}

impl CodecError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Write { .. } => ErrorCode::DataFileWriteFailed,
            Self::Read { .. }
            | Self::UnterminatedQuote { .. }
            | Self::MissingColumn { .. }
            | Self::FieldCount { .. }
            | Self::InvalidDate { .. } => ErrorCode::MalformedDataFile,
        }
    }
}

/// One parsed CSV record and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split CSV text into records. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`CodecError::UnterminatedQuote`] if the text ends inside a
/// quoted field.
pub fn parse_records(text: &str) -> Result<Vec<Record>, CodecError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_record(&mut records, &mut fields, &mut field, quoted, record_line);
                quoted = false;
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CodecError::UnterminatedQuote { line: record_line });
    }
    finish_record(&mut records, &mut fields, &mut field, quoted, record_line);

    Ok(records)
}

fn finish_record(
    records: &mut Vec<Record>,
    fields: &mut Vec<String>,
    field: &mut String,
    quoted: bool,
    line: usize,
) {
    if fields.is_empty() && field.is_empty() && !quoted {
        return;
    }
    fields.push(std::mem::take(field));
    records.push(Record {
        line,
        fields: std::mem::take(fields),
    });
}

/// Parse the data file contents into raw records keyed by column name.
///
/// Empty text yields no records. Cells come back as [`RawValue::Text`],
/// except `expiry`, which is parsed here into [`RawValue::Date`]; blank
/// cells and cells past the end of a short row are [`RawValue::Missing`].
///
/// # Errors
///
/// See the module docs for what makes a file unreadable.
pub fn read_items(text: &str) -> Result<Vec<RawItem>, CodecError> {
    let mut records = parse_records(text)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };

    let position = |column: &str| {
        header
            .fields
            .iter()
            .position(|name| name.trim() == column)
    };
    if position("expiry").is_none() {
        return Err(CodecError::MissingColumn { column: "expiry" });
    }
    let columns: Vec<(&'static str, Option<usize>)> = Item::COLUMNS
        .iter()
        .map(|&column| (column, position(column)))
        .collect();

    let width = header.fields.len();
    let mut items = Vec::new();
    for record in records {
        if record.fields.len() > width {
            return Err(CodecError::FieldCount {
                line: record.line,
                expected: width,
                found: record.fields.len(),
            });
        }

        let mut raw = RawItem::new();
        for &(column, idx) in &columns {
            let Some(cell) = idx.and_then(|i| record.fields.get(i)) else {
                continue;
            };
            if column == "expiry" {
                let trimmed = cell.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let date = parse_iso_date(trimmed).ok_or_else(|| CodecError::InvalidDate {
                    line: record.line,
                    value: cell.clone(),
                })?;
                raw.insert(column, date);
            } else if cell.is_empty() {
                raw.insert(column, RawValue::Missing);
            } else {
                raw.insert(column, cell.as_str());
            }
        }
        items.push(raw);
    }

    Ok(items)
}

/// Serialize items with a header row.
#[must_use]
pub fn write_items(items: &[Item]) -> String {
    let mut out = Item::COLUMNS.join(",");
    out.push('\n');
    for item in items {
        let row = [
            escape_field(&item.name).into_owned(),
            item.quantity.to_string(),
            escape_field(&item.category).into_owned(),
            item.expiry.format("%Y-%m-%d").to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field if it contains a separator, quote, or line break.
#[must_use]
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Read the data file at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_path(path: &Path) -> Result<Option<Vec<RawItem>>, CodecError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CodecError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    read_items(&text).map(Some)
}

/// Overwrite the data file at `path` with `items`.
///
/// # Errors
///
/// Returns [`CodecError::Write`] if the file cannot be written.
pub fn write_path(path: &Path, items: &[Item]) -> Result<(), CodecError> {
    fs::write(path, write_items(items)).map_err(|source| CodecError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fields(records: &[Record]) -> Vec<Vec<&str>> {
        records
            .iter()
            .map(|r| r.fields.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn parses_plain_rows() {
        let records = parse_records("a,b\n1,2\n").unwrap();
        assert_eq!(fields(&records), vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn parses_quoted_fields() {
        let records = parse_records("\"Salt, sea\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(fields(&records), vec![vec!["Salt, sea", "say \"hi\""]]);
    }

    #[test]
    fn quoted_field_may_span_lines() {
        let records = parse_records("x,\"a\nb\"\ny,z\n").unwrap();
        assert_eq!(fields(&records), vec![vec!["x", "a\nb"], vec!["y", "z"]]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn crlf_bom_and_blank_lines() {
        let records = parse_records("\u{feff}a,b\r\n\r\n1,2\r\n").unwrap();
        assert_eq!(fields(&records), vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn missing_trailing_newline() {
        let records = parse_records("a,b\n1,").unwrap();
        assert_eq!(fields(&records), vec![vec!["a", "b"], vec!["1", ""]]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = parse_records("a,b\n\"oops,2\n").unwrap_err();
        assert!(matches!(err, CodecError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn write_matches_expected_bytes() {
        let items = vec![
            Item {
                name: "Olive Oil".into(),
                quantity: 2,
                category: "Oils".into(),
                expiry: date(2025, 1, 1),
            },
            Item {
                name: "Salt, sea".into(),
                quantity: 1,
                category: String::new(),
                expiry: date(2027, 12, 31),
            },
        ];
        assert_eq!(
            write_items(&items),
            "name,quantity,category,expiry\n\
             Olive Oil,2,Oils,2025-01-01\n\
             \"Salt, sea\",1,,2027-12-31\n"
        );
    }

    #[test]
    fn write_quotes_embedded_quotes_and_line_breaks() {
        let items = vec![Item {
            name: "12\" pizza\nfrozen".into(),
            quantity: 3,
            category: "Freezer".into(),
            expiry: date(2026, 2, 1),
        }];
        assert_eq!(
            write_items(&items),
            "name,quantity,category,expiry\n\"12\"\" pizza\nfrozen\",3,Freezer,2026-02-01\n"
        );
    }

    #[test]
    fn empty_list_writes_header_only() {
        assert_eq!(write_items(&[]), "name,quantity,category,expiry\n");
        assert!(read_items("name,quantity,category,expiry\n").unwrap().is_empty());
    }

    #[test]
    fn read_items_keys_by_header() {
        let raws = read_items("expiry,name,extra\n2025-03-04,Beans,x\n").unwrap();
        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].get("name"), &RawValue::from("Beans"));
        assert_eq!(raws[0].get("expiry"), &RawValue::Date(date(2025, 3, 4)));
        assert_eq!(raws[0].get("quantity"), &RawValue::Missing);
    }

    #[test]
    fn read_items_accepts_datetime_cells() {
        let raws = read_items("name,quantity,category,expiry\nMilk,1,Dairy,2025-03-04 00:00:00\n")
            .unwrap();
        assert_eq!(raws[0].get("expiry"), &RawValue::Date(date(2025, 3, 4)));
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let raws = read_items("name,quantity,category,expiry\nMilk,1\n").unwrap();
        assert_eq!(raws[0].get("category"), &RawValue::Missing);
        assert_eq!(raws[0].get("expiry"), &RawValue::Missing);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = read_items("name,quantity,category,expiry\nMilk,1,Dairy,2025-01-01,x\n")
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::FieldCount {
                line: 2,
                expected: 4,
                found: 5
            }
        ));
    }

    #[test]
    fn missing_expiry_column_is_rejected() {
        let err = read_items("name,quantity\nMilk,1\n").unwrap_err();
        assert!(matches!(err, CodecError::MissingColumn { column: "expiry" }));
    }

    #[test]
    fn invalid_expiry_cell_is_rejected() {
        let err = read_items("name,quantity,category,expiry\nMilk,1,Dairy,soon\n").unwrap_err();
        assert!(matches!(err, CodecError::InvalidDate { line: 2, .. }));
        assert_eq!(err.code(), ErrorCode::MalformedDataFile);
    }

    #[test]
    fn escape_only_when_needed() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("6\" pan"), "\"6\"\" pan\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn read_path_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_path(&dir.path().join("absent.csv")).unwrap().is_none());
    }
}
