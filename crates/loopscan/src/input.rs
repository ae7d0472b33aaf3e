//! Measurement file loading.
//!
//! A measurement file is two numeric columns (field, signal) with one header
//! row. The column delimiter is detected per file: tab, comma, or semicolon
//! via the CSV reader, with a whitespace-split fallback for plain
//! space-aligned exports.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::curve::Curve;
use crate::error::{LoopscanError, Result};

/// Load a two-column measurement file into a [`Curve`].
pub fn load_curve(path: impl AsRef<Path>) -> Result<Curve> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| LoopscanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_curve(&contents, path)
}

/// Parse file contents already in memory. `path` is only carried into error
/// messages.
pub fn parse_curve(contents: &str, path: &Path) -> Result<Curve> {
    let curve = match detect_delimiter(contents) {
        Some(delimiter) => parse_delimited(contents, path, delimiter)?,
        None => parse_whitespace(contents, path)?,
    };
    if curve.is_empty() {
        return Err(LoopscanError::EmptyData(format!(
            "no data rows in '{}'",
            path.display()
        )));
    }
    Ok(curve)
}

/// Pick the delimiter from the first data row. `None` selects the
/// whitespace fallback.
fn detect_delimiter(contents: &str) -> Option<u8> {
    let line = contents.lines().filter(|l| !l.trim().is_empty()).nth(1)?;
    [b'\t', b',', b';']
        .into_iter()
        .find(|&d| line.contains(d as char))
}

fn parse_delimited(contents: &str, path: &Path, delimiter: u8) -> Result<Curve> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents.as_bytes());

    let mut x = Vec::new();
    let mut y = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            return Err(LoopscanError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!("expected two columns, found {}", record.len()),
            });
        }
        x.push(parse_field(&record[0], path, line)?);
        y.push(parse_field(&record[1], path, line)?);
    }
    Curve::new(x, y)
}

fn parse_whitespace(contents: &str, path: &Path) -> Result<Curve> {
    let mut x = Vec::new();
    let mut y = Vec::new();
    // Line 1 is the header row.
    for (i, line) in contents.lines().enumerate().skip(1) {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(LoopscanError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                message: format!("expected two columns, found {}", fields.len()),
            });
        }
        x.push(parse_field(fields[0], path, line_no)?);
        y.push(parse_field(fields[1], path, line_no)?);
    }
    Curve::new(x, y)
}

fn parse_field(field: &str, path: &Path, line: usize) -> Result<f64> {
    field.parse().map_err(|_| LoopscanError::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("'{field}' is not a number"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<Curve> {
        parse_curve(contents, Path::new("test.dat"))
    }

    #[test]
    fn test_parse_tab_separated() {
        let curve = parse("field\tsignal\n1.0\t2.0\n-3.5\t4.25\n").unwrap();
        assert_eq!(curve.x(), &[1.0, -3.5]);
        assert_eq!(curve.y(), &[2.0, 4.25]);
    }

    #[test]
    fn test_parse_comma_separated_with_padding() {
        let curve = parse("field,signal\n1.0, 2.0\n 3.0,4.0\n").unwrap();
        assert_eq!(curve.x(), &[1.0, 3.0]);
        assert_eq!(curve.y(), &[2.0, 4.0]);
    }

    #[test]
    fn test_parse_whitespace_fallback() {
        let curve = parse("field signal\n1.0   2.0\n3.0 4.0\n").unwrap();
        assert_eq!(curve.x(), &[1.0, 3.0]);
        assert_eq!(curve.y(), &[2.0, 4.0]);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = parse("field\tsignal\n1.0\t2.0\nbad\t4.0\n").unwrap_err();
        match err {
            LoopscanError::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("bad"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_single_column() {
        let err = parse("field\tsignal\n1.0\t2.0\n3.0\n").unwrap_err();
        assert!(matches!(err, LoopscanError::Parse { .. }));
    }

    #[test]
    fn test_header_only_file_is_empty_data() {
        let err = parse("field\tsignal\n").unwrap_err();
        assert!(matches!(err, LoopscanError::EmptyData(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_curve("/nonexistent/curve.dat").unwrap_err();
        assert!(matches!(err, LoopscanError::Io { .. }));
    }
}
