//! `# key: value` metadata headers written by the simulation binaries.
//!
//! A data file starts with comment lines such as:
//!
//! ```text
//! # cell dimensions: (4.5, 4.5, 4.5)
//! # ff_small: 0.05
//! # total checks of small cell: 100000
//! ```
//!
//! Every comment line containing `:` becomes one entry; everything else is
//! ignored. Values are kept typed so callers can ask for a number directly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::AppError;

/// A single parsed header value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Number(f64),
    Tuple(Vec<f64>),
    Text(String),
}

impl MetaValue {
    fn parse(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<f64>() {
            return MetaValue::Number(v);
        }
        if let Some(inner) = raw.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            let parts: Result<Vec<f64>, _> = inner
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<f64>)
                .collect();
            if let Ok(values) = parts {
                return MetaValue::Tuple(values);
            }
        }
        MetaValue::Text(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parsed metadata of one data file.
#[derive(Debug, Clone, Default)]
pub struct MetaHeader {
    entries: BTreeMap<String, MetaValue>,
}

impl MetaHeader {
    /// Parse header entries from file contents.
    ///
    /// Later duplicates of a key overwrite earlier ones; the simulation
    /// rewrites its running totals at the end of the file.
    pub fn parse(contents: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in contents.lines() {
            if !line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = strip_marks(key);
            let value = strip_marks(value);
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), MetaValue::parse(value));
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch a numeric entry, failing with a message naming `source`.
    pub fn number(&self, key: &str, source: &Path) -> Result<f64, AppError> {
        match self.entries.get(key) {
            Some(MetaValue::Number(v)) => Ok(*v),
            Some(other) => Err(AppError::data(format!(
                "Header entry `{key}` in '{}' is not a number: {other:?}",
                source.display()
            ))),
            None => Err(AppError::data(format!(
                "Missing header entry `{key}` in '{}'",
                source.display()
            ))),
        }
    }
}

/// Read and parse the metadata header of a data file.
pub fn read_meta_header(path: &Path) -> Result<MetaHeader, AppError> {
    tracing::debug!(path = %path.display(), "reading metadata header");
    let contents = fs::read_to_string(path)
        .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))?;
    Ok(MetaHeader::parse(&contents))
}

fn strip_marks(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '#' || c == '\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# version: abc123
# cell dimensions: (4.5, 4.5, 6)
# walls: 0
# ff_small: 0.05
# total checks of small cell: 1000
# total valid small checks: 250
0.1 0.2 0.3
";

    #[test]
    fn parses_numbers_tuples_and_text() {
        let h = MetaHeader::parse(SAMPLE);
        assert_eq!(h.get("ff_small"), Some(&MetaValue::Number(0.05)));
        assert_eq!(h.get("cell dimensions"), Some(&MetaValue::Tuple(vec![4.5, 4.5, 6.0])));
        assert_eq!(h.get("version"), Some(&MetaValue::Text("abc123".to_string())));
        assert_eq!(h.get("total valid small checks").and_then(MetaValue::as_f64), Some(250.0));
        assert_eq!(h.len(), 6);
    }

    #[test]
    fn ignores_data_and_colonless_comments() {
        let h = MetaHeader::parse("# just a remark\n1 2 3\nkey: 4\n");
        assert!(h.is_empty());
    }

    #[test]
    fn value_keeps_text_after_first_colon() {
        let h = MetaHeader::parse("# started: 12:30:01\n");
        assert_eq!(h.get("started"), Some(&MetaValue::Text("12:30:01".to_string())));
    }

    #[test]
    fn number_reports_missing_key_with_path() {
        let h = MetaHeader::parse(SAMPLE);
        let err = h.number("ff", Path::new("data/x-g.dat")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("data/x-g.dat"));
    }

    #[test]
    fn reads_header_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run-g.dat");
        std::fs::write(&path, SAMPLE).unwrap();
        let h = read_meta_header(&path).unwrap();
        assert_eq!(h.number("total checks of small cell", &path).unwrap(), 1000.0);
    }
}
