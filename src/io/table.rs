//! Whitespace-delimited numeric tables.
//!
//! The simulation writes its radial profiles as plain text matrices: one row
//! per radius, one column per observable. Comment lines start with `#` and
//! trailing `# ...` comments are allowed.

use std::fs;
use std::path::Path;

use crate::error::AppError;

/// A dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Table {
    /// Parse a table from text. Rows must all have the same column count.
    pub fn parse(contents: &str, source: &str) -> Result<Self, AppError> {
        let mut cols = 0usize;
        let mut rows = 0usize;
        let mut values = Vec::new();

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let before = values.len();
            for token in line.split_whitespace() {
                let v = token.parse::<f64>().map_err(|_| {
                    AppError::data(format!(
                        "{source}:{}: could not parse `{token}` as a number",
                        idx + 1
                    ))
                })?;
                values.push(v);
            }
            let n = values.len() - before;

            if rows == 0 {
                cols = n;
            } else if n != cols {
                return Err(AppError::data(format!(
                    "{source}:{}: expected {cols} columns, found {n}",
                    idx + 1
                )));
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(AppError::data(format!("{source}: no data rows")));
        }

        Ok(Self { rows, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Copy one column out of the table.
    pub fn column(&self, col: usize) -> Result<Vec<f64>, AppError> {
        if col >= self.cols {
            return Err(AppError::data(format!(
                "Column {col} requested but the table has only {} columns",
                self.cols
            )));
        }
        Ok((0..self.rows).map(|r| self.get(r, col)).collect())
    }
}

/// Load a whitespace-delimited table from disk.
pub fn load_table(path: &Path) -> Result<Table, AppError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AppError::input(format!("Failed to read '{}': {e}", path.display())))?;
    let table = Table::parse(&contents, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        rows = table.rows(),
        cols = table.cols(),
        "loaded table"
    );
    Ok(table)
}
