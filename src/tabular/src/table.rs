// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The table and cell model.

/// One value in a table.
///
/// Cells distinguish text from numbers so lookups can compare a key both
/// ways deterministically, and distinguish empty cells so blank rows are
/// recognizable.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// A textual value.
    Text(String),
    /// A numeric value.
    Number(f64),
}

impl Cell {
    /// Parses a raw field into a cell.
    ///
    /// An empty or all-whitespace field is [Cell::Empty]; a field that
    /// parses as a number is [Cell::Number]; anything else is kept as text,
    /// untrimmed.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Cell::Empty;
        }
        match raw.trim().parse::<f64>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    /// Returns `true` for [Cell::Empty].
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => write!(f, "{value}"),
            Cell::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

/// A row whose width does not match the table's column count.
#[derive(thiserror::Error, Debug)]
#[error("row has {actual} cells, the table has {expected} columns")]
pub struct ShapeError {
    expected: usize,
    actual: usize,
}

/// The table holds an unexpected number of columns.
#[derive(thiserror::Error, Debug)]
#[error("expected {expected} columns, found {actual}")]
pub struct ColumnCountError {
    expected: usize,
    actual: usize,
}

impl ColumnCountError {
    /// The number of columns actually present.
    pub fn actual(&self) -> usize {
        self.actual
    }
}

/// An in-memory table: named columns over uniform-width rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(|c| c.into()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, which must match the table's width.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), ShapeError> {
        if row.len() != self.columns.len() {
            return Err(ShapeError {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// The column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows, in order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The first column name, when the table has any columns.
    ///
    /// Mapping files carry a marker value in the first header slot; this is
    /// the cheap way to read it without touching the rows.
    pub fn first_header_value(&self) -> Option<&str> {
        self.columns.first().map(|c| c.as_str())
    }

    /// Replaces the listed characters in every column name with a space,
    /// then collapses runs of double spaces.
    pub fn scrub_column_characters(&mut self, characters: &[char]) {
        for column in &mut self.columns {
            let mut scrubbed: String = column
                .chars()
                .map(|c| if characters.contains(&c) { ' ' } else { c })
                .collect();
            while scrubbed.contains("  ") {
                scrubbed = scrubbed.replace("  ", " ");
            }
            *column = scrubbed;
        }
    }

    /// Restricts the table to the named columns, in the requested order.
    ///
    /// Requested names that are not present are skipped.
    pub fn select_columns(&mut self, names: &[&str]) {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.columns.iter().position(|c| c == name))
            .collect();
        self.columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = indices.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Drops the tail of the table below its first blank row.
    ///
    /// Keeps everything above the blank row, the blank row itself, and the
    /// one row after it, where source files put a trailing total. A table
    /// with no blank row is left unchanged.
    pub fn truncate_after_blank_row(&mut self) {
        let first_blank = self.rows.iter().position(|row| {
            !row.is_empty() && row.iter().all(|cell| cell.is_empty())
        });
        if let Some(index) = first_blank {
            self.rows.truncate(index + 2);
        }
    }

    /// Verifies the table holds exactly `expected` columns.
    ///
    /// Returns the actual count on success; a mismatch is an error the
    /// caller decides how to treat.
    pub fn verify_column_count(&self, expected: usize) -> Result<usize, ColumnCountError> {
        let actual = self.columns.len();
        if actual != expected {
            return Err(ColumnCountError { expected, actual });
        }
        Ok(actual)
    }
}
