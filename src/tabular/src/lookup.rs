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

//! Typed-key lookups over a table.
//!
//! Mapping files are keyed by columns that hold numbers in some files and
//! text in others. A lookup key is therefore compared both ways, in one
//! deterministic pass: a cell matches on exact text, or on numeric
//! equality when both the cell and the key are numbers.

use crate::table::{Cell, Table};

/// A lookup could not produce a value.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LookupError {
    /// The named column does not exist in the table.
    #[error("the table has no column named `{0}`")]
    UnknownColumn(String),

    /// No row's key cell matched the key.
    #[error("no row matched the key `{0}`")]
    KeyNotFound(String),
}

fn matches_key(cell: &Cell, key: &str) -> bool {
    match cell {
        Cell::Empty => false,
        Cell::Text(text) => text == key,
        Cell::Number(number) => key.trim().parse::<f64>() == Ok(*number),
    }
}

impl Table {
    /// Finds the first row whose `key_column` cell matches `key` and
    /// returns that row's `value_column` cell.
    pub fn lookup(
        &self,
        key_column: &str,
        key: &str,
        value_column: &str,
    ) -> Result<&Cell, LookupError> {
        let key_index = self.column_index(key_column)?;
        let value_index = self.column_index(value_column)?;
        self.rows()
            .iter()
            .find(|row| matches_key(&row[key_index], key))
            .map(|row| &row[value_index])
            .ok_or_else(|| LookupError::KeyNotFound(key.to_string()))
    }

    /// Like [lookup][Table::lookup], but falls back to the key itself when
    /// the lookup misses or hits an empty cell.
    ///
    /// Mapping files are allowed to be incomplete; downstream steps then
    /// carry the unmapped key through. The fallback is logged, never
    /// silent.
    pub fn lookup_or_key(&self, key_column: &str, key: &str, value_column: &str) -> Cell {
        match self.lookup(key_column, key, value_column) {
            Ok(cell) if !cell.is_empty() => cell.clone(),
            Ok(_) => {
                tracing::warn!(key = %key, column = %value_column, "mapping row has no value, using the key");
                Cell::Text(key.to_string())
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "lookup missed, using the key");
                Cell::Text(key.to_string())
            }
        }
    }

    fn column_index(&self, name: &str) -> Result<usize, LookupError> {
        self.columns()
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| LookupError::UnknownColumn(name.to_string()))
    }
}
