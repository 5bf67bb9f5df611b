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

//! A caller-owned accumulator of per-file header records.
//!
//! Each processed file contributes one record: a short source tag, the
//! item-number prefix the file was matched by, and the column names it
//! arrived with. The catalog is an explicit value the caller creates,
//! fills, and writes out; there is no shared or static collection behind
//! it, so concurrent pipelines and tests each own their accumulation.

use std::io::Write;

// The prefixes recorded from the raw inputs.
const SOURCE_TAG_CHARS: usize = 2;
const ITEM_NUMBER_CHARS: usize = 7;

/// One file's header record.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderRecord {
    /// A two-character tag identifying the file's source grouping.
    pub source: String,
    /// The leading characters of the item number the file matched.
    pub item_number: String,
    /// The file's column names, in order.
    pub columns: Vec<String>,
}

/// An accumulator of [HeaderRecord]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderCatalog {
    records: Vec<HeaderRecord>,
}

impl HeaderCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one file's record.
    ///
    /// `source` and `item_number` are truncated to their recorded prefixes;
    /// shorter values are kept whole.
    pub fn record<S>(&mut self, source: &str, item_number: &str, columns: &[S])
    where
        S: AsRef<str>,
    {
        self.records.push(HeaderRecord {
            source: source.chars().take(SOURCE_TAG_CHARS).collect(),
            item_number: item_number.chars().take(ITEM_NUMBER_CHARS).collect(),
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        });
    }

    /// The accumulated records, in insertion order.
    pub fn records(&self) -> &[HeaderRecord] {
        &self.records
    }

    /// The number of accumulated records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the catalog as CSV: one row per record, the source tag and
    /// item number followed by that file's column names.
    ///
    /// Rows are ragged on purpose; files disagree on column counts and the
    /// catalog exists to show exactly that.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        for record in &self.records {
            let mut row = Vec::with_capacity(2 + record.columns.len());
            row.push(record.source.as_str());
            row.push(record.item_number.as_str());
            row.extend(record.columns.iter().map(|c| c.as_str()));
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
