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

//! CSV ingest and egress.
//!
//! The transfer clients hand over raw bytes; these functions convert
//! between those bytes and [Table]s. The first CSV record is the header
//! row; every field is parsed into a [Cell](crate::table::Cell) so numbers
//! arrive comparable.

use crate::table::{Cell, Table};
use std::io::{Read, Write};

/// A table could not be read or written as CSV.
#[derive(thiserror::Error, Debug)]
pub enum CsvError {
    /// The underlying CSV stream failed.
    #[error("cannot process the CSV stream")]
    Stream(#[from] csv::Error),

    /// A record's width differs from the header row's.
    #[error(transparent)]
    Shape(#[from] crate::table::ShapeError),
}

/// Reads a table from CSV, taking the first record as the header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, CsvError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|field| field.to_string())
        .collect();
    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        let row = record.iter().map(Cell::parse).collect();
        table.push_row(row)?;
    }
    Ok(table)
}

/// Writes a table as CSV, header row first.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_parses_cells() -> anyhow::Result<()> {
        let input = "Region,Units,Notes\nnorth,12,ok\nsouth,7,\n";
        let table = read_csv(input.as_bytes())?;
        assert_eq!(table.columns(), ["Region", "Units", "Notes"]);
        assert_eq!(
            table.rows()[0],
            vec![
                Cell::Text("north".into()),
                Cell::Number(12.0),
                Cell::Text("ok".into()),
            ]
        );
        assert_eq!(table.rows()[1][2], Cell::Empty);
        Ok(())
    }

    #[test]
    fn round_trip_preserves_shape() -> anyhow::Result<()> {
        let input = "A,B\n1,x\n,\n2,y\n";
        let table = read_csv(input.as_bytes())?;
        let mut out = Vec::new();
        write_csv(&table, &mut out)?;
        assert_eq!(String::from_utf8(out)?, input);
        Ok(())
    }

    #[test]
    fn read_empty_input_yields_empty_table() -> anyhow::Result<()> {
        let table = read_csv("".as_bytes())?;
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
        Ok(())
    }

    #[test]
    fn ragged_record_is_an_error() {
        let input = "A,B\n1\n";
        let e = read_csv(input.as_bytes()).unwrap_err();
        // The csv reader itself rejects the short record.
        assert!(matches!(e, CsvError::Stream(_)), "{e}");
    }
}
