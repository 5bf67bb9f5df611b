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

//! Storage-agnostic cleanup helpers for tabular data.
//!
//! Files pulled from a drive or a blob container tend to arrive with messy
//! headers, trailing junk rows, and more columns than the downstream steps
//! want. This crate holds the table in memory and offers the handful of
//! cleanup operations those steps need: header scrubbing, column selection,
//! blank-row truncation, typed-key lookups, and a caller-owned catalog of
//! per-file header records.
//!
//! Nothing here touches the network or the filesystem; [io] converts
//! between tables and CSV streams the caller already holds.

/// The table and cell model.
pub mod table;

/// Typed-key lookups over a table.
pub mod lookup;

/// A caller-owned accumulator of per-file header records.
pub mod catalog;

/// CSV ingest and egress.
pub mod io;

pub use catalog::HeaderCatalog;
pub use table::{Cell, Table};
