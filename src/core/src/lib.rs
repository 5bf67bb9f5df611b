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

//! Shared types for the graphsync client crates.
//!
//! The drive and blob clients report failures through the same [error::Error]
//! type, so applications moving files between the two services handle one
//! error surface.

pub mod error;

/// A `Result` alias where the `Err` case is `graphsync_core::error::Error`.
pub type Result<T> = std::result::Result<T, crate::error::Error>;
