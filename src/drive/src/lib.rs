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

//! A thin client for the Microsoft Graph [drive-items] API.
//!
//! The client moves file content in and out of SharePoint document
//! libraries and updates list-item metadata. It holds a header-producing
//! credentials value from `graphsync-auth`; exchanging and refreshing
//! tokens stays the application's decision.
//!
//! [drive-items]: https://learn.microsoft.com/graph/api/resources/driveitem

pub use graphsync_core::{Result, error};

/// The drive client and its builder.
pub mod client;

/// Wire models for drive-item resources.
pub mod model;

pub use client::{Builder, Drive};
