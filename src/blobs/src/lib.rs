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

//! A thin client for blob-store containers.
//!
//! The client reads and writes named binary objects (blobs) within one
//! container of an Azure storage account, authorizing each request with a
//! [shared-key signature]. It pairs with the drive client to move files
//! between the object store and a document library.
//!
//! [shared-key signature]: https://learn.microsoft.com/rest/api/storageservices/authorize-with-shared-key

pub use graphsync_core::{Result, error};

/// The container client and its builder.
pub mod client;

/// Shared-key request signing.
pub mod shared_key;

pub(crate) mod list;

pub use client::{BlobContainer, Builder};
pub use shared_key::SharedKeyCredentials;
