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

//! Types and functions to work with client-secret credentials.
//!
//! The client crates do not depend on a concrete credentials type. They
//! hold any implementation of [HeaderSource], keeping authentication and
//! API interaction composed rather than coupled.

use crate::errors::NotAuthenticatedError;
use http::HeaderMap;

/// Client-secret (client-credentials grant) credentials.
pub mod client_secret;

pub use client_secret::{Builder, ClientSecretCredentials};

/// The header-producing capability consumed by the client crates.
///
/// Implementations derive ready-to-attach request headers from whatever
/// token state they hold. Both operations are read-only: deriving headers
/// never refreshes a token.
pub trait HeaderSource: Send + Sync + std::fmt::Debug {
    /// Headers for endpoints that move raw bytes.
    ///
    /// The map carries `Authorization: Bearer {token}` and
    /// `Content-Type: application/octet-stream`.
    fn binary_headers(&self) -> Result<HeaderMap, NotAuthenticatedError>;

    /// Headers for endpoints that accept JSON bodies.
    ///
    /// The map carries `Authorization: Bearer {token}` and
    /// `Content-Type: application/json`.
    fn json_headers(&self) -> Result<HeaderMap, NotAuthenticatedError>;
}

// Lets an application hand a shared handle to a client while keeping one
// for its own token refreshes.
impl<T: HeaderSource + ?Sized> HeaderSource for std::sync::Arc<T> {
    fn binary_headers(&self) -> Result<HeaderMap, NotAuthenticatedError> {
        (**self).binary_headers()
    }

    fn json_headers(&self) -> Result<HeaderMap, NotAuthenticatedError> {
        (**self).json_headers()
    }
}
