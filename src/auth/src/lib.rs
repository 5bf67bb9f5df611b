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

//! Authentication components for the Microsoft identity platform.
//!
//! This crate implements the OAuth2 [client credentials] flow used by
//! daemon-style applications to call Microsoft Graph and other APIs that
//! accept bearer tokens. The sibling client crates consume a
//! [credentials::HeaderSource] and attach the resulting headers to the
//! requests they issue.
//!
//! Token refresh is caller-driven: an application exchanges its client
//! secret for a token explicitly, and header derivation fails once that
//! token expires. There is no background refresh and tokens are never
//! persisted.
//!
//! [client credentials]: https://learn.microsoft.com/entra/identity-platform/v2-oauth2-client-creds-grant-flow

/// Errors returned when creating or using credentials.
pub mod errors;

/// Types and functions to work with access tokens.
pub mod token;

/// Types and functions to work with client-secret credentials.
pub mod credentials;

pub(crate) mod headers_util;
