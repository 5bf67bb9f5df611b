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

//! The error types returned when creating or using credentials.
//!
//! The taxonomy is small and deliberate:
//! * [ConfigurationError]: the credentials could not be constructed.
//! * [AuthenticationError]: the token endpoint rejected an exchange, or
//!   returned a response this crate could not understand.
//! * [NotAuthenticatedError]: headers were requested while no valid token
//!   was held.
//!
//! All three surface to the caller. Nothing in this crate logs an error and
//! continues.

use http::StatusCode;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

type BoxError = Box<dyn StdError + Send + Sync>;

/// The credentials could not be constructed from the given configuration.
///
/// Returned by the credentials builder when a required field is missing or
/// empty. The offending field is named in the error message; the field
/// *values* never are.
#[derive(thiserror::Error, Debug)]
#[error("invalid credentials configuration: `{field}` must be set and non-empty")]
pub struct ConfigurationError {
    field: &'static str,
}

impl ConfigurationError {
    pub(crate) fn empty_field(field: &'static str) -> Self {
        Self { field }
    }

    /// The name of the configuration field that failed validation.
    pub fn field(&self) -> &str {
        self.field
    }
}

#[derive(Debug)]
enum ExchangeFailure {
    Transport,
    Rejected,
    Malformed,
}

/// The token exchange failed.
///
/// The provider's stored token (if any) is left untouched when an exchange
/// fails: callers can keep using a previously obtained token until it
/// expires.
#[derive(Debug)]
pub struct AuthenticationError {
    kind: ExchangeFailure,
    status: Option<StatusCode>,
    body: Option<String>,
    source: Option<BoxError>,
}

impl AuthenticationError {
    /// The request never produced an HTTP response.
    pub(crate) fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ExchangeFailure::Transport,
            status: None,
            body: None,
            source: Some(source.into()),
        }
    }

    /// The token endpoint answered with a non-success status.
    pub(crate) fn rejected(status: StatusCode, body: String) -> Self {
        Self {
            kind: ExchangeFailure::Rejected,
            status: Some(status),
            body: Some(body),
            source: None,
        }
    }

    /// The response could not be decoded, or lacked an `access_token`.
    pub(crate) fn malformed<T: Into<BoxError>>(status: StatusCode, body: String, source: T) -> Self {
        Self {
            kind: ExchangeFailure::Malformed,
            status: Some(status),
            body: Some(body),
            source: Some(source.into()),
        }
    }

    /// The HTTP status returned by the token endpoint, if a response was
    /// received at all.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The response body received from the token endpoint, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl Display for AuthenticationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let body = self.body.as_deref().unwrap_or_default();
        match self.kind {
            ExchangeFailure::Transport => write!(f, "cannot reach the token endpoint"),
            ExchangeFailure::Rejected => match self.status {
                Some(status) => write!(f, "token exchange rejected with {status}: {body}"),
                None => write!(f, "token exchange rejected: {body}"),
            },
            ExchangeFailure::Malformed => match self.status {
                Some(status) => write!(
                    f,
                    "cannot understand token endpoint response ({status}): {body}"
                ),
                None => write!(f, "cannot understand token endpoint response: {body}"),
            },
        }
    }
}

impl StdError for AuthenticationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as _)
    }
}

/// Headers were requested while no valid token was held.
///
/// Distinguishes the two ways a provider can lack a usable token: no
/// exchange has succeeded yet, or the most recent token has expired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotAuthenticatedError {
    expired: bool,
}

impl NotAuthenticatedError {
    /// Creates the error reported when no exchange has succeeded yet.
    ///
    /// Public so alternative [HeaderSource](crate::credentials::HeaderSource)
    /// implementations can report the same condition.
    pub fn missing() -> Self {
        Self { expired: false }
    }

    /// Creates the error reported when the held token's lifetime elapsed.
    pub fn expired() -> Self {
        Self { expired: true }
    }

    /// Returns `true` if a token was held but its lifetime has elapsed.
    pub fn is_expired(&self) -> bool {
        self.expired
    }
}

impl Display for NotAuthenticatedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.expired {
            write!(f, "the access token expired, exchange a new one")
        } else {
            write!(f, "no access token has been exchanged yet")
        }
    }
}

impl StdError for NotAuthenticatedError {}
