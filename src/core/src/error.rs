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

//! The error type returned by the client crates.

use http::StatusCode;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

type BoxError = Box<dyn StdError + Send + Sync>;

/// The core error returned by the drive and blob clients.
///
/// The clients report errors from multiple sources: the credentials may not
/// hold a usable token, the transport may fail before a response arrives,
/// the service may answer with an error status, or the response body may
/// not decode. The type offers predicates to distinguish the kinds and
/// accessors for the common details; the [source][std::error::Error::source]
/// chain carries the underlying cause.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

#[derive(Debug)]
enum ErrorKind {
    Authentication,
    Transport,
    Service(Box<ServiceDetails>),
    Deserialization,
}

#[derive(Debug)]
struct ServiceDetails {
    status: StatusCode,
    body: String,
}

impl Error {
    /// Creates an error for a request that could not be authenticated.
    ///
    /// Typically wraps the credentials crate's not-authenticated error: the
    /// caller must exchange a token before retrying.
    pub fn authentication<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Authentication,
            source: Some(source.into()),
        }
    }

    /// The request headers could not be derived from the credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Creates an error for a request that never produced a response.
    pub fn transport<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Transport,
            source: Some(source.into()),
        }
    }

    /// The request failed before an HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport)
    }

    /// Creates an error from a service error response.
    pub fn service(status: StatusCode, body: String) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(ServiceDetails { status, body })),
            source: None,
        }
    }

    /// The service answered with a non-success status.
    pub fn is_service(&self) -> bool {
        matches!(self.kind, ErrorKind::Service(_))
    }

    /// The status returned by the service, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match &self.kind {
            ErrorKind::Service(details) => Some(details.status),
            _ => None,
        }
    }

    /// The error body returned by the service, when one was received.
    pub fn body(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Service(details) => Some(&details.body),
            _ => None,
        }
    }

    /// Creates an error for a response that could not be decoded.
    pub fn deserialization<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Deserialization,
            source: Some(source.into()),
        }
    }

    /// The response arrived but could not be decoded.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ErrorKind::Deserialization)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Authentication => write!(f, "cannot authenticate the request"),
            ErrorKind::Transport => write!(f, "cannot reach the service"),
            ErrorKind::Service(details) => write!(
                f,
                "the service responded with {}: {}",
                details.status, details.body
            ),
            ErrorKind::Deserialization => write!(f, "cannot decode the service response"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as _)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn service_details() {
        let e = Error::service(StatusCode::NOT_FOUND, "no such item".into());
        assert!(e.is_service());
        assert_eq!(e.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(e.body(), Some("no such item"));
        let got = format!("{e}");
        assert!(got.contains("404"), "{got}");
        assert!(got.contains("no such item"), "{got}");
    }

    #[test_case(Error::authentication("x".to_string()), "authenticate")]
    #[test_case(Error::transport("x".to_string()), "reach")]
    #[test_case(Error::deserialization("x".to_string()), "decode")]
    fn kinds_with_source(e: Error, fragment: &str) {
        assert!(e.source().is_some());
        assert_eq!(e.status(), None);
        assert_eq!(e.body(), None);
        let got = format!("{e}");
        assert!(got.contains(fragment), "{got}");
    }

    #[test]
    fn predicates_are_exclusive() {
        let e = Error::transport("x".to_string());
        assert!(e.is_transport());
        assert!(!e.is_authentication());
        assert!(!e.is_service());
        assert!(!e.is_deserialization());
    }
}
