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

use crate::token::Token;
use http::HeaderMap;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue, InvalidHeaderValue};

pub(crate) const OCTET_STREAM: &str = "application/octet-stream";
pub(crate) const JSON: &str = "application/json";

/// Builds the `Authorization` value for a freshly exchanged token.
///
/// Validation happens here, at exchange time: a token whose bytes cannot
/// form a header value is rejected before it is ever stored, so header
/// derivation itself never fails.
pub(crate) fn authorization_value(token: &Token) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::try_from(format!("{} {}", token.token_type, token.token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Builds the two-entry header map consumed by the client crates.
///
/// `content_type` must be one of the statically known values above.
pub(crate) fn build_headers(authorization: &HeaderValue, content_type: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization.clone());
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn test_token(value: &str) -> Token {
        Token {
            token: value.into(),
            token_type: "Bearer".into(),
            obtained_at: Instant::now(),
            expires_at: None,
        }
    }

    #[test]
    fn binary_shape() {
        let auth = authorization_value(&test_token("abc")).unwrap();
        let headers = build_headers(&auth, OCTET_STREAM);
        assert_eq!(headers.len(), 2, "{headers:?}");
        let got = headers.get(AUTHORIZATION).unwrap();
        assert_eq!(got, HeaderValue::from_static("Bearer abc"));
        assert!(got.is_sensitive());
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            HeaderValue::from_static("application/octet-stream")
        );
    }

    #[test]
    fn json_shape() {
        let auth = authorization_value(&test_token("abc")).unwrap();
        let headers = build_headers(&auth, JSON);
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            HeaderValue::from_static("application/json")
        );
    }

    #[test]
    fn invalid_token_bytes_rejected() {
        assert!(authorization_value(&test_token("with \n newline")).is_err());
    }
}
