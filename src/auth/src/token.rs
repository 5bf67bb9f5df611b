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

//! Types and functions to work with access tokens.

// Using tokio's wrapper keeps expiry testable without relying on wall-clock
// times.
use tokio::time::Instant;

/// Represents an access token obtained from the identity endpoint.
#[derive(Clone, PartialEq)]
pub struct Token {
    /// The actual token string.
    ///
    /// This is the value used in the `Authorization:` header.
    pub token: String,

    /// The type of the token, almost always `"Bearer"`.
    pub token_type: String,

    /// The instant at which the token was obtained.
    pub obtained_at: Instant,

    /// The instant at which the token expires.
    ///
    /// `None` when the endpoint did not declare a lifetime; such tokens are
    /// treated as non-expiring. The `Instant` is process-local and must not
    /// be persisted.
    pub expires_at: Option<Instant>,
}

impl Token {
    /// Returns `true` once the token's declared lifetime has elapsed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| e <= Instant::now())
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("obtained_at", &self.obtained_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn token(expires_at: Option<Instant>) -> Token {
        Token {
            token: "token-test-only".into(),
            token_type: "Bearer".into(),
            obtained_at: Instant::now(),
            expires_at,
        }
    }

    #[test]
    fn debug_censors_value() {
        let t = token(Some(Instant::now() + Duration::from_secs(3600)));
        let got = format!("{t:?}");
        assert!(!got.contains("token-test-only"), "{got}");
        assert!(got.contains("token: \"[censored]\""), "{got}");
        assert!(got.contains("token_type: \"Bearer\""), "{got}");
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_is_enforced_at_the_boundary() {
        let t = token(Some(Instant::now() + Duration::from_secs(10)));
        assert!(!t.is_expired());
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(t.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_lifetime_never_expires() {
        let t = token(None);
        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;
        assert!(!t.is_expired());
    }
}
