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

//! Shared-key request signing.
//!
//! Storage-account requests are authorized by an HMAC-SHA256 signature over
//! a canonical rendering of the request, keyed with the account key. The
//! canonical form and header order follow the [shared-key scheme].
//!
//! [shared-key scheme]: https://learn.microsoft.com/rest/api/storageservices/authorize-with-shared-key

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

/// The shared-key credentials could not be constructed.
#[derive(thiserror::Error, Debug)]
pub enum SharedKeyError {
    /// The account name was empty.
    #[error("account must be set and non-empty")]
    EmptyAccount,

    /// The account key was not valid base64.
    #[error("cannot decode the account key")]
    InvalidKey(#[from] base64::DecodeError),

    /// The decoded account key was rejected by the signer.
    #[error("the account key was rejected by the signer")]
    KeyRejected,
}

/// Storage-account credentials: an account name and its access key.
///
/// The key is taken base64-encoded, exactly as the portal shows it, and is
/// held only in its decoded, signer-ready form.
#[derive(Clone)]
pub struct SharedKeyCredentials {
    account: String,
    mac: Hmac<Sha256>,
}

impl std::fmt::Debug for SharedKeyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKeyCredentials")
            .field("account", &self.account)
            .field("key", &"[censored]")
            .finish()
    }
}

impl SharedKeyCredentials {
    /// Creates credentials from an account name and its base64 access key.
    pub fn new<A: Into<String>>(account: A, key: &str) -> Result<Self, SharedKeyError> {
        let account = account.into();
        if account.is_empty() {
            return Err(SharedKeyError::EmptyAccount);
        }
        let key = BASE64_STANDARD.decode(key)?;
        let mac =
            Hmac::<Sha256>::new_from_slice(&key).map_err(|_| SharedKeyError::KeyRejected)?;
        Ok(Self { account, mac })
    }

    /// The account name these credentials sign for.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Signs a canonical request into an `Authorization` value.
    pub(crate) fn authorize(&self, request: &CanonicalRequest<'_>) -> String {
        let mut mac = self.mac.clone();
        mac.update(request.string_to_sign(&self.account).as_bytes());
        let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());
        format!("SharedKey {}:{}", self.account, signature)
    }
}

/// The request fields that participate in the signature.
///
/// `ms_headers` must hold every `x-ms-*` header sent with the request;
/// the `BTreeMap` keeps them in the lexical order the scheme requires.
pub(crate) struct CanonicalRequest<'a> {
    pub verb: &'a str,
    pub content_length: u64,
    pub content_type: Option<&'a str>,
    pub ms_headers: &'a BTreeMap<&'a str, String>,
    /// The URL path below the account, e.g. `/container/blob.bin`.
    pub resource: &'a str,
    pub query: &'a BTreeMap<&'a str, &'a str>,
}

impl CanonicalRequest<'_> {
    fn string_to_sign(&self, account: &str) -> String {
        // A zero content length is rendered as an empty field.
        let content_length = match self.content_length {
            0 => String::new(),
            n => n.to_string(),
        };
        let canonical_headers: String = self
            .ms_headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();
        let mut canonical_resource = format!("/{}{}", account, self.resource);
        for (name, value) in self.query {
            canonical_resource.push_str(&format!("\n{name}:{value}"));
        }
        // The empty fields are, in order: Content-Encoding,
        // Content-Language, Content-MD5, Date (x-ms-date supersedes it),
        // If-Modified-Since, If-Match, If-None-Match, If-Unmodified-Since,
        // and Range.
        format!(
            "{}\n\n\n{}\n\n{}\n\n\n\n\n\n\n{}{}",
            self.verb,
            content_length,
            self.content_type.unwrap_or_default(),
            canonical_headers,
            canonical_resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64 of `test-account-key`.
    const TEST_KEY: &str = "dGVzdC1hY2NvdW50LWtleQ==";
    const TEST_DATE: &str = "Wed, 06 Aug 2025 00:00:00 GMT";

    fn test_credentials() -> SharedKeyCredentials {
        SharedKeyCredentials::new("testaccount", TEST_KEY).unwrap()
    }

    fn ms_headers(with_blob_type: bool) -> BTreeMap<&'static str, String> {
        let mut headers = BTreeMap::new();
        if with_blob_type {
            headers.insert("x-ms-blob-type", "BlockBlob".to_string());
        }
        headers.insert("x-ms-date", TEST_DATE.to_string());
        headers.insert("x-ms-version", "2021-12-02".to_string());
        headers
    }

    #[test]
    fn empty_account_rejected() {
        let e = SharedKeyCredentials::new("", TEST_KEY).unwrap_err();
        assert!(matches!(e, SharedKeyError::EmptyAccount), "{e}");
    }

    #[test]
    fn invalid_key_rejected() {
        let e = SharedKeyCredentials::new("testaccount", "not base64 !!").unwrap_err();
        assert!(matches!(e, SharedKeyError::InvalidKey(_)), "{e}");
    }

    #[test]
    fn debug_censors_key() {
        let got = format!("{:?}", test_credentials());
        assert!(got.contains("testaccount"), "{got}");
        assert!(got.contains("[censored]"), "{got}");
        assert!(!got.contains(TEST_KEY), "{got}");
    }

    #[test]
    fn list_string_to_sign() {
        let headers = ms_headers(false);
        let query = BTreeMap::from([("comp", "list"), ("restype", "container")]);
        let request = CanonicalRequest {
            verb: "GET",
            content_length: 0,
            content_type: None,
            ms_headers: &headers,
            resource: "/container",
            query: &query,
        };
        let got = request.string_to_sign("testaccount");
        let want = "GET\n\n\n\n\n\n\n\n\n\n\n\n\
                    x-ms-date:Wed, 06 Aug 2025 00:00:00 GMT\n\
                    x-ms-version:2021-12-02\n\
                    /testaccount/container\ncomp:list\nrestype:container";
        assert_eq!(got, want);
    }

    #[test]
    fn list_signature() {
        let headers = ms_headers(false);
        let query = BTreeMap::from([("comp", "list"), ("restype", "container")]);
        let request = CanonicalRequest {
            verb: "GET",
            content_length: 0,
            content_type: None,
            ms_headers: &headers,
            resource: "/container",
            query: &query,
        };
        let got = test_credentials().authorize(&request);
        assert_eq!(
            got,
            "SharedKey testaccount:rbxIlyUbHfyEFcpYbAT/snFYL7S9cyyHJQPc0aga9LU="
        );
    }

    #[test]
    fn upload_signature() {
        let headers = ms_headers(true);
        let query = BTreeMap::new();
        let request = CanonicalRequest {
            verb: "PUT",
            content_length: 11,
            content_type: Some("application/octet-stream"),
            ms_headers: &headers,
            resource: "/container/report.xlsx",
            query: &query,
        };
        let got = test_credentials().authorize(&request);
        assert_eq!(
            got,
            "SharedKey testaccount:oprUBQSshRd/v5c3MLAlmd0z9UKNYqcPu3BeK0cjvpI="
        );
    }
}
