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

use crate::list;
use crate::shared_key::{CanonicalRequest, SharedKeyCredentials};
use bytes::Bytes;
use graphsync_core::Result;
use graphsync_core::error::Error;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Method;
use std::collections::BTreeMap;

// The service version every request declares.
const SERVICE_VERSION: &str = "2021-12-02";

const OCTET_STREAM: &str = "application/octet-stream";

// The characters that cannot appear verbatim in a blob path. `/` stays
// verbatim: blob names may contain folder-like segments.
const BLOB_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Implements a client for one container of a storage account.
///
/// # Example
/// ```no_run
/// # use graphsync_blobs::client::BlobContainer;
/// # use graphsync_blobs::shared_key::SharedKeyCredentials;
/// # tokio_test::block_on(async {
/// let credentials = SharedKeyCredentials::new("myaccount", "bXkta2V5")?;
/// let container = BlobContainer::builder(credentials, "source-files").build();
/// let names = container.list_blobs().await?;
/// # Ok::<(), anyhow::Error>(())
/// # });
/// ```
///
/// # Pooling and Cloning
///
/// `BlobContainer` holds a connection pool internally; create one and reuse
/// it. Cloning is cheap and clones share the pool and the credentials.
#[derive(Clone, Debug)]
pub struct BlobContainer {
    inner: reqwest::Client,
    cred: SharedKeyCredentials,
    endpoint: String,
    container: String,
}

/// A builder for [BlobContainer].
pub struct Builder {
    cred: SharedKeyCredentials,
    endpoint: String,
    container: String,
}

impl Builder {
    /// Sets the endpoint used for every request.
    ///
    /// Defaults to `https://{account}.blob.core.windows.net`.
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Returns a [BlobContainer] instance with the configured settings.
    pub fn build(self) -> BlobContainer {
        BlobContainer {
            inner: reqwest::Client::new(),
            cred: self.cred,
            endpoint: self.endpoint,
            container: self.container,
        }
    }
}

impl BlobContainer {
    /// Returns a builder for [BlobContainer].
    ///
    /// All operations address blobs inside `container`; the container itself
    /// must already exist.
    pub fn builder<C: Into<String>>(credentials: SharedKeyCredentials, container: C) -> Builder {
        let endpoint = format!("https://{}.blob.core.windows.net", credentials.account());
        Builder {
            cred: credentials,
            endpoint,
            container: container.into(),
        }
    }

    /// Uploads `content` as a block blob named `name`.
    ///
    /// An existing blob with the same name is overwritten.
    pub async fn upload_blob<B: Into<Bytes>>(&self, name: &str, content: B) -> Result<()> {
        let content = content.into();
        let resource = self.blob_resource(name);
        let date = rfc1123_now();
        let mut ms_headers = base_ms_headers(&date);
        ms_headers.insert("x-ms-blob-type", "BlockBlob".to_string());
        let authorization = self.cred.authorize(&CanonicalRequest {
            verb: "PUT",
            content_length: content.len() as u64,
            content_type: Some(OCTET_STREAM),
            ms_headers: &ms_headers,
            resource: &resource,
            query: &BTreeMap::new(),
        });

        tracing::debug!(name = %name, size = content.len(), "uploading blob");
        let request = self
            .inner
            .request(Method::PUT, format!("{}{}", self.endpoint, resource))
            .header("authorization", authorization)
            .header("content-type", OCTET_STREAM)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-date", &date)
            .header("x-ms-version", SERVICE_VERSION)
            .body(content);
        let response = request.send().await.map_err(Error::transport)?;
        expect_success(response).await?;
        Ok(())
    }

    /// Downloads the content of the blob named `name`.
    pub async fn download_blob(&self, name: &str) -> Result<Bytes> {
        let resource = self.blob_resource(name);
        let response = self
            .signed_request(Method::GET, &resource, &BTreeMap::new())
            .send()
            .await
            .map_err(Error::transport)?;
        let response = expect_success(response).await?;
        let content = response.bytes().await.map_err(Error::transport)?;
        tracing::debug!(name = %name, size = content.len(), "downloaded blob");
        Ok(content)
    }

    /// Lists the names of every blob in the container.
    pub async fn list_blobs(&self) -> Result<Vec<String>> {
        let resource = format!("/{}", self.container);
        let query = BTreeMap::from([("comp", "list"), ("restype", "container")]);
        let response = self
            .signed_request(Method::GET, &resource, &query)
            .query(&[("restype", "container"), ("comp", "list")])
            .send()
            .await
            .map_err(Error::transport)?;
        let response = expect_success(response).await?;
        let body = response.text().await.map_err(Error::transport)?;
        Ok(list::blob_names(&body))
    }

    /// Deletes the blob named `name`.
    pub async fn delete_blob(&self, name: &str) -> Result<()> {
        let resource = self.blob_resource(name);
        let response = self
            .signed_request(Method::DELETE, &resource, &BTreeMap::new())
            .send()
            .await
            .map_err(Error::transport)?;
        expect_success(response).await?;
        tracing::debug!(name = %name, "deleted blob");
        Ok(())
    }

    /// Deletes every blob in the container and returns how many went.
    pub async fn clear_container(&self) -> Result<usize> {
        let names = self.list_blobs().await?;
        for name in &names {
            self.delete_blob(name).await?;
        }
        Ok(names.len())
    }

    fn blob_resource(&self, name: &str) -> String {
        format!(
            "/{}/{}",
            self.container,
            utf8_percent_encode(name, BLOB_PATH)
        )
    }

    // Builds a bodyless request carrying the signature and x-ms headers.
    fn signed_request(
        &self,
        method: Method,
        resource: &str,
        query: &BTreeMap<&str, &str>,
    ) -> reqwest::RequestBuilder {
        let date = rfc1123_now();
        let ms_headers = base_ms_headers(&date);
        let authorization = self.cred.authorize(&CanonicalRequest {
            verb: method.as_str(),
            content_length: 0,
            content_type: None,
            ms_headers: &ms_headers,
            resource,
            query,
        });
        self.inner
            .request(method, format!("{}{}", self.endpoint, resource))
            .header("authorization", authorization)
            .header("x-ms-date", &date)
            .header("x-ms-version", SERVICE_VERSION)
    }
}

fn base_ms_headers(date: &str) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("x-ms-date", date.to_string()),
        ("x-ms-version", SERVICE_VERSION.to_string()),
    ])
}

fn rfc1123_now() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::service(status, body));
    }
    Ok(response)
}
