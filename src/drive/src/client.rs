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

use crate::model::{DownloadedItem, DriveItem, DriveItemList};
use auth::credentials::HeaderSource;
use bytes::Bytes;
use graphsync_core::Result;
use graphsync_core::error::Error;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::sync::Arc;

const DEFAULT_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";

// The characters that cannot appear verbatim in a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Implements a client for the Microsoft Graph drive-items API.
///
/// # Example
/// ```no_run
/// # use graphsync_drive::client::Drive;
/// # use auth::credentials::client_secret::Builder;
/// # tokio_test::block_on(async {
/// let credentials = Builder::new("my-tenant", "my-client", "my-secret").build()?;
/// credentials.exchange_token().await?;
/// let client = Drive::builder(credentials).build();
/// let items = client.list_children("site-id", "drive-id").await?;
/// # Ok::<(), anyhow::Error>(())
/// # });
/// ```
///
/// # Configuration
///
/// Use [with_endpoint][Builder::with_endpoint] on the builder to target a
/// sovereign-cloud Graph endpoint or a local test server.
///
/// # Pooling and Cloning
///
/// `Drive` holds a connection pool internally; create one and reuse it.
/// Cloning is cheap and clones share the pool and the credentials.
#[derive(Clone, Debug)]
pub struct Drive {
    inner: reqwest::Client,
    cred: Arc<dyn HeaderSource>,
    endpoint: String,
}

/// A builder for [Drive].
pub struct Builder {
    cred: Arc<dyn HeaderSource>,
    endpoint: String,
}

impl Builder {
    /// Sets the endpoint used for every request.
    ///
    /// Defaults to `https://graph.microsoft.com/v1.0`.
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Returns a [Drive] instance with the configured settings.
    pub fn build(self) -> Drive {
        Drive {
            inner: reqwest::Client::new(),
            cred: self.cred,
            endpoint: self.endpoint,
        }
    }
}

impl Drive {
    /// Returns a builder for [Drive], composed with the given credentials.
    ///
    /// The client derives request headers from the credentials on every
    /// call; it never exchanges tokens itself.
    pub fn builder<C>(credentials: C) -> Builder
    where
        C: HeaderSource + 'static,
    {
        Builder {
            cred: Arc::new(credentials),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Lists every child of a drive's root folder.
    ///
    /// Follows pagination until the listing is exhausted.
    pub async fn list_children(&self, site_id: &str, drive_id: &str) -> Result<Vec<DriveItem>> {
        let mut url = format!(
            "{}/sites/{}/drives/{}/root/children",
            self.endpoint,
            segment(site_id),
            segment(drive_id)
        );
        let mut items = Vec::new();
        loop {
            let headers = self.cred.binary_headers().map_err(Error::authentication)?;
            let response = self
                .inner
                .get(&url)
                .headers(headers)
                .send()
                .await
                .map_err(Error::transport)?;
            let page = expect_json::<DriveItemList>(response).await?;
            items.extend(page.value);
            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }
        tracing::debug!(count = items.len(), "listed drive children");
        Ok(items)
    }

    /// Downloads the content of every file whose name contains `fragment`.
    ///
    /// Folders and items without content are skipped. Each file is fetched
    /// through its pre-authenticated download URL, which must not carry an
    /// `Authorization` header.
    pub async fn download_matching(
        &self,
        site_id: &str,
        drive_id: &str,
        fragment: &str,
    ) -> Result<Vec<DownloadedItem>> {
        let items = self.list_children(site_id, drive_id).await?;
        let mut downloads = Vec::new();
        for item in items {
            if !item.name.contains(fragment) {
                continue;
            }
            let Some(url) = item.download_url else {
                continue;
            };
            let response = self.inner.get(url).send().await.map_err(Error::transport)?;
            let response = expect_success(response).await?;
            let content = response.bytes().await.map_err(Error::transport)?;
            tracing::debug!(name = %item.name, size = content.len(), "downloaded drive item");
            downloads.push(DownloadedItem {
                name: item.name,
                content,
            });
        }
        Ok(downloads)
    }

    /// Uploads `content` as a file named `name` in the drive's root folder.
    ///
    /// Replaces an existing item with the same name.
    pub async fn upload_item<B>(
        &self,
        site_id: &str,
        drive_id: &str,
        name: &str,
        content: B,
    ) -> Result<DriveItem>
    where
        B: Into<Bytes>,
    {
        let url = format!(
            "{}/sites/{}/drives/{}/root:/{}:/content",
            self.endpoint,
            segment(site_id),
            segment(drive_id),
            segment(name)
        );
        let headers = self.cred.binary_headers().map_err(Error::authentication)?;
        let content = content.into();
        tracing::debug!(name = %name, size = content.len(), "uploading drive item");
        let response = self
            .inner
            .put(&url)
            .headers(headers)
            .body(content)
            .send()
            .await
            .map_err(Error::transport)?;
        expect_json::<DriveItem>(response).await
    }

    /// Updates one field of the list item behind a drive item.
    ///
    /// Issues a `PATCH` against the item's `listItem/fields` resource with
    /// the body `{field: value}`. Service rejections surface as errors;
    /// nothing is retried or swallowed.
    pub async fn update_metadata(
        &self,
        site_id: &str,
        drive_id: &str,
        item_id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let url = format!(
            "{}/sites/{}/drives/{}/items/{}/listItem/fields",
            self.endpoint,
            segment(site_id),
            segment(drive_id),
            segment(item_id)
        );
        let headers = self.cred.json_headers().map_err(Error::authentication)?;
        let body = serde_json::Map::from_iter([(field.to_string(), value)]);
        let response = self
            .inner
            .patch(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(Error::transport)?;
        expect_success(response).await?;
        tracing::debug!(item_id = %item_id, field = %field, "updated drive item metadata");
        Ok(())
    }
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::service(status, body));
    }
    Ok(response)
}

async fn expect_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = expect_success(response).await?;
    response.json::<T>().await.map_err(Error::deserialization)
}
