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

//! Wire models for drive-item resources.

use bytes::Bytes;

/// A single item in a drive: a file or a folder.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DriveItem {
    /// The item's unique identifier within its drive.
    #[serde(default)]
    pub id: String,

    /// The item's name, including any file extension.
    #[serde(default)]
    pub name: String,

    /// The item's size in bytes, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// A short-lived, pre-authenticated URL for the item's content.
    ///
    /// Only present on file items. Requests against this URL must not carry
    /// an `Authorization` header; the URL embeds its own grant.
    #[serde(
        default,
        rename = "@microsoft.graph.downloadUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,
}

/// One page of a children listing.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DriveItemList {
    /// The items on this page.
    #[serde(default)]
    pub value: Vec<DriveItem>,

    /// The URL of the next page, when more items remain.
    #[serde(
        default,
        rename = "@odata.nextLink",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_link: Option<String>,
}

/// A drive item's name paired with its downloaded content.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadedItem {
    /// The item's name, as listed in the drive.
    pub name: String,

    /// The item's raw content.
    pub content: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_item_from_json() {
        let json = serde_json::json!({
            "id": "item-123",
            "name": "report.xlsx",
            "size": 4096,
            "@microsoft.graph.downloadUrl": "https://example.com/grant",
            "lastModifiedDateTime": "2025-05-01T00:00:00Z",
        });
        let got = serde_json::from_value::<DriveItem>(json).unwrap();
        assert_eq!(got.id, "item-123");
        assert_eq!(got.name, "report.xlsx");
        assert_eq!(got.size, Some(4096));
        assert_eq!(got.download_url.as_deref(), Some("https://example.com/grant"));
    }

    #[test]
    fn folder_item_has_no_download_url() {
        let json = serde_json::json!({"id": "folder-1", "name": "Archive"});
        let got = serde_json::from_value::<DriveItem>(json).unwrap();
        assert_eq!(got.download_url, None);
        assert_eq!(got.size, None);
    }

    #[test]
    fn list_page_with_next_link() {
        let json = serde_json::json!({
            "value": [{"id": "a", "name": "one.csv"}],
            "@odata.nextLink": "https://example.com/page2",
        });
        let got = serde_json::from_value::<DriveItemList>(json).unwrap();
        assert_eq!(got.value.len(), 1);
        assert_eq!(got.next_link.as_deref(), Some("https://example.com/page2"));
    }

    #[test]
    fn empty_listing() {
        let got = serde_json::from_value::<DriveItemList>(serde_json::json!({})).unwrap();
        assert!(got.value.is_empty());
        assert_eq!(got.next_link, None);
    }
}
