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

//! Extraction of blob names from a container listing.
//!
//! The list operation answers with an XML enumeration. Only the `<Name>`
//! elements matter to this crate, so they are scanned out directly instead
//! of pulling in a full XML stack for one tag.

/// Returns the `<Name>` element values in document order.
pub(crate) fn blob_names(body: &str) -> Vec<String> {
    const OPEN: &str = "<Name>";
    const CLOSE: &str = "</Name>";
    let mut names = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find(OPEN) {
        rest = &rest[start + OPEN.len()..];
        let Some(end) = rest.find(CLOSE) else { break };
        names.push(unescape(&rest[..end]));
        rest = &rest[end + CLOSE.len()..];
    }
    names
}

// The five entities the service escapes in element content.
fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
