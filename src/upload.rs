// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use sha2::{Digest, Sha256};
use tracing::info;
use url::Url;

use crate::error::UploadError;
use crate::media::base_name;

/// An archive ready to be sent to the processing endpoint
#[derive(Debug, Clone)]
pub struct ArchiveUpload {
    /// Name the archive is uploaded under
    pub file_name: String,
    /// Archive contents
    pub bytes: Vec<u8>,
    /// Content checksum, e.g. `sha256:<hex>`
    pub checksum: String,
}

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub status: u16,
    pub checksum: String,
}

/// HTTP client abstraction for testability
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST an archive as a multipart form and return the response status
    async fn post_archive(&self, url: &str, upload: ArchiveUpload) -> Result<u16, reqwest::Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default settings
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestClient with a custom reqwest::Client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_archive(&self, url: &str, upload: ArchiveUpload) -> Result<u16, reqwest::Error> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/zip")?;
        let form = Form::new()
            .part("file", part)
            .text("checksum", upload.checksum);

        let response = self.client.post(url).multipart(form).send().await?;
        Ok(response.status().as_u16())
    }
}

/// SHA-256 checksum of `bytes` in `sha256:<hex>` form
pub fn checksum(bytes: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(bytes))
}

/// Upload a finished package archive
///
/// Succeeds only if the endpoint answers with a 2xx status. There are no
/// retries.
pub async fn publish_package<C: HttpClient>(
    client: &C,
    url: &Url,
    archive: &Path,
) -> Result<PublishReceipt, UploadError> {
    let bytes = tokio::fs::read(archive)
        .await
        .map_err(|e| UploadError::FileReadFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

    let checksum = checksum(&bytes);
    let upload = ArchiveUpload {
        file_name: base_name(archive),
        bytes,
        checksum: checksum.clone(),
    };

    let status = client
        .post_archive(url.as_str(), upload)
        .await
        .map_err(|e| UploadError::HttpFailed {
            url: url.to_string(),
            source: e,
        })?;

    if !(200..300).contains(&status) {
        return Err(UploadError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    info!(url = %url, status, checksum = %checksum, "package published");

    Ok(PublishReceipt { status, checksum })
}
