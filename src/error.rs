// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while serializing or parsing a package manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to serialize manifest: {0}")]
    SerializeFailed(#[from] quick_xml::se::SeError),

    #[error("Failed to parse manifest: {0}")]
    ParseFailed(#[from] quick_xml::de::DeError),
}

/// Errors that can occur while assembling a package on disk
#[derive(Error, Debug)]
pub enum PackagingError {
    #[error("Failed to create staging directory in {path}: {source}")]
    StagingFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {path}: {source}")]
    ManifestWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Failed to read media file {path}: {source}")]
    MediaReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write archive {path}: {source}")]
    ArchiveWriteFailed {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to finalize archive {path}: {source}")]
    FinalizeFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by the packaging workflow
///
/// Every variant leaves the session in the state it was in before the call.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("you're already producing a new podcast")]
    AlreadyOpen,

    #[error("you need to start a new podcast")]
    NoOpenPodcast,

    #[error("you must provide a valid artifact ({path}: {reason})")]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("the package is missing its {missing} media")]
    IncompleteMedia { missing: &'static str },

    #[error("Packaging failed: {0}")]
    Packaging(#[from] PackagingError),
}

/// Errors that can occur when publishing a package
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to read archive {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}
