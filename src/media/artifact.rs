// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::error::WorkflowError;

use super::format::MediaFormat;

/// Extract the lowercase extension from a file reference
///
/// Only the file name is inspected (no filesystem access), so nonexistent
/// paths are classified too. Returns `None` when the name has no `.` or
/// nothing follows the last one.
pub fn extension_for(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let (_, ext) = name.rsplit_once('.')?;

    let ext = ext.trim().to_lowercase();
    if ext.is_empty() { None } else { Some(ext) }
}

/// The final path component, used for manifest attributes and archive entries
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Check whether a file reference names an accepted media artifact
pub fn is_valid_artifact(path: &Path) -> bool {
    validate_artifact(path).is_ok()
}

/// Like [`is_valid_artifact`], treating a missing reference as invalid
pub fn is_valid_artifact_opt(path: Option<&Path>) -> bool {
    path.is_some_and(is_valid_artifact)
}

/// Validate a file reference and return the media format it carries
pub fn validate_artifact(path: &Path) -> Result<MediaFormat, WorkflowError> {
    let invalid = |reason: String| WorkflowError::InvalidArtifact {
        path: path.to_path_buf(),
        reason,
    };

    let ext = extension_for(path).ok_or_else(|| invalid("file has no extension".to_string()))?;

    ext.parse::<MediaFormat>()
        .map_err(|_| invalid(format!("unsupported extension '{ext}', expected mp3 or wav")))
}
