// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PackagingError;
use crate::manifest::{MANIFEST_FILENAME, Manifest};
use crate::media::{Media, base_name};

const STAGING_PREFIX: &str = "staging";
const PARTIAL_SUFFIX: &str = ".partial";

/// A finished package on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Location of the `.zip` archive
    pub archive: PathBuf,
    /// Single-use directory holding the manifest and the archive
    pub staging_dir: PathBuf,
    /// Archive entry names, in the order they were written
    pub entries: Vec<String>,
}

/// Create a fresh, uniquely named staging directory below `root`
///
/// The directory is kept on disk after this call returns; removing it is
/// left to the caller.
pub fn create_staging_dir(root: &Path) -> Result<PathBuf, PackagingError> {
    let staging_failed = |e| PackagingError::StagingFailed {
        path: root.to_path_buf(),
        source: e,
    };

    std::fs::create_dir_all(root).map_err(staging_failed)?;

    let dir = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(root)
        .map_err(staging_failed)?;

    Ok(dir.keep())
}

/// Write the manifest and the referenced media into one zip archive
///
/// Entries are the manifest, then for each media its interview followed by its
/// intro, each stored under its base name. The archive is written under a
/// `.partial` name and only renamed to `<uuid>.zip` once complete, so a failed
/// call never leaves a finished-looking archive behind.
pub fn build_archive(
    staging_dir: &Path,
    manifest: &Manifest,
    media: &[&Media],
) -> Result<Package, PackagingError> {
    let manifest_path = staging_dir.join(MANIFEST_FILENAME);
    let xml = manifest.to_xml()?;
    std::fs::write(&manifest_path, &xml).map_err(|e| PackagingError::ManifestWriteFailed {
        path: manifest_path.clone(),
        source: e,
    })?;
    debug!(path = %manifest_path.display(), content = %xml, "wrote manifest");

    let mut sources = vec![manifest_path];
    for m in media {
        sources.push(m.interview().to_path_buf());
        sources.push(m.intro().to_path_buf());
    }

    let archive = staging_dir.join(format!("{}.zip", Uuid::new_v4()));
    let partial = staging_dir.join(format!("{}{PARTIAL_SUFFIX}", base_name(&archive)));

    let entries = match write_entries(&partial, &sources) {
        Ok(entries) => entries,
        Err(e) => {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
    };

    if let Err(e) = std::fs::rename(&partial, &archive) {
        let _ = std::fs::remove_file(&partial);
        return Err(PackagingError::FinalizeFailed {
            path: archive,
            source: e,
        });
    }

    debug!(archive = %archive.display(), entries = entries.len(), "wrote archive");

    Ok(Package {
        archive,
        staging_dir: staging_dir.to_path_buf(),
        entries,
    })
}

fn write_entries(archive_path: &Path, sources: &[PathBuf]) -> Result<Vec<String>, PackagingError> {
    let write_failed = |e| PackagingError::ArchiveWriteFailed {
        path: archive_path.to_path_buf(),
        source: e,
    };

    let file = File::create(archive_path).map_err(|e| write_failed(ZipError::Io(e)))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::with_capacity(sources.len());
    for source in sources {
        let file = File::open(source).map_err(|e| PackagingError::MediaReadFailed {
            path: source.clone(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);

        let name = base_name(source);
        zip.start_file(name.clone(), options).map_err(write_failed)?;
        std::io::copy(&mut reader, &mut zip).map_err(|e| write_failed(ZipError::Io(e)))?;
        entries.push(name);
    }

    let mut writer = zip.finish().map_err(write_failed)?;
    writer.flush().map_err(|e| PackagingError::FinalizeFailed {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    Ok(entries)
}
