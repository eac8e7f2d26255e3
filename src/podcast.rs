// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use tracing::info;
use uuid::Uuid;

use crate::error::PackagingError;
use crate::manifest::Manifest;
use crate::media::{Media, MediaFormat};
use crate::package::{Package, build_archive, create_staging_dir};

/// The two fixed media slots of a podcast, one per accepted format
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSlots {
    pub mp3: Option<Media>,
    pub wav: Option<Media>,
}

impl MediaSlots {
    pub fn get(&self, format: MediaFormat) -> Option<&Media> {
        match format {
            MediaFormat::Mp3 => self.mp3.as_ref(),
            MediaFormat::Wav => self.wav.as_ref(),
        }
    }

    fn slot_mut(&mut self, format: MediaFormat) -> &mut Option<Media> {
        match format {
            MediaFormat::Mp3 => &mut self.mp3,
            MediaFormat::Wav => &mut self.wav,
        }
    }

    /// Filled slots in manifest order (mp3, then wav)
    pub fn populated(&self) -> Vec<&Media> {
        self.mp3.iter().chain(self.wav.iter()).collect()
    }
}

/// A podcast release being assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Podcast {
    description: String,
    id: Uuid,
    media: MediaSlots,
}

impl Podcast {
    /// Create a podcast with a freshly generated id and empty media slots
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            id: Uuid::new_v4(),
            media: MediaSlots::default(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn media(&self) -> &MediaSlots {
        &self.media
    }

    /// Put `media` into the slot for `format`, replacing whatever was there
    ///
    /// The media is trusted as-is; artifact validation happens upstream.
    pub fn add_media(&mut self, format: MediaFormat, media: Media) -> &mut Self {
        *self.media.slot_mut(format) = Some(media);
        self
    }

    /// Swap a slot's value back in, returning what it held
    pub(crate) fn restore_media(
        &mut self,
        format: MediaFormat,
        media: Option<Media>,
    ) -> Option<Media> {
        std::mem::replace(self.media.slot_mut(format), media)
    }

    /// Build the manifest and archive for the populated slots
    ///
    /// Each call gets its own staging directory below `staging_root`. The
    /// podcast itself is not modified, so a failed call can be retried.
    pub fn create_package(&self, staging_root: &Path) -> Result<Package, PackagingError> {
        let manifest = Manifest::build(
            &self.description,
            self.id.to_string(),
            self.media.mp3.as_ref(),
            self.media.wav.as_ref(),
        );

        let staging_dir = create_staging_dir(staging_root)?;
        let package = build_archive(&staging_dir, &manifest, &self.media.populated())?;

        info!(
            podcast = %self.id,
            archive = %package.archive.display(),
            "package created"
        );

        Ok(package)
    }
}
