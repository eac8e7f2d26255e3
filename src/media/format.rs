use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::WorkflowError;

/// The closed set of media formats a podcast can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFormat {
    Mp3,
    Wav,
}

impl MediaFormat {
    /// All accepted formats, in manifest order
    pub const ALL: [MediaFormat; 2] = [MediaFormat::Mp3, MediaFormat::Wav];

    /// The format key, which is also the file extension
    pub fn as_str(self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Wav => "wav",
        }
    }

    /// Look up a format by its (already normalized) extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.as_str() == ext)
    }
}

impl FromStr for MediaFormat {
    type Err = WorkflowError;

    /// Parse a format key such as `mp3` or ` WAV `
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let normalized = key.trim().to_lowercase();
        Self::from_extension(&normalized).ok_or_else(|| WorkflowError::InvalidArtifact {
            path: PathBuf::from(key),
            reason: format!("unsupported format '{normalized}', expected mp3 or wav"),
        })
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete pair of introduction and interview recordings for one format
///
/// Both files are required at construction, so a half-filled `Media` cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    format: MediaFormat,
    intro: PathBuf,
    interview: PathBuf,
}

impl Media {
    pub fn new(
        format: MediaFormat,
        intro: impl Into<PathBuf>,
        interview: impl Into<PathBuf>,
    ) -> Self {
        Self {
            format,
            intro: intro.into(),
            interview: interview.into(),
        }
    }

    pub fn format(&self) -> MediaFormat {
        self.format
    }

    pub fn intro(&self) -> &Path {
        &self.intro
    }

    pub fn interview(&self) -> &Path {
        &self.interview
    }
}
