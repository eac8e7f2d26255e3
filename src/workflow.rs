// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::events::{SharedEventListener, WorkflowEvent};
use crate::media::{Media, validate_artifact};
use crate::package::Package;
use crate::podcast::Podcast;

/// Caller-chosen identity of a workflow session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a session stands in the packaging lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No podcast open
    Idle,
    /// A podcast is open and being filled
    Open,
    /// A package was produced since the last attachment; the podcast stays
    /// open, and starting a new one is allowed again
    Packaged,
}

/// The two recording roles a package needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaRole {
    Introduction,
    Interview,
}

impl MediaRole {
    fn label(self) -> &'static str {
        match self {
            MediaRole::Introduction => "introduction",
            MediaRole::Interview => "interview",
        }
    }
}

#[derive(Debug)]
struct Session {
    podcast: Podcast,
    intro: Option<PathBuf>,
    interview: Option<PathBuf>,
    packaged: bool,
}

impl Session {
    fn new(podcast: Podcast) -> Self {
        Self {
            podcast,
            intro: None,
            interview: None,
            packaged: false,
        }
    }

    fn state(&self) -> WorkflowState {
        if self.packaged {
            WorkflowState::Packaged
        } else {
            WorkflowState::Open
        }
    }
}

/// Session-keyed state machine driving podcast assembly
///
/// Each session holds at most one open podcast plus the introduction and
/// interview files attached since the last package. Failed calls leave the
/// session exactly as it was.
pub struct PackagingWorkflow {
    sessions: HashMap<SessionId, Session>,
    listeners: Vec<SharedEventListener>,
    staging_root: PathBuf,
}

impl PackagingWorkflow {
    /// Create a workflow that stages packages below `staging_root`
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        Self {
            sessions: HashMap::new(),
            listeners: Vec::new(),
            staging_root: staging_root.into(),
        }
    }

    /// Register a listener for lifecycle events
    pub fn subscribe(&mut self, listener: SharedEventListener) {
        self.listeners.push(listener);
    }

    fn emit(&self, event: WorkflowEvent) {
        for listener in &self.listeners {
            listener.notify(&event);
        }
    }

    pub fn state(&self, session: &SessionId) -> WorkflowState {
        self.sessions
            .get(session)
            .map_or(WorkflowState::Idle, Session::state)
    }

    pub fn podcast(&self, session: &SessionId) -> Option<&Podcast> {
        self.sessions.get(session).map(|s| &s.podcast)
    }

    /// Introduction file attached since the last package, if any
    pub fn pending_introduction(&self, session: &SessionId) -> Option<&Path> {
        self.sessions.get(session).and_then(|s| s.intro.as_deref())
    }

    /// Interview file attached since the last package, if any
    pub fn pending_interview(&self, session: &SessionId) -> Option<&Path> {
        self.sessions.get(session).and_then(|s| s.interview.as_deref())
    }

    /// Open a new podcast in `session`
    ///
    /// Fails with [`WorkflowError::AlreadyOpen`] while a podcast is still
    /// being assembled. A packaged podcast is replaced.
    pub fn start(
        &mut self,
        session: &SessionId,
        description: impl Into<String>,
    ) -> Result<&Podcast, WorkflowError> {
        if self.state(session) == WorkflowState::Open {
            return Err(WorkflowError::AlreadyOpen);
        }

        let podcast = Podcast::new(description);
        info!(session = %session, podcast = %podcast.id(), "podcast started");

        self.sessions
            .insert(session.clone(), Session::new(podcast.clone()));
        self.emit(WorkflowEvent::PodcastStarted {
            session: session.clone(),
            podcast,
        });

        Ok(&self.sessions[session].podcast)
    }

    /// Attach the introduction recording
    pub fn attach_introduction(
        &mut self,
        session: &SessionId,
        file: impl AsRef<Path>,
    ) -> Result<(), WorkflowError> {
        self.attach(session, MediaRole::Introduction, file.as_ref())
    }

    /// Attach the interview recording
    pub fn attach_interview(
        &mut self,
        session: &SessionId,
        file: impl AsRef<Path>,
    ) -> Result<(), WorkflowError> {
        self.attach(session, MediaRole::Interview, file.as_ref())
    }

    fn attach(
        &mut self,
        session: &SessionId,
        role: MediaRole,
        file: &Path,
    ) -> Result<(), WorkflowError> {
        let state = self
            .sessions
            .get_mut(session)
            .ok_or(WorkflowError::NoOpenPodcast)?;
        validate_artifact(file)?;

        let slot = match role {
            MediaRole::Introduction => &mut state.intro,
            MediaRole::Interview => &mut state.interview,
        };
        *slot = Some(file.to_path_buf());
        state.packaged = false;

        info!(session = %session, role = role.label(), file = %file.display(), "media attached");

        let session = session.clone();
        let file = file.to_path_buf();
        self.emit(match role {
            MediaRole::Introduction => WorkflowEvent::IntroductionAttached { session, file },
            MediaRole::Interview => WorkflowEvent::InterviewAttached { session, file },
        });

        Ok(())
    }

    /// Package the attached introduction and interview
    ///
    /// The active format is taken from the introduction's extension; the
    /// interview's extension is not checked against it. On success the
    /// pending files are cleared and the podcast stays open for another
    /// package. On failure the podcast's media slot and the pending files are
    /// left untouched.
    pub fn create_package(&mut self, session: &SessionId) -> Result<Package, WorkflowError> {
        let state = self
            .sessions
            .get_mut(session)
            .ok_or(WorkflowError::NoOpenPodcast)?;

        let intro = state.intro.clone().ok_or(WorkflowError::IncompleteMedia {
            missing: MediaRole::Introduction.label(),
        })?;
        let interview = state.interview.clone().ok_or(WorkflowError::IncompleteMedia {
            missing: MediaRole::Interview.label(),
        })?;

        let format = validate_artifact(&intro)?;
        let previous = state.podcast.media().get(format).cloned();
        state
            .podcast
            .add_media(format, Media::new(format, intro, interview));

        let package = match state.podcast.create_package(&self.staging_root) {
            Ok(package) => package,
            Err(e) => {
                warn!(session = %session, error = %e, "packaging failed");
                state.podcast.restore_media(format, previous);
                return Err(e.into());
            }
        };

        state.intro = None;
        state.interview = None;
        state.packaged = true;

        self.emit(WorkflowEvent::PackageCreated {
            session: session.clone(),
            archive: package.archive.clone(),
        });

        Ok(package)
    }

    /// Discard a session and its podcast
    pub fn end_session(&mut self, session: &SessionId) -> Option<Podcast> {
        self.sessions.remove(session).map(|s| s.podcast)
    }
}

impl Default for PackagingWorkflow {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}
