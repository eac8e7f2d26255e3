use std::path::PathBuf;
use std::sync::Arc;

use crate::podcast::Podcast;
use crate::workflow::SessionId;

/// Lifecycle notifications emitted by the packaging workflow
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    /// A new podcast was opened in a session
    PodcastStarted {
        session: SessionId,
        podcast: Podcast,
    },

    /// An introduction recording was accepted
    IntroductionAttached {
        session: SessionId,
        file: PathBuf,
    },

    /// An interview recording was accepted
    InterviewAttached {
        session: SessionId,
        file: PathBuf,
    },

    /// A package archive was written
    PackageCreated {
        session: SessionId,
        archive: PathBuf,
    },
}

impl WorkflowEvent {
    /// The session this event belongs to
    pub fn session(&self) -> &SessionId {
        match self {
            WorkflowEvent::PodcastStarted { session, .. }
            | WorkflowEvent::IntroductionAttached { session, .. }
            | WorkflowEvent::InterviewAttached { session, .. }
            | WorkflowEvent::PackageCreated { session, .. } => session,
        }
    }
}

/// Observer for workflow lifecycle events.
///
/// Events are delivered synchronously, once per transition, to every
/// registered listener. No acknowledgment is expected.
pub trait EventListener: Send + Sync {
    /// Handle a workflow event
    fn notify(&self, event: &WorkflowEvent);
}

/// A shared reference to an event listener
pub type SharedEventListener = Arc<dyn EventListener>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct SessionLog {
        sessions: Mutex<Vec<String>>,
    }

    impl EventListener for SessionLog {
        fn notify(&self, event: &WorkflowEvent) {
            let session = event.session().as_str().to_string();
            self.sessions.lock().unwrap().push(session);
        }
    }

    #[test]
    fn session_is_available_for_every_event() {
        let session = SessionId::from("s1");
        let events = [
            WorkflowEvent::PodcastStarted {
                session: session.clone(),
                podcast: Podcast::new("Episode 1"),
            },
            WorkflowEvent::IntroductionAttached {
                session: session.clone(),
                file: PathBuf::from("intro.mp3"),
            },
            WorkflowEvent::InterviewAttached {
                session: session.clone(),
                file: PathBuf::from("interview.mp3"),
            },
            WorkflowEvent::PackageCreated {
                session: session.clone(),
                archive: PathBuf::from("/tmp/staging/x.zip"),
            },
        ];

        let log = Arc::new(SessionLog::default());
        let listener: SharedEventListener = log.clone();
        for event in &events {
            assert_eq!(event.session(), &session);
            listener.notify(event);
        }

        assert_eq!(*log.sessions.lock().unwrap(), vec!["s1"; 4]);
    }
}
