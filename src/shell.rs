// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};

use crate::error::WorkflowError;
use crate::events::{EventListener, WorkflowEvent};
use crate::media::base_name;
use crate::workflow::WorkflowState;

const PROMPT_TERMINAL: &str = " :>";

/// One line entered at the interactive prompt
#[derive(Parser, Debug)]
#[command(name = "podpack", no_binary_name = true)]
#[command(disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

/// Commands understood by the interactive shell
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Start a new podcast
    NewPodcast {
        /// Free-text description of the podcast
        #[arg(long)]
        description: String,
    },

    /// Add the introduction media
    AddIntroductionMedia {
        /// Path to an mp3 or wav file
        #[arg(long)]
        media: PathBuf,
    },

    /// Add the interview media
    AddInterviewMedia {
        /// Path to an mp3 or wav file
        #[arg(long)]
        media: PathBuf,
    },

    /// Build the package archive from the attached media
    Package,

    /// Upload the most recent package for processing
    Publish,

    /// Show the current podcast and attached media
    Status,

    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

impl ShellCommand {
    /// Check whether the command may run in the given workflow state
    ///
    /// Starting is gated on no podcast being open, adding media on one being
    /// open. Other commands are always available and report their own errors.
    pub fn availability(&self, state: WorkflowState) -> Result<(), WorkflowError> {
        match self {
            ShellCommand::NewPodcast { .. } if state == WorkflowState::Open => {
                Err(WorkflowError::AlreadyOpen)
            }
            ShellCommand::AddIntroductionMedia { .. } | ShellCommand::AddInterviewMedia { .. }
                if state == WorkflowState::Idle =>
            {
                Err(WorkflowError::NoOpenPodcast)
            }
            _ => Ok(()),
        }
    }
}

/// Split an input line into arguments
///
/// Whitespace separates arguments; single or double quotes group text
/// containing spaces. Returns an error for an unterminated quote.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_arg {
        args.push(current);
    }

    Ok(args)
}

/// Parse an input line into a shell command
pub fn parse_command(args: &[String]) -> Result<ShellCommand, clap::Error> {
    ShellLine::try_parse_from(args).map(|line| line.command)
}

#[derive(Debug, Default)]
struct PromptState {
    description: Option<String>,
    introduction: Option<String>,
    interview: Option<String>,
    archive: Option<PathBuf>,
}

/// Listener that tracks what the prompt displays and the latest package
#[derive(Debug, Default)]
pub struct ShellListener {
    state: Mutex<PromptState>,
}

impl ShellListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain prompt text, without colors
    pub fn prompt_text(&self) -> String {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let Some(description) = &state.description else {
            return format!("(no podcast created yet) {PROMPT_TERMINAL}");
        };

        let mut files = Vec::new();
        if let Some(intro) = &state.introduction {
            files.push(format!("introduction: {intro}"));
        }
        if let Some(interview) = &state.interview {
            files.push(format!("interview: {interview}"));
        }

        if files.is_empty() {
            format!("{description} {PROMPT_TERMINAL}")
        } else {
            format!("{description} ( {} ){PROMPT_TERMINAL}", files.join(", "))
        }
    }

    /// Prompt text colored by whether a podcast is open
    pub fn prompt(&self) -> ColoredString {
        let open = self.is_podcast_started();
        let text = self.prompt_text();
        if open { text.yellow() } else { text.red() }
    }

    pub fn is_podcast_started(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .description
            .is_some()
    }

    /// The most recently created package archive
    pub fn last_archive(&self) -> Option<PathBuf> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .archive
            .clone()
    }
}

impl EventListener for ShellListener {
    fn notify(&self, event: &WorkflowEvent) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            WorkflowEvent::PodcastStarted { podcast, .. } => {
                *state = PromptState {
                    description: Some(podcast.description().to_string()),
                    ..PromptState::default()
                };
            }
            WorkflowEvent::IntroductionAttached { file, .. } => {
                state.introduction = Some(base_name(file));
            }
            WorkflowEvent::InterviewAttached { file, .. } => {
                state.interview = Some(base_name(file));
            }
            WorkflowEvent::PackageCreated { archive, .. } => {
                state.introduction = None;
                state.interview = None;
                state.archive = Some(archive.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::podcast::Podcast;
    use crate::workflow::SessionId;

    fn args(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn tokenize_splits_on_whitespace() {
        assert_eq!(args("  package  "), vec!["package"]);
        assert_eq!(
            args("add-interview-media --media /tmp/a.mp3"),
            vec!["add-interview-media", "--media", "/tmp/a.mp3"]
        );
        assert!(args("   ").is_empty());
    }

    #[test]
    fn tokenize_respects_quotes() {
        assert_eq!(
            args(r#"new-podcast --description "Episode 1: the start""#),
            vec!["new-podcast", "--description", "Episode 1: the start"]
        );
        assert_eq!(args("a 'b c' d"), vec!["a", "b c", "d"]);
        assert_eq!(args(r#"say "it's""#), vec!["say", "it's"]);
        assert_eq!(args(r#"empty """#), vec!["empty", ""]);
    }

    #[test]
    fn tokenize_rejects_unterminated_quote() {
        assert!(tokenize(r#"new-podcast --description "oops"#).is_err());
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse_command(&args(r#"new-podcast --description "Episode 1""#)).unwrap(),
            ShellCommand::NewPodcast {
                description: "Episode 1".to_string()
            }
        );
        assert_eq!(
            parse_command(&args("add-introduction-media --media intro.mp3")).unwrap(),
            ShellCommand::AddIntroductionMedia {
                media: PathBuf::from("intro.mp3")
            }
        );
        assert_eq!(
            parse_command(&args("add-interview-media --media interview.wav")).unwrap(),
            ShellCommand::AddInterviewMedia {
                media: PathBuf::from("interview.wav")
            }
        );
        assert_eq!(parse_command(&args("package")).unwrap(), ShellCommand::Package);
        assert_eq!(parse_command(&args("publish")).unwrap(), ShellCommand::Publish);
        assert_eq!(parse_command(&args("status")).unwrap(), ShellCommand::Status);
        assert_eq!(parse_command(&args("exit")).unwrap(), ShellCommand::Exit);
        assert_eq!(parse_command(&args("quit")).unwrap(), ShellCommand::Exit);
    }

    #[test]
    fn rejects_unknown_or_incomplete_commands() {
        assert!(parse_command(&args("dance")).is_err());
        assert!(parse_command(&args("new-podcast")).is_err());
        assert!(parse_command(&args("add-interview-media")).is_err());
    }

    #[test]
    fn new_podcast_unavailable_while_open() {
        let cmd = ShellCommand::NewPodcast {
            description: "x".to_string(),
        };
        assert!(cmd.availability(WorkflowState::Idle).is_ok());
        assert!(cmd.availability(WorkflowState::Packaged).is_ok());
        assert!(matches!(
            cmd.availability(WorkflowState::Open),
            Err(WorkflowError::AlreadyOpen)
        ));
    }

    #[test]
    fn add_media_unavailable_without_podcast() {
        let cmd = ShellCommand::AddIntroductionMedia {
            media: PathBuf::from("intro.mp3"),
        };
        assert!(matches!(
            cmd.availability(WorkflowState::Idle),
            Err(WorkflowError::NoOpenPodcast)
        ));
        assert!(cmd.availability(WorkflowState::Open).is_ok());
        assert!(cmd.availability(WorkflowState::Packaged).is_ok());
        assert!(ShellCommand::Package.availability(WorkflowState::Idle).is_ok());
    }

    #[test]
    fn prompt_without_podcast() {
        let listener = ShellListener::new();
        assert_eq!(listener.prompt_text(), "(no podcast created yet)  :>");
        assert!(!listener.is_podcast_started());
    }

    #[test]
    fn prompt_follows_events() {
        let listener = ShellListener::new();
        let session = SessionId::from("shell");

        listener.notify(&WorkflowEvent::PodcastStarted {
            session: session.clone(),
            podcast: Podcast::new("Episode 1"),
        });
        assert_eq!(listener.prompt_text(), "Episode 1  :>");

        listener.notify(&WorkflowEvent::IntroductionAttached {
            session: session.clone(),
            file: PathBuf::from("/rec/intro.mp3"),
        });
        assert_eq!(listener.prompt_text(), "Episode 1 ( introduction: intro.mp3 ) :>");

        listener.notify(&WorkflowEvent::InterviewAttached {
            session: session.clone(),
            file: PathBuf::from("/rec/interview.mp3"),
        });
        assert_eq!(
            listener.prompt_text(),
            "Episode 1 ( introduction: intro.mp3, interview: interview.mp3 ) :>"
        );

        listener.notify(&WorkflowEvent::PackageCreated {
            session,
            archive: PathBuf::from("/tmp/staging1/abc.zip"),
        });
        assert_eq!(listener.prompt_text(), "Episode 1  :>");
        assert_eq!(
            listener.last_archive(),
            Some(PathBuf::from("/tmp/staging1/abc.zip"))
        );
    }

    #[test]
    fn starting_new_podcast_clears_previous_archive() {
        let listener = ShellListener::new();
        let session = SessionId::from("shell");
        listener.notify(&WorkflowEvent::PackageCreated {
            session: session.clone(),
            archive: PathBuf::from("/tmp/old.zip"),
        });

        listener.notify(&WorkflowEvent::PodcastStarted {
            session,
            podcast: Podcast::new("Episode 2"),
        });

        assert!(listener.last_archive().is_none());
        assert!(listener.is_podcast_started());
    }
}
