pub mod error;
pub mod events;
pub mod manifest;
pub mod media;
pub mod package;
pub mod podcast;
pub mod shell;
pub mod upload;
pub mod workflow;

// Re-export main types for convenience
pub use error::{ManifestError, PackagingError, UploadError, WorkflowError};
pub use events::{EventListener, SharedEventListener, WorkflowEvent};
pub use manifest::{MANIFEST_FILENAME, Manifest, ManifestEntry};
pub use media::{Media, MediaFormat, extension_for, is_valid_artifact, validate_artifact};
pub use package::{Package, build_archive, create_staging_dir};
pub use podcast::{MediaSlots, Podcast};
pub use shell::{ShellCommand, ShellListener, parse_command, tokenize};
pub use upload::{HttpClient, PublishReceipt, ReqwestClient, publish_package};
pub use workflow::{PackagingWorkflow, SessionId, WorkflowState};
