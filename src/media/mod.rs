mod artifact;
mod format;

pub use artifact::{
    base_name, extension_for, is_valid_artifact, is_valid_artifact_opt, validate_artifact,
};
pub use format::{Media, MediaFormat};
