mod archive;

pub use archive::{Package, build_archive, create_staging_dir};
