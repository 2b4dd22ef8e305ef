//! Final artifact writing
//!
//! The artifact is one plain-text document per completed run, one line per
//! matched comment record.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the delivered artifact
pub const ARTIFACT_FILE_NAME: &str = "Result";

/// Writes the artifact document into `dir`
///
/// Creates the directory when it does not exist yet and overwrites a
/// previous artifact of the same name.
///
/// # Arguments
///
/// * `dir` - Directory the artifact is written into
/// * `name` - Artifact file name
/// * `content` - The serialized records, newline-terminated
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(std::io::Error)` - Failed to create the directory or write the file
pub fn write_artifact(dir: &Path, name: &str, content: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(name);
    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;

    Ok(path)
}
