//! Writing a streamplot to disk.
//!
//! The output directory is created with a single non-recursive
//! `create_dir`, so an existing directory is never written into and a
//! missing parent is never created.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fieldlines_core::Streamplot;
use fieldlines_export::{to_arrows, to_streamlines};
use log::info;

/// File holding the streamline polylines.
pub const STREAMLINES_FILE: &str = "streamlines.dat";

/// File holding the direction arrows.
pub const ARROWS_FILE: &str = "streamarrows.dat";

/// Errors that can occur when writing a streamplot.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The output directory is already there.
    #[error("output directory {} already exists", .0.display())]
    DirectoryExists(PathBuf),

    /// The output directory's parent does not exist.
    #[error("parent of output directory {} does not exist", .0.display())]
    ParentMissing(PathBuf),

    /// Any other filesystem failure.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Path being created or written.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Create `directory` and write [`STREAMLINES_FILE`] and
/// [`ARROWS_FILE`] inside it.
///
/// Absent arrows are skipped, so the arrows file may have fewer lines
/// than there are streamlines.
///
/// # Errors
///
/// Returns [`OutputError::DirectoryExists`] if `directory` exists,
/// [`OutputError::ParentMissing`] if its parent does not, and
/// [`OutputError::Io`] for any other failure.
pub fn write_streamplot(directory: &Path, streamplot: &Streamplot) -> Result<(), OutputError> {
    std::fs::create_dir(directory).map_err(|source| match source.kind() {
        ErrorKind::AlreadyExists => OutputError::DirectoryExists(directory.to_path_buf()),
        ErrorKind::NotFound => OutputError::ParentMissing(directory.to_path_buf()),
        _ => OutputError::Io {
            path: directory.to_path_buf(),
            source,
        },
    })?;

    let streamlines_path = directory.join(STREAMLINES_FILE);
    write_file(&streamlines_path, &to_streamlines(&streamplot.streamlines))?;

    let arrows_path = directory.join(ARROWS_FILE);
    write_file(&arrows_path, &to_arrows(streamplot.placed_arrows()))?;

    info!(
        "wrote {} streamlines and {} arrows to {}",
        streamplot.streamlines.len(),
        streamplot.placed_arrows().count(),
        directory.display(),
    );
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    std::fs::write(path, contents).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
