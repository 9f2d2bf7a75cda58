//! Reading traced segment files.

use std::path::{Path, PathBuf};

use fieldlines_core::Segment;
use fieldlines_export::{ParseError, parse_segments};
use log::debug;

/// Errors that can occur when loading a segments file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The file contents are not valid segment soup.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying parse failure.
        source: ParseError,
    },
}

/// Read and parse a segments file.
///
/// # Errors
///
/// Returns [`InputError::Read`] if the file cannot be read and
/// [`InputError::Parse`] if a data line is malformed.
pub fn read_segments(path: &Path) -> Result<Vec<Segment>, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let segments = parse_segments(&text).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} segments from {}", segments.len(), path.display());
    Ok(segments)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::scratch_path;

    #[test]
    fn reads_segments_file() {
        let path = scratch_path("read-ok");
        std::fs::write(&path, "# soup\n0; 0; 1; 0\n1; 0; 2; 0\n").unwrap();
        let segments = read_segments(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn missing_file_is_read_error() {
        let path = scratch_path("read-missing");
        let err = read_segments(&path).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
        assert!(err.to_string().contains("read-missing"));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = scratch_path("read-bad");
        std::fs::write(&path, "0; 0; 1\n").unwrap();
        let err = read_segments(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            InputError::Parse {
                source: ParseError::FieldCount { line: 1, .. },
                ..
            }
        ));
    }
}
