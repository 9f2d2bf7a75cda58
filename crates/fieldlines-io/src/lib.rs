//! fieldlines-io: Filesystem input and output.
//!
//! Reads segment soup files produced by a streamline tracer and writes
//! finished streamplots as `.dat` files. All formatting is delegated to
//! `fieldlines-export`; this crate only touches the filesystem.

pub mod input;
pub mod output;

pub use input::{InputError, read_segments};
pub use output::{ARROWS_FILE, OutputError, STREAMLINES_FILE, write_streamplot};

#[cfg(test)]
mod test_support {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT: AtomicUsize = AtomicUsize::new(0);

    /// A path under the system temp directory that no other test uses.
    pub fn scratch_path(label: &str) -> PathBuf {
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "fieldlines-io-{}-{label}-{n}",
            std::process::id()
        ))
    }
}
