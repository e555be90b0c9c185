//! Input discovery: the base image and the overlay sequence.
//!
//! Both lookups are non-recursive listings of a single directory, keeping
//! regular files whose name ends in a configured image extension and
//! ordering them with [`natural_cmp`](crate::naming::natural_cmp):
//!
//! ```text
//! <root>/
//! ├── cover.png        ← candidate
//! ├── ff1pr0.png       ← candidate, natural-sort first → base
//! ├── notes.txt        ← ignored (extension)
//! ├── Overlays/        ← ignored (directory), listed separately
//! │   ├── 2.png
//! │   └── 10.png       ← after 2.png
//! └── Finished/        ← ignored (directory)
//! ```

use crate::config::RunConfig;
use crate::naming::{StemParts, natural_cmp, split_prefix_number};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The selected base image.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseImage {
    pub path: PathBuf,
    /// File name as found on disk, e.g. `ff1pr0.png`.
    pub file_name: String,
    /// Stem decomposition that seeds output naming.
    pub stem: StemParts,
}

impl BaseImage {
    fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            stem: split_prefix_number(&stem),
        }
    }
}

/// Non-empty, natural-sorted list of overlay files.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySequence(Vec<PathBuf>);

#[allow(clippy::len_without_is_empty)]
impl OverlaySequence {
    /// Returns `None` for an empty list.
    pub fn new(paths: Vec<PathBuf>) -> Option<Self> {
        if paths.is_empty() {
            None
        } else {
            Some(Self(paths))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

/// Pick the base image: the natural-sort-first image file directly in the
/// root. Returns `Ok(None)` when there is no candidate.
pub fn find_base_image(config: &RunConfig) -> Result<Option<BaseImage>, ScanError> {
    let candidates = list_image_files(&config.root, config)?;
    tracing::debug!(count = candidates.len(), "base image candidates");
    Ok(candidates.into_iter().next().map(BaseImage::from_path))
}

/// All overlay image files, in natural order.
pub fn list_overlays(config: &RunConfig) -> Result<Vec<PathBuf>, ScanError> {
    list_image_files(&config.overlays_path(), config)
}

/// Regular files in `dir` (not recursive, symlinks followed) with a matching
/// extension, natural-sorted by file name.
fn list_image_files(dir: &Path, config: &RunConfig) -> Result<Vec<PathBuf>, ScanError> {
    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => continue,
        };
        if path.is_file() && config.matches_extension(&name) {
            files.push((name, path));
        }
    }

    files.sort_by(|(a, _), (b, _)| natural_cmp(a, b));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}
