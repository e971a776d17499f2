//! Turn a finalized dependency into concrete file downloads.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::descriptor::{Dependency, DescriptorError};

/// One file to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDownload {
    /// Normalized source path, as keyed in the file mapping
    pub source_path: String,
    /// Fully resolved download URL
    pub url: String,
    /// Local path under the destination directory
    pub destination: PathBuf,
}

impl FileDownload {
    /// Local file name, for display.
    pub fn file_name(&self) -> String {
        self.destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Destination names must stay inside the destination directory: no root,
/// no drive prefix and no `..` segment, with either separator.
fn is_confined(local_name: &str) -> bool {
    let has_parent_segment = local_name.split(['/', '\\']).any(|segment| segment == "..");
    let has_root = local_name.starts_with(['/', '\\'])
        || Path::new(local_name)
            .components()
            .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir));

    !local_name.is_empty() && !has_parent_segment && !has_root
}

/// Plan every file download for `dep` under `destination_dir`.
///
/// The dependency's version must already be final: version-constrained
/// shorthand dependencies should have gone through
/// [`resolve_version`](crate::version::resolve_version) and
/// [`Dependency::with_version`] before planning.
pub fn plan_downloads(
    dep: &Dependency,
    destination_dir: &Path,
) -> Result<Vec<FileDownload>, DescriptorError> {
    dep.files()
        .into_iter()
        .map(|(source_path, local_name)| {
            if !is_confined(&local_name) {
                return Err(DescriptorError::UnsafeDestination {
                    file: source_path,
                    destination: local_name,
                });
            }
            Ok(FileDownload {
                url: dep.download_url(&source_path)?,
                destination: destination_dir.join(local_name),
                source_path,
            })
        })
        .collect()
}
