//! Download and tag-listing URL construction.
//!
//! Shorthand sources resolve against GitHub:
//! - files: `https://raw.githubusercontent.com/{owner/repo}/{tag}/{file}`
//! - tags:  `https://api.github.com/repos/{owner/repo}/tags`
//!
//! Absolute sources resolve files against the source URL and have no tag
//! listing.

use std::path::MAIN_SEPARATOR;

use crate::descriptor::{Dependency, DescriptorError, Source};

/// Base for raw file downloads from GitHub.
pub const RAW_CONTENT_BASE: &str = "https://raw.githubusercontent.com";

/// Base for GitHub REST API calls.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Tag used when a shorthand dependency requests no version.
pub const DEFAULT_BRANCH: &str = "master";

impl Dependency {
    /// URL to download `file` (a key of [`Dependency::files`]) from.
    ///
    /// Uses whatever version this dependency currently carries; callers that
    /// resolve a version against the tag list must splice it in with
    /// [`Dependency::with_version`] first.
    pub fn download_url(&self, file: &str) -> Result<String, DescriptorError> {
        let file = url_path(file);
        match &self.source {
            Source::Absolute { base, .. } => base
                .join(&file)
                .map(String::from)
                .map_err(|e| DescriptorError::InvalidFileUrl {
                    file: file.clone(),
                    base: base.to_string(),
                    reason: e.to_string(),
                }),
            Source::Shorthand(repo) => {
                let tag = self.requested_version().unwrap_or(DEFAULT_BRANCH);
                Ok(format!("{}/{}/{}/{}", RAW_CONTENT_BASE, repo, tag, file))
            }
        }
    }

    /// URL listing the published tags, or `None` for absolute sources.
    pub fn tags_url(&self) -> Option<String> {
        self.source.tags_url()
    }
}

impl Source {
    pub fn tags_url(&self) -> Option<String> {
        self.as_shorthand()
            .map(|repo| format!("{}/repos/{}/tags", GITHUB_API_BASE, repo))
    }
}

/// Turn a platform-normalized file path back into URL path form.
fn url_path(file: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        file.to_string()
    } else {
        file.replace(MAIN_SEPARATOR, "/")
    }
}
