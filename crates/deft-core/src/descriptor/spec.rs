//! Dependency descriptor types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::DescriptorError;
use crate::files::{FileMapping, FileSpec};

/// Where a dependency's files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Literal HTTP(S) URL prefix. `raw` is the text as declared, `base`
    /// the parsed URL with a trailing `/` enforced.
    Absolute { raw: String, base: Url },
    /// GitHub `owner/repo` reference.
    Shorthand(String),
}

impl Source {
    /// Parse a source string.
    ///
    /// Anything starting with `http:` or `https:` is an absolute source and
    /// must be a valid URL; everything else is taken as a GitHub shorthand.
    pub fn parse(source: &str) -> Result<Self, DescriptorError> {
        if !is_absolute_source(source) {
            return Ok(Self::Shorthand(source.to_string()));
        }

        let base = if source.ends_with('/') {
            source.to_string()
        } else {
            format!("{}/", source)
        };

        Url::parse(&base)
            .map(|base| Self::Absolute {
                raw: source.to_string(),
                base,
            })
            .map_err(|e| DescriptorError::InvalidSourceUrl {
                source_url: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// Check if this is an absolute URL source.
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute { .. })
    }

    /// Get the `owner/repo` reference if this is a shorthand source.
    pub fn as_shorthand(&self) -> Option<&str> {
        match self {
            Self::Shorthand(repo) => Some(repo),
            Self::Absolute { .. } => None,
        }
    }

    /// Get the base URL if this is an absolute source.
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Absolute { base, .. } => Some(base),
            Self::Shorthand(_) => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute { raw, .. } => f.write_str(raw),
            Self::Shorthand(repo) => f.write_str(repo),
        }
    }
}

/// Scheme check on the raw source string. Case-sensitive on purpose:
/// `HTTP://...` is treated as a shorthand.
pub fn is_absolute_source(source: &str) -> bool {
    source.starts_with("http:") || source.starts_with("https:")
}

/// One element of a descriptor tuple as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptorPart {
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl From<&str> for DescriptorPart {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<FileSpec> for DescriptorPart {
    fn from(spec: FileSpec) -> Self {
        match spec {
            FileSpec::Single(file) => Self::Text(file),
            FileSpec::List(files) => Self::List(files),
            FileSpec::Map(files) => Self::Map(files),
        }
    }
}

impl From<DescriptorPart> for FileSpec {
    fn from(part: DescriptorPart) -> Self {
        match part {
            DescriptorPart::Text(file) => Self::Single(file),
            DescriptorPart::List(files) => Self::List(files),
            DescriptorPart::Map(files) => Self::Map(files),
        }
    }
}

/// A single remote dependency.
///
/// On the wire this is a 2- or 3-element array: `[source, files]` or
/// `[source, version, files]`. The last element is always the file spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DescriptorPart>", into = "Vec<DescriptorPart>")]
pub struct Dependency {
    pub source: Source,
    /// Requested tag or semver version; `None` means "no constraint".
    pub version: Option<String>,
    pub files: FileSpec,
}

impl Dependency {
    /// Create a dependency without a version constraint.
    pub fn new(source: Source, files: impl Into<FileSpec>) -> Self {
        Self {
            source,
            version: None,
            files: files.into(),
        }
    }

    /// Set the requested version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Build a dependency from its tuple elements.
    pub fn from_parts(parts: Vec<DescriptorPart>) -> Result<Self, DescriptorError> {
        let len = parts.len();
        if !(2..=3).contains(&len) {
            return Err(DescriptorError::WrongLength(len));
        }

        let mut parts = parts.into_iter();
        let (source, version, files) = match (parts.next(), parts.next(), parts.next()) {
            (Some(source), Some(files), None) => (source, None, files),
            (Some(source), Some(version), Some(files)) => (source, Some(version), files),
            _ => return Err(DescriptorError::WrongLength(len)),
        };

        let source = match source {
            DescriptorPart::Text(source) => Source::parse(&source)?,
            _ => return Err(DescriptorError::SourceNotString),
        };

        let version = match version {
            None => None,
            Some(DescriptorPart::Text(version)) => Some(version),
            Some(_) => return Err(DescriptorError::VersionNotString),
        };

        let files = FileSpec::from(files);
        if files.is_empty() {
            return Err(DescriptorError::NoFiles);
        }

        Ok(Self {
            source,
            version,
            files,
        })
    }

    /// Parse a single JSON descriptor tuple.
    pub fn parse_json(input: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Source-path → local-name mapping for this dependency.
    pub fn files(&self) -> FileMapping {
        self.files.normalize()
    }

    /// The requested version, if any.
    pub fn requested_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_absolute(&self) -> bool {
        self.source.is_absolute()
    }

    /// The source exactly as declared, used in logs, listings and `--skip`.
    pub fn name(&self) -> String {
        self.source.to_string()
    }

    /// Whether this dependency was declared with exactly `source`.
    pub fn has_source(&self, source: &str) -> bool {
        match &self.source {
            Source::Absolute { raw, .. } => raw == source,
            Source::Shorthand(repo) => repo == source,
        }
    }
}

impl TryFrom<Vec<DescriptorPart>> for Dependency {
    type Error = DescriptorError;

    fn try_from(parts: Vec<DescriptorPart>) -> Result<Self, Self::Error> {
        Self::from_parts(parts)
    }
}

impl From<Dependency> for Vec<DescriptorPart> {
    fn from(dep: Dependency) -> Self {
        let mut parts = vec![DescriptorPart::Text(dep.source.to_string())];
        if let Some(version) = dep.version {
            parts.push(DescriptorPart::Text(version));
        }
        parts.push(dep.files.into());
        parts
    }
}
