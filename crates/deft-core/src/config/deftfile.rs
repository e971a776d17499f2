//! Project deftfile: the list of dependencies and their destination.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::parser::parse_toml_str;
use crate::descriptor::Dependency;

/// File names searched for, in order, by [`Deftfile::discover`].
pub const DEFTFILE_NAMES: [&str; 2] = ["deft.json", "deft.toml"];

/// Directory files land in when the deftfile does not say otherwise.
pub const DEFAULT_DESTINATION: &str = "vendor";

/// Project-level dependency declarations.
///
/// ```json
/// {
///   "destination": "public/js",
///   "dependencies": [
///     ["lodash/lodash", "lodash.js"],
///     ["jashkenas/underscore", "1.6.0", "underscore.js"]
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deftfile {
    /// Output directory, relative to the deftfile
    #[serde(default = "default_destination")]
    pub destination: PathBuf,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

fn default_destination() -> PathBuf {
    PathBuf::from(DEFAULT_DESTINATION)
}

impl Default for Deftfile {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            dependencies: Vec::new(),
        }
    }
}

impl Deftfile {
    /// Load a deftfile, choosing the format from the extension.
    ///
    /// `.toml` files are parsed as TOML, everything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deftfile: {}", path.display()))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        };

        let deftfile =
            parsed.with_context(|| format!("Failed to parse deftfile: {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            dependencies = deftfile.dependencies.len(),
            "Loaded deftfile"
        );
        Ok(deftfile)
    }

    /// Find and load the deftfile in `dir`.
    pub fn discover(dir: &Path) -> Result<(PathBuf, Self)> {
        let path = DEFTFILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No deftfile found in {} (looked for {})",
                    dir.display(),
                    DEFTFILE_NAMES.join(", ")
                )
            })?;

        let deftfile = Self::load(&path)?;
        Ok((path, deftfile))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let deftfile: Self = serde_json::from_str(content).context("Invalid deftfile JSON")?;
        deftfile.validate()?;
        Ok(deftfile)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let deftfile: Self = parse_toml_str(content)?;
        deftfile.validate()?;
        Ok(deftfile)
    }

    /// Reject settings the installer cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.destination.as_os_str().is_empty() {
            anyhow::bail!("Deftfile destination must not be empty");
        }
        Ok(())
    }

    /// Destination directory resolved against the deftfile's location.
    pub fn destination_dir(&self, deftfile_path: &Path) -> PathBuf {
        match deftfile_path.parent() {
            Some(parent) => parent.join(&self.destination),
            None => self.destination.clone(),
        }
    }
}
