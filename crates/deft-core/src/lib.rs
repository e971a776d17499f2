//! Deft Core Library
//!
//! Resolves compact dependency descriptors into download URLs, local file
//! names and version tags, and provides the fetcher that acts on them.
//! Everything except [`config`] and [`fetch`] is pure computation.

pub mod config;
pub mod descriptor;
pub mod fetch;
pub mod files;
pub mod plan;
pub mod source;
pub mod util;
pub mod version;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{Deftfile, Settings};

    // Descriptors
    pub use crate::descriptor::{Dependency, DescriptorError, Source};
    pub use crate::files::{FileMapping, FileSpec};

    // Resolution
    pub use crate::plan::{plan_downloads, FileDownload};
    pub use crate::version::{resolve_version, TagRecord};

    // Fetching
    pub use crate::fetch::Fetcher;
}
