//! Dependency descriptors.
//!
//! A descriptor declares one remote dependency as a compact tuple:
//! - `["owner/repo", "file.js"]` - GitHub shorthand tracking `master`
//! - `["owner/repo", "1.2.0", "file.js"]` - GitHub shorthand at a version
//! - `["https://cdn.example.com/lib", ["a.js", "b.js"]]` - absolute URL source

mod error;
mod spec;

pub use error::DescriptorError;
pub use spec::{is_absolute_source, Dependency, DescriptorPart, Source};
