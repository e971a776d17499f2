//! File specification normalization.
//!
//! A dependency names the files it wants in one of three shapes: a single
//! file name, a list of file names, or an explicit source → destination
//! table. All three collapse into a [`FileMapping`] keyed by the normalized
//! source path.

use std::collections::BTreeMap;
use std::path::MAIN_SEPARATOR;

use serde::{Deserialize, Serialize};

/// Normalized source path → destination file name.
pub type FileMapping = BTreeMap<String, String>;

/// User-facing shorthand for the files to fetch from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileSpec {
    /// `"lodash.js"`
    Single(String),
    /// `["lodash.js", "lodash.min.js"]`
    List(Vec<String>),
    /// `{ "dist/lodash.js": "lodash-full.js" }`
    Map(BTreeMap<String, String>),
}

impl FileSpec {
    /// Collapse this spec into its canonical mapping.
    ///
    /// Single names and list entries map to their own base name. Explicit
    /// mappings keep their destinations as written, but their keys are
    /// normalized like every other shape.
    pub fn normalize(&self) -> FileMapping {
        let mut mapping = FileMapping::new();
        match self {
            Self::Single(file) => {
                mapping.insert(normalize_path(file), base_name(file).to_string());
            }
            Self::List(files) => {
                for file in files {
                    mapping.insert(normalize_path(file), base_name(file).to_string());
                }
            }
            Self::Map(files) => {
                for (source, destination) in files {
                    mapping.insert(normalize_path(source), destination.clone());
                }
            }
        }
        mapping
    }

    /// Whether the spec names no files at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::List(files) => files.is_empty(),
            Self::Map(files) => files.is_empty(),
        }
    }
}

impl From<&str> for FileSpec {
    fn from(file: &str) -> Self {
        Self::Single(file.to_string())
    }
}

impl From<Vec<String>> for FileSpec {
    fn from(files: Vec<String>) -> Self {
        Self::List(files)
    }
}

impl From<BTreeMap<String, String>> for FileSpec {
    fn from(files: BTreeMap<String, String>) -> Self {
        Self::Map(files)
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalize a relative or absolute file path for the host platform.
///
/// Both `/` and `\` are accepted as separators on input; the output uses
/// [`MAIN_SEPARATOR`]. `.` segments are dropped and `..` collapses against
/// the preceding segment. An input that collapses to nothing yields `"."`.
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with(is_separator);
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // Nothing above root
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join(&MAIN_SEPARATOR.to_string());
    match (absolute, joined.is_empty()) {
        (true, _) => format!("{}{}", MAIN_SEPARATOR, joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Last path segment of `path`, extension included.
pub fn base_name(path: &str) -> &str {
    path.split(is_separator)
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(path: &str) -> String {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }

    #[test]
    fn test_single_file_maps_to_itself() {
        let mapping = FileSpec::from("foo.js").normalize();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["foo.js"], "foo.js");
    }

    #[test]
    fn test_list_maps_each_file_to_itself() {
        let spec = FileSpec::List(vec!["foo.js".into(), "bar.js".into()]);
        let mapping = spec.normalize();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["foo.js"], "foo.js");
        assert_eq!(mapping["bar.js"], "bar.js");
    }

    #[test]
    fn test_nested_file_maps_to_base_name() {
        let mapping = FileSpec::from("dist/js/app.min.js").normalize();
        assert_eq!(mapping[&native("dist/js/app.min.js")], "app.min.js");
    }

    #[test]
    fn test_later_list_entries_overwrite_earlier_ones() {
        let spec = FileSpec::List(vec!["./a/x.js".into(), "a/x.js".into()]);
        let mapping = spec.normalize();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping[&native("a/x.js")], "x.js");
    }

    #[test]
    fn test_explicit_mapping_keys_are_normalized() {
        let mut files = BTreeMap::new();
        files.insert("./src/../lib\\util.js".to_string(), "helpers.js".to_string());
        let mapping = FileSpec::Map(files).normalize();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping[&native("lib/util.js")], "helpers.js");
    }

    #[test]
    fn test_explicit_mapping_values_pass_through() {
        let mut files = BTreeMap::new();
        files.insert("a.js".to_string(), "vendor/b.js".to_string());
        let mapping = FileSpec::Map(files).normalize();
        assert_eq!(mapping["a.js"], "vendor/b.js");
    }

    #[test]
    fn test_normalize_path_handles_dots() {
        assert_eq!(normalize_path("./foo.js"), "foo.js");
        assert_eq!(normalize_path("a/./b/../c.js"), native("a/c.js"));
        assert_eq!(normalize_path("../up.js"), native("../up.js"));
        assert_eq!(normalize_path("../../up.js"), native("../../up.js"));
        assert_eq!(normalize_path("a//b.js"), native("a/b.js"));
    }

    #[test]
    fn test_normalize_path_keeps_root() {
        assert_eq!(normalize_path("/a/b.js"), native("/a/b.js"));
        assert_eq!(normalize_path("/../b.js"), native("/b.js"));
    }

    #[test]
    fn test_normalize_path_degenerate_input() {
        assert_eq!(normalize_path(""), ".");
        assert_eq!(normalize_path("a/.."), ".");
    }

    #[test]
    fn test_base_name_takes_last_segment() {
        assert_eq!(base_name("foo.js"), "foo.js");
        assert_eq!(base_name("a/b/c.tar.gz"), "c.tar.gz");
        assert_eq!(base_name("a\\b.js"), "b.js");
        assert_eq!(base_name("dir/"), "dir");
        assert_eq!(base_name(""), "");
    }

    #[test]
    fn test_file_spec_deserializes_all_shapes() {
        let single: FileSpec = serde_json::from_str(r#""a.js""#).unwrap();
        assert_eq!(single, FileSpec::Single("a.js".into()));

        let list: FileSpec = serde_json::from_str(r#"["a.js", "b.js"]"#).unwrap();
        assert_eq!(list, FileSpec::List(vec!["a.js".into(), "b.js".into()]));

        let map: FileSpec = serde_json::from_str(r#"{"a.js": "b.js"}"#).unwrap();
        assert!(matches!(map, FileSpec::Map(ref m) if m["a.js"] == "b.js"));
    }
}
