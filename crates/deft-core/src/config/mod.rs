//! Configuration loading.
//!
//! Two files are read:
//! - the deftfile (`deft.json` or `deft.toml`) in the project, declaring
//!   dependencies and where to put them
//! - user settings at `<config dir>/deft/config.toml`, overridable through
//!   the environment

pub mod deftfile;
pub mod parser;
pub mod settings;

pub use deftfile::{Deftfile, DEFAULT_DESTINATION, DEFTFILE_NAMES};
pub use parser::parse_toml_str;
pub use settings::Settings;
