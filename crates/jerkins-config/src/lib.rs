//! Configuration for jerkins.
//!
//! This crate handles:
//! - Job parameter declarations (jerkins.kdl, or JSON)
//! - Validation of the remote server settings

pub mod error;
pub mod params;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use params::{load_parameters, parse_json_parameters, parse_kdl_parameters};
pub use settings::Settings;
