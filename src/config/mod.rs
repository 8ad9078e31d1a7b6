// src/config/mod.rs

//! Configuration for gir contexts.
//!
//! - `model.rs`: TOML-backed data model and `ContextOptions`.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: option invariants checked before a pool is built.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{CONFIG_ENV, DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, ContextOptions, RawConfigFile};
pub use validate::validate_options;
