// src/config/loader.rs

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "GIR_CONFIG";

/// Config file picked up from the working directory when `$GIR_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "Gir.toml";

/// Load a configuration file and return the raw, unvalidated `RawConfigFile`.
///
/// Use [`load_and_validate`] to also check option invariants.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    parse_str(&contents)
}

/// Parse TOML text into a `RawConfigFile`.
pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the config file named by `$GIR_CONFIG`, or `Gir.toml` in the
/// current working directory if it exists, otherwise built-in defaults.
///
/// A file named explicitly through `$GIR_CONFIG` must exist; only the
/// implicit `Gir.toml` is optional.
pub fn load_or_default() -> Result<ConfigFile> {
    load_or_default_from(std::env::var_os(CONFIG_ENV))
}

/// `$GIR_CONFIG` if set, else `Gir.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    config_path_from(std::env::var_os(CONFIG_ENV))
}

fn config_path_from(env: Option<OsString>) -> PathBuf {
    env.filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn load_or_default_from(env: Option<OsString>) -> Result<ConfigFile> {
    let explicit = env.as_ref().is_some_and(|value| !value.is_empty());
    let path = config_path_from(env);

    if explicit || path.is_file() {
        debug!(path = %path.display(), "loading gir config");
        load_and_validate(path)
    } else {
        ConfigFile::try_from(RawConfigFile::default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::model::ContextOptions;
    use crate::errors::GirError;
    use crate::types::LogLevel;

    #[test]
    fn unset_or_empty_env_falls_back_to_gir_toml() {
        assert_eq!(config_path_from(None), PathBuf::from("Gir.toml"));
        assert_eq!(
            config_path_from(Some(OsString::new())),
            PathBuf::from("Gir.toml")
        );
    }

    #[test]
    fn env_names_the_config_path() {
        let path = config_path_from(Some(OsString::from("/etc/gir/ci.toml")));
        assert_eq!(path, PathBuf::from("/etc/gir/ci.toml"));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[context]\nlog_level = \"debug\"\nmax_blocking_threads = 4").unwrap();

        let config = load_or_default_from(Some(file.path().as_os_str().to_owned())).unwrap();

        assert_eq!(config.context.log_level, LogLevel::Debug);
        assert_eq!(config.context.max_blocking_threads, 4);
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let err = load_or_default_from(Some(missing.into_os_string())).unwrap_err();

        assert!(matches!(err, GirError::Other(_)), "got {err:?}");
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn invalid_explicit_config_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[context]\nworker_threads = 0").unwrap();

        let err = load_or_default_from(Some(file.path().as_os_str().to_owned())).unwrap_err();

        assert!(matches!(err, GirError::ConfigError(_)), "got {err:?}");
    }

    #[test]
    fn without_env_or_gir_toml_defaults_are_used() {
        // The crate root carries no Gir.toml.
        let config = load_or_default_from(None).unwrap();
        assert_eq!(config.context, ContextOptions::default());
    }
}
