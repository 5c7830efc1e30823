use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use ::config::ConfigError;

pub const ENV_PREFIX: &str = "WORKFORCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON snapshot used by `save json` / `load json` without an explicit path.
    pub data_file: PathBuf,
    /// SQLite database; the sqlite commands are unavailable when unset.
    pub sqlite_path: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Save the JSON snapshot after every successful mutating command.
    pub autosave: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("company.json"),
            sqlite_path: None,
            log_filter: "warn".to_string(),
            autosave: false,
        }
    }
}

impl AppConfig {
    /// Layers an optional TOML file under `WORKFORCE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_sources() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.data_file, PathBuf::from("company.json"));
        assert!(!config.autosave);
    }

    #[test]
    fn reads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "data_file = \"acme.json\"\nsqlite_path = \"acme.db\"\nautosave = true"
        )
        .unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data_file, PathBuf::from("acme.json"));
        assert_eq!(config.sqlite_path, Some(PathBuf::from("acme.db")));
        assert!(config.autosave);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/workforce.toml"))).is_err());
    }
}
