use adocstream_syntax::ParseOptions;
use adocstream_syntax::options::DEFAULT_URL_SCHEMES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("configuration file {} does not exist", .0.display())]
    Missing(PathBuf),
}

/// How the CLI prints the event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One indented event per line.
    #[default]
    Trace,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Trace => "trace",
            OutputFormat::Json => "json",
        })
    }
}

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Macro names that turn `name:target[text]` into a link.
    pub url_schemes: Vec<String>,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url_schemes: DEFAULT_URL_SCHEMES.iter().map(|s| s.to_string()).collect(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// The user's configuration file, `~/.config/adocstream/config.toml`.
    pub fn default_path() -> PathBuf {
        let dir = shellexpand::tilde("~/.config/adocstream");
        Path::new(dir.as_ref()).join("config.toml")
    }

    /// Reads `path`, or returns `None` when there is no such file.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(path, &content).map(Some),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads the configuration the CLI runs with.
    ///
    /// An explicit path must exist. Without one, the default file is used
    /// when present and the built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::resolved_path(explicit);
        match Self::read(&path)? {
            Some(config) => Ok(config),
            None if explicit.is_some() => Err(ConfigError::Missing(path)),
            None => Ok(Self::default()),
        }
    }

    /// The file [`Config::resolve`] reads: `explicit` if given, the default
    /// path otherwise.
    pub fn resolved_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(Self::default_path, Path::to_path_buf)
    }

    fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Parser options derived from this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default().with_url_schemes(self.url_schemes.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_path() {
        let config_path = Config::default_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/adocstream/config.toml"));
    }

    #[test]
    fn test_defaults_match_parser_defaults() {
        let config = Config::default();
        assert_eq!(config.format, OutputFormat::Trace);
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str(r#"format = "json""#).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.url_schemes, Config::default().url_schemes);
    }

    #[test]
    fn test_url_schemes_reach_parse_options() {
        let config: Config = toml::from_str(
            r#"
url_schemes = ["https", "gopher"]
"#,
        )
        .unwrap();

        let options = config.parse_options();
        assert!(options.is_url_scheme("gopher"));
        assert!(!options.is_url_scheme("mailto"));
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, r#"format = "html""#).unwrap();

        let err = Config::read(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::read(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");

        let err = Config::resolve(Some(missing.as_path())).unwrap_err();

        assert!(matches!(err, ConfigError::Missing(path) if path == missing));
    }

    #[test]
    fn test_resolved_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/adoc.toml");
        assert_eq!(Config::resolved_path(Some(explicit.as_path())), explicit);
        assert_eq!(Config::resolved_path(None), Config::default_path());
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("adoc.toml");
        std::fs::write(&config_file, "url_schemes = [\"gopher\"]\n").unwrap();

        let config = Config::resolve(Some(config_file.as_path())).unwrap();

        assert_eq!(config.url_schemes, vec!["gopher".to_string()]);
        assert_eq!(config.format, OutputFormat::Trace);
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            url_schemes: vec!["https".to_string()],
            format: OutputFormat::Json,
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::read(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Trace.to_string(), "trace");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
