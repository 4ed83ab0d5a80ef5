use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one search run.
///
/// Every field has a default so a config file may set only what it cares
/// about; the root and pattern normally come from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Directory to scan recursively
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Regular expression searched for in file contents
    #[serde(default)]
    pub pattern: String,

    /// Optional regular expression; files whose bare name it matches are skipped
    #[serde(default)]
    pub exclude_pattern: Option<String>,

    /// Encoding labels tried in order when decoding a file
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

/// Console code pages come first on Windows, where project files are often
/// saved in them; everywhere else only UTF-8 is attempted.
pub fn default_encodings() -> Vec<String> {
    let labels: &[&str] = if cfg!(windows) {
        &["windows-1251", "cp866", "utf-8"]
    } else {
        &["utf-8"]
    };
    labels.iter().map(|s| s.to_string()).collect()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            pattern: String::new(),
            exclude_pattern: None,
            encodings: default_encodings(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    /// Creates a config for the given root and pattern with default settings
    pub fn new(root_path: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Sets the file name exclusion pattern
    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude_pattern = Some(exclude.into());
        self
    }

    /// Replaces the encoding list
    pub fn with_encodings<I, S>(mut self, encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encodings = encodings.into_iter().map(Into::into).collect();
        self
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an explicit file.
    ///
    /// Default locations are optional; an explicitly named file must exist.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("textscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".textscout.yaml")),
        ];

        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// Every value given on the command line wins, including one that
    /// happens to equal the built-in default.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(pattern) = cli.pattern {
            self.pattern = pattern;
        }
        if cli.exclude_pattern.is_some() {
            self.exclude_pattern = cli.exclude_pattern;
        }
        if let Some(encodings) = cli.encodings {
            self.encodings = encodings;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Values passed on the command line; `None` means the flag was not given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub pattern: Option<String>,
    pub exclude_pattern: Option<String>,
    pub encodings: Option<Vec<String>>,
    pub log_level: Option<String>,
}
