//! Layered application configuration.
//!
//! Values are merged in this order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, or `config.toml` in the platform config dir)
//! 3. `HASHDUPE_*` environment variables (e.g. `HASHDUPE_CRYPTO=md5`)
//! 4. Command-line flags, applied by [`Config::apply_cli`]
//!
//! ```toml
//! crypto = "sha512"
//! jobs = 4
//! on_read_error = "skip"
//! follow_symlinks = false
//! skip_hidden = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::duplicates::ReadErrorPolicy;
use crate::scanner::HashAlgorithm;

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "HASHDUPE_";

/// Errors raised while loading the configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has values of the wrong type.
    #[error("Invalid configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the digest algorithm. Resolved only when a scan starts.
    pub crypto: String,
    /// Number of hashing threads.
    pub jobs: usize,
    /// Handling of read/stat failures on opened files.
    pub on_read_error: ReadErrorPolicy,
    /// Follow symbolic links during the walk.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crypto: HashAlgorithm::default().name().to_string(),
            jobs: 1,
            on_read_error: ReadErrorPolicy::default(),
            follow_symlinks: false,
            skip_hidden: false,
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// With `path == None` the platform default file is used if it exists.
    /// An explicit `path` must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing or any
    /// layer fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        if let Some(ref file) = file {
            log::debug!("Loading configuration from {}", file.display());
        }

        Self::figment(file.as_deref())
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Build the figment for the given file (if any) and the environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "hashdupe").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay the flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref crypto) = cli.crypto {
            self.crypto.clone_from(crypto);
        }
        if let Some(jobs) = cli.jobs {
            self.jobs = jobs;
        }
        if let Some(policy) = cli.on_read_error {
            self.on_read_error = policy;
        }
        self.follow_symlinks |= cli.follow_symlinks;
        self.skip_hidden |= cli.skip_hidden;
    }
}
