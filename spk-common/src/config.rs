//! Configuration loading and root folder resolution
//!
//! Root folder resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `SPK_ROOT_FOLDER` environment variable
//! 3. TOML config file (`root_folder`)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or invalid TOML file at the default location is never fatal:
//! defaults apply and the caller reports the problem.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "SPK_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "spk.db";

/// Default number of peaks produced per audio asset
pub const DEFAULT_TARGET_PEAKS: usize = 300;

/// Default number of concurrent batch workers
pub const DEFAULT_WORKERS: usize = 4;

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file path
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

/// Waveform peak extraction section of the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakConfig {
    /// Number of peaks to aim for per asset
    #[serde(default = "default_target_peaks")]
    pub target_peaks: usize,

    /// Reject unsupported bit depths and missing `fmt ` chunks
    #[serde(default)]
    pub strict: bool,

    /// Concurrent files processed by the batch tool
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            target_peaks: default_target_peaks(),
            strict: false,
            workers: default_workers(),
        }
    }
}

/// Contents of `<config_dir>/spk/<module>.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Folder containing sample pack audio (batch default)
    #[serde(default)]
    pub library_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub peaks: PeakConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_target_peaks() -> usize {
    DEFAULT_TARGET_PEAKS
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Compiled defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
        }
    }

    /// Starter config file contents with these defaults filled in
    pub fn to_toml_config(&self) -> TomlConfig {
        TomlConfig {
            root_folder: Some(self.root_folder.clone()),
            logging: LoggingConfig {
                level: self.log_level.clone(),
                log_file: None,
            },
            ..Default::default()
        }
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/spk
        dirs::data_local_dir()
            .map(|d| d.join("spk"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/spk"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/spk
        dirs::data_dir()
            .map(|d| d.join("spk"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/spk"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\spk
        dirs::data_local_dir()
            .map(|d| d.join("spk"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\spk"))
    } else {
        PathBuf::from("./spk_data")
    }
}

/// Default TOML path for a module: `<config_dir>/spk/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spk").join(format!("{}.toml", module_name)))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Serialize a config to disk, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file at the default location
    Defaults,
    /// File at the default location did not load; defaults apply instead
    Invalid { path: PathBuf, error: String },
}

/// Configuration plus its origin
///
/// Loading happens before tracing is installed, so problems are carried
/// here for the caller to log once a subscriber exists.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

impl LoadedConfig {
    /// Warning to report when a broken file was replaced by defaults
    pub fn warning(&self) -> Option<String> {
        match &self.source {
            ConfigSource::Invalid { path, error } => Some(format!(
                "Ignoring invalid config {}: {}",
                path.display(),
                error
            )),
            _ => None,
        }
    }
}

/// Load `path`, falling back to defaults when it is absent or invalid
pub fn load_config_or_default(path: &Path) -> LoadedConfig {
    if !path.exists() {
        return LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Defaults,
        };
    }

    match load_toml_config(path) {
        Ok(config) => LoadedConfig {
            config,
            source: ConfigSource::File(path.to_path_buf()),
        },
        Err(e) => LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Invalid {
                path: path.to_path_buf(),
                error: e.to_string(),
            },
        },
    }
}

/// Load configuration for a module
///
/// An explicitly requested file must exist and parse. The implicit default
/// location falls back to defaults when absent or invalid.
pub fn load_module_config(module_name: &str, explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::NotFound(format!("config file {}", path.display())));
        }
        return Ok(LoadedConfig {
            config: load_toml_config(path)?,
            source: ConfigSource::File(path.to_path_buf()),
        });
    }

    match default_config_path(module_name) {
        Some(path) => Ok(load_config_or_default(&path)),
        None => Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Defaults,
        }),
    }
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!(module = %self.module_name, "Root folder from command line");
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                debug!(module = %self.module_name, "Root folder from {}", ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            debug!(module = %self.module_name, "Root folder from TOML config");
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and names the files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }
}
