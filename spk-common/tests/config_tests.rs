//! Unit tests for configuration and graceful degradation
//!
//! Covers:
//! - Root folder priority order (CLI > env > TOML > default)
//! - TOML round trip through write/load
//! - Missing or invalid config files at the default location never abort
//!   startup, and an invalid one is reported
//!
//! Tests touching SPK_ROOT_FOLDER are marked #[serial] so they never race.

use serial_test::serial;
use spk_common::config::{
    load_config_or_default, load_module_config, load_toml_config, write_toml_config,
    CompiledDefaults, ConfigSource, LoggingConfig, PeakConfig, RootFolderInitializer,
    RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use spk_common::Error;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.root_folder.to_string_lossy().contains("spk"));
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root_folder = RootFolderResolver::new("test-module").resolve();

    let defaults = CompiledDefaults::for_current_platform();
    assert_eq!(root_folder, defaults.root_folder);
}

#[test]
#[serial]
fn test_resolver_env_var() {
    let test_path = "/tmp/spk-test-env-folder";
    env::set_var(ROOT_FOLDER_ENV, test_path);

    let root_folder = RootFolderResolver::new("test-module").resolve();
    assert_eq!(root_folder, PathBuf::from(test_path));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/spk-env-wins");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/spk-toml-loses")),
        ..Default::default()
    };
    let root_folder = RootFolderResolver::new("test-module")
        .with_toml_config(&config)
        .resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/spk-env-wins"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_beats_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/spk-from-toml")),
        ..Default::default()
    };
    let root_folder = RootFolderResolver::new("test-module")
        .with_toml_config(&config)
        .resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/spk-from-toml"));
}

#[test]
#[serial]
fn test_resolver_cli_beats_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/spk-env");

    let root_folder = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/spk-cli")))
        .resolve();
    assert_eq!(root_folder, PathBuf::from("/tmp/spk-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
fn test_toml_write_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("waveform-peaks.toml");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/srv/spk")),
        library_folder: Some(PathBuf::from("/srv/packs")),
        logging: LoggingConfig {
            level: "debug".to_string(),
            log_file: None,
        },
        peaks: PeakConfig {
            target_peaks: 512,
            strict: true,
            workers: 2,
        },
    };

    write_toml_config(&config, &path).unwrap();
    let loaded = load_toml_config(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_explicit_missing_config_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let result = load_module_config("test-module", Some(&path));
    assert!(matches!(result, Err(Error::NotFound(_))), "got {:?}", result);
}

#[test]
fn test_explicit_invalid_config_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[peaks\ntarget_peaks = ").unwrap();

    let result = load_module_config("test-module", Some(&path));
    assert!(matches!(result, Err(Error::Config(_))), "got {:?}", result);
}

#[test]
fn test_explicit_config_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("wp.toml");
    std::fs::write(&path, "[peaks]\ntarget_peaks = 128\n").unwrap();

    let loaded = load_module_config("test-module", Some(&path)).unwrap();
    assert_eq!(loaded.config.peaks.target_peaks, 128);
    assert_eq!(loaded.source, ConfigSource::File(path));
    assert!(loaded.warning().is_none());
}

#[test]
fn test_absent_default_config_uses_defaults_quietly() {
    let temp_dir = TempDir::new().unwrap();

    let loaded = load_config_or_default(&temp_dir.path().join("absent.toml"));
    assert_eq!(loaded.config, TomlConfig::default());
    assert_eq!(loaded.source, ConfigSource::Defaults);
    assert!(loaded.warning().is_none());
}

#[test]
fn test_invalid_default_config_falls_back_with_warning() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("waveform-peaks.toml");
    std::fs::write(&path, "this is = = not toml [[").unwrap();

    let loaded = load_config_or_default(&path);
    assert_eq!(loaded.config, TomlConfig::default());
    assert!(matches!(&loaded.source, ConfigSource::Invalid { path: p, .. } if *p == path));

    let warning = loaded.warning().expect("invalid config must be reported");
    assert!(warning.starts_with("Ignoring invalid config"), "{}", warning);
    assert!(warning.contains("waveform-peaks.toml"), "{}", warning);
}

#[test]
fn test_starter_config_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("spk").join("waveform-peaks.toml");

    let defaults = CompiledDefaults::for_current_platform();
    write_toml_config(&defaults.to_toml_config(), &path).unwrap();

    let loaded = load_config_or_default(&path);
    assert_eq!(loaded.source, ConfigSource::File(path));
    assert_eq!(loaded.config.root_folder, Some(defaults.root_folder));
    assert_eq!(loaded.config.logging.level, defaults.log_level);
    assert_eq!(loaded.config.peaks, PeakConfig::default());
}

#[test]
fn test_initializer_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("a").join("b");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("spk.db"));
}
