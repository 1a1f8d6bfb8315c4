//! spk-wp binary tests
//!
//! - A broken config at the default location is reported, then defaults apply
//! - init-config writes a loadable starter file and never clobbers silently

mod helpers;

use helpers::{pcm16, WavBuilder};
use spk_common::config::{load_toml_config, CompiledDefaults};
use std::process::Command;
use tempfile::TempDir;

fn spk_wp() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_spk-wp"));
    cmd.env("NO_COLOR", "1").env_remove("SPK_ROOT_FOLDER");
    cmd
}

// dirs::config_dir() follows XDG_CONFIG_HOME on Linux only
#[cfg(target_os = "linux")]
#[test]
fn test_invalid_default_config_is_reported() {
    let config_home = TempDir::new().unwrap();
    std::fs::create_dir_all(config_home.path().join("spk")).unwrap();
    std::fs::write(
        config_home.path().join("spk").join("waveform-peaks.toml"),
        "this is = = not toml [[",
    )
    .unwrap();

    let audio = TempDir::new().unwrap();
    let wav = audio.path().join("t.wav");
    std::fs::write(&wav, WavBuilder::new().fmt(1, 16).data(pcm16(&[16384, -16384])).build()).unwrap();

    let output = spk_wp()
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("RUST_LOG", "info")
        .arg("extract")
        .arg(&wav)
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("Ignoring invalid config"), "stderr: {}", stderr);
    assert!(stderr.contains("waveform-peaks.toml"), "stderr: {}", stderr);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "[0.5,0.5]");
}

#[test]
fn test_init_config_writes_starter_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("conf").join("wp.toml");

    let output = spk_wp()
        .arg("--config")
        .arg(&path)
        .arg("init-config")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written = load_toml_config(&path).unwrap();
    let defaults = CompiledDefaults::for_current_platform();
    assert_eq!(written.root_folder, Some(defaults.root_folder));
    assert_eq!(written.logging.level, defaults.log_level);

    // Second run refuses to overwrite
    let again = spk_wp()
        .arg("--config")
        .arg(&path)
        .arg("init-config")
        .output()
        .unwrap();
    assert!(!again.status.success());

    let forced = spk_wp()
        .arg("--config")
        .arg(&path)
        .args(["init-config", "--force"])
        .output()
        .unwrap();
    assert!(forced.status.success());
}
