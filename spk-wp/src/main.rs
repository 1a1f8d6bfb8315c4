//! spk-wp (Waveform Peaks) - admin tool for sample pack waveform data
//!
//! Subcommands:
//! - `extract`: print the peak sequence of one WAV file as JSON
//! - `batch`: extract and store peaks for every WAV file in a library folder
//! - `show`: print the stored waveform record of one asset
//! - `init-config`: write a starter TOML config with compiled defaults

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spk_common::config::{
    default_config_path, load_module_config, write_toml_config, CompiledDefaults, ConfigSource,
    RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use spk_wp::services::{
    BatchProcessor, FileScanner, FsAudioSource, PeakStore, SqlitePeakStore,
};
use spk_wp::{extract_peaks_with, PeakOptions};

const MODULE_NAME: &str = "waveform-peaks";

/// Command-line arguments for spk-wp
#[derive(Parser, Debug)]
#[command(name = "spk-wp")]
#[command(about = "Waveform peak extraction for sample pack audio")]
#[command(version)]
struct Args {
    /// Root folder holding spk.db
    #[arg(short, long, global = true)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: <config_dir>/spk/waveform-peaks.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the peaks of one WAV file as JSON
    Extract {
        file: PathBuf,

        /// Number of peaks to aim for
        #[arg(short, long)]
        target: Option<usize>,

        /// Reject unsupported bit depths and missing fmt chunks
        #[arg(long)]
        strict: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Extract and store peaks for every WAV file under a folder
    Batch {
        /// Library folder (default: library_folder from config)
        dir: Option<PathBuf>,

        /// Files processed concurrently
        #[arg(short, long)]
        workers: Option<usize>,

        #[arg(long)]
        strict: bool,
    },

    /// Print the stored waveform record for a storage key
    Show { audio_path: String },

    /// Write a starter config file (to --config, or the default location)
    InitConfig {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if let Command::InitConfig { force } = args.command {
        init_config(args.config.as_deref(), force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let loaded = load_module_config(MODULE_NAME, args.config.as_deref())
        .context("Failed to load configuration")?;
    let config = loaded.config.clone();

    init_tracing(&config)?;

    info!(
        "Starting spk-wp v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &loaded.source {
        ConfigSource::File(path) => info!("Config: {}", path.display()),
        ConfigSource::Defaults => debug!("No config file, using defaults"),
        ConfigSource::Invalid { .. } => {
            if let Some(warning) = loaded.warning() {
                warn!("{}", warning);
            }
        }
    }

    match args.command {
        Command::Extract {
            file,
            target,
            strict,
            pretty,
        } => {
            let options = PeakOptions::new()
                .with_target_peaks(target.unwrap_or(config.peaks.target_peaks))
                .strict(strict || config.peaks.strict);
            extract(&file, &options, pretty).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch {
            dir,
            workers,
            strict,
        } => {
            let dir = dir
                .or_else(|| config.library_folder.clone())
                .ok_or_else(|| anyhow!("No folder given and no library_folder configured"))?;
            let options = PeakOptions::new()
                .with_target_peaks(config.peaks.target_peaks)
                .strict(strict || config.peaks.strict);
            let workers = workers.unwrap_or(config.peaks.workers);
            batch(args.root_folder.as_deref(), &config, &dir, options, workers).await
        }
        Command::Show { audio_path } => {
            show(args.root_folder.as_deref(), &config, &audio_path).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig { .. } => unreachable!("handled before config load"),
    }
}

fn init_config(explicit: Option<&Path>, force: bool) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| default_config_path(MODULE_NAME))
        .ok_or_else(|| anyhow!("Could not determine config directory; pass --config"))?;

    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }

    let config = CompiledDefaults::for_current_platform().to_toml_config();
    write_toml_config(&config, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote {}", path.display());
    Ok(())
}

/// Logs go to stderr (and optionally a file) so stdout stays valid JSON
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let file_layer = match &config.logging.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

async fn extract(file: &Path, options: &PeakOptions, pretty: bool) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let report = extract_peaks_with(&bytes, options)
        .with_context(|| format!("Failed to extract peaks from {}", file.display()))?;

    info!(
        file = %file.display(),
        peaks = report.peaks.len(),
        samples_per_peak = report.samples_per_peak,
        "Extracted waveform peaks"
    );

    let json = if pretty {
        serde_json::to_string_pretty(&report.peaks)?
    } else {
        serde_json::to_string(&report.peaks)?
    };
    println!("{}", json);

    Ok(())
}

async fn open_store(root_folder: Option<&Path>, config: &TomlConfig) -> Result<SqlitePeakStore> {
    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(root_folder.map(Path::to_path_buf))
        .with_toml_config(config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let pool = spk_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    Ok(SqlitePeakStore::new(pool))
}

async fn batch(
    root_folder: Option<&Path>,
    config: &TomlConfig,
    dir: &Path,
    options: PeakOptions,
    workers: usize,
) -> Result<ExitCode> {
    let store = open_store(root_folder, config).await?;

    let files = FileScanner::new()
        .scan(dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    let source = FsAudioSource::new(dir);
    let keys: Vec<String> = files.iter().filter_map(|path| source.key_for(path)).collect();

    let processor = BatchProcessor::new(source, store, options).with_workers(workers);
    let summary = processor.process(keys).await;

    println!(
        "Processed {} files: {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    );
    for failure in &summary.failures {
        println!("  FAILED {}: {}", failure.key, failure.reason);
    }

    let stored = processor.store().count().await?;
    info!(stored, "Assets with stored peaks");

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn show(root_folder: Option<&Path>, config: &TomlConfig, audio_path: &str) -> Result<()> {
    let store = open_store(root_folder, config).await?;

    let record = store
        .load(audio_path)
        .await?
        .ok_or_else(|| anyhow!("No stored peaks for {}", audio_path))?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
