use crate::app::cli::Cli;
use crate::app::filter::{FilterChain, FormatFilter, NameFilter, SUPPORTED_FORMATS};
use crate::app::models::RuntimeConfig;
use crate::app::sanitize::sanitize_filename;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_OUTPUT: &str = "playlist.m3u8";
pub const PLAYLIST_EXTENSION: &str = ".m3u8";

/// Problems with the user's input. Always detected before any scanning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing base directory, pass it with --dir")]
    MissingBaseDir,
    #[error(
        "you can only use one of --filter-prefix, --filter-suffix, --filter-contains \
         and --filter-title-contains, two or more filters can't be used simultaneously"
    )]
    ConflictingFilters,
    #[error("unsupported format {0:?}, supported formats are flac, mp3")]
    UnsupportedFormat(String),
    #[error("cannot access base directory {0:?}: {1}")]
    BaseDirNotFound(PathBuf, #[source] io::Error),
    #[error("{0:?} is not a directory")]
    NotADirectory(PathBuf),
}

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PresetConfig {
    pub ext: Option<String>,
    pub filter_prefix: Option<String>,
    pub filter_suffix: Option<String>,
    pub filter_contains: Option<String>,
    pub filter_title_contains: Option<String>,
    pub output: Option<String>,
    pub ffprobe: Option<PathBuf>,
}

impl PresetConfig {
    fn has_name_filter(&self) -> bool {
        [
            &self.filter_prefix,
            &self.filter_suffix,
            &self.filter_contains,
            &self.filter_title_contains,
        ]
        .into_iter()
        .any(|f| non_empty(f).is_some())
    }
}

pub fn load_presets_file() -> Result<HashMap<String, PresetConfig>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home
        .join(".config")
        .join("walkman_playlist")
        .join("presets.toml");

    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    parse_presets(&content)
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content).context("Failed to parse presets.toml")?;
    Ok(parsed.presets)
}

/// Validates the command line, merges in the selected preset and produces the
/// immutable configuration for the run.
pub fn resolve_config(cli: Cli, presets: &HashMap<String, PresetConfig>) -> Result<RuntimeConfig> {
    let dir = cli
        .dir
        .as_deref()
        .filter(|d| !d.as_os_str().is_empty())
        .ok_or(ConfigError::MissingBaseDir)?;
    let base_dir = canonical_dir(dir)?;

    // Explicit preset > folder name of the scanned directory > none
    let auto_key = base_dir.file_name().and_then(|n| n.to_str());
    let preset_key = cli.preset.as_deref().or(auto_key);
    let preset = match preset_key.and_then(|k| presets.get(k).map(|p| (k, p))) {
        Some((key, preset)) => {
            log::info!("Using preset {:?}", key);
            preset.clone()
        }
        None => {
            if let Some(key) = cli.preset.as_deref() {
                log::warn!("Preset {:?} not found, ignoring it", key);
            }
            PresetConfig::default()
        }
    };

    let cli_filters = PresetConfig {
        filter_prefix: cli.filter_prefix,
        filter_suffix: cli.filter_suffix,
        filter_contains: cli.filter_contains,
        filter_title_contains: cli.filter_title_contains,
        ..Default::default()
    };
    // Filters merge as a group so a preset can never add a second one.
    let name = if cli_filters.has_name_filter() {
        build_name_filter(&cli_filters)?
    } else {
        build_name_filter(&preset)?
    };

    let format = match non_empty(&cli.ext).or(non_empty(&preset.ext)) {
        Some(ext) => select_format(ext)?,
        None => FormatFilter::Supported,
    };

    let output_filename = output_filename(non_empty(&cli.output).or(non_empty(&preset.output)));

    let ffprobe = cli
        .ffprobe
        .or(preset.ffprobe)
        .unwrap_or_else(|| PathBuf::from("ffprobe"));

    Ok(RuntimeConfig {
        base_dir,
        filters: FilterChain { name, format },
        output_filename,
        ffprobe,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn canonical_dir(dir: &Path) -> Result<PathBuf, ConfigError> {
    let base_dir =
        fs::canonicalize(dir).map_err(|e| ConfigError::BaseDirNotFound(dir.to_path_buf(), e))?;
    if !base_dir.is_dir() {
        return Err(ConfigError::NotADirectory(base_dir));
    }
    Ok(base_dir)
}

fn build_name_filter(source: &PresetConfig) -> Result<NameFilter, ConfigError> {
    let candidates = [
        non_empty(&source.filter_prefix).map(|s| NameFilter::Prefix(s.to_string())),
        non_empty(&source.filter_suffix).map(|s| NameFilter::Suffix(s.to_string())),
        non_empty(&source.filter_contains).map(|s| NameFilter::Contains(s.to_string())),
        non_empty(&source.filter_title_contains).map(|s| NameFilter::TitleContains(s.to_string())),
    ];

    let mut active = candidates.into_iter().flatten();
    let filter = active.next().unwrap_or_default();
    if active.next().is_some() {
        return Err(ConfigError::ConflictingFilters);
    }
    Ok(filter)
}

fn select_format(ext: &str) -> Result<FormatFilter, ConfigError> {
    let selected = ext.trim_start_matches('.').to_lowercase();
    if !SUPPORTED_FORMATS.contains(&selected.as_str()) {
        return Err(ConfigError::UnsupportedFormat(ext.to_string()));
    }
    Ok(FormatFilter::Only(selected))
}

/// Defaults, appends the playlist extension, then sanitizes. Falls back to
/// the unsanitized name when sanitizing leaves nothing.
pub fn output_filename(requested: Option<&str>) -> String {
    let name = match requested {
        None => DEFAULT_OUTPUT.to_string(),
        Some(name) if name.ends_with(PLAYLIST_EXTENSION) => name.to_string(),
        Some(name) => format!("{}{}", name, PLAYLIST_EXTENSION),
    };

    let safe = sanitize_filename(&name, "_");
    if safe.is_empty() {
        name
    } else {
        safe
    }
}
