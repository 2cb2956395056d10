use crate::app::filter::FilterChain;
use std::collections::HashMap;
use std::path::PathBuf;

/// Represents the final configuration after merging presets and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Canonical, absolute directory to scan. The playlist is written here too.
    pub base_dir: PathBuf,
    pub filters: FilterChain,
    /// Already suffixed with `.m3u8` and sanitized.
    pub output_filename: String,
    pub ffprobe: PathBuf,
}

impl RuntimeConfig {
    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(&self.output_filename)
    }
}

/// Raw result of probing a single file.
#[derive(Debug, Clone, Default)]
pub struct ProbeInfo {
    pub format_name: String,
    pub duration_secs: f64,
    pub tags: HashMap<String, String>,
}

/// Represents a single file that survived every active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkMatch {
    pub path: PathBuf,
    pub duration_secs: u64,
    pub title: String,
}

/// How a run ended when nothing fatal happened.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Written(PathBuf),
    NoMatches,
}
