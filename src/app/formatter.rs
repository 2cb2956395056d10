use crate::app::models::{RuntimeConfig, WalkMatch};
use anyhow::{Context, Result};
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

pub struct PlaylistWriter;

impl PlaylistWriter {
    /// Renders the extended M3U text. Paths are relative to `base_dir`, where
    /// the playlist itself lives.
    pub fn render(matches: &[WalkMatch], base_dir: &Path) -> String {
        let mut out = String::from("#EXTM3U\n");

        for entry in matches {
            out.push_str(&format!(
                "#EXTINF:{};{}\n",
                entry.duration_secs, entry.title
            ));
            out.push_str(&relative_path(&entry.path, base_dir));
            out.push('\n');
        }

        out.push('\n');
        out
    }

    pub fn write(config: &RuntimeConfig, matches: &[WalkMatch]) -> Result<PathBuf> {
        let output_path = config.output_path();
        let content = Self::render(matches, &config.base_dir);

        fs::write(&output_path, content)
            .context(format!("Failed to write playlist {:?}", output_path))?;

        Ok(output_path)
    }
}

fn relative_path(path: &Path, base_dir: &Path) -> String {
    let relative = diff_paths(path, base_dir).unwrap_or_else(|| path.to_path_buf());
    relative
        .to_string_lossy()
        .trim_start_matches(MAIN_SEPARATOR)
        .to_string()
}
