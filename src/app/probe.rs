use crate::app::models::ProbeInfo;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Inspects a media file and reports its container format, duration and tags.
///
/// An error means the file is not a readable media container.
pub trait Prober {
    fn probe(&self, path: &Path) -> Result<ProbeInfo>;
}

/// Runs the `ffprobe` executable and decodes its JSON report.
pub struct FfprobeProber {
    program: PathBuf,
}

impl FfprobeProber {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Prober for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<ProbeInfo> {
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .context(format!("Failed to run {}", self.program.display()))?;

        if !output.status.success() {
            bail!(
                "{} exited with {} for {:?}",
                self.program.display(),
                output.status,
                path
            );
        }

        parse_ffprobe_output(&output.stdout)
    }
}

#[derive(Deserialize, Debug)]
struct FfprobeReport {
    format: FfprobeFormat,
}

#[derive(Deserialize, Debug)]
struct FfprobeFormat {
    format_name: String,
    duration: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Decodes `ffprobe -print_format json -show_format` output.
pub fn parse_ffprobe_output(stdout: &[u8]) -> Result<ProbeInfo> {
    let report: FfprobeReport =
        serde_json::from_slice(stdout).context("Failed to parse ffprobe output")?;

    let duration_secs = report
        .format
        .duration
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite())
        .unwrap_or(0.0);

    Ok(ProbeInfo {
        format_name: report.format.format_name.to_lowercase(),
        duration_secs,
        tags: report.format.tags,
    })
}

/// Whole seconds, rounded half away from zero. Negative input clamps to 0.
pub fn round_duration(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        secs.round() as u64
    } else {
        0
    }
}

/// The TITLE tag if present and non-blank, otherwise the file stem.
pub fn resolve_title(info: &ProbeInfo, path: &Path) -> String {
    // Exact key first, then the smallest case variant so lookups are stable.
    let tagged = info
        .tags
        .get("TITLE")
        .or_else(|| {
            info.tags
                .iter()
                .filter(|(key, _)| key.eq_ignore_ascii_case("title"))
                .min_by(|a, b| a.0.cmp(b.0))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty());

    match tagged {
        Some(title) => title.to_string(),
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
