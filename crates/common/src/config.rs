use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::process::DEFAULT_MAX_OUTPUT;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectConfig {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Program names for the external inspection tools.  Each one is looked up
/// on `PATH` unless given as an absolute path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_file")]
    pub file: String,
    #[serde(default = "default_identify")]
    pub identify: String,
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
    #[serde(default = "default_pdfinfo")]
    pub pdfinfo: String,
    #[serde(default = "default_archive")]
    pub archive: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
            identify: default_identify(),
            ffprobe: default_ffprobe(),
            pdfinfo: default_pdfinfo(),
            archive: default_archive(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Per-tool stdout ceiling in bytes; anything beyond is dropped.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Regexes matched against `"target: message"`; matching events are dropped.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_file() -> String { "file".into() }
fn default_identify() -> String { "identify".into() }
fn default_ffprobe() -> String { "ffprobe".into() }
fn default_pdfinfo() -> String { "pdfinfo".into() }
fn default_archive() -> String { "7z".into() }
fn default_max_output_bytes() -> usize { DEFAULT_MAX_OUTPUT }

/// Parse a config file body.  Unknown keys are reported as warnings, not errors.
pub fn parse_config(text: &str) -> Result<InspectConfig> {
    let mut unknown = Vec::new();
    let config: InspectConfig =
        serde_ignored::deserialize(toml::Deserializer::new(text), |path| {
            unknown.push(path.to_string());
        })
        .context("parsing config")?;

    for key in &unknown {
        tracing::warn!("unknown config key: {key}");
    }
    Ok(config)
}

/// Read and parse the config at `path`.
pub fn load_config(path: &Path) -> Result<InspectConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in {}", path.display()))
}

/// `$XDG_CONFIG_HOME/inf/config.toml`, falling back to `~/.config/inf/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("inf").join("config.toml"))
}
