use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::FetchOptions;

/// Workers used when neither config file nor CLI say otherwise.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Global configuration loaded from `~/.config/imgdl/config.toml`.
/// Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgdlConfig {
    /// Number of concurrent downloads.
    pub concurrency: usize,
    /// Upper bound applied to `concurrency` (also to the CLI override).
    pub max_concurrency: usize,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Seconds without any received data before a transfer is aborted.
    pub read_timeout_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirections: u32,
    /// Only save responses with an `image/*` Content-Type.
    pub images_only: bool,
    /// Optional User-Agent header; defaults to `imgdl/<version>`.
    pub user_agent: Option<String>,
    /// Optional default download directory (CLI `--out-dir` wins).
    pub output_dir: Option<PathBuf>,
}

impl Default for ImgdlConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_concurrency: 64,
            connect_timeout_secs: 15,
            read_timeout_secs: 30,
            max_redirections: 10,
            images_only: true,
            user_agent: None,
            output_dir: None,
        }
    }
}

impl ImgdlConfig {
    /// `concurrency` clamped to `1..=max_concurrency`.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, self.max_concurrency.max(1))
    }
}

impl From<&ImgdlConfig> for FetchOptions {
    fn from(cfg: &ImgdlConfig) -> Self {
        FetchOptions {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs.max(1)),
            read_timeout: Duration::from_secs(cfg.read_timeout_secs.max(1)),
            max_redirections: cfg.max_redirections,
            user_agent: Some(
                cfg.user_agent
                    .clone()
                    .unwrap_or_else(|| format!("imgdl/{}", env!("CARGO_PKG_VERSION"))),
            ),
            images_only: cfg.images_only,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Parse a config file at an explicit path.
pub fn load_from_path(path: &Path) -> Result<ImgdlConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ImgdlConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
