use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Browser-like identification sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Global configuration loaded from `~/.config/bdl/config.toml`.
///
/// Every key is optional in the file; missing keys take the default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BdlConfig {
    /// Maximum number of transfers admitted at once.
    pub max_concurrent: usize,
    /// Directory that receives one file per URL.
    pub download_dir: PathBuf,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Receive buffer size in bytes handed to libcurl (None = library default).
    pub buffer_size: Option<usize>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Stall detector: abort when throughput stays below this many bytes/s...
    pub low_speed_limit: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
}

impl Default for BdlConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            download_dir: PathBuf::from("downloads"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            buffer_size: None,
            connect_timeout_secs: 30,
            low_speed_limit: 1,
            low_speed_time_secs: 60,
        }
    }
}

impl BdlConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BdlConfig::default();
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

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<BdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: BdlConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
