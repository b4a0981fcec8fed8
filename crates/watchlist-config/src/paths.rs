use anyhow::Result;
use dirs;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("NEXTUP_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("nextup");

        Ok(Self {
            config_dir: base_dir.clone(),
            data_dir: base_dir.join("data"),
            log_dir: base_dir.join("logs"),
        })
    }

    pub fn from_container_env() -> Self {
        let base = container_base_path();
        // Config files at base level, data/logs in subdirs, same as the
        // platform layout
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// The local watchlist store file.
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("watchlist.json")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // A preexisting container base directory indicates we run inside
        // the packaged image rather than on a user machine
        let base = container_base_path();
        if base.exists() {
            return Self::from_container_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_container_env())
    }
}
