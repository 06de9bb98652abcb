// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::store::{FilterOptions, SortKey, StatusFilter};
use anyhow::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_AI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

fn default_ai_endpoint() -> String {
    DEFAULT_AI_ENDPOINT.to_string()
}

fn default_ai_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub use_ai: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_ai_endpoint")]
    pub ai_endpoint: String,
    /// 0 disables the timeout.
    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,
    #[serde(default)]
    pub default_sort: SortKey,
    #[serde(default)]
    pub hide_completed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_ai: false,
            api_key: String::new(),
            // Match the serde defaults
            ai_endpoint: default_ai_endpoint(),
            ai_timeout_secs: default_ai_timeout_secs(),
            default_sort: SortKey::default(),
            hide_completed: false,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults. Parse errors still surface.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            atomic_write(&path, toml_str)?;
            Ok(())
        })
    }

    /// The list view a front end starts with.
    pub fn filter_options<'a>(&self, search_term: &'a str) -> FilterOptions<'a> {
        FilterOptions {
            search_term,
            status: if self.hide_completed {
                StatusFilter::Active
            } else {
                StatusFilter::All
            },
            sort: self.default_sort,
        }
    }

    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let lock_path = file_path.with_extension("lock");
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;

    file.lock_exclusive()?;
    let result = f();
    file.unlock()?;
    result
}

/// Write to a .tmp sibling, then rename over the target.
fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}
