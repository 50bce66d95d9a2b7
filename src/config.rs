use anyhow::{Context, Result, bail};
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_STAGES: usize = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub prompt: String,
    pub max_stages: usize,
    // Where pipeline rendezvous sockets go; system temp dir when unset.
    pub rendezvous_dir: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            prompt: "minish$ ".to_string(),
            max_stages: DEFAULT_MAX_STAGES,
            rendezvous_dir: None,
        }
    }
}

impl ShellConfig {
    pub fn rendezvous_dir(&self) -> PathBuf {
        self.rendezvous_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

// A file named with --config must exist; otherwise $MINISH_CONFIG is
// tried, then $HOME/.minish.toml, then built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ShellConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let candidate = match env::var_os("MINISH_CONFIG") {
                Some(p) => PathBuf::from(p),
                None => match env::var_os("HOME") {
                    Some(home) => Path::new(&home).join(".minish.toml"),
                    None => return Ok(ShellConfig::default()),
                },
            };
            if !candidate.exists() {
                return Ok(ShellConfig::default());
            }
            candidate
        }
    };

    debug!("loading config from {}", path.display());
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ShellConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if config.max_stages == 0 {
        bail!("max_stages must be at least 1");
    }

    Ok(config)
}
