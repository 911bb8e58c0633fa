//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! the `LISTEN` environment variable and command-line flags. The root
//! directory only ever comes from the command line.
//!
//! ```yaml
//! server:
//!   listen_addr: "127.0.0.1:8080"
//!   sequential: false
//!   read_timeout_secs: 30
//!   max_request_bytes: 65536
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::http::connection::{ConnectionOptions, DEFAULT_MAX_REQUEST_BYTES};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Serve the files under a single directory over HTTP/1.1.
#[derive(Debug, Clone, Parser)]
#[command(name = "statik", version)]
pub struct Cli {
    /// Directory to serve files from
    pub root: PathBuf,

    /// Address to listen on
    #[arg(long, env = "LISTEN")]
    pub listen: Option<String>,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Finish each connection before accepting the next
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub sequential: bool,
    pub read_timeout_secs: Option<u64>,
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            sequential: false,
            read_timeout_secs: None,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            max_request_bytes: self.max_request_bytes,
            read_timeout: self.read_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Layout of the YAML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerConfig,
}

impl FileConfig {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid configuration file")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration file {}", path.display()))?;
        Self::from_yaml(&text)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absolute, canonical root directory.
    pub root: PathBuf,
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut server = match &cli.config {
            Some(path) => FileConfig::from_path(path)?.server,
            None => ServerConfig::default(),
        };

        if let Some(listen) = &cli.listen {
            server.listen_addr = listen.clone();
        }
        if cli.sequential {
            server.sequential = true;
        }

        Ok(Self {
            server,
            root: resolve_root(&cli.root)?,
        })
    }
}

/// Makes `path` absolute once, at startup.
pub fn resolve_root(path: &Path) -> anyhow::Result<PathBuf> {
    let root = std::fs::canonicalize(path)
        .with_context(|| format!("root directory {} is not accessible", path.display()))?;

    if !root.is_dir() {
        anyhow::bail!("root {} is not a directory", root.display());
    }

    Ok(root)
}
