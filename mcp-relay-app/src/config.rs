use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "MCP_RELAY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "mcp-relay.yaml";
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Largest chat request body accepted, in bytes.
    pub max_body_bytes: usize,
    pub completion_backend: BackendConfig,
    pub executor: ExecutorConfig,
    pub storage_public_url: String,
    pub storage_bucket: String,
    pub privileged_keys: Vec<String>,
    /// Confines `list_directory` to this directory when set.
    pub filesystem_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub mode: ExecutorMode,
    pub proxy_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorMode {
    /// Local deterministic handlers.
    Fixture,
    /// Forward to an MCP proxy.
    Proxy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:4001".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            completion_backend: BackendConfig::default(),
            executor: ExecutorConfig::default(),
            storage_public_url: "https://s3.example.com/mcp-storage".to_string(),
            storage_bucket: "mcp-storage".to_string(),
            privileged_keys: Vec::new(),
            filesystem_root: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4000".to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            mode: ExecutorMode::Fixture,
            proxy_url: "http://localhost:8585".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load from `explicit`, else `MCP_RELAY_CONFIG`, else `mcp-relay.yaml`,
    /// then apply environment overrides and validate.
    ///
    /// A missing default file means defaults; a missing named file is an error.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let named = explicit.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match named {
            Some(path) => Self::load(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `LITELLM_URL`, `MCP_PROXY_URL`, `MCP_ADMIN_KEYS` and
    /// `MCP_RELAY_LISTEN` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = set("LITELLM_URL") {
            self.completion_backend.url = url;
        }
        if let Some(url) = set("MCP_PROXY_URL") {
            self.executor.proxy_url = url;
        }
        if let Some(addr) = set("MCP_RELAY_LISTEN") {
            self.listen_addr = addr;
        }
        if let Some(keys) = set("MCP_ADMIN_KEYS") {
            for key in keys.split(',').map(str::trim).filter(|k| !k.is_empty()) {
                if !self.privileged_keys.iter().any(|existing| existing == key) {
                    self.privileged_keys.push(key.to_string());
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.max_body_bytes == 0 {
            bail!("max_body_bytes must be greater than zero");
        }
        if self.completion_backend.url.trim().is_empty() {
            bail!("completion_backend.url must not be empty");
        }
        if self.completion_backend.timeout_ms == 0 {
            bail!("completion_backend.timeout_ms must be greater than zero");
        }
        if self.executor.timeout_ms == 0 {
            bail!("executor.timeout_ms must be greater than zero");
        }
        if self.executor.mode == ExecutorMode::Proxy && self.executor.proxy_url.trim().is_empty() {
            bail!("executor.proxy_url must not be empty in proxy mode");
        }
        if self.storage_public_url.trim().is_empty() {
            bail!("storage_public_url must not be empty");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("Invalid listen_addr: {}", self.listen_addr))
    }
}
