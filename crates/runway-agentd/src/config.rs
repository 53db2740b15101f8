use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use runway_core::{ProvisionError, TimeoutConfig};
use runway_model::{IdentityPolicy, ModelError, ProvisioningPolicy};
use runway_observe::LoggerConfig;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "RUNWAY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("--config expects a path")]
    MissingPath,

    #[error(transparent)]
    Policy(#[from] ModelError),

    #[error(transparent)]
    Timeouts(#[from] ProvisionError),

    #[error("control plane context is only meaningful for the kubernetes backend")]
    ContextWithoutKubernetes,
}

/// Which control plane the agent talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Kubernetes,
    /// In-process plane; nothing reaches a cluster.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Directory served for paths outside the API, e.g. the landing page.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPlaneConfig {
    pub backend: Backend,
    /// Kubeconfig context; unset uses in-cluster or the current context.
    pub context: Option<String>,
    #[serde(flatten)]
    pub timeouts: TimeoutConfig,
}

/// Whole agent configuration, one table per concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub server: ServerConfig,
    pub logger: LoggerConfig,
    pub policy: ProvisioningPolicy,
    pub identity: IdentityPolicy,
    pub control_plane: ControlPlaneConfig,
}

impl AgentConfig {
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: AgentConfig = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    /// Load from `--config <path>`, else `RUNWAY_CONFIG`, else built-in defaults.
    pub fn load<I>(args: I) -> Result<(Self, Option<PathBuf>), ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let path = match config_arg(args)? {
            Some(p) => Some(p),
            None => std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        };
        match path {
            Some(p) => Ok((Self::from_file(&p)?, Some(p))),
            None => {
                let cfg = Self::default();
                cfg.validate()?;
                Ok((cfg, None))
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        self.identity.validate()?;
        self.control_plane.timeouts.validate()?;
        if self.control_plane.backend != Backend::Kubernetes && self.control_plane.context.is_some()
        {
            return Err(ConfigError::ContextWithoutKubernetes);
        }
        Ok(())
    }
}

fn config_arg<I>(args: I) -> Result<Option<PathBuf>, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args
                .next()
                .map(|p| Some(PathBuf::from(p)))
                .ok_or(ConfigError::MissingPath);
        }
        if let Some(p) = arg.strip_prefix("--config=") {
            return Ok(Some(PathBuf::from(p)));
        }
    }
    Ok(None)
}
