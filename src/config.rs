use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::ml::{PostProcessing, Variant};

/// Overrides the location of the TOML layer
pub const CONFIG_PATH_ENV: &str = "SOLAR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SOLAR__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub models: ModelsConfig,
    #[validate(nested)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1024))]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
            body_limit_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Artifact paths, one per variant; unset variants are not served
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ModelsConfig {
    pub generation: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub consumption: Option<PathBuf>,
}

impl ModelsConfig {
    pub fn path_for(&self, variant: Variant) -> Option<&Path> {
        match variant {
            Variant::Generation => self.generation.as_deref(),
            Variant::Source => self.source.as_deref(),
            Variant::Consumption => self.consumption.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InferenceConfig {
    /// Round predictions to `decimals` places; `false` keeps full precision
    pub round: bool,
    #[validate(range(max = 10))]
    pub decimals: u32,
    /// Negative model outputs are reported as zero
    pub clamp_negative: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        let post = PostProcessing::default();
        Self {
            round: post.decimals.is_some(),
            decimals: post.decimals.unwrap_or(2),
            clamp_negative: post.clamp_negative,
        }
    }
}

impl InferenceConfig {
    pub fn post_processing(&self) -> PostProcessing {
        PostProcessing {
            decimals: self.round.then_some(self.decimals),
            clamp_negative: self.clamp_negative,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `SOLAR__`-prefixed environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let cfg: Config = Self::figment(Path::new(&path))
            .extract()
            .with_context(|| format!("failed to read configuration ({path})"))?;
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
