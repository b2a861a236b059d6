//! Port availability check.

use crate::engine::check::{CheckContext, Predicate};
use crate::platform::env::EnvSource;
use crate::platform::network::{probe_port, PortState};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port used when neither the environment nor the config names one
pub const DEFAULT_PORT: u16 = 3000;

/// Where the port number comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSetting {
    /// Variable consulted first; `None` means always use `default`
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default = "default_port")]
    pub default: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for PortSetting {
    fn default() -> Self {
        PortSetting {
            env_var: Some("PORT".to_string()),
            default: DEFAULT_PORT,
        }
    }
}

impl PortSetting {
    pub fn fixed(port: u16) -> Self {
        PortSetting {
            env_var: None,
            default: port,
        }
    }

    /// Resolve the port from `env`, falling back to the default when unset
    pub fn resolve(&self, env: &dyn EnvSource) -> anyhow::Result<u16> {
        let Some(var) = &self.env_var else {
            return Ok(self.default);
        };
        match env.get(var) {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow!("{}={:?} is not a valid port number", var, raw)),
            _ => Ok(self.default),
        }
    }
}

/// Passes when `host:port` can be bound right now.
///
/// The probe listener is dropped before `evaluate` returns, so the port is
/// free again for the next check and for the application itself.
#[derive(Debug, Clone)]
pub struct PortAvailable {
    host: String,
    setting: PortSetting,
}

impl PortAvailable {
    pub fn new(host: impl Into<String>, setting: PortSetting) -> Self {
        PortAvailable {
            host: host.into(),
            setting,
        }
    }

    pub fn fixed(host: impl Into<String>, port: u16) -> Self {
        Self::new(host, PortSetting::fixed(port))
    }
}

#[async_trait]
impl Predicate for PortAvailable {
    async fn evaluate(&self, ctx: &CheckContext) -> anyhow::Result<bool> {
        let port = self.setting.resolve(ctx.env())?;
        let state = probe_port(&self.host, port)
            .await
            .with_context(|| format!("cannot bind {}:{}", self.host, port))?;
        Ok(state == PortState::Free)
    }
}
