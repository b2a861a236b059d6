//! Environment variable sources.
//!
//! Predicates read variables through [`EnvSource`] instead of touching the
//! process environment directly, so tests can inject a fixed mapping.

use crate::SetupDocError;
use std::collections::HashMap;
use std::path::Path;

/// Read-only key/value view of environment variables
pub trait EnvSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed in-memory mapping
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new(vars: HashMap<String, String>) -> Self {
        MapEnv { vars }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        MapEnv {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Process environment layered over a dotenv file.
///
/// Values already present in the process environment win, matching how
/// dotenv loaders behave at application start-up.
pub struct LayeredEnv {
    primary: Box<dyn EnvSource>,
    fallback: MapEnv,
}

impl LayeredEnv {
    pub fn new(primary: impl EnvSource + 'static, fallback: MapEnv) -> Self {
        LayeredEnv {
            primary: Box::new(primary),
            fallback,
        }
    }

    /// Layer the process environment over the variables in `path`
    pub fn from_dotenv(path: &Path) -> Result<Self, SetupDocError> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| SetupDocError::Io {
            context: format!("reading env file {}", path.display()),
            message: e.to_string(),
        })?;

        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| SetupDocError::Parse {
                context: format!("env file {}", path.display()),
                message: e.to_string(),
            })?;
            vars.insert(key, value);
        }

        tracing::debug!(path = %path.display(), count = vars.len(), "loaded env file");
        Ok(LayeredEnv::new(ProcessEnv, MapEnv::new(vars)))
    }
}

impl EnvSource for LayeredEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.primary.get(key).or_else(|| self.fallback.get(key))
    }
}
