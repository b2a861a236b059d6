//! Manifest script checks.
//!
//! Reads a `package.json`-style manifest and looks for a named entry in its
//! `scripts` table.

use crate::engine::check::{CheckContext, Predicate};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    scripts: BTreeMap<String, Value>,
}

/// Passes when the manifest declares `script` under `scripts`
#[derive(Debug, Clone)]
pub struct ScriptDeclared {
    manifest: PathBuf,
    script: String,
}

impl ScriptDeclared {
    pub fn new(manifest: impl Into<PathBuf>, script: impl Into<String>) -> Self {
        ScriptDeclared {
            manifest: manifest.into(),
            script: script.into(),
        }
    }
}

#[async_trait]
impl Predicate for ScriptDeclared {
    async fn evaluate(&self, ctx: &CheckContext) -> anyhow::Result<bool> {
        let path = ctx.resolve(&self.manifest);
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a valid manifest", path.display()))?;
        Ok(manifest.scripts.contains_key(&self.script))
    }
}
