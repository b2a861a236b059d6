//! Environment variable checks.

use crate::engine::check::{CheckContext, Predicate};
use async_trait::async_trait;

/// Passes when a variable is set to a real value.
///
/// Unset, blank, and placeholder values all fail. Placeholders are compared
/// case-insensitively after trimming, so a template value copied verbatim
/// from `.env.example` is caught.
#[derive(Debug, Clone)]
pub struct EnvVarConfigured {
    name: String,
    placeholders: Vec<String>,
}

impl EnvVarConfigured {
    pub fn new(name: impl Into<String>) -> Self {
        EnvVarConfigured {
            name: name.into(),
            placeholders: Vec::new(),
        }
    }

    pub fn with_placeholders<I, S>(mut self, placeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.placeholders
            .extend(placeholders.into_iter().map(Into::into));
        self
    }

    fn is_placeholder(&self, value: &str) -> bool {
        self.placeholders
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(value))
    }
}

#[async_trait]
impl Predicate for EnvVarConfigured {
    async fn evaluate(&self, ctx: &CheckContext) -> anyhow::Result<bool> {
        let Some(value) = ctx.env().get(&self.name) else {
            return Ok(false);
        };
        let value = value.trim();
        Ok(!value.is_empty() && !self.is_placeholder(value))
    }
}
