//! Header template resolution.
//!
//! A header value written exactly as `${NAME}` is replaced by the secret
//! `NAME`; an unknown secret resolves to the empty string. Anything else is
//! sent verbatim.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Source of secret values referenced from header templates.
#[cfg_attr(test, mockall::automock)]
pub trait SecretsProvider: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Secrets read from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretsProvider for EnvSecrets {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed in-memory secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl SecretsProvider for StaticSecrets {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Resolves `${NAME}` header values against a [`SecretsProvider`].
#[derive(Clone)]
pub struct HeaderResolver {
    secrets: Arc<dyn SecretsProvider>,
}

impl fmt::Debug for HeaderResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderResolver").finish_non_exhaustive()
    }
}

impl HeaderResolver {
    pub fn new(secrets: Arc<dyn SecretsProvider>) -> Self {
        Self { secrets }
    }

    pub fn resolve(&self, headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        headers
            .iter()
            .map(|(name, value)| {
                let resolved = match secret_reference(value) {
                    Some(var) => self.secrets.get(var).unwrap_or_default(),
                    None => value.clone(),
                };
                (name.clone(), resolved)
            })
            .collect()
    }
}

/// `Some("NAME")` for a value of the exact form `${NAME}`.
fn secret_reference(value: &str) -> Option<&str> {
    value.strip_prefix("${")?.strip_suffix('}')
}
