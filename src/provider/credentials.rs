//! Provider credentials resolved from the process environment.

use std::collections::{BTreeSet, HashMap};
use std::env;

use super::Provider;
use crate::{Error, ErrorContext, Result};

/// One API key per provider.
#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<Provider, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.keys.insert(provider, key.into());
        self
    }

    /// Resolve a key for every provider in `providers` from `<PROVIDER>_API_KEY`.
    ///
    /// A missing or empty variable is a configuration error.
    pub fn from_env<'a>(providers: impl IntoIterator<Item = &'a Provider>) -> Result<Self> {
        let mut creds = Self::new();
        let wanted: BTreeSet<Provider> = providers.into_iter().copied().collect();
        for provider in wanted {
            let var = provider.credential_env_var();
            match env::var(&var) {
                Ok(key) if !key.trim().is_empty() => {
                    creds.keys.insert(provider, key.trim().to_string());
                }
                _ => {
                    return Err(Error::configuration_with_context(
                        format!("{} environment variable not set", var),
                        ErrorContext::new()
                            .with_field_path(var)
                            .with_source("credentials"),
                    ))
                }
            }
        }
        Ok(creds)
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    /// Bearer token for a provider, or a configuration error naming the variable.
    pub fn require(&self, provider: Provider) -> Result<&str> {
        self.get(provider).ok_or_else(|| {
            Error::configuration(format!(
                "{} environment variable not set",
                provider.credential_env_var()
            ))
        })
    }

    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.keys.keys()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print keys
        f.debug_struct("Credentials")
            .field("providers", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}
