//! Hot-reloadable service registry.

use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::definition::ServiceDefinition;
use super::loader;
use crate::provider::{Credentials, Provider};
use crate::{Error, ErrorContext, Result};

type Snapshot = HashMap<String, Arc<ServiceDefinition>>;

// Editors often emit several events per save.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(150);

/// Name → definition map, replaced as a whole on every (re)load.
///
/// Readers take a snapshot without locking; a reload builds a new map and swaps
/// it in atomically, so a lookup sees either the old set or the new one.
pub struct ServiceRegistry {
    services: ArcSwap<Snapshot>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    pub fn from_definitions(definitions: HashMap<String, ServiceDefinition>) -> Self {
        let registry = Self::new();
        registry.replace(definitions);
        registry
    }

    /// Parse the document at `path` and swap it in. On error the current
    /// snapshot is kept.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let definitions = loader::load_document(path).await?;
        let count = self.replace(definitions);
        info!(path = %path.display(), services = count, "service registry loaded");
        Ok(count)
    }

    /// Like [`load`](Self::load), but reject a document that names a provider
    /// without a key in `credentials`. The current snapshot is kept on error.
    pub async fn reload(&self, path: impl AsRef<Path>, credentials: &Credentials) -> Result<usize> {
        let path = path.as_ref();
        let definitions = loader::load_document(path).await?;
        check_credentials(&definitions, credentials)?;
        let count = self.replace(definitions);
        info!(path = %path.display(), services = count, "service registry reloaded");
        Ok(count)
    }

    /// Install a new set of definitions. Each definition's name is set to its key.
    pub fn replace(&self, definitions: HashMap<String, ServiceDefinition>) -> usize {
        let snapshot: Snapshot = definitions
            .into_iter()
            .map(|(name, mut def)| {
                def.name = name.clone();
                (name, Arc::new(def))
            })
            .collect();
        let count = snapshot.len();
        self.services.store(Arc::new(snapshot));
        count
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<ServiceDefinition>> {
        self.services
            .load()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.services.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.load().keys().cloned().collect();
        names.sort();
        names
    }

    /// Providers referenced by at least one service; used to resolve credentials.
    pub fn providers(&self) -> BTreeSet<Provider> {
        self.services.load().values().map(|s| s.provider).collect()
    }

    /// Reload from `path` whenever the file changes.
    ///
    /// The parent directory is watched so that editors that replace the file
    /// on save are seen too. Reloads go through [`reload`](Self::reload) with
    /// `credentials`. Dropping the returned guard stops watching.
    pub fn watch(
        self: &Arc<Self>,
        path: impl AsRef<Path>,
        credentials: Credentials,
    ) -> Result<RegistryWatcher> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| {
                Error::configuration(format!("cannot watch '{}': not a file path", path.display()))
            })?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            let relevant = matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_)
            ) && event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(file_name.as_os_str()));
            if relevant {
                let _ = tx.send(());
            }
        })
        .map_err(|e| Error::configuration(format!("cannot start file watcher: {}", e)))?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                Error::configuration(format!("cannot watch '{}': {}", dir.display(), e))
            })?;

        let registry = Arc::clone(self);
        let task = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                tokio::time::sleep(RELOAD_DEBOUNCE).await;
                while rx.try_recv().is_ok() {}
                debug!(path = %path.display(), "service document changed");
                if let Err(e) = registry.reload(&path, &credentials).await {
                    warn!(path = %path.display(), error = %e, "reload failed; keeping previous services");
                }
            }
        });

        Ok(RegistryWatcher {
            _watcher: watcher,
            task,
        })
    }
}

fn check_credentials(
    definitions: &HashMap<String, ServiceDefinition>,
    credentials: &Credentials,
) -> Result<()> {
    let mut names: Vec<&String> = definitions.keys().collect();
    names.sort();
    for name in names {
        let provider = definitions[name].provider;
        if credentials.get(provider).is_none() {
            return Err(Error::configuration_with_context(
                format!(
                    "service '{}' uses provider '{}' but {} was not set at startup",
                    name,
                    provider.id(),
                    provider.credential_env_var()
                ),
                ErrorContext::new()
                    .with_field_path(format!("{}.provider", name))
                    .with_source("service_registry"),
            ));
        }
    }
    Ok(())
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a registry watch alive.
pub struct RegistryWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl Drop for RegistryWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
