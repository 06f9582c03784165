//! Filesystem-backed config file store.
//!
//! Every operation works against the live directory; nothing is cached.
//! Names are validated textually first, then the resolved path is checked
//! to stay under the canonical root so symlinks cannot escape it.

use dashmap::DashMap;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::SitesConfig;
use crate::error::GatewayError;
use crate::sites::name::{SiteLayout, SiteName};

/// One config file and its whole content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteFile {
    pub name: String,
    pub content: String,
}

/// Lists, reads and overwrites config files under a fixed root directory.
pub struct SiteStore {
    root: PathBuf,
    layout: SiteLayout,
    /// Present when writes to the same name are serialized.
    write_locks: Option<DashMap<SiteName, Arc<Mutex<()>>>>,
}

impl SiteStore {
    pub fn new(root: impl Into<PathBuf>, layout: SiteLayout, serialize_writes: bool) -> Self {
        Self {
            root: root.into(),
            layout,
            write_locks: serialize_writes.then(DashMap::new),
        }
    }

    pub fn from_config(config: &SitesConfig) -> Self {
        let layout = SiteLayout {
            subdirectory: config.subdirectory.clone(),
            suffix: config.suffix.clone(),
        };
        Self::new(config.root.clone(), layout, config.serialize_writes)
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// Root-level files first, then files of the subdirectory with its prefix.
    ///
    /// A missing subdirectory contributes nothing.
    pub async fn list(&self) -> Result<Vec<String>, GatewayError> {
        let mut names = self.scan_dir(&self.root, None).await.map_err(|e| {
            GatewayError::io(format!("Cannot list {}", self.root.display()), e)
        })?;

        let subdir = self.root.join(&self.layout.subdirectory);
        match self.scan_dir(&subdir, Some(&self.layout.subdirectory)).await {
            Ok(mut nested) => names.append(&mut nested),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %subdir.display(), "Subdirectory absent, skipping");
            }
            Err(e) => {
                return Err(GatewayError::io(
                    format!("Cannot list {}", subdir.display()),
                    e,
                ))
            }
        }

        tracing::debug!(count = names.len(), "Listed config files");
        Ok(names)
    }

    /// Read the entire content of one file.
    pub async fn read(&self, raw_name: &str) -> Result<SiteFile, GatewayError> {
        let name = SiteName::parse(raw_name, &self.layout)?;
        let path = name.resolve(&self.root);

        let resolved = match fs::canonicalize(&path).await {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GatewayError::NotFound(name.to_string()))
            }
            Err(e) => return Err(GatewayError::io(format!("Cannot resolve {}", name), e)),
        };
        let root = self.canonical_root().await?;
        if !resolved.starts_with(&root) {
            return Err(outside_root(&name));
        }

        let content = match fs::read_to_string(&resolved).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GatewayError::NotFound(name.to_string()))
            }
            Err(e) => return Err(GatewayError::io(format!("Cannot read {}", name), e)),
        };

        tracing::debug!(name = %name, bytes = content.len(), "Read config file");
        Ok(SiteFile {
            name: name.to_string(),
            content,
        })
    }

    /// Overwrite (or create) one file with `content`.
    ///
    /// Last writer wins. With write serialization on, overlapping writes to
    /// the same name run one after the other instead of interleaving.
    pub async fn write(&self, raw_name: &str, content: &str) -> Result<SiteName, GatewayError> {
        let name = SiteName::parse(raw_name, &self.layout)?;
        let path = name.resolve(&self.root);
        let _lock = self.lock(&name).await;

        let root = self.canonical_root().await?;
        let parent = path.parent().unwrap_or(self.root.as_path());
        let parent = fs::canonicalize(parent)
            .await
            .map_err(|e| GatewayError::io(format!("Cannot resolve directory of {}", name), e))?;
        if !parent.starts_with(&root) {
            return Err(outside_root(&name));
        }

        match fs::symlink_metadata(&path).await {
            Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(&path).await {
                Ok(target) if target.starts_with(&root) => {}
                Ok(_) => return Err(outside_root(&name)),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(GatewayError::InvalidPath(format!(
                        "'{}' is a dangling symlink",
                        name
                    )))
                }
                Err(e) => return Err(GatewayError::io(format!("Cannot resolve {}", name), e)),
            },
            _ => {}
        }

        fs::write(&path, content)
            .await
            .map_err(|e| GatewayError::io(format!("Cannot write {}", name), e))?;

        tracing::info!(name = %name, bytes = content.len(), "Wrote config file");
        Ok(name)
    }

    async fn lock(&self, name: &SiteName) -> Option<WriteLock<'_>> {
        let locks = self.write_locks.as_ref()?;
        let lock = locks.entry(name.clone()).or_default().clone();
        Some(WriteLock {
            locks,
            name: name.clone(),
            guard: Some(lock.lock_owned().await),
        })
    }

    async fn canonical_root(&self) -> Result<PathBuf, GatewayError> {
        fs::canonicalize(&self.root)
            .await
            .map_err(|e| GatewayError::io(format!("Cannot resolve {}", self.root.display()), e))
    }

    async fn scan_dir(&self, dir: &Path, prefix: Option<&str>) -> std::io::Result<Vec<String>> {
        let mut entries = fs::read_dir(dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            if !self.layout.has_suffix(&file_name) {
                continue;
            }
            // Follows symlinks; dangling links and links to directories are skipped.
            match fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }
            names.push(match prefix {
                Some(prefix) => format!("{}/{}", prefix, file_name),
                None => file_name,
            });
        }

        Ok(names)
    }
}

/// Held for the duration of one write. The map entry is removed on drop
/// once no other writer holds or waits on it.
struct WriteLock<'a> {
    locks: &'a DashMap<SiteName, Arc<Mutex<()>>>,
    name: SiteName,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for WriteLock<'_> {
    fn drop(&mut self) {
        // The guard owns a reference to the mutex, so release it first.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.name, |_, lock| Arc::strong_count(lock) == 1);
    }
}

fn outside_root(name: &SiteName) -> GatewayError {
    GatewayError::InvalidPath(format!("'{}' resolves outside the config root", name))
}
