//! Tracked state persistence
//!
//! Manages the `.terrakube/state.json` file in which a host without its own
//! state backend keeps one state object per resource instance.

use crate::error::{ProviderError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".terrakube";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const STATE_STAGING: &str = "state.json.tmp";
const LOCK_FILE: &str = "lock.json";

/// A lock older than this is assumed to belong to a crashed process
const LOCK_TTL_HOURS: i64 = 1;

/// Resource address: `<type>.<name>`
pub fn address(type_name: &str, name: &str) -> String {
    format!("{}.{}", type_name, name)
}

/// All tracked resources of one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Resources indexed by address
    pub resources: BTreeMap<String, TrackedResource>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resources: BTreeMap::new(),
        }
    }
}

impl StateFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &str) -> Option<&TrackedResource> {
        self.resources.get(address)
    }

    /// Record the state returned by the provider, keeping `created_at` of
    /// an existing entry
    pub fn set(&mut self, address: impl Into<String>, resource_type: &str, state: Value) {
        let now = Utc::now();
        let address = address.into();
        match self.resources.get_mut(&address) {
            Some(existing) => {
                existing.state = state;
                existing.updated_at = now;
            }
            None => {
                self.resources.insert(
                    address,
                    TrackedResource {
                        resource_type: resource_type.to_string(),
                        state,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        self.updated_at = now;
    }

    pub fn remove(&mut self, address: &str) -> Option<TrackedResource> {
        let result = self.resources.remove(address);
        if result.is_some() {
            self.updated_at = Utc::now();
        }
        result
    }

    /// Resources of one type
    pub fn by_type(&self, resource_type: &str) -> Vec<(&String, &TrackedResource)> {
        self.resources
            .iter()
            .filter(|(_, r)| r.resource_type == resource_type)
            .collect()
    }
}

/// Tracked state of a single resource instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedResource {
    /// Resource type, e.g. `terrakube_team`
    pub resource_type: String,

    /// State object as returned by the provider
    pub state: Value,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl TrackedResource {
    /// Server-assigned id, if known
    pub fn id(&self) -> Option<&str> {
        self.state.get("id").and_then(Value::as_str)
    }
}

/// Owns the `.terrakube` directory of one project
pub struct StateManager {
    dir: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            dir: project_root.as_ref().join(STATE_DIR),
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Load the current state. Only a missing file counts as empty state;
    /// an unreadable or corrupt one is an error.
    pub async fn load(&self) -> Result<StateFile> {
        let path = self.file(STATE_FILE);
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No state file yet");
                return Ok(StateFile::new());
            }
            Err(e) => return Err(e.into()),
        };

        let state: StateFile = serde_json::from_slice(&content).map_err(|e| {
            ProviderError::StateFile(format!("{} is not valid state: {}", path.display(), e))
        })?;
        if state.version > STATE_VERSION {
            return Err(ProviderError::StateFile(format!(
                "state version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!(resources = state.resources.len(), "Loaded state");
        Ok(state)
    }

    /// Replace the state file atomically.
    ///
    /// The new content is staged next to the state file and renamed over it,
    /// so a failed write leaves the previous state in place. The previous
    /// file is copied to `state.json.backup` first.
    pub async fn save(&self, state: &StateFile) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let content = serde_json::to_vec_pretty(state)?;
        let current = self.file(STATE_FILE);
        let staged = self.file(STATE_STAGING);

        if let Err(e) = fs::write(&staged, &content).await {
            if let Err(cleanup) = fs::remove_file(&staged).await {
                tracing::debug!(error = %cleanup, "Staged state not removed");
            }
            return Err(e.into());
        }

        if fs::try_exists(&current).await? {
            fs::copy(&current, self.file(STATE_BACKUP)).await?;
        }
        fs::rename(&staged, &current).await?;

        tracing::debug!(resources = state.resources.len(), "Saved state");
        Ok(())
    }

    /// Take the project lock.
    ///
    /// The lock file is created with `create_new`, so only one process can
    /// win. A lock past its TTL is removed and the attempt repeated once.
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.file(LOCK_FILE);
        let holder = LockHolder::current();

        for _ in 0..2 {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    // Dropping the guard on a failed write removes the file again
                    let lock = StateLock { path: Some(path) };
                    file.write_all(&serde_json::to_vec(&holder)?).await?;
                    file.flush().await?;
                    tracing::debug!(holder = %holder.holder, "Acquired state lock");
                    return Ok(lock);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    match LockHolder::read(&path).await {
                        Some(existing) if existing.is_stale() => {
                            tracing::warn!(
                                holder = %existing.holder,
                                since = %existing.acquired_at,
                                "Removing stale state lock"
                            );
                            match fs::remove_file(&path).await {
                                Ok(()) => {}
                                Err(e) if e.kind() == ErrorKind::NotFound => {}
                                Err(e) => return Err(e.into()),
                            }
                        }
                        Some(existing) => {
                            return Err(ProviderError::Lock(format!(
                                "state is locked by {} (pid {}) since {}",
                                existing.holder, existing.pid, existing.acquired_at
                            )));
                        }
                        // Being written by its owner, or unreadable: held either way
                        None => {
                            return Err(ProviderError::Lock(format!(
                                "state is locked ({} exists)",
                                path.display()
                            )));
                        }
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ProviderError::Lock(
            "another process took the lock after a stale one was removed".to_string(),
        ))
    }
}

/// Contents of `lock.json`
#[derive(Debug, Serialize, Deserialize)]
struct LockHolder {
    holder: String,
    pid: u32,
    acquired_at: DateTime<Utc>,
}

impl LockHolder {
    fn current() -> Self {
        Self {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
            acquired_at: Utc::now(),
        }
    }

    async fn read(path: &Path) -> Option<Self> {
        let content = fs::read(path).await.ok()?;
        serde_json::from_slice(&content).ok()
    }

    fn is_stale(&self) -> bool {
        Utc::now().signed_duration_since(self.acquired_at) >= TimeDelta::hours(LOCK_TTL_HOURS)
    }
}

/// Held project lock; the lock file is removed on `release` or drop
pub struct StateLock {
    path: Option<PathBuf>,
}

impl StateLock {
    pub async fn release(mut self) -> Result<()> {
        if let Some(path) = self.path.take() {
            match fs::remove_file(&path).await {
                Ok(()) => tracing::debug!("Released state lock"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
