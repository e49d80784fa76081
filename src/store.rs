use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use crate::StoreError;

/// Name of the flag every fresh service starts with.
pub const WELCOME_MESSAGE: &str = "welcomeMessage";

/// Backing storage for feature flags.
///
/// Implementations must make each operation atomic with respect to the
/// mapping: `create` checks for the key and inserts it under one guard, and
/// likewise for `set` and `delete`.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Snapshot of every flag, ordered by name.
    async fn get_all(&self) -> BTreeMap<String, bool>;
    async fn get(&self, name: &str) -> Result<bool, StoreError>;
    /// Update an existing flag. Never creates one.
    async fn set(&self, name: &str, enabled: bool) -> Result<(), StoreError>;
    /// Insert a new flag. Never overwrites one.
    async fn create(&self, name: &str, enabled: bool) -> Result<(), StoreError>;
    async fn delete(&self, name: &str) -> Result<(), StoreError>;
}

pub struct MemoryStore {
    flags: RwLock<HashMap<String, bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            flags: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_flags<I, N>(flags: I) -> Self
    where
        I: IntoIterator<Item = (N, bool)>,
        N: Into<String>,
    {
        Self {
            flags: RwLock::new(
                flags
                    .into_iter()
                    .map(|(name, enabled)| (name.into(), enabled))
                    .collect(),
            ),
        }
    }

    /// Store holding only `welcomeMessage: true`.
    pub fn seeded() -> Self {
        Self::with_flags([(WELCOME_MESSAGE, true)])
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl FlagStore for MemoryStore {
    async fn get_all(&self) -> BTreeMap<String, bool> {
        let flags = self.flags.read().await;
        flags
            .iter()
            .map(|(name, enabled)| (name.clone(), *enabled))
            .collect()
    }

    async fn get(&self, name: &str) -> Result<bool, StoreError> {
        let flags = self.flags.read().await;
        flags
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn set(&self, name: &str, enabled: bool) -> Result<(), StoreError> {
        let mut flags = self.flags.write().await;
        match flags.get_mut(name) {
            Some(value) => {
                *value = enabled;
                debug!("Flag {} set to {}", name, enabled);
                Ok(())
            }
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    async fn create(&self, name: &str, enabled: bool) -> Result<(), StoreError> {
        let mut flags = self.flags.write().await;
        // Key presence decides the conflict, so a flag holding `false` still exists.
        if flags.contains_key(name) {
            return Err(StoreError::Conflict(name.to_string()));
        }
        flags.insert(name.to_string(), enabled);
        debug!("Flag {} created with value {}", name, enabled);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut flags = self.flags.write().await;
        match flags.remove(name) {
            Some(_) => {
                debug!("Flag {} deleted", name);
                Ok(())
            }
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }
}
