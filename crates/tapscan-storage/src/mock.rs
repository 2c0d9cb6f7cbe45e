//! In-memory vault and scripted authenticator for tests and demos.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{StorageError, StorageResult};
use crate::secure::{Authenticator, SecretVault};

/// Process-local [`SecretVault`]. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    entries: Arc<Mutex<HashMap<String, String>>>,
    reads: Arc<AtomicUsize>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let vault = Self::new();
        vault.lock().insert(key.into(), value.into());
        vault
    }

    /// Inspect an entry without counting a read.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Number of `get` calls served.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SecretVault for MemoryVault {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// [`Authenticator`] that replays queued outcomes.
///
/// Once the script runs out, every prompt gets the fallback outcome.
#[derive(Debug, Clone)]
pub struct ScriptedAuthenticator {
    script: Arc<Mutex<VecDeque<bool>>>,
    fallback: bool,
    prompts: Arc<AtomicUsize>,
}

impl ScriptedAuthenticator {
    /// Always authenticates.
    pub fn allow() -> Self {
        Self::with_fallback(true)
    }

    /// Never authenticates.
    pub fn deny() -> Self {
        Self::with_fallback(false)
    }

    fn with_fallback(fallback: bool) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            prompts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue an outcome to be used before the fallback.
    pub fn then(self, outcome: bool) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
        self
    }

    /// Number of prompts shown.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Authenticator for ScriptedAuthenticator {
    async fn authenticate(&self, _prompt: &str) -> StorageResult<()> {
        self.prompts.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(self.fallback);

        if outcome {
            Ok(())
        } else {
            Err(StorageError::AuthenticationFailed(
                "user was not authenticated".to_string(),
            ))
        }
    }
}
