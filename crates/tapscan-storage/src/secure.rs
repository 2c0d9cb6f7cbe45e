//! Authenticated single-slot secret storage.

#![allow(async_fn_in_trait)]

use chrono::Local;
use tracing::{info, warn};

use crate::error::{StorageError, StorageResult};

/// Vault key of the secure note.
pub const SECURE_SLOT_KEY: &str = "secure_memo";

/// Prompt passed to the authenticator on unlock.
pub const UNLOCK_PROMPT: &str = "Authenticate to view the secure note";

/// Platform secret store.
pub trait SecretVault: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn delete(&self, key: &str) -> StorageResult<()>;
}

/// User authentication gate (biometrics, device passcode).
pub trait Authenticator: Send + Sync {
    /// Prompt the user.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AuthenticationFailed`] when the user is not
    /// authenticated.
    async fn authenticate(&self, prompt: &str) -> StorageResult<()>;
}

/// One secret note behind an authenticator.
///
/// The vault is only read after a successful [`unlock`](Self::unlock).
/// Writing and deleting require the slot to be unlocked.
#[derive(Debug)]
pub struct SecureSlot<V: SecretVault, A: Authenticator> {
    vault: V,
    authenticator: A,
    unlocked: bool,
    value: Option<String>,
}

impl<V: SecretVault, A: Authenticator> SecureSlot<V, A> {
    pub fn new(vault: V, authenticator: A) -> Self {
        Self {
            vault,
            authenticator,
            unlocked: false,
            value: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Revealed value; always `None` while locked.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Authenticate, then load the stored value.
    ///
    /// On failure the slot stays locked and the vault is not touched.
    pub async fn unlock(&mut self) -> StorageResult<Option<&str>> {
        if let Err(e) = self.authenticator.authenticate(UNLOCK_PROMPT).await {
            warn!(error = %e, "Secure slot unlock refused");
            return Err(e);
        }

        self.value = self.vault.get(SECURE_SLOT_KEY).await?;
        self.unlocked = true;
        info!(has_value = self.value.is_some(), "Secure slot unlocked");
        Ok(self.value.as_deref())
    }

    /// Store the trimmed `text` stamped with the local save time.
    pub async fn save(&mut self, text: &str) -> StorageResult<&str> {
        self.ensure_unlocked()?;

        let text = text.trim();
        if text.is_empty() {
            return Err(StorageError::Validation(
                "secure note must not be empty".to_string(),
            ));
        }

        let stamped = format!(
            "{}\nSaved at: {}",
            text,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        self.vault.set(SECURE_SLOT_KEY, &stamped).await?;
        info!("Secure note saved");

        Ok(self.value.insert(stamped).as_str())
    }

    /// Clear the slot.
    pub async fn delete(&mut self) -> StorageResult<()> {
        self.ensure_unlocked()?;

        self.vault.delete(SECURE_SLOT_KEY).await?;
        self.value = None;
        info!("Secure note deleted");
        Ok(())
    }

    /// Hide the value again. The stored secret is kept.
    pub fn lock(&mut self) {
        self.unlocked = false;
        self.value = None;
    }

    fn ensure_unlocked(&self) -> StorageResult<()> {
        if self.unlocked {
            Ok(())
        } else {
            Err(StorageError::Locked)
        }
    }
}
