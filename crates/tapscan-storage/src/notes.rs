//! Plain note storage.
//!
//! All notes live under a single key as one JSON array, newest first.
//! Every mutation rewrites the whole array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::kv::KeyValueStore;

/// Key holding the serialized note list.
pub const NOTES_KEY: &str = "@memos";

/// A single plain note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Ordered note list over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct NoteBook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NoteBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All notes, newest first. A missing key is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the stored value is not a
    /// valid note list.
    pub async fn list(&self) -> StorageResult<Vec<Note>> {
        match self.store.get(NOTES_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Prepend a note with the trimmed `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Validation`] if `text` is blank.
    pub async fn add(&self, text: &str) -> StorageResult<Note> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StorageError::Validation(
                "note text must not be empty".to_string(),
            ));
        }

        let note = Note::new(text);
        let mut notes = self.list().await?;
        notes.insert(0, note.clone());
        self.write(&notes).await?;

        info!(id = %note.id, total = notes.len(), "Note added");
        Ok(note)
    }

    /// Remove the note with `id`. Returns whether a note was removed.
    pub async fn delete(&self, id: &str) -> StorageResult<bool> {
        let mut notes = self.list().await?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        self.write(&notes).await?;

        let removed = notes.len() != before;
        debug!(id, removed, "Note delete");
        Ok(removed)
    }

    async fn write(&self, notes: &[Note]) -> StorageResult<()> {
        let json = serde_json::to_string(notes)?;
        self.store.set(NOTES_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::kv::SqliteKeyValueStore;
    use rstest::rstest;

    async fn notebook() -> NoteBook<SqliteKeyValueStore> {
        Database::in_memory().await.unwrap().note_book()
    }

    #[tokio::test]
    async fn test_empty_list() {
        let book = notebook().await;
        assert!(book.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_trims_and_prepends() {
        let book = notebook().await;

        book.add("first").await.unwrap();
        let second = book.add("  second  ").await.unwrap();

        assert_eq!(second.text, "second");
        let texts: Vec<_> = book
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|note| note.text)
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    #[tokio::test]
    async fn test_add_rejects_blank(#[case] text: &str) {
        let book = notebook().await;

        let err = book.add(text).await.unwrap_err();

        assert!(matches!(err, StorageError::Validation(_)));
        assert!(book.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_filters_by_id() {
        let book = notebook().await;
        let keep = book.add("keep").await.unwrap();
        let drop = book.add("drop").await.unwrap();

        assert!(book.delete(&drop.id).await.unwrap());
        assert!(!book.delete(&drop.id).await.unwrap());

        assert_eq!(book.list().await.unwrap(), vec![keep]);
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let note = Note::new("hello");
        let json = serde_json::to_value(&note).unwrap();

        assert!(json.get("createdAt").is_some());
        assert_eq!(json["text"], "hello");
    }
}
