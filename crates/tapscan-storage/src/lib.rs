//! Local persistence for the tapscan app.
//!
//! Two independent stores:
//!
//! - [`NoteBook`] - plain notes kept as one JSON list in a SQLite
//!   `key_value` table
//! - [`SecureSlot`] - a single secret note in a platform [`SecretVault`],
//!   revealed only after an [`Authenticator`] succeeds
//!
//! # Examples
//!
//! ```no_run
//! use tapscan_storage::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open("tapscan.db").await?;
//! let notes = db.note_book();
//!
//! notes.add("Top up transit card").await?;
//! for note in notes.list().await? {
//!     println!("{} {}", note.created_at, note.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod error;
pub mod kv;
pub mod mock;
pub mod notes;
pub mod secure;

pub use database::Database;
pub use error::{StorageError, StorageResult};
pub use kv::{KeyValueStore, SqliteKeyValueStore};
pub use notes::{NOTES_KEY, Note, NoteBook};
pub use secure::{Authenticator, SECURE_SLOT_KEY, SecretVault, SecureSlot};
