//! Scan session management.
//!
//! This crate turns a raw [`NfcDriver`](tapscan_hardware::NfcDriver) into a
//! safe, single-owner scanning service:
//!
//! - [`probe`](probe::probe) resolves the reader capability once per process
//! - [`SessionManager`] runs one scan at a time through an explicit
//!   [`SessionStateMachine`] and converts every hardware failure into a
//!   classified [`ScanError`](tapscan_core::ScanError)
//! - [`HardwareClaim`] guarantees the hardware is released on every exit
//!   path, including a dropped scan future
//! - [`ScanScreen`] holds the presentation state a UI renders
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tapscan_core::{RawTag, TagTechnology};
//! use tapscan_hardware::mock::MockNfc;
//! use tapscan_session::{ScanScreen, SessionConfig, SessionManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (driver, handle) = MockNfc::new();
//!     let manager = Arc::new(SessionManager::new(driver, SessionConfig::default()));
//!     let screen = ScanScreen::new(Arc::clone(&manager));
//!     screen.mount().await;
//!
//!     handle
//!         .present_tag(TagTechnology::Felica, RawTag::new().with_idm("0123456789AB"))
//!         .await
//!         .unwrap();
//!     screen.start_scan().await.unwrap();
//!
//!     assert_eq!(
//!         screen.state().reading.unwrap().manufacturer_id(),
//!         "0123456789AB"
//!     );
//! }
//! ```

pub mod claim;
pub mod config;
pub mod error;
pub mod manager;
pub mod probe;
pub mod screen;
pub mod state_machine;

pub use claim::HardwareClaim;
pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use manager::SessionManager;
pub use probe::ProbeReport;
pub use screen::{ScanScreen, ScreenState};
pub use state_machine::{SessionState, SessionStateMachine, StateTransition};
