//! Mock driver implementations for testing and development.
//!
//! This module provides a simulated contactless driver that can be
//! controlled programmatically without requiring physical hardware.

pub mod nfc;

pub use nfc::{MockNfc, MockNfcConfig, MockNfcHandle, MockNfcStats};
