//! Mock contactless driver implementation for testing and development.
//!
//! This module provides a simulated driver whose tag presentations and
//! failures are scripted through a [`MockNfcHandle`]. Claim/release counters
//! are shared with the handle so tests can check that every claim was
//! released.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tapscan_core::{RawTag, TagTechnology};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::{HardwareError, NfcDriver, Result, types::DriverInfo};

/// Configuration for a mock driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockNfcConfig {
    /// Device name reported in driver info.
    pub name: String,

    /// Whether the simulated device has contactless hardware.
    pub supported: bool,

    /// When set, `start` fails with this message.
    pub start_error: Option<String>,

    /// When set, `is_supported` fails with this message.
    pub query_error: Option<String>,

    /// When true, `read_tag` never completes, as with a card held at the
    /// edge of the field. Only dropping the read ends it.
    pub hold_read: bool,
}

impl Default for MockNfcConfig {
    fn default() -> Self {
        Self {
            name: "Mock NFC Reader".to_string(),
            supported: true,
            start_error: None,
            query_error: None,
            hold_read: false,
        }
    }
}

impl MockNfcConfig {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn supported(mut self, supported: bool) -> Self {
        self.supported = supported;
        self
    }

    pub fn start_error(mut self, message: impl Into<String>) -> Self {
        self.start_error = Some(message.into());
        self
    }

    pub fn query_error(mut self, message: impl Into<String>) -> Self {
        self.query_error = Some(message.into());
        self
    }

    pub fn hold_read(mut self, hold: bool) -> Self {
        self.hold_read = hold;
        self
    }
}

/// Counters shared between a mock driver and its handle.
#[derive(Debug, Default)]
pub struct MockNfcStats {
    starts: AtomicUsize,
    claims: AtomicUsize,
    releases: AtomicUsize,
    claimed: AtomicBool,
}

impl MockNfcStats {
    /// Number of successful `start` calls.
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of successful claims.
    pub fn claims(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }

    /// Number of releases that ended an outstanding claim.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Whether a claim is currently outstanding.
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }
}

/// Mock contactless driver for testing and development.
///
/// # Examples
///
/// ```
/// use tapscan_core::{RawTag, TagTechnology};
/// use tapscan_hardware::mock::MockNfc;
/// use tapscan_hardware::traits::NfcDriver;
///
/// #[tokio::main]
/// async fn main() -> tapscan_hardware::Result<()> {
///     let (mut driver, handle) = MockNfc::new();
///     driver.start().await?;
///
///     handle
///         .present_tag(TagTechnology::Felica, RawTag::new().with_idm("0123456789AB"))
///         .await?;
///
///     driver.claim(&TagTechnology::DEFAULT_SET, "Hold your card").await?;
///     assert_eq!(driver.negotiate().await?, TagTechnology::Felica);
///     assert!(driver.read_tag().await?.is_some());
///     driver.release().await?;
///
///     assert_eq!(handle.stats().releases(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockNfc {
    /// Channel receiver for scripted tag events
    event_rx: mpsc::Receiver<TagEvent>,

    config: MockNfcConfig,

    started: bool,

    /// Technologies declared by the outstanding claim
    requested: Option<Vec<TagTechnology>>,

    /// Prompt passed with the last claim
    prompt: Option<String>,

    /// Payload of the negotiated tag, consumed by `read_tag`
    current_tag: Option<RawTag>,

    stats: Arc<MockNfcStats>,
}

impl MockNfc {
    /// Create a new mock driver with the default configuration.
    ///
    /// Returns a tuple of (MockNfc, MockNfcHandle) where the handle
    /// can be used to simulate tag presentations.
    pub fn new() -> (Self, MockNfcHandle) {
        Self::with_config(MockNfcConfig::default())
    }

    /// Create a new mock driver with a custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapscan_hardware::mock::{MockNfc, MockNfcConfig};
    ///
    /// let (driver, _handle) = MockNfc::with_config(MockNfcConfig::default().supported(false));
    /// ```
    pub fn with_config(config: MockNfcConfig) -> (Self, MockNfcHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let stats = Arc::new(MockNfcStats::default());

        let driver = Self {
            event_rx,
            config,
            started: false,
            requested: None,
            prompt: None,
            current_tag: None,
            stats: Arc::clone(&stats),
        };

        let handle = MockNfcHandle { event_tx, stats };

        (driver, handle)
    }

    /// Prompt passed with the most recent claim.
    pub fn last_prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl NfcDriver for MockNfc {
    fn is_present(&self) -> bool {
        true
    }

    async fn is_supported(&self) -> Result<bool> {
        match &self.config.query_error {
            Some(message) => Err(HardwareError::communication(message.clone())),
            None => Ok(self.config.supported),
        }
    }

    async fn start(&mut self) -> Result<()> {
        if let Some(message) = &self.config.start_error {
            return Err(HardwareError::initialization_failed(message.clone()));
        }

        self.started = true;
        self.stats.starts.fetch_add(1, Ordering::SeqCst);
        debug!(name = %self.config.name, "Mock NFC manager started");
        Ok(())
    }

    async fn claim(&mut self, technologies: &[TagTechnology], prompt: &str) -> Result<()> {
        if !self.started {
            return Err(HardwareError::other("NFC manager not started"));
        }

        if self.requested.is_some() {
            return Err(HardwareError::busy("technology request already pending"));
        }

        self.requested = Some(technologies.to_vec());
        self.prompt = Some(prompt.to_string());
        self.stats.claimed.store(true, Ordering::SeqCst);
        self.stats.claims.fetch_add(1, Ordering::SeqCst);
        trace!(?technologies, "Mock NFC claimed");
        Ok(())
    }

    async fn negotiate(&mut self) -> Result<TagTechnology> {
        if self.requested.is_none() {
            return Err(HardwareError::other("no technology request pending"));
        }

        let event = self
            .event_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("NFC event channel closed"))?;

        match event {
            TagEvent::Presented { technology, tag } => {
                let accepted = self
                    .requested
                    .as_ref()
                    .is_some_and(|requested| requested.contains(&technology));

                if !accepted {
                    return Err(HardwareError::technology_mismatch(format!(
                        "presented {}",
                        technology
                    )));
                }

                self.current_tag = tag;
                Ok(technology)
            }
            TagEvent::Failure(error) => Err(error),
        }
    }

    async fn read_tag(&mut self) -> Result<Option<RawTag>> {
        if self.config.hold_read {
            trace!("Mock NFC holding read");
            std::future::pending::<()>().await;
        }

        Ok(self.current_tag.take())
    }

    async fn release(&mut self) -> Result<()> {
        self.current_tag = None;

        if self.requested.take().is_some() {
            self.stats.claimed.store(false, Ordering::SeqCst);
            self.stats.releases.fetch_add(1, Ordering::SeqCst);
            trace!("Mock NFC released");
        }

        Ok(())
    }

    async fn get_driver_info(&self) -> Result<DriverInfo> {
        Ok(
            DriverInfo::new(self.config.name.clone(), TagTechnology::DEFAULT_SET.to_vec())
                .with_platform("mock"),
        )
    }
}

/// Internal event type for the mock driver.
#[derive(Debug)]
enum TagEvent {
    Presented {
        technology: TagTechnology,
        tag: Option<RawTag>,
    },
    Failure(HardwareError),
}

/// Handle for scripting a mock driver.
///
/// Events are queued: a tag presented before the session starts negotiating
/// is picked up by the next `negotiate` call.
#[derive(Debug, Clone)]
pub struct MockNfcHandle {
    event_tx: mpsc::Sender<TagEvent>,
    stats: Arc<MockNfcStats>,
}

impl MockNfcHandle {
    /// Present a readable tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver has been dropped.
    pub async fn present_tag(&self, technology: TagTechnology, tag: RawTag) -> Result<()> {
        self.send(TagEvent::Presented {
            technology,
            tag: Some(tag),
        })
        .await
    }

    /// Present a tag that negotiates but exposes no readable data.
    pub async fn present_unreadable(&self, technology: TagTechnology) -> Result<()> {
        self.send(TagEvent::Presented {
            technology,
            tag: None,
        })
        .await
    }

    /// Make the next negotiation fail with `error`.
    pub async fn fail_next(&self, error: HardwareError) -> Result<()> {
        self.send(TagEvent::Failure(error)).await
    }

    /// Shared counters.
    pub fn stats(&self) -> &MockNfcStats {
        &self.stats
    }

    async fn send(&self, event: TagEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| HardwareError::disconnected("NFC event channel closed"))
    }
}
