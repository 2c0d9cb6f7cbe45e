//! Session configuration.

use std::time::Duration;

use tapscan_core::TagTechnology;

/// Default wait for a card to be presented.
///
/// Matches the system reader sheet lifetime on common mobile platforms.
pub const DEFAULT_PRESENTATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default prompt shown while awaiting presentation.
pub const DEFAULT_PROMPT: &str = "Hold your card near the top of the device";

/// Configuration for scan sessions.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tapscan_core::TagTechnology;
/// use tapscan_session::SessionConfig;
///
/// let config = SessionConfig::default()
///     .technologies(vec![TagTechnology::Felica])
///     .presentation_timeout(Some(Duration::from_secs(10)));
///
/// assert_eq!(config.technologies, vec![TagTechnology::Felica]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Technologies declared with each claim; the first that negotiates wins.
    pub technologies: Vec<TagTechnology>,

    /// Prompt handed to the driver while awaiting presentation.
    pub prompt: String,

    /// Upper bound on the wait for a card. `None` waits indefinitely.
    pub presentation_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            technologies: TagTechnology::DEFAULT_SET.to_vec(),
            prompt: DEFAULT_PROMPT.to_string(),
            presentation_timeout: Some(DEFAULT_PRESENTATION_TIMEOUT),
        }
    }
}

impl SessionConfig {
    pub fn technologies(mut self, technologies: Vec<TagTechnology>) -> Self {
        self.technologies = technologies;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn presentation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.presentation_timeout = timeout;
        self
    }
}
