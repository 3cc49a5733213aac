use clap::ValueEnum;
use std::time::Duration;
use url::Url;

use crate::error::{AssessError, Result};
use crate::model::DEFAULT_USER_ID;

pub const DEFAULT_API_URL: &str = "https://craftpatent-176187988301.us-central1.run.app";
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What a submission does when the poll budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeoutPolicy {
  /// Fail with a timeout error.
  #[default]
  Error,
  /// Return the canned demonstration assessment.
  Fallback,
}

/// Configuration for the assessment client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the assessment service, without trailing slash
  pub base_url: String,
  /// User the sessions are created under
  pub user_id: String,
  /// Per-request timeout in seconds
  pub timeout_secs: u64,
  pub max_poll_attempts: u32,
  /// Wait before each poll attempt
  pub poll_interval: Duration,
  pub on_timeout: TimeoutPolicy,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_API_URL.to_string(),
      user_id: DEFAULT_USER_ID.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
      poll_interval: DEFAULT_POLL_INTERVAL,
      on_timeout: TimeoutPolicy::default(),
    }
  }
}

impl ClientConfig {
  /// Defaults overridden by `CRAFTPATENT_API_URL`, `CRAFTPATENT_USER` and
  /// `CRAFTPATENT_TIMEOUT_SECS`.
  pub fn from_env() -> Self {
    let defaults = Self::default();

    let base_url = std::env::var("CRAFTPATENT_API_URL").unwrap_or(defaults.base_url);
    let user_id = std::env::var("CRAFTPATENT_USER").unwrap_or(defaults.user_id);
    let timeout_secs = std::env::var("CRAFTPATENT_TIMEOUT_SECS")
      .ok()
      .and_then(|v| v.parse().ok())
      .unwrap_or(defaults.timeout_secs);

    Self { base_url, user_id, timeout_secs, ..defaults }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  pub fn with_poll(mut self, max_attempts: u32, interval: Duration) -> Self {
    self.max_poll_attempts = max_attempts;
    self.poll_interval = interval;
    self
  }

  pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
    self.on_timeout = policy;
    self
  }

  /// Check the base URL and normalize it to have no trailing slash.
  pub fn validated(mut self) -> Result<Self> {
    let parsed = Url::parse(self.base_url.trim())
      .map_err(|e| AssessError::invalid_config(format!("base URL '{}': {e}", self.base_url)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(AssessError::invalid_config(format!(
        "base URL must be http or https, got '{}'",
        parsed.scheme()
      )));
    }
    if self.user_id.trim().is_empty() {
      return Err(AssessError::invalid_config("user id must not be empty"));
    }

    self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
    Ok(self)
  }

  /// Total time the poll loop spends sleeping before giving up.
  ///
  /// Request time is not included: each of the `max_poll_attempts + 1`
  /// requests may take up to `timeout_secs` on top of this.
  pub fn poll_budget(&self) -> Duration {
    self.poll_interval * self.max_poll_attempts
  }

  /// Upper bound on one submission's wall-clock time, counting the session
  /// creation request and every poll request running into its timeout.
  pub fn worst_case_duration(&self) -> Duration {
    let requests = self.max_poll_attempts.saturating_add(1);
    self.poll_budget() + Duration::from_secs(self.timeout_secs) * requests
  }
}
