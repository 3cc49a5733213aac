use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessError {
  #[error("Disclosure text is empty")]
  EmptyDisclosure,

  #[error("Failed to create session: {status} {reason}")]
  SessionCreation { status: u16, reason: String },

  #[error("Failed to get session status: {status}")]
  SessionStatus { status: u16 },

  #[error("Failed to assess patent: {message}")]
  Transport { message: String },

  #[error("Assessment timed out after {attempts} poll attempts")]
  TimedOut { attempts: u32 },

  #[error("Invalid client configuration: {message}")]
  InvalidConfig { message: String },
}

impl AssessError {
  pub fn session_creation(status: reqwest::StatusCode) -> Self {
    Self::SessionCreation {
      status: status.as_u16(),
      reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
  }

  pub fn session_status(status: reqwest::StatusCode) -> Self {
    Self::SessionStatus { status: status.as_u16() }
  }

  pub fn transport(message: impl Into<String>) -> Self {
    Self::Transport { message: message.into() }
  }

  pub fn invalid_config(message: impl Into<String>) -> Self {
    Self::InvalidConfig { message: message.into() }
  }
}

impl From<reqwest::Error> for AssessError {
  fn from(err: reqwest::Error) -> Self {
    Self::transport(err.to_string())
  }
}

impl From<serde_json::Error> for AssessError {
  fn from(err: serde_json::Error) -> Self {
    Self::transport(format!("invalid JSON response: {err}"))
  }
}

pub type Result<T> = std::result::Result<T, AssessError>;
