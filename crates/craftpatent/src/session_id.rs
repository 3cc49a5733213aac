use chrono::Utc;
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;

/// Source of session identifiers, injected into the client at construction.
pub trait SessionIdSource: Send + Sync {
  fn next_id(&self) -> String;
}

/// `session_<unix millis>_<9 random chars>`; unique enough within one process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampSessionIds;

impl SessionIdSource for TimestampSessionIds {
  fn next_id(&self) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(SUFFIX_LEN).collect();
    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
  }
}

/// Always hands out the same identifier. Useful when the caller owns the id.
#[derive(Debug, Clone)]
pub struct FixedSessionId(pub String);

impl SessionIdSource for FixedSessionId {
  fn next_id(&self) -> String {
    self.0.clone()
  }
}
