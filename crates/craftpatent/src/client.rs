//! HTTP client for the CraftPatent assessment service
//!
//! A submission runs three phases in order: create a session, poll it until a
//! terminal assessment shows up or the attempt budget is spent, then normalize
//! the payload. Polls that come back with a non-success status are treated as
//! "not ready yet". Transport failures anywhere are fatal and surface as
//! [`AssessError::Transport`].

use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{ClientConfig, TimeoutPolicy};
use crate::error::{AssessError, Result};
use crate::model::{AssessmentRequest, AssessmentResult, Disclosure, ProcessingState};
use crate::payload::extract_terminal;
use crate::session_id::{SessionIdSource, TimestampSessionIds};

const APP_NAME: &str = "coordinator_agent";

const STEP_INITIALIZING: &str = "Initializing analysis...";
const STEP_ASSESSING: &str = "Running quality assessment...";
const PROGRESS_CREATING: u8 = 10;
const PROGRESS_POLL_START: u8 = 30;
const PROGRESS_POLL_END: u8 = 95;

/// Client for one assessment service deployment
pub struct AssessmentClient {
  http: Client,
  config: ClientConfig,
  session_ids: Box<dyn SessionIdSource>,
}

impl AssessmentClient {
  /// Create a client that generates timestamp-based session ids
  pub fn new(config: ClientConfig) -> Result<Self> {
    Self::with_session_ids(config, Box::new(TimestampSessionIds))
  }

  /// Create a client with an injected session id source
  pub fn with_session_ids(
    config: ClientConfig,
    session_ids: Box<dyn SessionIdSource>,
  ) -> Result<Self> {
    let config = config.validated()?;
    let http = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| AssessError::invalid_config(format!("failed to create HTTP client: {e}")))?;

    Ok(Self { http, config, session_ids })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  fn sessions_url(&self, session_id: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(&self.config.base_url)
      .map_err(|e| AssessError::invalid_config(format!("base URL: {e}")))?;
    {
      let mut segments = url
        .path_segments_mut()
        .map_err(|_| AssessError::invalid_config("base URL cannot carry a path"))?;
      segments.pop_if_empty().extend([
        "apps",
        APP_NAME,
        "users",
        self.config.user_id.as_str(),
        "sessions",
      ]);
      if let Some(id) = session_id {
        segments.push(id);
      }
    }
    Ok(url)
  }

  /// Create an analysis session. Returns the raw session descriptor.
  pub async fn create_session(&self, request: &AssessmentRequest) -> Result<Value> {
    let url = self.sessions_url(None)?;
    debug!(%url, session_id = %request.session_id, "creating session");

    let response = self.http.post(url).json(request).send().await?;
    if !response.status().is_success() {
      return Err(AssessError::session_creation(response.status()));
    }

    let descriptor = read_json(response).await?;
    info!(session_id = %request.session_id, "session created");
    Ok(descriptor)
  }

  /// Fetch the raw state of a session. Non-success statuses are errors.
  pub async fn fetch_session_status(&self, session_id: &str) -> Result<Value> {
    let response = self.http.get(self.sessions_url(Some(session_id))?).send().await?;
    if !response.status().is_success() {
      return Err(AssessError::session_status(response.status()));
    }
    read_json(response).await
  }

  /// Submit a disclosure and wait for its assessment
  pub async fn submit(&self, disclosure: &Disclosure) -> Result<AssessmentResult> {
    let (progress, _observer) = watch::channel(ProcessingState::idle());
    self.submit_with_progress(disclosure, &progress).await
  }

  /// Like [`submit`](Self::submit), publishing progress into `progress` as it goes.
  pub async fn submit_with_progress(
    &self,
    disclosure: &Disclosure,
    progress: &watch::Sender<ProcessingState>,
  ) -> Result<AssessmentResult> {
    match self.run(disclosure, progress).await {
      Ok(result) => {
        progress.send_replace(ProcessingState::completed());
        Ok(result)
      }
      Err(e) => {
        warn!(error = %e, "assessment failed");
        progress.send_replace(ProcessingState::error());
        Err(e)
      }
    }
  }

  async fn run(
    &self,
    disclosure: &Disclosure,
    progress: &watch::Sender<ProcessingState>,
  ) -> Result<AssessmentResult> {
    let session_id = self.session_ids.next_id();
    let user_id = Some(self.config.user_id.as_str());
    let request = AssessmentRequest::new(disclosure, session_id, user_id);

    progress.send_replace(ProcessingState::processing(STEP_INITIALIZING, PROGRESS_CREATING));
    let descriptor = self.create_session(&request).await?;

    if let Some(result) = extract_terminal(&descriptor) {
      info!(session_id = %request.session_id, "session creation returned a finished assessment");
      return Ok(result);
    }

    debug!(
      budget = ?self.config.poll_budget(),
      worst_case = ?self.config.worst_case_duration(),
      "polling session"
    );
    if let Some(result) = self.poll(&request.session_id, progress).await? {
      return Ok(result);
    }

    let attempts = self.config.max_poll_attempts;
    match self.config.on_timeout {
      TimeoutPolicy::Error => Err(AssessError::TimedOut { attempts }),
      TimeoutPolicy::Fallback => {
        warn!(attempts, "assessment timed out, returning demonstration assessment");
        Ok(AssessmentResult::demo())
      }
    }
  }

  /// Poll until a terminal assessment appears. `None` means the budget ran out.
  async fn poll(
    &self,
    session_id: &str,
    progress: &watch::Sender<ProcessingState>,
  ) -> Result<Option<AssessmentResult>> {
    let max_attempts = self.config.max_poll_attempts;

    for attempt in 1..=max_attempts {
      sleep(self.config.poll_interval).await;
      let percent = poll_progress(attempt, max_attempts);
      progress.send_replace(ProcessingState::processing(STEP_ASSESSING, percent));

      let response = self.http.get(self.sessions_url(Some(session_id))?).send().await?;
      let status = response.status();
      if !status.is_success() {
        debug!(attempt, %status, "poll attempt returned non-success status");
        continue;
      }

      let payload = read_json(response).await?;
      debug!(attempt, %payload, "poll attempt");

      if let Some(result) = extract_terminal(&payload) {
        info!(attempt, "assessment ready");
        return Ok(Some(result));
      }
    }

    Ok(None)
  }
}

async fn read_json(response: Response) -> Result<Value> {
  let body = response.text().await?;
  Ok(serde_json::from_str(&body)?)
}

fn poll_progress(attempt: u32, max_attempts: u32) -> u8 {
  if max_attempts == 0 {
    return PROGRESS_POLL_END;
  }
  let span = u32::from(PROGRESS_POLL_END - PROGRESS_POLL_START);
  let step = span * attempt.min(max_attempts) / max_attempts;
  PROGRESS_POLL_START + step as u8
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::session_id::FixedSessionId;
  use mockito::{Matcher, Server};
  use serde_json::json;

  const SESSIONS_PATH: &str = "/apps/coordinator_agent/users/user/sessions";
  const SESSION_PATH: &str = "/apps/coordinator_agent/users/user/sessions/session_test";

  fn client_for(server: &Server, attempts: u32, policy: TimeoutPolicy) -> AssessmentClient {
    let config = ClientConfig::default()
      .with_base_url(server.url())
      .with_poll(attempts, Duration::from_millis(0))
      .with_timeout_policy(policy);
    AssessmentClient::with_session_ids(config, Box::new(FixedSessionId("session_test".into())))
      .unwrap()
  }

  fn disclosure() -> Disclosure {
    Disclosure::parse("INVENTION DISCLOSURE\nTitle: Smart Water Bottle with Hydration Tracking")
      .unwrap()
  }

  #[test]
  fn test_poll_progress_is_scaled_between_bounds() {
    assert_eq!(poll_progress(0, 30), PROGRESS_POLL_START);
    assert_eq!(poll_progress(30, 30), PROGRESS_POLL_END);
    assert_eq!(poll_progress(15, 30), 62);
    assert_eq!(poll_progress(40, 30), PROGRESS_POLL_END);
    assert_eq!(poll_progress(1, 0), PROGRESS_POLL_END);
  }

  #[test]
  fn test_session_urls_keep_base_path() {
    let config = ClientConfig::default().with_base_url("https://example.com/api/");
    let client =
      AssessmentClient::with_session_ids(config, Box::new(FixedSessionId("s".into()))).unwrap();
    assert_eq!(
      client.sessions_url(None).unwrap().as_str(),
      "https://example.com/api/apps/coordinator_agent/users/user/sessions"
    );
    assert_eq!(
      client.sessions_url(Some("session 1")).unwrap().as_str(),
      "https://example.com/api/apps/coordinator_agent/users/user/sessions/session%201"
    );
  }

  #[tokio::test]
  async fn test_submit_returns_first_terminal_poll() {
    let mut server = Server::new_async().await;
    let create = server
      .mock("POST", SESSIONS_PATH)
      .match_body(Matcher::PartialJson(json!({ "session_id": "session_test" })))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id": "session_test"}"#)
      .expect(1)
      .create_async()
      .await;
    let poll = server
      .mock("GET", SESSION_PATH)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        json!({
          "state": {
            "novelty_score": 7, "clarity_score": 6, "claims_score": 5,
            "industrial_applicability_score": 8, "overall_summary": "Promising hydration tracker"
          }
        })
        .to_string(),
      )
      .expect(1)
      .create_async()
      .await;

    let client = client_for(&server, 30, TimeoutPolicy::Error);
    let result = client.submit(&disclosure()).await.unwrap();

    assert_eq!(result.overall_score(), 6.0);
    assert_eq!(result.overall_summary(), "Promising hydration tracker");
    create.assert_async().await;
    poll.assert_async().await;
  }

  #[tokio::test]
  async fn test_session_creation_failure_skips_polling() {
    let mut server = Server::new_async().await;
    let _create = server.mock("POST", SESSIONS_PATH).with_status(500).create_async().await;
    let poll = server.mock("GET", SESSION_PATH).expect(0).create_async().await;

    let client = client_for(&server, 30, TimeoutPolicy::Fallback);
    let err = client.submit(&disclosure()).await.unwrap_err();

    assert_eq!(
      err,
      AssessError::SessionCreation { status: 500, reason: "Internal Server Error".to_string() }
    );
    poll.assert_async().await;
  }

  #[tokio::test]
  async fn test_exhausted_polls_time_out_without_extra_attempt() {
    let mut server = Server::new_async().await;
    let _create =
      server.mock("POST", SESSIONS_PATH).with_status(200).with_body("{}").create_async().await;
    let poll = server
      .mock("GET", SESSION_PATH)
      .with_status(200)
      .with_body(r#"{"events": [], "state": {}}"#)
      .expect(30)
      .create_async()
      .await;

    let client = client_for(&server, 30, TimeoutPolicy::Error);
    let err = client.submit(&disclosure()).await.unwrap_err();

    assert_eq!(err, AssessError::TimedOut { attempts: 30 });
    poll.assert_async().await;
  }

  #[tokio::test]
  async fn test_failed_polls_are_absorbed_and_fall_back() {
    let mut server = Server::new_async().await;
    let _create =
      server.mock("POST", SESSIONS_PATH).with_status(200).with_body("{}").create_async().await;
    let poll = server.mock("GET", SESSION_PATH).with_status(503).expect(5).create_async().await;

    let client = client_for(&server, 5, TimeoutPolicy::Fallback);
    let result = client.submit(&disclosure()).await.unwrap();

    assert_eq!(result, AssessmentResult::demo());
    poll.assert_async().await;
  }

  #[tokio::test]
  async fn test_terminal_session_descriptor_skips_polling() {
    let mut server = Server::new_async().await;
    let _create = server
      .mock("POST", SESSIONS_PATH)
      .with_status(200)
      .with_body(r#"{"state": {"novelty_score": 9, "overall_score": 8}}"#)
      .create_async()
      .await;
    let poll = server.mock("GET", SESSION_PATH).expect(0).create_async().await;

    let client = client_for(&server, 30, TimeoutPolicy::Error);
    let result = client.submit(&disclosure()).await.unwrap();

    assert_eq!(result.overall_score(), 8.0);
    poll.assert_async().await;
  }

  #[tokio::test]
  async fn test_malformed_poll_body_is_a_transport_failure() {
    let mut server = Server::new_async().await;
    let _create =
      server.mock("POST", SESSIONS_PATH).with_status(200).with_body("{}").create_async().await;
    let poll = server
      .mock("GET", SESSION_PATH)
      .with_status(200)
      .with_body("<html>")
      .expect(1)
      .create_async()
      .await;

    let client = client_for(&server, 30, TimeoutPolicy::Fallback);
    let err = client.submit(&disclosure()).await.unwrap_err();

    assert!(matches!(err, AssessError::Transport { .. }), "got: {err:?}");
    poll.assert_async().await;
  }

  #[tokio::test]
  async fn test_connection_failure_is_a_transport_failure() {
    let config =
      ClientConfig::default().with_base_url("http://127.0.0.1:1").with_poll(1, Duration::ZERO);
    let client = AssessmentClient::new(config).unwrap();

    let err = client.submit(&disclosure()).await.unwrap_err();
    assert!(matches!(err, AssessError::Transport { .. }), "got: {err:?}");
    assert!(err.to_string().starts_with("Failed to assess patent:"));
  }

  #[tokio::test]
  async fn test_progress_reports_completion_and_error() {
    let mut server = Server::new_async().await;
    let _create =
      server.mock("POST", SESSIONS_PATH).with_status(200).with_body("{}").create_async().await;
    let _poll = server
      .mock("GET", SESSION_PATH)
      .with_status(200)
      .with_body(r#"{"events": [{"data": {"scores": {"novelty": {"score": 8}}}}]}"#)
      .create_async()
      .await;

    let client = client_for(&server, 3, TimeoutPolicy::Error);
    let (tx, rx) = watch::channel(ProcessingState::idle());
    client.submit_with_progress(&disclosure(), &tx).await.unwrap();
    assert_eq!(*rx.borrow(), ProcessingState::completed());

    let mut failing = Server::new_async().await;
    let _create = failing.mock("POST", SESSIONS_PATH).with_status(404).create_async().await;
    let client = client_for(&failing, 3, TimeoutPolicy::Error);
    let (tx, rx) = watch::channel(ProcessingState::idle());
    assert!(client.submit_with_progress(&disclosure(), &tx).await.is_err());
    assert_eq!(*rx.borrow(), ProcessingState::error());
  }

  #[tokio::test]
  async fn test_fetch_session_status_propagates_failure() {
    let mut server = Server::new_async().await;
    let _poll = server.mock("GET", SESSION_PATH).with_status(404).create_async().await;

    let client = client_for(&server, 1, TimeoutPolicy::Error);
    let err = client.fetch_session_status("session_test").await.unwrap_err();
    assert_eq!(err, AssessError::SessionStatus { status: 404 });
  }

  #[tokio::test]
  async fn test_fetch_session_status_returns_raw_payload() {
    let mut server = Server::new_async().await;
    let _poll = server
      .mock("GET", SESSION_PATH)
      .with_status(200)
      .with_body(r#"{"events": [], "state": {"phase": "drafting"}}"#)
      .create_async()
      .await;

    let client = client_for(&server, 1, TimeoutPolicy::Error);
    let payload = client.fetch_session_status("session_test").await.unwrap();
    assert_eq!(payload["state"]["phase"], "drafting");
  }
}
