use anyhow::{Context, Result};
use std::io::Read;
use std::path::PathBuf;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::client::AssessmentClient;
use crate::config::ClientConfig;
use crate::display::print_report;
use crate::model::{AssessmentResult, Disclosure, ProcessingState};
use crate::sample::SAMPLE_DISCLOSURE;

/// Where the disclosure text comes from
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
  File(PathBuf),
  Stdin,
  Text(String),
  Sample,
}

pub fn read_disclosure(source: &InputSource) -> Result<String> {
  match source {
    InputSource::File(path) => std::fs::read_to_string(path)
      .with_context(|| format!("failed to read disclosure from {}", path.display())),
    InputSource::Stdin => {
      let mut text = String::new();
      std::io::stdin().read_to_string(&mut text).context("failed to read disclosure from stdin")?;
      Ok(text)
    }
    InputSource::Text(text) => Ok(text.clone()),
    InputSource::Sample => Ok(SAMPLE_DISCLOSURE.to_string()),
  }
}

/// Submit a disclosure and print the assessment
pub async fn assess(config: ClientConfig, source: InputSource, json: bool) -> Result<()> {
  let text = read_disclosure(&source)?;
  let disclosure = Disclosure::parse(&text)?;
  let client = AssessmentClient::new(config)?;

  bentley::info(&format!("submitting disclosure to {}", client.config().base_url));
  let result = submit_with_progress_display(&client, &disclosure).await?;

  if json {
    println!("{}", serde_json::to_string_pretty(&result)?);
  } else {
    print_report(&result);
    bentley::success("assessment complete");
  }
  Ok(())
}

async fn submit_with_progress_display(
  client: &AssessmentClient,
  disclosure: &Disclosure,
) -> Result<AssessmentResult> {
  let (progress, mut updates) = watch::channel(ProcessingState::idle());

  let reporter = tokio::spawn(async move {
    while updates.changed().await.is_ok() {
      let state = updates.borrow_and_update().clone();
      if state.is_terminal() {
        break;
      }
      bentley::progress(state.progress, &state.current_step);
    }
    bentley::finish_progress();
  });

  let outcome = client.submit_with_progress(disclosure, &progress).await;
  drop(progress);
  join_reporter(reporter).await;

  Ok(outcome?)
}

/// Wait for the progress reporter; its failure never fails the submission.
async fn join_reporter(reporter: JoinHandle<()>) {
  if let Err(e) = reporter.await {
    warn!(error = %e, "progress reporter task failed");
  }
}

/// Print the raw payload of an existing session
pub async fn status(config: ClientConfig, session_id: &str) -> Result<()> {
  let client = AssessmentClient::new(config)?;
  let payload = client.fetch_session_status(session_id).await?;
  println!("{}", serde_json::to_string_pretty(&payload)?);
  Ok(())
}

/// Print the bundled sample disclosure
pub fn sample() {
  println!("{SAMPLE_DISCLOSURE}");
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_read_disclosure_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("disclosure.txt");
    fs::write(&path, "Smart Water Bottle").unwrap();

    let text = read_disclosure(&InputSource::File(path)).unwrap();
    assert_eq!(text, "Smart Water Bottle");
  }

  #[test]
  fn test_read_disclosure_missing_file_names_path() {
    let err = read_disclosure(&InputSource::File(PathBuf::from("/nonexistent/disclosure.txt")))
      .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/disclosure.txt"));
  }

  #[test]
  fn test_read_disclosure_sample_and_text() {
    assert!(read_disclosure(&InputSource::Sample).unwrap().contains("Smart Water Bottle"));
    assert_eq!(read_disclosure(&InputSource::Text("abc".into())).unwrap(), "abc");
  }

  #[tokio::test]
  async fn test_assess_rejects_blank_text_before_network() {
    // Unroutable base URL: reaching the network would surface a transport error instead
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:1");
    let err = assess(config, InputSource::Text("   ".into()), false).await.unwrap_err();
    assert_eq!(
      err.downcast_ref::<crate::error::AssessError>(),
      Some(&crate::error::AssessError::EmptyDisclosure)
    );
  }

  #[tokio::test]
  async fn test_panicking_reporter_does_not_fail_submission() {
    let reporter: JoinHandle<()> =
      tokio::spawn(async { panic!("progress line could not be drawn") });
    join_reporter(reporter).await;

    let finished = tokio::spawn(async {});
    join_reporter(finished).await;
  }
}
