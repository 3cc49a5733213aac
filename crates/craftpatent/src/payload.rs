//! Normalization of the assessment service's loosely shaped JSON payloads.
//!
//! The service does not commit to one response layout. Session responses may
//! carry an `events` list, a `state` object, or both, and the assessment inside
//! them may report scores nested (`scores.<dimension>.score`) or flat
//! (`<dimension>_score`). Every accepted shape is enumerated here as a variant
//! and funnelled through [`parse_result`].

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::{
  AssessmentResult, Dimension, DimensionScore, DEFAULT_STATUS, DEFAULT_SUMMARY, PENDING_RATIONALE,
};

/// Where a terminal assessment may be found inside a session response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionSnapshot<'a> {
  /// `data` of the last entry in `events`, when it carries score or assessment data.
  LastEvent(&'a Value),
  /// A non-empty `state` object.
  State(&'a Value),
}

impl<'a> SessionSnapshot<'a> {
  /// Candidates in the order they are checked: last event first, then state.
  pub fn candidates(payload: &'a Value) -> Vec<SessionSnapshot<'a>> {
    let mut candidates = Vec::new();

    if let Some(data) = payload
      .get("events")
      .and_then(Value::as_array)
      .and_then(|events| events.last())
      .and_then(|event| event.get("data"))
      .and_then(event_assessment)
    {
      candidates.push(SessionSnapshot::LastEvent(data));
    }

    let state = payload.get("state").filter(|s| s.as_object().is_some_and(|m| !m.is_empty()));
    if let Some(state) = state {
      candidates.push(SessionSnapshot::State(state));
    }

    candidates
  }

  pub fn payload(&self) -> &'a Value {
    match self {
      SessionSnapshot::LastEvent(value) | SessionSnapshot::State(value) => value,
    }
  }
}

fn event_assessment(data: &Value) -> Option<&Value> {
  if data.get("scores").is_some() {
    return Some(data);
  }
  data.get("assessment").filter(|a| a.is_object())
}

/// Inspect a session response and return the first terminal assessment it holds.
pub fn extract_terminal(payload: &Value) -> Option<AssessmentResult> {
  SessionSnapshot::candidates(payload).into_iter().find_map(|snapshot| {
    let parsed = parse_result(snapshot.payload());
    if parsed.is_none() {
      debug!(?snapshot, "session snapshot is not a terminal assessment");
    }
    parsed
  })
}

/// How a payload reports its dimension scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreLayout {
  Nested,
  Flat,
  /// Both present; nested values win field by field.
  Mixed,
}

/// Read-only view over an assessment object.
///
/// Fields are read one at a time so a secondary field with an unexpected type
/// degrades to its default instead of hiding the scores.
#[derive(Debug, Clone, Copy)]
struct RawAssessment<'a> {
  fields: &'a Map<String, Value>,
}

impl<'a> RawAssessment<'a> {
  fn of(payload: &'a Value) -> Option<Self> {
    payload.as_object().map(|fields| Self { fields })
  }

  /// A present, non-null field.
  fn field(&self, key: &str) -> Option<&'a Value> {
    self.fields.get(key).filter(|v| !v.is_null())
  }

  fn layout(&self) -> Option<ScoreLayout> {
    let nested = self.field("scores").is_some();
    let flat = Dimension::ALL.iter().any(|d| self.field(&flat_score_key(*d)).is_some());
    match (nested, flat) {
      (true, true) => Some(ScoreLayout::Mixed),
      (true, false) => Some(ScoreLayout::Nested),
      (false, true) => Some(ScoreLayout::Flat),
      (false, false) => None,
    }
  }

  fn nested_field(&self, dimension: Dimension, field: &str) -> Option<&'a Value> {
    self.field("scores")?.as_object()?.get(dimension.key())?.as_object()?.get(field)
  }

  fn flat_field(&self, dimension: Dimension, field: &str) -> Option<&'a Value> {
    self.field(&format!("{}_{}", dimension.key(), field))
  }

  /// Resolved score, or `None` when neither layout reports one.
  fn score(&self, dimension: Dimension) -> Option<f64> {
    self
      .nested_field(dimension, "score")
      .and_then(as_score)
      .or_else(|| self.flat_field(dimension, "score").and_then(as_score))
  }

  fn rationale(&self, dimension: Dimension) -> Option<String> {
    self
      .nested_field(dimension, "rationale")
      .and_then(as_text)
      .or_else(|| self.flat_field(dimension, "rationale").and_then(as_text))
  }

  fn text(&self, key: &str) -> Option<String> {
    self.field(key).and_then(as_text)
  }

  /// A list of suggestions; a lone string counts as a single suggestion.
  fn suggestions(&self, key: &str) -> Option<Vec<String>> {
    match self.field(key)? {
      Value::Array(items) => Some(
        items
          .iter()
          .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
          })
          .collect(),
      ),
      Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(|s| vec![s.to_string()]),
      other => {
        debug!(key, value = %other, "ignoring suggestions of unexpected type");
        None
      }
    }
  }
}

fn flat_score_key(dimension: Dimension) -> String {
  format!("{}_score", dimension.key())
}

fn as_score(value: &Value) -> Option<f64> {
  match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}

fn as_text(value: &Value) -> Option<String> {
  value.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Classify the score layout of a payload; `None` means it is not an assessment.
pub fn classify(payload: &Value) -> Option<ScoreLayout> {
  RawAssessment::of(payload)?.layout()
}

/// Normalize one upstream payload into an [`AssessmentResult`].
///
/// Returns `None` when the payload carries neither a `scores` key nor any
/// `<dimension>_score` key. That is the poll loop's "keep waiting" signal.
/// Once either key is present the payload is terminal, and any other field
/// that is absent or of an unexpected type falls back to its default.
pub fn parse_result(payload: &Value) -> Option<AssessmentResult> {
  let raw = RawAssessment::of(payload)?;
  let layout = raw.layout()?;
  debug!(?layout, "normalizing assessment payload");

  let mut missing = Vec::new();
  let dimensions = Dimension::ALL.map(|dimension| {
    let score = raw.score(dimension).unwrap_or_else(|| {
      missing.push(dimension);
      0.0
    });
    let rationale = raw.rationale(dimension).unwrap_or_else(|| PENDING_RATIONALE.to_string());
    DimensionScore { score, rationale }
  });

  let overall_score = match raw.field("overall_score").and_then(as_score) {
    Some(score) => score,
    None => {
      if !missing.is_empty() {
        warn!(
          ?missing,
          "overall score averaged with missing dimensions counted as 0; result is deflated"
        );
      }
      average(&dimensions)
    }
  };

  let status = raw
    .text("overall_status")
    .or_else(|| raw.text("patentability_assessment"))
    .unwrap_or_else(|| DEFAULT_STATUS.to_string());

  let summary = raw
    .text("overall_summary")
    .or_else(|| raw.text("summary"))
    .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

  let suggestions = raw
    .suggestions("improvement_suggestions")
    .or_else(|| raw.suggestions("suggestions"))
    .unwrap_or_default();

  Some(AssessmentResult::new(status, dimensions, overall_score, summary, suggestions))
}

/// Mean of the four dimension scores, rounded half to even.
fn average(dimensions: &[DimensionScore; 4]) -> f64 {
  let total: f64 = dimensions.iter().map(|d| d.score).sum();
  (total / dimensions.len() as f64).round_ties_even()
}
