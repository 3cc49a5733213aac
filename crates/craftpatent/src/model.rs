//! Core records shared by the client, the payload normalizer and the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AssessError, Result};

pub const DEFAULT_USER_ID: &str = "user";
pub const PENDING_RATIONALE: &str = "Analysis pending";
pub const DEFAULT_STATUS: &str = "Under Review";
pub const DEFAULT_SUMMARY: &str = "Assessment complete";

/// One of the four scored assessment axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
  Novelty,
  Clarity,
  Claims,
  IndustrialApplicability,
}

impl Dimension {
  pub const ALL: [Dimension; 4] =
    [Dimension::Novelty, Dimension::Clarity, Dimension::Claims, Dimension::IndustrialApplicability];

  /// Key used by the upstream service, both as `scores.<key>` and as the `<key>_score` prefix.
  pub fn key(&self) -> &'static str {
    match self {
      Dimension::Novelty => "novelty",
      Dimension::Clarity => "clarity",
      Dimension::Claims => "claims",
      Dimension::IndustrialApplicability => "industrial_applicability",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Dimension::Novelty => "Novelty",
      Dimension::Clarity => "Clarity",
      Dimension::Claims => "Claims",
      Dimension::IndustrialApplicability => "Industrial Applicability",
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      Dimension::Novelty => "Innovation and uniqueness",
      Dimension::Clarity => "Technical clarity",
      Dimension::Claims => "Claim structure",
      Dimension::IndustrialApplicability => "Commercial viability",
    }
  }

  fn index(&self) -> usize {
    match self {
      Dimension::Novelty => 0,
      Dimension::Clarity => 1,
      Dimension::Claims => 2,
      Dimension::IndustrialApplicability => 3,
    }
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionScore {
  pub score: f64,
  pub rationale: String,
}

impl Default for DimensionScore {
  fn default() -> Self {
    Self { score: 0.0, rationale: PENDING_RATIONALE.to_string() }
  }
}

/// Disclosure text that is known to be non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclosure(String);

impl Disclosure {
  pub fn parse(text: &str) -> Result<Self> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return Err(AssessError::EmptyDisclosure);
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Body of the session-creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentRequest {
  pub input: String,
  pub session_id: String,
  #[serde(skip)]
  pub user_id: String,
}

impl AssessmentRequest {
  pub fn new(disclosure: &Disclosure, session_id: String, user_id: Option<&str>) -> Self {
    Self {
      input: disclosure.as_str().to_string(),
      session_id,
      user_id: user_id.unwrap_or(DEFAULT_USER_ID).to_string(),
    }
  }
}

/// Normalized assessment. Every field is populated; nothing is mutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireAssessment", from = "WireAssessment")]
pub struct AssessmentResult {
  status: String,
  dimensions: [DimensionScore; 4],
  overall_score: f64,
  overall_summary: String,
  suggestions: Vec<String>,
}

impl AssessmentResult {
  pub(crate) fn new(
    status: String,
    dimensions: [DimensionScore; 4],
    overall_score: f64,
    overall_summary: String,
    suggestions: Vec<String>,
  ) -> Self {
    Self { status, dimensions, overall_score, overall_summary, suggestions }
  }

  /// Free-text patentability status such as "Approved" or "Requires Improvement".
  pub fn status(&self) -> &str {
    &self.status
  }

  pub fn verdict(&self) -> Verdict {
    Verdict::from_status(&self.status)
  }

  pub fn dimension(&self, dimension: Dimension) -> &DimensionScore {
    &self.dimensions[dimension.index()]
  }

  pub fn dimensions(&self) -> impl Iterator<Item = (Dimension, &DimensionScore)> {
    Dimension::ALL.into_iter().map(move |d| (d, self.dimension(d)))
  }

  pub fn overall_score(&self) -> f64 {
    self.overall_score
  }

  pub fn overall_summary(&self) -> &str {
    &self.overall_summary
  }

  pub fn suggestions(&self) -> &[String] {
    &self.suggestions
  }

  /// Canned assessment used when polling runs out under the fallback policy.
  pub fn demo() -> Self {
    let dim =
      |score: f64, rationale: &str| DimensionScore { score, rationale: rationale.to_string() };
    Self::new(
      "Requires Improvement".to_string(),
      [
        dim(
          7.0,
          "The smart water bottle concept shows good inventive step with unique sensor integration.",
        ),
        dim(
          6.0,
          "Technical description is clear but could benefit from more detailed claim structure.",
        ),
        dim(5.0, "Claims need refinement for better scope and patentability."),
        dim(8.0, "Strong commercial potential in health and fitness market."),
      ],
      7.0,
      "The patent shows promise but requires improvements in claims structure and technical detail."
        .to_string(),
      vec![
        "Strengthen claim independence and scope".to_string(),
        "Add more technical implementation details".to_string(),
        "Include comparative analysis with prior art".to_string(),
      ],
    )
  }
}

/// Flat field layout the presentation layer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireAssessment {
  patentability_assessment: String,
  novelty_score: f64,
  novelty_rationale: String,
  clarity_score: f64,
  clarity_rationale: String,
  claims_score: f64,
  claims_rationale: String,
  industrial_applicability_score: f64,
  industrial_applicability_rationale: String,
  overall_score: f64,
  overall_summary: String,
  #[serde(default)]
  suggestions: Vec<String>,
}

impl From<AssessmentResult> for WireAssessment {
  fn from(result: AssessmentResult) -> Self {
    let [novelty, clarity, claims, industrial] = result.dimensions;
    Self {
      patentability_assessment: result.status,
      novelty_score: novelty.score,
      novelty_rationale: novelty.rationale,
      clarity_score: clarity.score,
      clarity_rationale: clarity.rationale,
      claims_score: claims.score,
      claims_rationale: claims.rationale,
      industrial_applicability_score: industrial.score,
      industrial_applicability_rationale: industrial.rationale,
      overall_score: result.overall_score,
      overall_summary: result.overall_summary,
      suggestions: result.suggestions,
    }
  }
}

impl From<WireAssessment> for AssessmentResult {
  fn from(wire: WireAssessment) -> Self {
    Self::new(
      wire.patentability_assessment,
      [
        DimensionScore { score: wire.novelty_score, rationale: wire.novelty_rationale },
        DimensionScore { score: wire.clarity_score, rationale: wire.clarity_rationale },
        DimensionScore { score: wire.claims_score, rationale: wire.claims_rationale },
        DimensionScore {
          score: wire.industrial_applicability_score,
          rationale: wire.industrial_applicability_rationale,
        },
      ],
      wire.overall_score,
      wire.overall_summary,
      wire.suggestions,
    )
  }
}

/// Display-side reading of the free-text status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  Approved,
  Rejected,
  NeedsAttention,
}

impl Verdict {
  pub fn from_status(status: &str) -> Self {
    let status = status.to_lowercase();
    if status.contains("rejected") {
      Verdict::Rejected
    } else if status.contains("approved") {
      Verdict::Approved
    } else {
      Verdict::NeedsAttention
    }
  }
}

/// Score quality band, by percentage of the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
  Strong,
  Fair,
  Weak,
}

impl ScoreBand {
  pub fn of(score: f64, max: f64) -> Self {
    let percent = if max > 0.0 { score / max * 100.0 } else { 0.0 };
    if percent >= 70.0 {
      ScoreBand::Strong
    } else if percent >= 50.0 {
      ScoreBand::Fair
    } else {
      ScoreBand::Weak
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
  Idle,
  Processing,
  Completed,
  Error,
}

/// UI-facing projection of where a submission is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingState {
  pub status: ProcessingStatus,
  pub current_step: String,
  pub progress: u8,
}

impl Default for ProcessingState {
  fn default() -> Self {
    Self::idle()
  }
}

impl ProcessingState {
  pub fn idle() -> Self {
    Self { status: ProcessingStatus::Idle, current_step: String::new(), progress: 0 }
  }

  pub fn processing(step: impl Into<String>, progress: u8) -> Self {
    Self {
      status: ProcessingStatus::Processing,
      current_step: step.into(),
      progress: progress.min(100),
    }
  }

  pub fn completed() -> Self {
    Self {
      status: ProcessingStatus::Completed,
      current_step: "Analysis complete".to_string(),
      progress: 100,
    }
  }

  pub fn error() -> Self {
    Self {
      status: ProcessingStatus::Error,
      current_step: "Error occurred".to_string(),
      progress: 0,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self.status, ProcessingStatus::Completed | ProcessingStatus::Error)
  }
}
