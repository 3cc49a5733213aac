//! Terminal rendering of assessment results

use colored::*;

use crate::model::{AssessmentResult, ScoreBand, Verdict};

const MAX_SCORE: f64 = 10.0;
const REPORT_WIDTH: usize = 80;
const SCORE_BAR_WIDTH: usize = 20;

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.len() + 1 + word.len() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(current_line);
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

fn band_color(score: f64) -> Color {
  match ScoreBand::of(score, MAX_SCORE) {
    ScoreBand::Strong => Color::Green,
    ScoreBand::Fair => Color::Yellow,
    ScoreBand::Weak => Color::Red,
  }
}

/// `7/10` style score; whole numbers print without a fraction
pub fn format_score(score: f64) -> String {
  format!("{score}/{MAX_SCORE}")
}

pub fn score_bar(score: f64) -> String {
  let ratio = (score / MAX_SCORE).clamp(0.0, 1.0);
  let filled = (ratio * SCORE_BAR_WIDTH as f64).round() as usize;
  format!("{}{}", "█".repeat(filled), "░".repeat(SCORE_BAR_WIDTH - filled))
}

fn verdict_header(result: &AssessmentResult) -> String {
  let (marker, color) = match result.verdict() {
    Verdict::Approved => ("✓", Color::Green),
    Verdict::Rejected => ("✗", Color::Red),
    Verdict::NeedsAttention => ("!", Color::Yellow),
  };
  format!("{} {}", marker.color(color).bold(), result.status().color(color).bold())
}

/// Full human-readable report
pub fn render_report(result: &AssessmentResult) -> String {
  let mut out = Vec::new();
  let rule = "=".repeat(REPORT_WIDTH);

  out.push(rule.clone());
  out.push(format!("{}  {}", "Patent Assessment".bold(), verdict_header(result)));
  out.push(rule);
  out.push(String::new());

  let overall = result.overall_score();
  out.push(format!(
    "{} {}",
    "Overall Score:".bold(),
    format_score(overall).color(band_color(overall)).bold()
  ));
  out.extend(wrap_text(result.overall_summary(), REPORT_WIDTH));
  out.push(String::new());

  for (dimension, score) in result.dimensions() {
    let color = band_color(score.score);
    out.push(format!(
      "{:<26} {} {}",
      dimension.label().bold(),
      score_bar(score.score).color(color),
      format_score(score.score).color(color)
    ));
    out.push(format!("  {}", dimension.description().dimmed()));
    for line in wrap_text(&score.rationale, REPORT_WIDTH - 2) {
      out.push(format!("  {line}"));
    }
    out.push(String::new());
  }

  if !result.suggestions().is_empty() {
    out.push("Improvement Suggestions".bold().to_string());
    for (i, suggestion) in result.suggestions().iter().enumerate() {
      let mut wrapped = wrap_text(suggestion, REPORT_WIDTH - 5).into_iter();
      if let Some(first) = wrapped.next() {
        out.push(format!("  {}. {first}", (i + 1).to_string().cyan()));
      }
      for line in wrapped {
        out.push(format!("     {line}"));
      }
    }
  }

  out.join("\n")
}

pub fn print_report(result: &AssessmentResult) {
  println!("{}", render_report(result));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_wrap_text_respects_width() {
    let lines = wrap_text("alpha beta gamma delta", 11);
    assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
  }

  #[test]
  fn test_wrap_text_keeps_blank_paragraphs() {
    let lines = wrap_text("one\n\ntwo", 80);
    assert_eq!(lines, vec!["one", "", "two"]);
  }

  #[test]
  fn test_format_score_drops_trailing_zero() {
    assert_eq!(format_score(7.0), "7/10");
    assert_eq!(format_score(6.5), "6.5/10");
  }

  #[test]
  fn test_score_bar_is_clamped() {
    assert_eq!(score_bar(10.0).chars().filter(|c| *c == '█').count(), SCORE_BAR_WIDTH);
    assert_eq!(score_bar(-3.0).chars().filter(|c| *c == '░').count(), SCORE_BAR_WIDTH);
    assert_eq!(score_bar(15.0).chars().count(), SCORE_BAR_WIDTH);
  }

  #[test]
  fn test_report_lists_every_section() {
    colored::control::set_override(false);
    let report = render_report(&AssessmentResult::demo());

    assert!(report.contains("! Requires Improvement"));
    assert!(report.contains("Overall Score: 7/10"));
    assert!(report.contains("Industrial Applicability"));
    assert!(report.contains("Strong commercial potential"));
    assert!(report.contains("1. Strengthen claim independence and scope"));
    assert!(report.contains("3. Include comparative analysis with prior art"));
  }
}
