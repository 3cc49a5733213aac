//! CraftPatent - patent disclosure assessment client
//!
//! Submits invention disclosures to the CraftPatent multi-agent assessment
//! service, polls the analysis session, and normalizes whatever payload shape
//! the service returns into a single [`AssessmentResult`].

pub mod client;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod payload;
pub mod sample;
pub mod session_id;

pub use client::AssessmentClient;
pub use config::{ClientConfig, TimeoutPolicy};
pub use error::AssessError;
pub use model::{
  AssessmentRequest, AssessmentResult, Dimension, DimensionScore, Disclosure, ProcessingState,
  ProcessingStatus,
};
pub use payload::{extract_terminal, parse_result};
