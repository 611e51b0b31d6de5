//! verdict.rs: Result records for a single analysis: verdict, confidence, reasons and the
//! nested sub-results of the three analyzers (plus the optional fact-check result).
//!
//! All records are built fresh per request and never mutated after construction.
//! Serialization shape is what the API returns and what history persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyze::emotion::EmotionalAnalysisResult;
use crate::analyze::fact_check::FactCheckResult;
use crate::analyze::source_credibility::SourceCredibilityResult;

/// Three-way outcome of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Fake,
    Verified,
    Uncertain,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fake => "fake",
            Verdict::Verified => "verified",
            Verdict::Uncertain => "uncertain",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity of a reason. Analyzers tag what they emit so the aggregator can tell
/// whether only positive indicators were collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    /// Something that pushes the score toward `fake`.
    RedFlag,
    /// A positive indicator (citations, links, trusted sources).
    Credibility,
}

/// Human-readable reason with its polarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub message: String,
    pub kind: ReasonKind,
}

impl Reason {
    pub fn red_flag(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ReasonKind::RedFlag,
        }
    }

    pub fn credibility(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ReasonKind::Credibility,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.kind == ReasonKind::Credibility
    }
}

/// How the final number was reached. Sub-scores are the clamped values that entered
/// the weighting; `composite` is pre-jitter, `final_score` post-jitter and clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub heuristic: f64,
    pub emotional: f64,
    pub source_credibility: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<f64>,
    pub composite: f64,
    pub jitter: f64,
    pub final_score: f64,
}

/// Complete analysis record returned by `FakeNewsAnalyzer::analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub text: String,
    pub verdict: Verdict,
    /// Integer in 0..=100, derived only from the final score.
    pub confidence: u8,
    /// Evidentiary order; no exact duplicates.
    #[serde(default)]
    pub reasons: Vec<String>,
    /// ISO-8601 on the wire.
    pub created_at: DateTime<Utc>,
    pub scores: ScoreBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional: Option<EmotionalAnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_credibility: Option<SourceCredibilityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<FactCheckResult>,
}

/// Push `reason` unless the exact same message is already present.
pub(crate) fn push_unique(reasons: &mut Vec<Reason>, reason: Reason) {
    if !reasons.iter().any(|r| r.message == reason.message) {
        reasons.push(reason);
    }
}
