// src/analyze/mod.rs
//! Analysis pipeline entry: runs the three local analyzers, the optional fact-check,
//! and hands everything to the pure engine.

pub mod cache;
pub mod debug;
pub mod emotion;
pub mod fact_check;
pub mod heuristics;
pub mod scoring;
pub mod source_credibility;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, JitterSource, RandomJitter, SystemClock};
use crate::config::AnalyzerConfig;
use crate::engine::{assess, EngineInputs};
use crate::logging::anon_hash;
use crate::verdict::AnalysisResult;

// Re-export convenient types.
pub use crate::analyze::emotion::{analyze_emotions, EmotionalAnalysisResult, SeverityLevel};
pub use crate::analyze::fact_check::{
    build_fact_checker, DynFactChecker, FactCheckResult, FactChecker,
};
pub use crate::analyze::heuristics::{analyze_heuristics, HeuristicResult};
pub use crate::analyze::source_credibility::{
    analyze_sources, classify_domain, DomainClassification, SourceCredibilityResult,
};

pub const DEFAULT_JITTER_AMPLITUDE: f64 = 5.0;

/// Aggregator. Cheap to share behind an `Arc`; holds no per-request state.
pub struct FakeNewsAnalyzer {
    fact_checker: DynFactChecker,
    clock: Arc<dyn Clock>,
    jitter: Arc<dyn JitterSource>,
    jitter_amplitude: f64,
    simulated_latency: Duration,
}

impl FakeNewsAnalyzer {
    pub fn new(
        fact_checker: DynFactChecker,
        clock: Arc<dyn Clock>,
        jitter: Arc<dyn JitterSource>,
    ) -> Self {
        Self {
            fact_checker,
            clock,
            jitter,
            jitter_amplitude: DEFAULT_JITTER_AMPLITUDE,
            simulated_latency: Duration::ZERO,
        }
    }

    /// Production wiring: system clock, random jitter, fact-checker per config.
    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let checker = build_fact_checker(&cfg.fact_check, clock.clone());
        Self::new(checker, clock, Arc::new(RandomJitter))
            .with_jitter_amplitude(cfg.jitter_amplitude)
            .with_simulated_latency(Duration::from_millis(cfg.simulated_latency_ms))
    }

    pub fn with_jitter_amplitude(mut self, amplitude: f64) -> Self {
        self.jitter_amplitude = if amplitude.is_finite() {
            amplitude.abs()
        } else {
            DEFAULT_JITTER_AMPLITUDE
        };
        self
    }

    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    pub fn jitter_amplitude(&self) -> f64 {
        self.jitter_amplitude
    }

    pub fn fact_checker(&self) -> &DynFactChecker {
        &self.fact_checker
    }

    /// Full pipeline. Never fails: fact-check problems are logged and scored as
    /// "no claims".
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        if !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }

        let id = anon_hash(text);

        // (1) Local analyzers
        let heuristics = analyze_heuristics(text);
        let emotional = analyze_emotions(text);
        let sources = analyze_sources(text);

        // (2) Remote evidence, only with a credential
        let fact_check = if self.fact_checker.is_available() {
            let r = self.fact_checker.query_claims(text).await;
            if let Some(err) = r.error.as_deref() {
                warn!(
                    target: "analyzer",
                    %id,
                    provider = self.fact_checker.provider_name(),
                    error = err,
                    "fact-check failed; scoring without claims"
                );
            }
            Some(r)
        } else {
            None
        };

        // (3) Engine
        let jitter = self.jitter.sample(self.jitter_amplitude);
        let a = assess(&EngineInputs {
            heuristics: &heuristics,
            emotional: &emotional,
            sources: &sources,
            fact_check: fact_check.as_ref(),
            jitter,
        });

        debug!(
            target: "analyzer",
            %id,
            heuristic = a.scores.heuristic,
            emotional = a.scores.emotional,
            source = a.scores.source_credibility,
            fact_check = ?a.scores.fact_check,
            composite = a.scores.composite,
            jitter = a.scores.jitter,
            "sub-scores"
        );
        info!(
            target: "analyzer",
            %id,
            verdict = %a.verdict,
            confidence = a.confidence,
            final_score = a.scores.final_score,
            reasons = a.reasons.len(),
            "analysis complete"
        );
        metrics::counter!("analysis_verdict_total", "verdict" => a.verdict.as_str()).increment(1);

        AnalysisResult {
            id: Uuid::new_v4(),
            text: text.to_string(),
            verdict: a.verdict,
            confidence: a.confidence,
            reasons: a.reasons,
            created_at: self.clock.now(),
            scores: a.scores,
            emotional: Some(emotional),
            source_credibility: Some(sources),
            fact_check,
        }
    }
}
