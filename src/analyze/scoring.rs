//! Weighting regimes, thresholds and confidence for the composite score.
//!
//! Two fixed regimes: with usable fact-check evidence the four signals are blended
//! 0.20 / 0.20 / 0.30 / 0.30, otherwise the remaining three get 0.30 / 0.30 / 0.40.
//! Every input is clamped to [0,100] before weighting.

use serde::Serialize;

use crate::analyze::fact_check::FactCheckResult;
use crate::verdict::Verdict;

pub const FAKE_THRESHOLD: f64 = 50.0;
pub const VERIFIED_THRESHOLD: f64 = 25.0;
pub const UNCERTAIN_CONFIDENCE: u8 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Weights {
    pub heuristic: f64,
    pub emotional: f64,
    pub source: f64,
    pub fact_check: f64,
}

pub const WITH_FACT_CHECK: Weights = Weights {
    heuristic: 0.20,
    emotional: 0.20,
    source: 0.30,
    fact_check: 0.30,
};

pub const WITHOUT_FACT_CHECK: Weights = Weights {
    heuristic: 0.30,
    emotional: 0.30,
    source: 0.40,
    fact_check: 0.0,
};

/// Sub-scores entering the blend, each in [0,100].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreInputs {
    pub heuristic: f64,
    pub emotional: f64,
    pub source: f64,
    /// Only read under the fact-check regime.
    pub fact_check: Option<f64>,
}

impl ScoreInputs {
    /// Safe constructor with clamping.
    pub fn new(heuristic: f64, emotional: f64, source: f64, fact_check: Option<f64>) -> Self {
        Self {
            heuristic: clamp_score(heuristic),
            emotional: clamp_score(emotional),
            source: clamp_score(source),
            fact_check: fact_check.map(clamp_score),
        }
    }
}

/// Fact-check evidence counts only when at least one claim came back.
/// Unavailable, errored and empty results all fall back to the three-signal regime.
pub fn has_usable_fact_check(result: Option<&FactCheckResult>) -> bool {
    result.is_some_and(|r| !r.claims.is_empty())
}

pub fn weights_for(with_fact_check: bool) -> Weights {
    if with_fact_check {
        WITH_FACT_CHECK
    } else {
        WITHOUT_FACT_CHECK
    }
}

/// Pre-jitter composite in [0,100].
pub fn composite_score(inputs: &ScoreInputs) -> f64 {
    let raw = match inputs.fact_check {
        Some(fc) => {
            let w = WITH_FACT_CHECK;
            inputs.heuristic * w.heuristic
                + inputs.emotional * w.emotional
                + inputs.source * w.source
                + fc * w.fact_check
        }
        None => {
            let w = WITHOUT_FACT_CHECK;
            inputs.heuristic * w.heuristic + inputs.emotional * w.emotional + inputs.source * w.source
        }
    };
    clamp_score(raw)
}

/// `composite + jitter`, clamped.
pub fn apply_jitter(composite: f64, jitter: f64) -> f64 {
    clamp_score(composite + jitter)
}

/// `>= 50` fake, `<= 25` verified, uncertain in between.
pub fn verdict_for(final_score: f64) -> Verdict {
    if final_score >= FAKE_THRESHOLD {
        Verdict::Fake
    } else if final_score <= VERIFIED_THRESHOLD {
        Verdict::Verified
    } else {
        Verdict::Uncertain
    }
}

/// Distance from the midpoint, doubled. Uncertain is pinned at 50.
pub fn confidence_for(verdict: Verdict, final_score: f64) -> u8 {
    match verdict {
        Verdict::Uncertain => UNCERTAIN_CONFIDENCE,
        _ => ((50.0 - final_score).abs() * 2.0).round().clamp(0.0, 100.0) as u8,
    }
}

pub fn clamp_score(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 100.0)
}
