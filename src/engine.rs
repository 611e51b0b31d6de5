//! # Verdict Engine
//! Pure, testable logic that maps the four sub-results plus a jitter offset to a
//! verdict, a confidence and an ordered reason list. No I/O, no randomness; the
//! caller samples jitter and runs the analyzers.
//!
//! Reason order: lexicon, emotional, source factors, fact-check, then one fallback
//! depending on the verdict.

use crate::analyze::emotion::{EmotionalAnalysisResult, SeverityLevel};
use crate::analyze::fact_check::{score_claims, FactCheckResult};
use crate::analyze::heuristics::HeuristicResult;
use crate::analyze::scoring::{
    apply_jitter, composite_score, confidence_for, has_usable_fact_check, verdict_for, ScoreInputs,
};
use crate::analyze::source_credibility::{factor_kind, SourceCredibilityResult};
use crate::verdict::{push_unique, Reason, ScoreBreakdown, Verdict};

pub const REASON_FAKE_FALLBACK: &str = "Multiple indicators suggest this content may be misleading";
pub const REASON_VERIFIED_FALLBACK: &str = "No significant red flags detected";
pub const REASON_UNCERTAIN: &str =
    "Low confidence: signals are mixed or insufficient, verify with additional sources";

/// Triggers named in the emotional reason.
const MAX_TRIGGER_LABELS: usize = 3;

/// Everything the engine needs; borrowed from the analyzers' outputs.
#[derive(Debug, Clone, Copy)]
pub struct EngineInputs<'a> {
    pub heuristics: &'a HeuristicResult,
    pub emotional: &'a EmotionalAnalysisResult,
    pub sources: &'a SourceCredibilityResult,
    /// `None` when the fact-checker is not available.
    pub fact_check: Option<&'a FactCheckResult>,
    /// Already sampled, in `[-A, +A]`.
    pub jitter: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub verdict: Verdict,
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub scores: ScoreBreakdown,
}

pub fn assess(inputs: &EngineInputs<'_>) -> Assessment {
    // 1) Regime + composite
    let usable = has_usable_fact_check(inputs.fact_check);
    let fact_score = if usable {
        inputs.fact_check.map(score_claims)
    } else {
        None
    };
    let score_inputs = ScoreInputs::new(
        f64::from(inputs.heuristics.score),
        f64::from(inputs.emotional.score),
        f64::from(inputs.sources.score),
        fact_score,
    );
    let composite = composite_score(&score_inputs);
    let final_score = apply_jitter(composite, inputs.jitter);

    // 2) Verdict + confidence
    let verdict = verdict_for(final_score);
    let confidence = confidence_for(verdict, final_score);

    // 3) Reasons
    let mut reasons: Vec<Reason> = Vec::new();
    for r in &inputs.heuristics.reasons {
        push_unique(&mut reasons, r.clone());
    }
    if let Some(r) = emotional_reason(inputs.emotional) {
        push_unique(&mut reasons, r);
    }
    for f in &inputs.sources.factors {
        push_unique(
            &mut reasons,
            Reason {
                message: f.clone(),
                kind: factor_kind(f),
            },
        );
    }
    if usable {
        if let Some(r) = inputs.fact_check.and_then(fact_check_reason) {
            push_unique(&mut reasons, r);
        }
    }

    // 4) Fallbacks
    match verdict {
        Verdict::Fake if reasons.is_empty() => {
            push_unique(&mut reasons, Reason::red_flag(REASON_FAKE_FALLBACK));
        }
        Verdict::Verified if reasons.iter().all(Reason::is_positive) => {
            push_unique(&mut reasons, Reason::credibility(REASON_VERIFIED_FALLBACK));
        }
        Verdict::Uncertain => {
            push_unique(&mut reasons, Reason::red_flag(REASON_UNCERTAIN));
        }
        _ => {}
    }

    Assessment {
        verdict,
        confidence,
        reasons: reasons.into_iter().map(|r| r.message).collect(),
        scores: ScoreBreakdown {
            heuristic: score_inputs.heuristic,
            emotional: score_inputs.emotional,
            source_credibility: score_inputs.source,
            fact_check: score_inputs.fact_check,
            composite,
            jitter: final_score - composite,
            final_score,
        },
    }
}

/// Only when something triggered and the level is above low.
fn emotional_reason(e: &EmotionalAnalysisResult) -> Option<Reason> {
    if e.triggers.is_empty() || e.level == SeverityLevel::Low {
        return None;
    }
    let labels = e
        .trigger_labels()
        .into_iter()
        .take(MAX_TRIGGER_LABELS)
        .collect::<Vec<&str>>()
        .join(", ");
    Some(Reason::red_flag(format!(
        "Emotional manipulation detected ({}): {}",
        e.level.as_str(),
        labels
    )))
}

/// Names the top claim's publisher and rating. Ratings on the "true" side count as
/// a positive indicator.
fn fact_check_reason(fc: &FactCheckResult) -> Option<Reason> {
    let top = fc.claims.first()?;
    let publisher = if top.publisher.trim().is_empty() {
        "an independent fact-checker"
    } else {
        top.publisher.as_str()
    };
    let msg = format!(
        "Similar claim reviewed by {}: rated \"{}\"",
        publisher, top.rating
    );
    Some(match top.normalized_rating {
        Some(r) if r < 50 => Reason::credibility(msg),
        _ => Reason::red_flag(msg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::emotion::analyze_emotions;
    use crate::analyze::fact_check::{normalize_rating, Claim};
    use crate::analyze::heuristics::analyze_heuristics;
    use crate::analyze::source_credibility::analyze_sources;

    const CLICKBAIT: &str =
        "BREAKING: Scientists SHOCKING discovery!!! You won't believe what happens next!";
    const SOURCED: &str = "According to a new study published in Nature, researchers found that \
        regular exercise improves memory in older adults. The peer-reviewed paper is available \
        at https://nature.com/article123 for anyone who wants to read the full methodology.";

    fn claim(publisher: &str, rating: &str) -> Claim {
        Claim {
            text: "c".into(),
            claimant: None,
            claim_date: None,
            rating: rating.into(),
            normalized_rating: normalize_rating(rating),
            url: "https://example.org/fc".into(),
            publisher: publisher.into(),
            review_date: None,
        }
    }

    fn run(text: &str, fc: Option<&FactCheckResult>, jitter: f64) -> Assessment {
        let h = analyze_heuristics(text);
        let e = analyze_emotions(text);
        let s = analyze_sources(text);
        assess(&EngineInputs {
            heuristics: &h,
            emotional: &e,
            sources: &s,
            fact_check: fc,
            jitter,
        })
    }

    #[test]
    fn clickbait_is_fake_with_ordered_reasons() {
        let a = run(CLICKBAIT, None, 0.0);
        assert_eq!(a.verdict, Verdict::Fake);
        assert!((a.scores.final_score - 58.2).abs() < 1e-9);
        assert_eq!(a.confidence, 16);
        assert_eq!(
            a.reasons,
            vec![
                "Contains sensationalist language: \"shocking\", \"you won't believe\"".to_string(),
                "Excessive use of exclamation or question marks".to_string(),
                "Excessive use of capital letters".to_string(),
                "Emotional manipulation detected (medium): Clickbait, Sensationalism, Urgency"
                    .to_string(),
                "No external sources referenced".to_string(),
            ]
        );
    }

    #[test]
    fn sourced_text_is_verified_with_fallback() {
        let a = run(SOURCED, None, 0.0);
        assert_eq!(a.verdict, Verdict::Verified);
        assert!((a.scores.final_score - 12.0).abs() < 1e-9);
        assert_eq!(a.confidence, 76);
        assert_eq!(a.reasons.last().map(String::as_str), Some(REASON_VERIFIED_FALLBACK));
        assert!(!a.reasons.iter().any(|r| r == REASON_UNCERTAIN));
    }

    #[test]
    fn negative_jitter_is_recorded_in_breakdown() {
        // 58.2 - 5 = 53.2, still fake
        let a = run(CLICKBAIT, None, -5.0);
        assert_eq!(a.verdict, Verdict::Fake);
        assert!((a.scores.jitter + 5.0).abs() < 1e-9);
        assert_eq!(a.confidence, 6);
    }

    #[test]
    fn uncertain_always_gets_low_confidence_reason() {
        // heuristics: short (+10) -> 10; no emotion; no sources -> 60 => 3 + 0 + 24 = 27
        let a = run("The council met today.", None, 0.0);
        assert_eq!(a.verdict, Verdict::Uncertain);
        assert_eq!(a.confidence, 50);
        assert_eq!(a.reasons.last().map(String::as_str), Some(REASON_UNCERTAIN));
    }

    #[test]
    fn fact_check_switches_regime_and_adds_reason() {
        let fc = FactCheckResult {
            available: true,
            claims: vec![claim("PolitiFact", "Pants on Fire"), claim("Snopes", "False")],
            error: None,
        };
        let a = run(CLICKBAIT, Some(&fc), 0.0);
        // 0.2*80 + 0.2*34 + 0.3*60 + 0.3*90
        assert!((a.scores.final_score - 67.8).abs() < 1e-9);
        assert_eq!(a.scores.fact_check, Some(90.0));
        assert_eq!(a.verdict, Verdict::Fake);
        assert!(a
            .reasons
            .contains(&"Similar claim reviewed by PolitiFact: rated \"Pants on Fire\"".to_string()));
    }

    #[test]
    fn failed_or_empty_fact_check_is_ignored() {
        let plain = run(CLICKBAIT, None, 0.0);
        for fc in [FactCheckResult::failed("timeout"), FactCheckResult::empty()] {
            let a = run(CLICKBAIT, Some(&fc), 0.0);
            assert_eq!(a.scores, plain.scores);
            assert_eq!(a.reasons, plain.reasons);
        }
    }

    #[test]
    fn true_rating_keeps_verified_fallback() {
        let fc = FactCheckResult {
            available: true,
            claims: vec![claim("", "True")],
            error: None,
        };
        let a = run(SOURCED, Some(&fc), 0.0);
        assert_eq!(a.verdict, Verdict::Verified);
        assert!(a.reasons.contains(
            &"Similar claim reviewed by an independent fact-checker: rated \"True\"".to_string()
        ));
        assert_eq!(a.reasons.last().map(String::as_str), Some(REASON_VERIFIED_FALLBACK));
    }

    #[test]
    fn low_emotion_is_not_reported() {
        // one fear word: 1.2 * 8 = 9.6 -> low
        let a = run(
            "Officials issued a warning about icy roads this weekend, according to reuters.com",
            None,
            0.0,
        );
        assert!(!a.reasons.iter().any(|r| r.starts_with("Emotional manipulation")));
    }
}
