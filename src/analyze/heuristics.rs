//! Lexicon matcher: keyword / punctuation / capitalization heuristics.
//!
//! Score starts at 0 and is pushed up by red flags and down by credibility indicators,
//! then clamped to [0,100]. Matching is plain substring containment on the lower-cased
//! text, so "shocking" also hits "shockingly".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::verdict::{push_unique, Reason};

/// Sensationalist terms (lower-case).
const SENSATIONALIST_WORDS: &[&str] = &[
    "shocking",
    "unbelievable",
    "you won't believe",
    "miracle",
    "secret",
    "exposed",
    "breaking",
    "bombshell",
    "mind-blowing",
    "they don't want you to know",
    "conspiracy",
    "cover-up",
    "banned",
    "hoax",
    "incredible",
    "urgent",
];

/// Phrases that usually accompany sourced reporting (lower-case).
const CREDIBILITY_PHRASES: &[&str] = &[
    "according to",
    "study published",
    "research shows",
    "peer-reviewed",
    "data shows",
    "researchers found",
    "official statement",
    "published in",
    "confirmed by",
];

const SENSATIONAL_POINTS: i32 = 15;
const PUNCTUATION_POINTS: i32 = 20;
const CAPS_POINTS: i32 = 15;
const CREDIBILITY_POINTS: i32 = -20;
const SHORT_CONTENT_POINTS: i32 = 10;
const LINK_POINTS: i32 = -10;

const SHORT_CONTENT_CHARS: usize = 50;

pub const REASON_PUNCTUATION: &str = "Excessive use of exclamation or question marks";
pub const REASON_CAPS: &str = "Excessive use of capital letters";
pub const REASON_CREDIBILITY: &str = "Contains credibility indicators (citations, research references)";
pub const REASON_SHORT: &str = "Content is too short to verify";
pub const REASON_LINKS: &str = "Contains external references or links";

static CAPS_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{4,}\b").expect("caps regex"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicResult {
    pub score: u8,
    pub reasons: Vec<Reason>,
}

impl HeuristicResult {
    pub fn messages(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.message.clone()).collect()
    }
}

pub fn analyze_heuristics(text: &str) -> HeuristicResult {
    let lower = text.to_lowercase();
    let mut score: i32 = 0;
    let mut reasons: Vec<Reason> = Vec::new();

    // 1) Sensationalist vocabulary
    let found: Vec<&str> = SENSATIONALIST_WORDS
        .iter()
        .copied()
        .filter(|w| lower.contains(w))
        .collect();
    if !found.is_empty() {
        score += SENSATIONAL_POINTS * found.len() as i32;
        let cited = found
            .iter()
            .take(2)
            .map(|w| format!("\"{w}\""))
            .collect::<Vec<_>>()
            .join(", ");
        push_unique(
            &mut reasons,
            Reason::red_flag(format!("Contains sensationalist language: {cited}")),
        );
    }

    // 2) Raw punctuation counts (repeats are not collapsed)
    let exclamations = text.matches('!').count();
    let questions = text.matches('?').count();
    if exclamations > 2 || questions > 3 {
        score += PUNCTUATION_POINTS;
        push_unique(&mut reasons, Reason::red_flag(REASON_PUNCTUATION));
    }

    // 3) Shouting
    if CAPS_WORD_RE.find_iter(text).count() > 1 {
        score += CAPS_POINTS;
        push_unique(&mut reasons, Reason::red_flag(REASON_CAPS));
    }

    // 4) Credibility phrases
    if CREDIBILITY_PHRASES.iter().any(|p| lower.contains(p)) {
        score += CREDIBILITY_POINTS;
        push_unique(&mut reasons, Reason::credibility(REASON_CREDIBILITY));
    }

    // 5) Too short to say much
    if text.chars().count() < SHORT_CONTENT_CHARS {
        score += SHORT_CONTENT_POINTS;
        push_unique(&mut reasons, Reason::red_flag(REASON_SHORT));
    }

    // 6) Links
    if lower.contains("http") || lower.contains("www") {
        score += LINK_POINTS;
        push_unique(&mut reasons, Reason::credibility(REASON_LINKS));
    }

    HeuristicResult {
        score: score.clamp(0, 100) as u8,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_only_short_reason() {
        let r = analyze_heuristics("");
        assert_eq!(r.score, 10);
        assert_eq!(r.messages(), vec![REASON_SHORT.to_string()]);
    }

    #[test]
    fn clickbait_headline_stacks_red_flags() {
        let r = analyze_heuristics(
            "BREAKING: Scientists SHOCKING discovery!!! You won't believe what happens next!",
        );
        // 3 sensational words (45) + punctuation (20) + caps (15)
        assert_eq!(r.score, 80);
        let msgs = r.messages();
        assert_eq!(
            msgs[0],
            "Contains sensationalist language: \"shocking\", \"you won't believe\""
        );
        assert!(msgs.contains(&REASON_PUNCTUATION.to_string()));
        assert!(msgs.contains(&REASON_CAPS.to_string()));
        assert!(r.reasons.iter().all(|r| !r.is_positive()));
    }

    #[test]
    fn sourced_text_with_link_clamps_to_zero() {
        let r = analyze_heuristics(
            "According to a new study published in Nature, researchers at MIT found correlation \
             between diet and longevity. See https://nature.com/article123 for details.",
        );
        assert_eq!(r.score, 0);
        assert_eq!(
            r.messages(),
            vec![REASON_CREDIBILITY.to_string(), REASON_LINKS.to_string()]
        );
        assert!(r.reasons.iter().all(|r| r.is_positive()));
    }

    #[test]
    fn question_marks_need_more_than_three() {
        let long = "Is this real? Who knows? Does anyone care? Honestly, it is hard to say here";
        assert!(!analyze_heuristics(long).messages().contains(&REASON_PUNCTUATION.to_string()));
        let more = format!("{long}?");
        assert!(analyze_heuristics(&more)
            .messages()
            .contains(&REASON_PUNCTUATION.to_string()));
    }

    #[test]
    fn single_caps_word_is_not_shouting() {
        let r = analyze_heuristics("The NASA mission report was released this morning by the agency.");
        assert!(!r.messages().contains(&REASON_CAPS.to_string()));
        assert_eq!(r.score, 0);
    }

    #[test]
    fn score_is_capped_at_100() {
        let r = analyze_heuristics(
            "SHOCKING BOMBSHELL!!! Secret miracle EXPOSED, banned hoax, conspiracy cover-up, \
             unbelievable and incredible!!!",
        );
        assert_eq!(r.score, 100);
    }
}
