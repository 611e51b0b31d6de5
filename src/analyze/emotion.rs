//! Emotional-manipulation analyzer.
//!
//! Six weighted emotion categories (`lexicon/emotions.json`) plus two typographic signals
//! (runs of `!` and SHOUTED words). Output is a 0..=100 score, triggers ranked by intensity,
//! the dominant lexicon category and a three-level severity.
//!
//! Scoring per category: `intensity = matches × weight`, contributing `intensity × 8` to the
//! raw total. Trigger intensity is rescaled to `min(100, round(intensity × 20))`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const CATEGORY_POINTS: f64 = 8.0;
const TRIGGER_SCALE: f64 = 20.0;

const EXCLAMATION_MIN_RUNS: usize = 2;
const EXCLAMATION_POINTS: f64 = 5.0;
const EXCLAMATION_INTENSITY: u32 = 15;

const CAPS_MIN_WORDS: usize = 2;
const CAPS_POINTS: f64 = 4.0;
const CAPS_INTENSITY: u32 = 12;

pub const MEDIUM_THRESHOLD: u8 = 25;
pub const HIGH_THRESHOLD: u8 = 55;

pub const LABEL_PUNCTUATION: &str = "Excessive Punctuation";
pub const LABEL_CAPITALIZATION: &str = "Capitalization";

#[derive(Debug, Clone, Deserialize)]
struct EmotionCategory {
    key: String,
    weight: f64,
    words: Vec<String>,
}

static CATEGORIES: Lazy<Vec<EmotionCategory>> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/emotions.json");
    let mut cats: Vec<EmotionCategory> =
        serde_json::from_str(raw).expect("valid emotion lexicon");
    for c in cats.iter_mut() {
        for w in c.words.iter_mut() {
            *w = w.to_lowercase();
        }
    }
    cats
});

static EXCLAMATION_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!+").expect("exclamation regex"));
static CAPS_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z]{3,}\b").expect("caps regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
}

impl SeverityLevel {
    pub fn from_score(score: u8) -> Self {
        if score < MEDIUM_THRESHOLD {
            SeverityLevel::Low
        } else if score < HIGH_THRESHOLD {
            SeverityLevel::Medium
        } else {
            SeverityLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "low",
            SeverityLevel::Medium => "medium",
            SeverityLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalTrigger {
    pub category: String,
    pub words: Vec<String>,
    /// 0..=100
    pub intensity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalAnalysisResult {
    pub score: u8,
    pub triggers: Vec<EmotionalTrigger>,
    pub dominant_category: Option<String>,
    pub level: SeverityLevel,
}

impl EmotionalAnalysisResult {
    /// Trigger labels in ranked order, for reason strings.
    pub fn trigger_labels(&self) -> Vec<&str> {
        self.triggers.iter().map(|t| t.category.as_str()).collect()
    }
}

pub fn analyze_emotions(text: &str) -> EmotionalAnalysisResult {
    let lower = text.to_lowercase();
    let mut total = 0.0f64;
    let mut triggers: Vec<EmotionalTrigger> = Vec::new();
    let mut dominant: Option<(&str, f64)> = None;

    for cat in CATEGORIES.iter() {
        let words: Vec<String> = cat
            .words
            .iter()
            .filter(|w| lower.contains(w.as_str()))
            .cloned()
            .collect();
        if words.is_empty() {
            continue;
        }

        let intensity = words.len() as f64 * cat.weight;
        total += intensity * CATEGORY_POINTS;

        // Strictly greater: ties keep the category seen first.
        let is_new_best = match dominant {
            None => true,
            Some((_, best)) => intensity > best,
        };
        if is_new_best {
            dominant = Some((cat.key.as_str(), intensity));
        }

        triggers.push(EmotionalTrigger {
            category: render_label(&cat.key),
            words,
            intensity: (intensity * TRIGGER_SCALE).round().min(100.0) as u8,
        });
    }

    let runs: Vec<String> = EXCLAMATION_RUN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    if runs.len() > EXCLAMATION_MIN_RUNS {
        let n = runs.len();
        total += n as f64 * EXCLAMATION_POINTS;
        triggers.push(EmotionalTrigger {
            category: LABEL_PUNCTUATION.to_string(),
            words: dedup_keep_order(runs),
            intensity: capped_intensity(n, EXCLAMATION_INTENSITY),
        });
    }

    let shouted: Vec<String> = CAPS_WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    if shouted.len() > CAPS_MIN_WORDS {
        let n = shouted.len();
        total += n as f64 * CAPS_POINTS;
        triggers.push(EmotionalTrigger {
            category: LABEL_CAPITALIZATION.to_string(),
            words: dedup_keep_order(shouted),
            intensity: capped_intensity(n, CAPS_INTENSITY),
        });
    }

    // Stable sort: equal intensities keep insertion order.
    triggers.sort_by(|a, b| b.intensity.cmp(&a.intensity));

    let score = total.clamp(0.0, 100.0).round() as u8;
    EmotionalAnalysisResult {
        score,
        triggers,
        dominant_category: dominant.map(|(k, _)| render_label(k)),
        level: SeverityLevel::from_score(score),
    }
}

/// "clickbait" -> "Clickbait", "emotionalAppeal" -> "Emotional Appeal".
pub fn render_label(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }
    out
}

fn capped_intensity(count: usize, per_item: u32) -> u8 {
    (count as u32).saturating_mul(per_item).min(100) as u8
}

fn dedup_keep_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        if !out.contains(&it) {
            out.push(it);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_loads_six_categories() {
        let keys: Vec<&str> = CATEGORIES.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["fear", "anger", "urgency", "sensationalism", "manipulation", "clickbait"]
        );
        assert!(CATEGORIES.iter().all(|c| (1.0..=1.5).contains(&c.weight)));
    }

    #[test]
    fn neutral_text_is_low() {
        let r = analyze_emotions("The committee met on Tuesday to review the annual budget.");
        assert_eq!(r.score, 0);
        assert!(r.triggers.is_empty());
        assert_eq!(r.dominant_category, None);
        assert_eq!(r.level, SeverityLevel::Low);
    }

    #[test]
    fn clickbait_headline_ranks_triggers() {
        let r = analyze_emotions(
            "BREAKING: Scientists SHOCKING discovery!!! You won't believe what happens next!",
        );
        // urgency 1.1*8 + sensationalism 1.2*8 + clickbait 2*1.0*8 = 34.4
        assert_eq!(r.score, 34);
        assert_eq!(r.level, SeverityLevel::Medium);
        assert_eq!(r.dominant_category.as_deref(), Some("Clickbait"));
        assert_eq!(r.trigger_labels(), vec!["Clickbait", "Sensationalism", "Urgency"]);
        assert_eq!(r.triggers[0].intensity, 40);
        assert_eq!(
            r.triggers[0].words,
            vec!["you won't believe".to_string(), "what happens next".to_string()]
        );
    }

    #[test]
    fn exactly_25_is_medium() {
        // five separate `!` runs -> 5 * 5 = 25
        let r = analyze_emotions("x! x! x! x! x!");
        assert_eq!(r.score, 25);
        assert_eq!(r.level, SeverityLevel::Medium);
        assert_eq!(r.trigger_labels(), vec![LABEL_PUNCTUATION]);
        assert_eq!(r.triggers[0].intensity, 75);
        assert_eq!(r.dominant_category, None);
    }

    #[test]
    fn exactly_55_is_high() {
        let r = analyze_emotions(&"x! ".repeat(11));
        assert_eq!(r.score, 55);
        assert_eq!(r.level, SeverityLevel::High);
        assert_eq!(r.triggers[0].intensity, 100);
    }

    #[test]
    fn two_exclamation_runs_do_not_trigger() {
        let r = analyze_emotions("x!!!!!! y!!!!");
        assert_eq!(r.score, 0);
        assert!(r.triggers.is_empty());
    }

    #[test]
    fn capitalization_needs_three_words() {
        let two = analyze_emotions("THE END is near");
        assert!(two.triggers.is_empty());

        let three = analyze_emotions("THE END WAS near");
        assert_eq!(three.score, 12);
        assert_eq!(three.trigger_labels(), vec![LABEL_CAPITALIZATION]);
        assert_eq!(three.triggers[0].intensity, 36);
    }

    #[test]
    fn dominant_tie_keeps_first_category() {
        // fear 1.2 vs sensationalism 1.2 -> fear comes first in list order
        let r = analyze_emotions("a deadly and stunning result");
        assert_eq!(r.dominant_category.as_deref(), Some("Fear"));
    }

    #[test]
    fn score_is_clamped() {
        let r = analyze_emotions(
            "They don't want you to know the truth about the hidden agenda! Wake up, sheeple! \
             The secret cover-up is EXPOSED! Mainstream media! Outrage! Scandal! Corrupt evil!",
        );
        assert_eq!(r.score, 100);
        assert_eq!(r.level, SeverityLevel::High);
        assert_eq!(r.dominant_category.as_deref(), Some("Manipulation"));
    }

    #[test]
    fn render_label_splits_camel_case() {
        assert_eq!(render_label("fear"), "Fear");
        assert_eq!(render_label("emotionalAppeal"), "Emotional Appeal");
        assert_eq!(render_label(""), "");
    }
}
