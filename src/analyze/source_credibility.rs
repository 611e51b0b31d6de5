//! # Source Credibility
//!
//! Extracts referenced domains from free text and classifies each one against the
//! reputation tables in `lexicon/domains.json` (trusted / satire / unreliable lists plus
//! suspicious naming patterns).
//!
//! - Extraction order: full URLs → bare `www.` mentions → attribution phrases
//!   ("according to reuters.com"). Domains are de-duplicated across all three.
//! - Classification precedence: trusted → satire → unreliable → `.edu` → `.gov*` →
//!   subdomain of trusted → suspicious pattern → unknown.
//! - Score: higher = less credible. Starts at 50, clamped to [0,100].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::verdict::ReasonKind;

const BASE_SCORE: i32 = 50;
const TRUSTED_POINTS: i32 = -20;
const SATIRE_POINTS: i32 = 30;
const UNRELIABLE_POINTS: i32 = 40;
const MIXED_POINTS: i32 = 15;
const NO_SOURCES_POINTS: i32 = 10;
const VAGUE_ATTRIBUTION_POINTS: i32 = 15;

const UNTRUSTED_SCORE: i32 = 70;
const TRUSTED_SCORE: i32 = 30;

pub const TRUSTED_FACTOR_PREFIX: &str = "References trusted sources";
pub const FACTOR_NO_SOURCES: &str = "No external sources referenced";
pub const FACTOR_VAGUE_ATTRIBUTION: &str = "Uses vague attribution without citing trusted sources";

pub const CATEGORY_EDUCATIONAL: &str = "Educational Institution";
pub const CATEGORY_GOVERNMENT: &str = "Government";
pub const CATEGORY_SATIRE: &str = "Satire";
pub const CATEGORY_SUSPICIOUS: &str = "Suspicious Domain Pattern";

#[derive(Debug, Deserialize)]
struct DomainTablesRaw {
    trusted: BTreeMap<String, String>,
    satire: Vec<String>,
    unreliable: BTreeMap<String, String>,
    suspicious_patterns: Vec<String>,
}

struct DomainTables {
    trusted: BTreeMap<String, String>,
    satire: BTreeSet<String>,
    unreliable: BTreeMap<String, String>,
    suspicious: Vec<Regex>,
}

static TABLES: Lazy<DomainTables> = Lazy::new(|| {
    let raw = include_str!("../../lexicon/domains.json");
    let t: DomainTablesRaw = serde_json::from_str(raw).expect("valid domain tables");
    DomainTables {
        trusted: t.trusted,
        satire: t.satire.into_iter().collect(),
        unreliable: t.unreliable,
        suspicious: t
            .suspicious_patterns
            .iter()
            .map(|p| Regex::new(p).expect("suspicious domain regex"))
            .collect(),
    }
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://(?:www\.)?([a-z0-9.-]+)").expect("url regex"));
static BARE_WWW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bwww\.([a-z0-9-]+(?:\.[a-z0-9-]+)+)").expect("bare www regex")
});
static ATTRIBUTION_DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:from|via|source:|according to|reported by)\s+([a-z0-9-]+\.[a-z]{2,}(?:\.[a-z]{2,})?)\b",
    )
    .expect("attribution regex")
});
static VAGUE_ATTRIBUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)according to|sources say|reports indicate|experts claim")
        .expect("vague attribution regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reputation {
    Trusted,
    Satire,
    Unreliable,
    Mixed,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallReputation {
    Trusted,
    Mixed,
    Untrusted,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainClassification {
    pub reputation: Reputation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DomainClassification {
    fn new(reputation: Reputation, category: Option<&str>) -> Self {
        Self {
            reputation,
            category: category.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub domain: String,
    pub reputation: Reputation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCredibilityResult {
    /// 0..=100, higher = less credible.
    pub score: u8,
    pub sources_found: Vec<SourceRecord>,
    pub overall_reputation: OverallReputation,
    pub factors: Vec<String>,
}

/// Polarity of a factor string produced by `analyze_sources`.
pub fn factor_kind(factor: &str) -> ReasonKind {
    if factor.starts_with(TRUSTED_FACTOR_PREFIX) {
        ReasonKind::Credibility
    } else {
        ReasonKind::RedFlag
    }
}

/// Lower-case, drop a leading `www.` and trailing dots/dashes.
fn normalize_domain(raw: &str) -> String {
    let d = raw.trim().to_ascii_lowercase();
    let d = d.trim_end_matches(['.', '-']);
    d.strip_prefix("www.").unwrap_or(d).to_string()
}

/// Domains referenced in `text`, in discovery order, de-duplicated.
pub fn extract_domains(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |raw: &str| {
        let d = normalize_domain(raw);
        if d.contains('.') && !out.contains(&d) {
            out.push(d);
        }
    };

    for re in [&*URL_RE, &*BARE_WWW_RE, &*ATTRIBUTION_DOMAIN_RE] {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                push(m.as_str());
            }
        }
    }
    out
}

/// Pure and total: every input gets a classification.
pub fn classify_domain(domain: &str) -> DomainClassification {
    let d = normalize_domain(domain);
    let t = &*TABLES;

    if let Some(cat) = t.trusted.get(&d) {
        return DomainClassification::new(Reputation::Trusted, Some(cat.as_str()));
    }
    if t.satire.contains(&d) {
        return DomainClassification::new(Reputation::Satire, Some(CATEGORY_SATIRE));
    }
    if let Some(cat) = t.unreliable.get(&d) {
        return DomainClassification::new(Reputation::Unreliable, Some(cat.as_str()));
    }
    if d.ends_with(".edu") {
        return DomainClassification::new(Reputation::Trusted, Some(CATEGORY_EDUCATIONAL));
    }
    if d.ends_with(".gov") || d.ends_with(".gov.uk") || d.ends_with(".gov.au") {
        return DomainClassification::new(Reputation::Trusted, Some(CATEGORY_GOVERNMENT));
    }
    // Subdomain of a trusted outlet (e.g. edition.bbc.com).
    if let Some((_, cat)) = t
        .trusted
        .iter()
        .find(|(k, _)| d.strip_suffix(k.as_str()).is_some_and(|p| p.ends_with('.')))
    {
        return DomainClassification::new(Reputation::Trusted, Some(cat.as_str()));
    }
    if t.suspicious.iter().any(|re| re.is_match(&d)) {
        return DomainClassification::new(Reputation::Mixed, Some(CATEGORY_SUSPICIOUS));
    }
    DomainClassification::new(Reputation::Unknown, None)
}

pub fn analyze_sources(text: &str) -> SourceCredibilityResult {
    let sources: Vec<SourceRecord> = extract_domains(text)
        .into_iter()
        .map(|domain| {
            let c = classify_domain(&domain);
            SourceRecord {
                domain,
                reputation: c.reputation,
                category: c.category,
            }
        })
        .collect();

    let with_rep = |rep: Reputation| {
        sources
            .iter()
            .filter(|s| s.reputation == rep)
            .map(|s| s.domain.as_str())
            .collect::<Vec<&str>>()
    };
    let trusted = with_rep(Reputation::Trusted);
    let satire = with_rep(Reputation::Satire);
    let unreliable = with_rep(Reputation::Unreliable);
    let mixed = with_rep(Reputation::Mixed);

    let mut score = BASE_SCORE;
    let mut factors: Vec<String> = Vec::new();
    let mut factor = |f: String| {
        if !factors.contains(&f) {
            factors.push(f);
        }
    };

    if !trusted.is_empty() {
        score += TRUSTED_POINTS * trusted.len() as i32;
        factor(format!("{TRUSTED_FACTOR_PREFIX}: {}", trusted.join(", ")));
    }
    if !satire.is_empty() {
        score += SATIRE_POINTS * satire.len() as i32;
        factor(format!("References known satire sites: {}", satire.join(", ")));
    }
    if !unreliable.is_empty() {
        score += UNRELIABLE_POINTS * unreliable.len() as i32;
        factor(format!(
            "References sources known for misinformation: {}",
            unreliable.join(", ")
        ));
    }
    if !mixed.is_empty() {
        score += MIXED_POINTS * mixed.len() as i32;
        factor(format!(
            "References domains with suspicious naming patterns: {}",
            mixed.join(", ")
        ));
    }
    if sources.is_empty() {
        score += NO_SOURCES_POINTS;
        factor(FACTOR_NO_SOURCES.to_string());
    }
    if trusted.is_empty() && VAGUE_ATTRIBUTION_RE.is_match(text) {
        score += VAGUE_ATTRIBUTION_POINTS;
        factor(FACTOR_VAGUE_ATTRIBUTION.to_string());
    }

    let score = score.clamp(0, 100);
    let overall_reputation = if !unreliable.is_empty() || score >= UNTRUSTED_SCORE {
        OverallReputation::Untrusted
    } else if !trusted.is_empty() && score < TRUSTED_SCORE {
        OverallReputation::Trusted
    } else if sources.is_empty() {
        OverallReputation::Unknown
    } else {
        OverallReputation::Mixed
    };

    SourceCredibilityResult {
        score: score as u8,
        sources_found: sources,
        overall_reputation,
        factors,
    }
}
