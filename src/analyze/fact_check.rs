//! Fact-check adapter: provider abstraction + time-bounded cache + rating normalization.
//!
//! The aggregator only sees the `FactChecker` contract:
//! - `is_available()`: a credential is configured (missing key = degraded mode, not an error)
//! - `query_claims()`: never fails past its boundary; errors land in `FactCheckResult.error`
//! - `score_claims()`: pure mean of normalized ratings, 50 when nothing is normalizable
//!
//! The real provider talks to the Google Fact Check Tools claim-search API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyze::cache::{normalize_key, FactCheckCache, InMemoryCache};
use crate::clock::Clock;
use crate::config::FactCheckConfig;

pub const ENV_TEST_MODE: &str = "FACT_CHECK_TEST_MODE";

const MIN_SENTENCE_CHARS: usize = 20;
const MAX_QUERY_CHARS: usize = 200;
const NEUTRAL_SCORE: f64 = 50.0;
const UNKNOWN_RATING: &str = "Unknown";

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_date: Option<String>,
    /// Publisher's textual rating, e.g. "Mostly False".
    pub rating: String,
    /// 0 = true .. 100 = false; `None` when the rating text is not recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_rating: Option<u8>,
    pub url: String,
    pub publisher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub available: bool,
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FactCheckResult {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            claims: Vec::new(),
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            available: true,
            claims: Vec::new(),
            error: None,
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            available: true,
            claims: Vec::new(),
            error: Some(msg.into()),
        }
    }
}

/// Collaborator contract consumed by the aggregator.
#[async_trait]
pub trait FactChecker: Send + Sync {
    fn is_available(&self) -> bool;
    async fn query_claims(&self, text: &str) -> FactCheckResult;
    /// Provider name for diagnostics/logs.
    fn provider_name(&self) -> &'static str;
}

pub type DynFactChecker = Arc<dyn FactChecker>;

/// Unweighted mean of the normalized ratings that exist; 50 if none do.
pub fn score_claims(result: &FactCheckResult) -> f64 {
    let rated: Vec<f64> = result
        .claims
        .iter()
        .filter_map(|c| c.normalized_rating)
        .map(f64::from)
        .collect();
    if rated.is_empty() {
        return NEUTRAL_SCORE;
    }
    rated.iter().sum::<f64>() / rated.len() as f64
}

/// Ordered: more specific phrases first ("mostly false" before "false",
/// "incorrect" before "correct").
const RATING_RULES: &[(&[&str], u8)] = &[
    (&["pants on fire", "pants-on-fire"], 90),
    (&["mostly false", "largely false"], 75),
    (&["mostly true", "largely true"], 25),
    (&["half true", "half-true", "mixed", "mixture"], 50),
    (&["misleading"], 70),
    (&["satire"], 85),
    (&["unproven", "unverified", "unsubstantiated"], 50),
    (&["false", "fake", "incorrect", "inaccurate", "untrue"], 90),
    (&["true", "correct", "accurate"], 10),
];

/// Map a publisher's textual rating onto the 0..=100 falseness scale.
pub fn normalize_rating(rating: &str) -> Option<u8> {
    let r = rating.to_lowercase();
    RATING_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| r.contains(n)))
        .map(|(_, v)| *v)
}

/// Search query: the first sentence when it is long enough to be meaningful,
/// otherwise the head of the text. Capped at 200 chars.
pub fn build_query(text: &str) -> String {
    let first = text.split(['.', '!', '?']).next().unwrap_or("").trim();
    let base = if first.chars().count() > MIN_SENTENCE_CHARS {
        first
    } else {
        text.trim()
    };
    base.chars()
        .take(MAX_QUERY_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Factory: build a checker according to config and environment variables.
///
/// * If `FACT_CHECK_TEST_MODE=mock`, returns a cached static provider (one "False" claim).
/// * Else if no API key is configured, returns `DisabledFactChecker`.
/// * Else builds the Google provider wrapped with the in-memory cache.
pub fn build_fact_checker(cfg: &FactCheckConfig, clock: Arc<dyn Clock>) -> DynFactChecker {
    let cache: Arc<dyn FactCheckCache> = Arc::new(InMemoryCache::new(
        ChronoDuration::seconds(cfg.cache_ttl_secs),
        clock,
    ));

    if std::env::var(ENV_TEST_MODE)
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        let provider = StaticProvider::ok(vec![Claim {
            text: "Mock claim".to_string(),
            claimant: None,
            claim_date: None,
            rating: "False".to_string(),
            normalized_rating: Some(90),
            url: "https://example.org/fact-check/mock".to_string(),
            publisher: "Mock Fact Check".to_string(),
            review_date: None,
        }]);
        return Arc::new(CachingFactChecker::new(provider, cache, cfg.max_claims));
    }

    if cfg.api_key.trim().is_empty() {
        debug!(target: "fact_check", "no API key configured; fact-check disabled");
        return Arc::new(DisabledFactChecker);
    }

    match GoogleFactCheckProvider::new(cfg) {
        Ok(provider) => Arc::new(CachingFactChecker::new(provider, cache, cfg.max_claims)),
        Err(e) => {
            warn!(target: "fact_check", error = %e, "failed to build HTTP client; fact-check disabled");
            Arc::new(DisabledFactChecker)
        }
    }
}

// ------------------------------------------------------------
// Provider abstraction + concrete providers
// ------------------------------------------------------------

/// Low-level provider: does the *real* remote call. Separated so the same caching
/// wrapper serves production and tests.
#[async_trait]
pub trait FactCheckProvider: Send + Sync + 'static {
    async fn search_claims(&self, query: &str, max_claims: usize) -> Result<Vec<Claim>>;
    fn name(&self) -> &'static str;
    fn is_configured(&self) -> bool {
        true
    }
}

/// Google Fact Check Tools `claims:search`.
pub struct GoogleFactCheckProvider {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    language_code: String,
}

impl GoogleFactCheckProvider {
    pub fn new(cfg: &FactCheckConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("fake-news-analyzer/0.1 (+github.com/lumlich/fake-news-analyzer)")
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.trim().to_string(),
            endpoint: cfg.endpoint.clone(),
            language_code: cfg.language_code.clone(),
        })
    }
}

#[async_trait]
impl FactCheckProvider for GoogleFactCheckProvider {
    async fn search_claims(&self, query: &str, max_claims: usize) -> Result<Vec<Claim>> {
        let page_size = max_claims.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("query", query),
                ("key", self.api_key.as_str()),
                ("pageSize", page_size.as_str()),
                ("languageCode", self.language_code.as_str()),
            ])
            .send()
            .await
            .context("fact-check request failed")?
            .error_for_status()
            .context("fact-check API returned an error status")?;

        let body: SearchResponse = resp
            .json()
            .await
            .context("decoding fact-check response")?;
        Ok(claims_from_response(body, max_claims))
    }

    fn name(&self) -> &'static str {
        "google"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    claims: Vec<ApiClaim>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiClaim {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    claimant: Option<String>,
    #[serde(default)]
    claim_date: Option<String>,
    #[serde(default)]
    claim_review: Vec<ApiReview>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiReview {
    #[serde(default)]
    publisher: Option<ApiPublisher>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    review_date: Option<String>,
    #[serde(default)]
    textual_rating: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiPublisher {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    site: Option<String>,
}

/// Missing fields are defaulted, never rejected: rating "Unknown", empty strings.
fn claims_from_response(body: SearchResponse, max_claims: usize) -> Vec<Claim> {
    body.claims
        .into_iter()
        .take(max_claims)
        .map(|c| {
            let review = c.claim_review.into_iter().next().unwrap_or_default();
            let rating = review
                .textual_rating
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_RATING.to_string());
            let publisher = review
                .publisher
                .and_then(|p| p.name.or(p.site))
                .unwrap_or_default();
            Claim {
                text: c.text.unwrap_or_default(),
                claimant: c.claimant,
                claim_date: c.claim_date,
                normalized_rating: normalize_rating(&rating),
                rating,
                url: review.url.unwrap_or_default(),
                publisher,
                review_date: review.review_date,
            }
        })
        .collect()
}

/// Canned provider for tests / local runs. Counts calls so cache behavior is observable.
pub struct StaticProvider {
    outcome: std::result::Result<Vec<Claim>, String>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn ok(claims: Vec<Claim>) -> Self {
        Self {
            outcome: Ok(claims),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            outcome: Err(msg.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactCheckProvider for StaticProvider {
    async fn search_claims(&self, _query: &str, max_claims: usize) -> Result<Vec<Claim>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(claims) => Ok(claims.iter().take(max_claims).cloned().collect()),
            Err(msg) => Err(anyhow::anyhow!("{msg}")),
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[async_trait]
impl<P: FactCheckProvider> FactCheckProvider for Arc<P> {
    async fn search_claims(&self, query: &str, max_claims: usize) -> Result<Vec<Claim>> {
        (**self).search_claims(query, max_claims).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }
}

// ------------------------------------------------------------
// Checkers
// ------------------------------------------------------------

/// Used when no credential is configured.
pub struct DisabledFactChecker;

#[async_trait]
impl FactChecker for DisabledFactChecker {
    fn is_available(&self) -> bool {
        false
    }

    async fn query_claims(&self, _text: &str) -> FactCheckResult {
        FactCheckResult::unavailable()
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Provider wrapped with the query cache. Failures are not cached.
pub struct CachingFactChecker<P: FactCheckProvider> {
    inner: P,
    cache: Arc<dyn FactCheckCache>,
    max_claims: usize,
}

impl<P: FactCheckProvider> CachingFactChecker<P> {
    pub fn new(inner: P, cache: Arc<dyn FactCheckCache>, max_claims: usize) -> Self {
        Self {
            inner,
            cache,
            max_claims: max_claims.max(1),
        }
    }
}

#[async_trait]
impl<P: FactCheckProvider> FactChecker for CachingFactChecker<P> {
    fn is_available(&self) -> bool {
        self.inner.is_configured()
    }

    async fn query_claims(&self, text: &str) -> FactCheckResult {
        let query = build_query(text);
        if query.is_empty() {
            return FactCheckResult::empty();
        }

        // 1) Cache lookup.
        let key = normalize_key(&query);
        if let Some(hit) = self.cache.get(&key) {
            metrics::counter!("fact_check_requests_total", "outcome" => "cache_hit").increment(1);
            debug!(target: "fact_check", claims = hit.claims.len(), "cache hit");
            return hit;
        }

        // 2) Real call.
        match self.inner.search_claims(&query, self.max_claims).await {
            Ok(mut claims) => {
                claims.truncate(self.max_claims);
                let result = FactCheckResult {
                    available: true,
                    claims,
                    error: None,
                };
                self.cache.set(&key, result.clone());
                metrics::counter!("fact_check_requests_total", "outcome" => "fetched").increment(1);
                debug!(
                    target: "fact_check",
                    provider = self.inner.name(),
                    claims = result.claims.len(),
                    "claims fetched"
                );
                result
            }
            Err(e) => {
                metrics::counter!("fact_check_requests_total", "outcome" => "error").increment(1);
                warn!(
                    target: "fact_check",
                    provider = self.inner.name(),
                    error = %e,
                    "fact-check lookup failed"
                );
                FactCheckResult::failed(format!("{e:#}"))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}
