use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::models::SentimentLabel;
use crate::services::lexicon::{INTENSIFIERS, NEGATORS, POLARITY};
use crate::{AppError, Result};

// Negated opinion words are flipped and damped
const NEGATION_FACTOR: f64 = -0.5;
// A negator stops applying after this many unrelated words
const NEGATION_WINDOW: usize = 3;

/// Produces a polarity score in [-1, 1] for a piece of text.
#[async_trait]
pub trait PolarityScorer: Send + Sync {
    async fn polarity(&self, text: &str) -> Result<f64>;
    fn name(&self) -> &'static str;
}

/// Deterministic word-list scorer for Spanish and English text.
///
/// Each opinion word contributes its polarity, scaled by any intensifiers
/// directly before it and flipped when a negator appeared shortly before.
/// The score is the mean of those contributions, or 0.0 when the text holds
/// no opinion words.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> f64 {
        let mut contributions = Vec::new();
        let mut intensity = 1.0;
        let mut negation_left = 0usize;

        for token in tokenize(text) {
            if NEGATORS.contains(&token.as_str()) {
                negation_left = NEGATION_WINDOW;
                continue;
            }
            if let Some(factor) = lookup(INTENSIFIERS, &token) {
                intensity *= factor;
                continue;
            }

            if let Some(polarity) = lookup(POLARITY, &token) {
                let mut value = polarity * intensity;
                if negation_left > 0 {
                    value *= NEGATION_FACTOR;
                }
                contributions.push(value.clamp(-1.0, 1.0));
                negation_left = 0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
            intensity = 1.0;
        }

        if contributions.is_empty() {
            return 0.0;
        }
        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

#[async_trait]
impl PolarityScorer for LexiconScorer {
    async fn polarity(&self, text: &str) -> Result<f64> {
        Ok(self.score(text))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

// Quotes around a word are dropped; apostrophes inside it ("don't") are kept.
// Combining accents are stripped, so decomposed "increíble" reads as "increible".
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || is_combining_mark(c)))
        .map(|word| word.trim_matches('\''))
        .map(|word| {
            word.chars()
                .filter(|c| !is_combining_mark(*c))
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

fn lookup(table: &[(&str, f64)], token: &str) -> Option<f64> {
    table
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, value)| *value)
}

#[derive(Serialize)]
struct PolarityRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct PolarityResponse {
    polarity: f64,
}

/// Scores text through an external HTTP service.
///
/// Sends `POST {url}` with `{"text": ...}` and expects `{"polarity": f64}`.
pub struct HttpPolarityScorer {
    url: String,
    http_client: reqwest::Client,
}

impl HttpPolarityScorer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PolarityScorer for HttpPolarityScorer {
    async fn polarity(&self, text: &str) -> Result<f64> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&PolarityRequest { text })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::InternalError(format!("Sentiment service request failed: {}", e)))?;

        let body: PolarityResponse = response.json().await.map_err(|e| {
            AppError::InternalError(format!("Sentiment service returned invalid body: {}", e))
        })?;

        if !body.polarity.is_finite() {
            return Err(AppError::InternalError(
                "Sentiment service returned a non-finite polarity".to_string(),
            ));
        }
        Ok(body.polarity.clamp(-1.0, 1.0))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Tags post content with a [`SentimentLabel`].
///
/// Tagging never fails: if the configured scorer errors, the built-in
/// lexicon scorer is used instead.
pub struct SentimentService {
    scorer: Arc<dyn PolarityScorer>,
    fallback: LexiconScorer,
}

impl SentimentService {
    pub fn new() -> Self {
        Self::with_scorer(Arc::new(LexiconScorer::new()))
    }

    pub fn with_scorer(scorer: Arc<dyn PolarityScorer>) -> Self {
        Self {
            scorer,
            fallback: LexiconScorer::new(),
        }
    }

    /// Picks the HTTP scorer when a service URL is configured.
    pub fn from_service_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => {
                tracing::info!("🧠 SENTIMENT: Using external polarity service at {}", url);
                Self::with_scorer(Arc::new(HttpPolarityScorer::new(url)))
            }
            None => {
                tracing::info!("🧠 SENTIMENT: Using built-in lexicon scorer");
                Self::new()
            }
        }
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    pub async fn tag(&self, text: &str) -> SentimentLabel {
        if text.trim().is_empty() {
            return SentimentLabel::Neutral;
        }

        let polarity = match self.scorer.polarity(text).await {
            Ok(polarity) => polarity,
            Err(e) => {
                warn!(
                    "⚠️ SENTIMENT: {} scorer failed, using lexicon: {}",
                    self.scorer.name(),
                    e
                );
                self.fallback.score(text)
            }
        };

        let label = SentimentLabel::from_polarity(polarity);
        debug!("🧠 SENTIMENT: polarity {:.3} -> {}", polarity, label);
        label
    }
}

impl Default for SentimentService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingScorer;

    #[async_trait]
    impl PolarityScorer for FailingScorer {
        async fn polarity(&self, _text: &str) -> Result<f64> {
            Err(AppError::InternalError("offline".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct FixedScorer(f64);

    #[async_trait]
    impl PolarityScorer for FixedScorer {
        async fn polarity(&self, _text: &str) -> Result<f64> {
            Ok(self.0)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_reference_sentences() {
        let service = SentimentService::new();
        assert_eq!(service.tag("¡Qué día más guay hace hoy!").await, SentimentLabel::Positive);
        assert_eq!(service.tag("El cielo es azul.").await, SentimentLabel::Neutral);
        assert_eq!(service.tag("Estoy muy triste").await, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_empty_text_is_neutral() {
        let service = SentimentService::with_scorer(Arc::new(FixedScorer(0.9)));
        assert_eq!(service.tag("").await, SentimentLabel::Neutral);
        assert_eq!(service.tag("   \n\t").await, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn test_tagging_is_deterministic() {
        let service = SentimentService::new();
        let text = "I love this, but the weather is terrible";
        let first = service.tag(text).await;
        for _ in 0..5 {
            assert_eq!(service.tag(text).await, first);
        }
    }

    #[tokio::test]
    async fn test_failing_scorer_falls_back_to_lexicon() {
        let service = SentimentService::with_scorer(Arc::new(FailingScorer));
        assert_eq!(service.tag("What a wonderful day").await, SentimentLabel::Positive);
        assert_eq!(service.scorer_name(), "failing");
    }

    #[tokio::test]
    async fn test_scorer_thresholds() {
        let positive = SentimentService::with_scorer(Arc::new(FixedScorer(0.2)));
        let boundary = SentimentService::with_scorer(Arc::new(FixedScorer(0.05)));
        let negative = SentimentService::with_scorer(Arc::new(FixedScorer(-0.2)));
        assert_eq!(positive.tag("x").await, SentimentLabel::Positive);
        assert_eq!(boundary.tag("x").await, SentimentLabel::Neutral);
        assert_eq!(negative.tag("x").await, SentimentLabel::Negative);
    }

    #[test]
    fn test_negation_and_intensifiers() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("not good") < 0.0);
        assert!(scorer.score("no es malo") > 0.0);
        assert!(scorer.score("very good") > scorer.score("good"));
        assert_eq!(scorer.score("nothing to report here"), 0.0);
    }

    #[test]
    fn test_quoted_words_are_scored() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score("Fue 'genial'"), scorer.score("Fue genial"));
        assert!(scorer.score("That was 'great'") > 0.0);
        assert!(scorer.score("'triste'") < 0.0);
        assert!(scorer.score("I don't love it") < 0.0);
        assert_eq!(scorer.score("' '' '"), 0.0);
    }

    #[test]
    fn test_decomposed_accents_match_lexicon() {
        let scorer = LexiconScorer::new();
        let decomposed = "Es incre\u{69}\u{301}ble";
        assert!(scorer.score(decomposed) > 0.0);
        assert_eq!(scorer.score(decomposed), scorer.score("Es increíble"));
        assert!(scorer.score("Estoy ma\u{301}s triste") < scorer.score("Estoy triste"));
    }

    #[tokio::test]
    async fn test_quoted_and_decomposed_text_is_tagged() {
        let service = SentimentService::new();
        assert_eq!(service.tag("Fue 'genial'").await, SentimentLabel::Positive);
        assert_eq!(service.tag("Es incre\u{69}\u{301}ble").await, SentimentLabel::Positive);
    }

    #[test]
    fn test_score_stays_in_range() {
        let scorer = LexiconScorer::new();
        let score = scorer.score("super muy muy extremely excellent");
        assert!((-1.0..=1.0).contains(&score));
    }
}
