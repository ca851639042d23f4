use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Polarity above this is positive.
    pub const POSITIVE_THRESHOLD: f64 = 0.05;
    /// Polarity below this is negative.
    pub const NEGATIVE_THRESHOLD: f64 = -0.05;

    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > Self::POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < Self::NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            // NaN lands here too
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(AppError::InternalError(format!("Unknown sentiment label: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(SentimentLabel::from_polarity(1.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(0.06), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(0.05), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.05), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.06), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_polarity(f64::NAN), SentimentLabel::Neutral);
    }

    #[test]
    fn test_label_text_round_trips_through_storage_form() {
        for label in [SentimentLabel::Positive, SentimentLabel::Negative, SentimentLabel::Neutral] {
            assert_eq!(label.as_str().parse::<SentimentLabel>().unwrap(), label);
        }
        assert!("Positivo".parse::<SentimentLabel>().is_err());
    }
}
