//! Sentiment classification.
//!
//! Two distinct classifiers exist on purpose and must not be conflated:
//!
//! - [`classify_rating`] maps the star rating to a sentiment and is the
//!   classifier used by the alerting and reporting paths.
//! - [`classify_text`] scans fixed Portuguese word lists and is used only
//!   where no rating is available (marketplace-sync text analysis).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::review::Review;

/// Sentiment label for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Get the sentiment as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Get the sentiment from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "positive" | "positivo" => Some(Self::Positive),
            "neutral" | "neutro" => Some(Self::Neutral),
            "negative" | "negativo" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a review by its star rating.
///
/// Ratings of 4 and above are positive, 2 and below negative, everything
/// else neutral. Total over all ratings; out-of-range values are accepted
/// as-is (range validation is caller-owned).
pub fn classify_rating(rating: u8) -> Sentiment {
    if rating >= 4 {
        Sentiment::Positive
    } else if rating <= 2 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bom", "boa", "ótimo", "otimo", "ótima", "otima", "excelente", "maravilhoso",
        "maravilhosa", "perfeito", "perfeita", "adorei", "amei", "gostei", "recomendo",
        "lindo", "linda", "rápido", "rapido", "rápida", "rapida", "satisfeito", "satisfeita",
        "funciona", "superou", "incrível", "incrivel", "top",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ruim", "péssimo", "pessimo", "péssima", "pessima", "horrível", "horrivel",
        "terrível", "terrivel", "defeito", "quebrado", "quebrada", "demorou", "atraso",
        "atrasado", "decepção", "decepcao", "decepcionado", "decepcionada", "problema",
        "lixo", "enganação", "enganacao", "odiei", "fraco", "fraca", "lento", "lenta",
    ]
    .into_iter()
    .collect()
});

/// Classify free text by scanning fixed positive/negative word lists.
///
/// Whichever list collects more hits wins; ties (including zero hits on
/// both sides) resolve to neutral.
pub fn classify_text(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let positive = words.iter().filter(|w| POSITIVE_WORDS.contains(*w)).count();
    let negative = words.iter().filter(|w| NEGATIVE_WORDS.contains(*w)).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Sentiment counts over a review collection (rating-based).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total: u64,
}

impl SentimentDistribution {
    /// Percentage of positive reviews, 0 when the collection is empty.
    pub fn positive_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.positive as f64 / self.total as f64 * 100.0
        }
    }

    /// Percentage of negative reviews, 0 when the collection is empty.
    pub fn negative_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.negative as f64 / self.total as f64 * 100.0
        }
    }
}

/// Compute the rating-based sentiment distribution of a review collection.
pub fn sentiment_distribution(reviews: &[Review]) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    for review in reviews {
        match classify_rating(review.rating) {
            Sentiment::Positive => dist.positive += 1,
            Sentiment::Neutral => dist.neutral += 1,
            Sentiment::Negative => dist.negative += 1,
        }
        dist.total += 1;
    }
    dist
}
