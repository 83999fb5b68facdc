//! Resenha Core Crate
//!
//! Shared domain primitives for the Resenha review monitoring platform:
//! review and product types, sentiment classification, keyword extraction
//! and aggregation, issue categorization, and the clock abstraction used
//! by the alerting and reporting engines.

pub mod category;
pub mod clock;
pub mod error;
pub mod keywords;
pub mod review;
pub mod sentiment;

pub use category::{categorize, IssueCategory};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use keywords::{aggregate_keywords, extract_keywords, KeywordStat, DEFAULT_TOP_KEYWORDS};
pub use review::{InMemoryReviewStore, Product, Review, ReviewStore};
pub use sentiment::{
    classify_rating, classify_text, sentiment_distribution, Sentiment, SentimentDistribution,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
