//! Keyword extraction and aggregation.
//!
//! Extraction is a pure tokenizer with a Portuguese stop-word list; no
//! stemming or lemmatization is applied. Aggregation counts mentions across
//! a review collection and tags each surviving keyword with the majority
//! sentiment of its contributing reviews.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::review::Review;
use crate::sentiment::{classify_rating, Sentiment};

/// Default top-N cutoff applied by aggregation call sites.
pub const DEFAULT_TOP_KEYWORDS: usize = 10;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "que", "com", "para", "uma", "não", "nao", "mas", "por", "dos", "das", "este",
        "esta", "esse", "essa", "isso", "muito", "mais", "foi", "ser", "tem", "como",
        "era", "está", "seu", "sua", "meu", "minha", "pelo", "pela", "são", "sao",
        "ela", "ele", "você", "voce", "bem", "já", "até", "ate", "também", "tambem",
        "quando", "porque", "ainda", "depois", "antes", "sobre", "tudo", "nada",
        "tinha", "fazer", "pois", "então", "entao", "aqui", "mesmo", "outro", "outra",
    ]
    .into_iter()
    .collect()
});

/// Extract candidate keyword tokens from free text.
///
/// Lowercases, strips punctuation, splits on whitespace, and drops tokens
/// shorter than `min_len` characters or present in the stop-word list.
/// Duplicates are kept in order of appearance so callers can count them.
pub fn extract_keywords(text: &str, min_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= min_len && !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// A keyword with its mention count and majority-vote sentiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordStat {
    /// The keyword token
    pub keyword: String,
    /// Number of occurrences across the collection
    pub mentions: u64,
    /// Most frequent sentiment among contributing reviews (ties → neutral)
    pub sentiment: Sentiment,
}

/// Aggregate keywords across a review collection.
///
/// Counts occurrences per token, keeps tokens mentioned at least
/// `min_mentions` times, attaches the majority-vote rating sentiment of the
/// reviews each token appeared in, sorts descending by mentions, and
/// truncates to `top_n`.
pub fn aggregate_keywords(
    reviews: &[Review],
    min_len: usize,
    min_mentions: u64,
    top_n: usize,
) -> Vec<KeywordStat> {
    let mut mentions: HashMap<String, u64> = HashMap::new();
    let mut votes: HashMap<String, [u64; 3]> = HashMap::new();

    for review in reviews {
        let sentiment = classify_rating(review.rating);
        let slot = match sentiment {
            Sentiment::Positive => 0,
            Sentiment::Neutral => 1,
            Sentiment::Negative => 2,
        };
        for token in extract_keywords(&review.comment, min_len) {
            *mentions.entry(token.clone()).or_insert(0) += 1;
            votes.entry(token).or_insert([0; 3])[slot] += 1;
        }
    }

    let mut stats: Vec<KeywordStat> = mentions
        .into_iter()
        .filter(|(_, count)| *count >= min_mentions)
        .map(|(keyword, count)| {
            let tally = votes.get(&keyword).copied().unwrap_or([0; 3]);
            KeywordStat {
                keyword,
                mentions: count,
                sentiment: majority_sentiment(tally),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.mentions.cmp(&a.mentions).then(a.keyword.cmp(&b.keyword)));
    stats.truncate(top_n);
    stats
}

/// Majority vote over [positive, neutral, negative] tallies; ties resolve
/// to neutral.
fn majority_sentiment(tally: [u64; 3]) -> Sentiment {
    let [positive, neutral, negative] = tally;
    if positive > neutral && positive > negative {
        Sentiment::Positive
    } else if negative > neutral && negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_drops_stop_words_and_short_tokens() {
        let tokens = extract_keywords("A entrega foi muito boa, mas o produto não chegou", 3);
        assert!(tokens.contains(&"entrega".to_string()));
        assert!(tokens.contains(&"produto".to_string()));
        assert!(!tokens.contains(&"foi".to_string()));
        assert!(!tokens.contains(&"muito".to_string()));
        assert!(!tokens.contains(&"a".to_string()));
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let tokens = extract_keywords("excelente qualidade excelente", 3);
        assert_eq!(tokens, vec!["excelente", "qualidade", "excelente"]);
    }

    #[test]
    fn test_aggregate_single_review() {
        let reviews = vec![Review::new("r1", "p1", 5, "excelente qualidade excelente")];
        let stats = aggregate_keywords(&reviews, 3, 1, DEFAULT_TOP_KEYWORDS);

        let excelente = stats.iter().find(|s| s.keyword == "excelente").unwrap();
        assert_eq!(excelente.mentions, 2);
        assert_eq!(excelente.sentiment, Sentiment::Positive);

        let qualidade = stats.iter().find(|s| s.keyword == "qualidade").unwrap();
        assert_eq!(qualidade.mentions, 1);
        assert_eq!(qualidade.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_aggregate_min_mentions_threshold() {
        let reviews = vec![
            Review::new("r1", "p1", 1, "defeito na tela"),
            Review::new("r2", "p1", 2, "defeito de fábrica"),
        ];
        let stats = aggregate_keywords(&reviews, 3, 2, DEFAULT_TOP_KEYWORDS);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].keyword, "defeito");
        assert_eq!(stats[0].mentions, 2);
        assert_eq!(stats[0].sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_aggregate_majority_vote_tie_is_neutral() {
        let reviews = vec![
            Review::new("r1", "p1", 5, "entrega"),
            Review::new("r2", "p1", 1, "entrega"),
        ];
        let stats = aggregate_keywords(&reviews, 3, 1, DEFAULT_TOP_KEYWORDS);
        assert_eq!(stats[0].sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_aggregate_sorted_and_truncated() {
        let reviews = vec![
            Review::new("r1", "p1", 4, "bateria bateria bateria"),
            Review::new("r2", "p1", 4, "bateria tela tela"),
        ];
        let stats = aggregate_keywords(&reviews, 3, 1, 1);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].keyword, "bateria");
        assert_eq!(stats[0].mentions, 4);
    }
}
