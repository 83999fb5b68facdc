//! Time-bucketed trend aggregation and window comparisons.
//!
//! Bucketization always produces the fixed bucket count in chronological
//! order; empty buckets are included with zero counts so the shape of the
//! result is the same for every call with the same granularity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use resenha_core::{classify_rating, Review, Sentiment};

/// Number of buckets produced per aggregation call.
pub const BUCKET_COUNT: usize = 6;

/// Lookback window keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGranularity {
    /// Trailing 7 days
    Week,
    /// Trailing 30 days
    Month,
    /// Trailing 90 days
    Quarter,
    /// Trailing year
    Year,
}

impl TrendGranularity {
    /// Parse a period keyword (`7d`, `30d`, `90d`, `1y`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "7d" => Some(Self::Week),
            "30d" => Some(Self::Month),
            "90d" => Some(Self::Quarter),
            "1y" => Some(Self::Year),
            _ => None,
        }
    }

    /// The period keyword.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::Year => "1y",
        }
    }

    /// Lookback window length in days.
    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }
}

impl std::fmt::Display for TrendGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sentiment and rating metrics for one time slice.
///
/// Produced fresh on every aggregation call; never persisted or mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendBucket {
    /// Display label for the bucket (start date, dd/mm)
    pub period: String,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total: u64,
    /// Mean rating of the bucket's reviews, 0 when empty
    pub average_rating: f64,
}

/// Bucket a review collection into fixed-width time slices.
///
/// The lookback window ends at `now` and spans `granularity.days()` days,
/// split into exactly [`BUCKET_COUNT`] equal-width buckets, oldest first.
/// Buckets are half-open on the right except the last, which includes the
/// window end so no in-window review is dropped.
pub fn bucketize(
    reviews: &[Review],
    granularity: TrendGranularity,
    now: DateTime<Utc>,
) -> Vec<TrendBucket> {
    let window = Duration::days(granularity.days());
    let start = now - window;
    let width = window / BUCKET_COUNT as i32;

    (0..BUCKET_COUNT)
        .map(|i| {
            let bucket_start = start + width * i as i32;
            let bucket_end = bucket_start + width;
            let last = i == BUCKET_COUNT - 1;

            let mut bucket = TrendBucket {
                period: bucket_start.format("%d/%m").to_string(),
                positive: 0,
                neutral: 0,
                negative: 0,
                total: 0,
                average_rating: 0.0,
            };

            let mut rating_sum = 0u64;
            for review in reviews.iter().filter(|r| {
                r.date >= bucket_start && (r.date < bucket_end || (last && r.date == bucket_end))
            }) {
                match classify_rating(review.rating) {
                    Sentiment::Positive => bucket.positive += 1,
                    Sentiment::Neutral => bucket.neutral += 1,
                    Sentiment::Negative => bucket.negative += 1,
                }
                bucket.total += 1;
                rating_sum += review.rating as u64;
            }

            if bucket.total > 0 {
                bucket.average_rating = rating_sum as f64 / bucket.total as f64;
            }
            bucket
        })
        .collect()
}

/// Direction of a metric between two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// A metric compared between the current and previous window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComparisonMetric {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    /// Percentage change relative to the previous window; 0 when the
    /// previous window is empty, to avoid dividing by zero.
    pub change_percentage: f64,
    pub trend: TrendDirection,
}

impl ComparisonMetric {
    fn compute(current: f64, previous: f64) -> Self {
        let change = current - previous;
        let change_percentage = if previous == 0.0 {
            0.0
        } else {
            change / previous * 100.0
        };
        let trend = if change > 0.0 {
            TrendDirection::Up
        } else if change < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        };
        Self {
            current,
            previous,
            change,
            change_percentage,
            trend,
        }
    }
}

/// Comparison of the trailing 30 days against the 31-60 day window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowComparison {
    pub review_count: ComparisonMetric,
    pub average_rating: ComparisonMetric,
    /// Percentage of reviews rated 4 or above
    pub satisfaction_rate: ComparisonMetric,
}

/// Compare the current window (trailing 30 days) with the previous one
/// (31-60 days back).
pub fn compare_windows(reviews: &[Review], now: DateTime<Utc>) -> WindowComparison {
    let month = Duration::days(30);
    let current: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.date > now - month && r.date <= now)
        .collect();
    let previous: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.date > now - month * 2 && r.date <= now - month)
        .collect();

    WindowComparison {
        review_count: ComparisonMetric::compute(current.len() as f64, previous.len() as f64),
        average_rating: ComparisonMetric::compute(average_rating(&current), average_rating(&previous)),
        satisfaction_rate: ComparisonMetric::compute(
            satisfaction_rate(&current),
            satisfaction_rate(&previous),
        ),
    }
}

fn average_rating(reviews: &[&Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    reviews.iter().map(|r| r.rating as u64).sum::<u64>() as f64 / reviews.len() as f64
}

fn satisfaction_rate(reviews: &[&Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    reviews.iter().filter(|r| r.rating >= 4).count() as f64 / reviews.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_count_is_fixed() {
        let now = Utc::now();
        for granularity in [
            TrendGranularity::Week,
            TrendGranularity::Month,
            TrendGranularity::Quarter,
            TrendGranularity::Year,
        ] {
            let buckets = bucketize(&[], granularity, now);
            assert_eq!(buckets.len(), BUCKET_COUNT);
            assert!(buckets.iter().all(|b| b.total == 0));
            assert!(buckets.iter().all(|b| b.average_rating == 0.0));
        }
    }

    #[test]
    fn test_buckets_chronological_and_complete() {
        let now = Utc::now();
        // One review per day over the last week.
        let reviews: Vec<Review> = (0..7)
            .map(|i| {
                Review::new(format!("r{}", i), "p1", 5, "")
                    .with_date(now - Duration::days(i) - Duration::hours(1))
            })
            .collect();

        let buckets = bucketize(&reviews, TrendGranularity::Week, now);
        assert_eq!(buckets.len(), BUCKET_COUNT);

        let in_window = reviews
            .iter()
            .filter(|r| r.date >= now - Duration::days(7))
            .count() as u64;
        let bucketed: u64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(bucketed, in_window);
    }

    #[test]
    fn test_bucket_sentiment_counts() {
        let now = Utc::now();
        let reviews = vec![
            Review::new("r1", "p1", 5, "").with_date(now - Duration::hours(1)),
            Review::new("r2", "p1", 3, "").with_date(now - Duration::hours(2)),
            Review::new("r3", "p1", 1, "").with_date(now - Duration::hours(3)),
        ];

        let buckets = bucketize(&reviews, TrendGranularity::Week, now);
        let last = buckets.last().unwrap();
        assert_eq!(last.positive, 1);
        assert_eq!(last.neutral, 1);
        assert_eq!(last.negative, 1);
        assert_eq!(last.total, 3);
        assert!((last.average_rating - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_window_reviews_excluded() {
        let now = Utc::now();
        let reviews = vec![
            Review::new("r1", "p1", 5, "").with_date(now - Duration::days(10)),
            Review::new("r2", "p1", 5, "").with_date(now + Duration::days(1)),
        ];
        let buckets = bucketize(&reviews, TrendGranularity::Week, now);
        assert_eq!(buckets.iter().map(|b| b.total).sum::<u64>(), 0);
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!(TrendGranularity::from_str("7d"), Some(TrendGranularity::Week));
        assert_eq!(TrendGranularity::from_str("30d"), Some(TrendGranularity::Month));
        assert_eq!(TrendGranularity::from_str("90d"), Some(TrendGranularity::Quarter));
        assert_eq!(TrendGranularity::from_str("1y"), Some(TrendGranularity::Year));
        assert_eq!(TrendGranularity::from_str("14d"), None);
    }

    #[test]
    fn test_comparison_basic() {
        let now = Utc::now();
        let mut reviews = Vec::new();
        // Current window: four 5-star reviews.
        for i in 0..4 {
            reviews.push(
                Review::new(format!("c{}", i), "p1", 5, "").with_date(now - Duration::days(i + 1)),
            );
        }
        // Previous window: two 1-star reviews.
        for i in 0..2 {
            reviews.push(
                Review::new(format!("p{}", i), "p1", 1, "").with_date(now - Duration::days(35 + i)),
            );
        }

        let comparison = compare_windows(&reviews, now);
        assert_eq!(comparison.review_count.current, 4.0);
        assert_eq!(comparison.review_count.previous, 2.0);
        assert_eq!(comparison.review_count.change, 2.0);
        assert_eq!(comparison.review_count.change_percentage, 100.0);
        assert_eq!(comparison.review_count.trend, TrendDirection::Up);

        assert_eq!(comparison.average_rating.trend, TrendDirection::Up);
        assert_eq!(comparison.satisfaction_rate.current, 100.0);
        assert_eq!(comparison.satisfaction_rate.previous, 0.0);
    }

    #[test]
    fn test_comparison_empty_previous_window() {
        let now = Utc::now();
        let reviews =
            vec![Review::new("r1", "p1", 4, "").with_date(now - Duration::days(2))];

        let comparison = compare_windows(&reviews, now);
        // No division by zero: percentage is 0 when previous is empty.
        assert_eq!(comparison.review_count.change_percentage, 0.0);
        assert_eq!(comparison.review_count.trend, TrendDirection::Up);
    }

    #[test]
    fn test_comparison_stable() {
        let comparison = compare_windows(&[], Utc::now());
        assert_eq!(comparison.review_count.trend, TrendDirection::Stable);
        assert_eq!(comparison.average_rating.change, 0.0);
    }
}
