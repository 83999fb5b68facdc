//! Rule evaluation.
//!
//! Evaluation is a pure function over the rule, the review under test, and
//! a read-only snapshot of the alert history. The history parameter exists
//! only for frequency conditions; everything else is stateless.

use chrono::{DateTime, Duration, Utc};

use resenha_core::{classify_rating, Review, Sentiment};

use crate::alert::{Alert, AlertType};
use crate::error::{Error, Result};
use crate::rule::{AlertRule, ConditionOperator, ConditionType, RuleCondition};

/// Window inspected by frequency conditions.
const FREQUENCY_WINDOW_HOURS: i64 = 24;

/// Evaluate a rule against a review.
///
/// Returns `Ok(true)` only when every condition holds. An empty condition
/// list is vacuously true. Every condition is evaluated, so a malformed
/// condition surfaces as an error even when an earlier condition already
/// failed; the manager uses this to skip and log the whole rule.
pub fn evaluate_rule(
    rule: &AlertRule,
    review: &Review,
    history: &[Alert],
    now: DateTime<Utc>,
) -> Result<bool> {
    let mut fired = true;
    for condition in &rule.conditions {
        fired &= evaluate_condition(condition, review, history, now)?;
    }
    Ok(fired)
}

fn evaluate_condition(
    condition: &RuleCondition,
    review: &Review,
    history: &[Alert],
    now: DateTime<Utc>,
) -> Result<bool> {
    match condition.condition {
        ConditionType::Rating => evaluate_rating(condition, review),
        ConditionType::Keyword => evaluate_keyword(condition, review),
        ConditionType::Sentiment => evaluate_sentiment(condition, review),
        ConditionType::Frequency => evaluate_frequency(condition, review, history, now),
    }
}

fn evaluate_rating(condition: &RuleCondition, review: &Review) -> Result<bool> {
    let threshold: f64 = condition.value.trim().parse().map_err(|_| {
        Error::InvalidCondition(format!("rating value is not numeric: {:?}", condition.value))
    })?;
    let rating = review.rating as f64;

    match condition.operator {
        ConditionOperator::Equals => Ok(rating == threshold),
        ConditionOperator::LessThan => Ok(rating < threshold),
        ConditionOperator::GreaterThan => Ok(rating > threshold),
        op => Err(Error::InvalidCondition(format!(
            "operator {:?} is not applicable to rating conditions",
            op
        ))),
    }
}

fn evaluate_keyword(condition: &RuleCondition, review: &Review) -> Result<bool> {
    let comment = review.comment.to_lowercase();
    let any_match = condition
        .value
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .any(|k| comment.contains(&k));

    match condition.operator {
        ConditionOperator::Contains => Ok(any_match),
        ConditionOperator::NotContains => Ok(!any_match),
        op => Err(Error::InvalidCondition(format!(
            "operator {:?} is not applicable to keyword conditions",
            op
        ))),
    }
}

fn evaluate_sentiment(condition: &RuleCondition, review: &Review) -> Result<bool> {
    let expected = Sentiment::from_str(condition.value.trim()).ok_or_else(|| {
        Error::InvalidCondition(format!("unknown sentiment label: {:?}", condition.value))
    })?;

    match condition.operator {
        ConditionOperator::Equals => Ok(classify_rating(review.rating) == expected),
        op => Err(Error::InvalidCondition(format!(
            "operator {:?} is not applicable to sentiment conditions",
            op
        ))),
    }
}

fn evaluate_frequency(
    condition: &RuleCondition,
    review: &Review,
    history: &[Alert],
    now: DateTime<Utc>,
) -> Result<bool> {
    let threshold: u64 = condition.value.trim().parse().map_err(|_| {
        Error::InvalidCondition(format!(
            "frequency value is not an integer: {:?}",
            condition.value
        ))
    })?;

    match condition.operator {
        ConditionOperator::GreaterThan => {
            let cutoff = now - Duration::hours(FREQUENCY_WINDOW_HOURS);
            let recent = history
                .iter()
                .filter(|a| {
                    matches!(a.alert_type, AlertType::Critical | AlertType::Urgent)
                        && a.product_id == review.product_id
                        && a.date > cutoff
                })
                .count() as u64;
            Ok(recent > threshold)
        }
        op => Err(Error::InvalidCondition(format!(
            "operator {:?} is not applicable to frequency conditions",
            op
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertPriority;
    use crate::rule::RuleCondition;
    use resenha_core::Product;

    fn rating_rule(condition: RuleCondition) -> AlertRule {
        AlertRule::new("test").with_condition(condition)
    }

    #[test]
    fn test_rating_less_than() {
        let rule = rating_rule(RuleCondition::rating_below(3));
        for (rating, expected) in [(1, true), (2, true), (3, false), (4, false), (5, false)] {
            let review = Review::new("r", "p1", rating, "ótimo");
            assert_eq!(
                evaluate_rule(&rule, &review, &[], Utc::now()).unwrap(),
                expected,
                "rating {}",
                rating
            );
        }
    }

    #[test]
    fn test_keyword_contains_any() {
        let rule = rating_rule(RuleCondition::keyword_contains("defeito, quebrado"));
        let hit = Review::new("r", "p1", 3, "Chegou QUEBRADO");
        let miss = Review::new("r", "p1", 3, "tudo certo");

        assert!(evaluate_rule(&rule, &hit, &[], Utc::now()).unwrap());
        assert!(!evaluate_rule(&rule, &miss, &[], Utc::now()).unwrap());
    }

    #[test]
    fn test_keyword_not_contains_none() {
        let rule = rating_rule(RuleCondition::keyword_not_contains("defeito,quebrado"));
        let clean = Review::new("r", "p1", 3, "tudo certo");
        let dirty = Review::new("r", "p1", 3, "veio com defeito");

        assert!(evaluate_rule(&rule, &clean, &[], Utc::now()).unwrap());
        assert!(!evaluate_rule(&rule, &dirty, &[], Utc::now()).unwrap());
    }

    #[test]
    fn test_sentiment_equals() {
        let rule = rating_rule(RuleCondition::sentiment_equals(Sentiment::Negative));
        assert!(evaluate_rule(&rule, &Review::new("r", "p1", 1, ""), &[], Utc::now()).unwrap());
        assert!(!evaluate_rule(&rule, &Review::new("r", "p1", 5, ""), &[], Utc::now()).unwrap());
    }

    #[test]
    fn test_and_semantics() {
        let rule = AlertRule::new("combo")
            .with_condition(RuleCondition::rating_below(3))
            .with_condition(RuleCondition::keyword_contains("defeito"));

        let both = Review::new("r", "p1", 1, "defeito grave");
        let only_rating = Review::new("r", "p1", 1, "não gostei");

        assert!(evaluate_rule(&rule, &both, &[], Utc::now()).unwrap());
        assert!(!evaluate_rule(&rule, &only_rating, &[], Utc::now()).unwrap());
    }

    #[test]
    fn test_empty_conditions_vacuously_true() {
        let rule = AlertRule::new("empty");
        let review = Review::new("r", "p1", 5, "");
        assert!(evaluate_rule(&rule, &review, &[], Utc::now()).unwrap());
    }

    #[test]
    fn test_frequency_threshold() {
        let now = Utc::now();
        let product = Product::new("p1", "Fone");
        let review = Review::new("r", "p1", 1, "");

        let mut history = Vec::new();
        let rule = rating_rule(RuleCondition::frequency_above(5));

        // Five prior critical alerts: 5 > 5 is false, must not fire.
        for i in 0..5 {
            let r = Review::new(format!("r{}", i), "p1", 1, "");
            history.push(Alert::from_review(
                AlertType::Critical,
                AlertPriority::High,
                &r,
                &product,
                now - Duration::hours(1),
            ));
        }
        assert!(!evaluate_rule(&rule, &review, &history, now).unwrap());

        // Sixth prior alert crosses the threshold.
        history.push(Alert::from_review(
            AlertType::Urgent,
            AlertPriority::High,
            &Review::new("r6", "p1", 1, ""),
            &product,
            now - Duration::minutes(5),
        ));
        assert!(evaluate_rule(&rule, &review, &history, now).unwrap());
    }

    #[test]
    fn test_frequency_ignores_old_and_foreign_alerts() {
        let now = Utc::now();
        let product = Product::new("p1", "Fone");
        let review = Review::new("r", "p1", 1, "");
        let rule = rating_rule(RuleCondition::frequency_above(0));

        // Outside the 24h window.
        let stale = Alert::from_review(
            AlertType::Critical,
            AlertPriority::High,
            &Review::new("r1", "p1", 1, ""),
            &product,
            now - Duration::hours(25),
        );
        // Different product.
        let foreign = Alert::from_review(
            AlertType::Critical,
            AlertPriority::High,
            &Review::new("r2", "p2", 1, ""),
            &Product::new("p2", "Outro"),
            now,
        );
        // Non-critical type.
        let mild = Alert::from_review(
            AlertType::Warning,
            AlertPriority::Low,
            &Review::new("r3", "p1", 3, ""),
            &product,
            now,
        );

        assert!(!evaluate_rule(&rule, &review, &[stale, foreign, mild], now).unwrap());
    }

    #[test]
    fn test_invalid_condition_is_an_error() {
        let rule = rating_rule(RuleCondition {
            condition: ConditionType::Rating,
            operator: ConditionOperator::Contains,
            value: "3".to_string(),
        });
        let review = Review::new("r", "p1", 3, "");
        assert!(evaluate_rule(&rule, &review, &[], Utc::now()).is_err());
    }

    #[test]
    fn test_malformed_value_is_an_error_even_after_false_condition() {
        let rule = AlertRule::new("broken")
            .with_condition(RuleCondition::rating_below(1))
            .with_condition(RuleCondition {
                condition: ConditionType::Rating,
                operator: ConditionOperator::Equals,
                value: "abc".to_string(),
            });
        let review = Review::new("r", "p1", 5, "");
        assert!(evaluate_rule(&rule, &review, &[], Utc::now()).is_err());
    }
}
