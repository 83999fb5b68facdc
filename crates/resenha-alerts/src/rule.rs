//! Alert rule model.
//!
//! Rules are plain data so they can be loaded from any configuration
//! store. A rule fires only when every condition holds (AND semantics).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resenha_core::Sentiment;

use crate::alert::{AlertPriority, AlertType};

/// Unique identifier for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub Uuid);

impl RuleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    /// The review's star rating
    Rating,
    /// The review's comment text
    Keyword,
    /// The rating-based sentiment of the review
    Sentiment,
    /// Count of recent critical/urgent alerts for the same product
    Frequency,
}

/// How a condition compares its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    LessThan,
    GreaterThan,
    Contains,
    NotContains,
}

/// A single rule condition.
///
/// Not every type/operator pairing is meaningful; the evaluator rejects
/// unsupported combinations and the manager skips the offending rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCondition {
    /// What this condition inspects
    pub condition: ConditionType,
    /// Comparison operator
    pub operator: ConditionOperator,
    /// Comparison value; comma-separated list for keyword conditions
    pub value: String,
}

impl RuleCondition {
    /// `rating < value`
    pub fn rating_below(value: u8) -> Self {
        Self {
            condition: ConditionType::Rating,
            operator: ConditionOperator::LessThan,
            value: value.to_string(),
        }
    }

    /// `rating > value`
    pub fn rating_above(value: u8) -> Self {
        Self {
            condition: ConditionType::Rating,
            operator: ConditionOperator::GreaterThan,
            value: value.to_string(),
        }
    }

    /// `rating == value`
    pub fn rating_equals(value: u8) -> Self {
        Self {
            condition: ConditionType::Rating,
            operator: ConditionOperator::Equals,
            value: value.to_string(),
        }
    }

    /// Comment contains any of the comma-separated keywords.
    pub fn keyword_contains(keywords: impl Into<String>) -> Self {
        Self {
            condition: ConditionType::Keyword,
            operator: ConditionOperator::Contains,
            value: keywords.into(),
        }
    }

    /// Comment contains none of the comma-separated keywords.
    pub fn keyword_not_contains(keywords: impl Into<String>) -> Self {
        Self {
            condition: ConditionType::Keyword,
            operator: ConditionOperator::NotContains,
            value: keywords.into(),
        }
    }

    /// Rating-based sentiment equals the given label.
    pub fn sentiment_equals(sentiment: Sentiment) -> Self {
        Self {
            condition: ConditionType::Sentiment,
            operator: ConditionOperator::Equals,
            value: sentiment.as_str().to_string(),
        }
    }

    /// More than `count` critical/urgent alerts for the product in the
    /// trailing 24 hours.
    pub fn frequency_above(count: u64) -> Self {
        Self {
            condition: ConditionType::Frequency,
            operator: ConditionOperator::GreaterThan,
            value: count.to_string(),
        }
    }
}

/// Action to take when a rule fires.
///
/// Delivery actions (email, WhatsApp, push) are external; the engine only
/// decides that an alert exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RuleAction {
    /// Create an alert of the given type.
    CreateAlert { alert_type: AlertType },
}

/// A named, enableable set of AND-combined conditions plus actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    /// Unique rule identifier
    pub id: RuleId,
    /// Rule display name
    pub name: String,
    /// Disabled rules are never evaluated
    pub enabled: bool,
    /// Conditions, all of which must hold for the rule to fire
    pub conditions: Vec<RuleCondition>,
    /// Actions taken when the rule fires
    pub actions: Vec<RuleAction>,
    /// Priority inherited by created alerts
    pub priority: AlertPriority,
}

impl AlertRule {
    /// Create an enabled rule with no conditions or actions.
    ///
    /// A rule with an empty condition list is vacuously true and fires on
    /// every review; callers are expected to attach at least one condition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RuleId::new(),
            name: name.into(),
            enabled: true,
            conditions: Vec::new(),
            actions: Vec::new(),
            priority: AlertPriority::Medium,
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a create-alert action.
    pub fn creating(mut self, alert_type: AlertType) -> Self {
        self.actions.push(RuleAction::CreateAlert { alert_type });
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: AlertPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Disable the rule.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_builder() {
        let rule = AlertRule::new("Nota baixa")
            .with_condition(RuleCondition::rating_below(3))
            .with_condition(RuleCondition::keyword_contains("defeito,quebrado"))
            .creating(AlertType::Critical)
            .with_priority(AlertPriority::High);

        assert!(rule.enabled);
        assert_eq!(rule.conditions.len(), 2);
        assert_eq!(rule.actions.len(), 1);
        assert_eq!(rule.priority, AlertPriority::High);
    }

    #[test]
    fn test_condition_serde_round_trip() {
        let condition = RuleCondition::rating_below(3);
        let json = serde_json::to_string(&condition).unwrap();
        assert!(json.contains("\"rating\""));
        assert!(json.contains("\"less_than\""));

        let back: RuleCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(back.condition, ConditionType::Rating);
        assert_eq!(back.operator, ConditionOperator::LessThan);
        assert_eq!(back.value, "3");
    }

    #[test]
    fn test_rule_loadable_from_plain_data() {
        let json = r#"{
            "id": "7f3c9d2e-5a1b-4c8d-9e0f-123456789abc",
            "name": "Sentimento negativo",
            "enabled": true,
            "conditions": [
                {"condition": "sentiment", "operator": "equals", "value": "negative"}
            ],
            "actions": [{"action": "create_alert", "alert_type": "negative"}],
            "priority": "medium"
        }"#;

        let rule: AlertRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.name, "Sentimento negativo");
        assert_eq!(rule.conditions.len(), 1);
    }
}
