//! Resenha Alerts Crate
//!
//! Rule-driven alerting over the incoming review stream.
//!
//! - **Rule model**: AND-combined conditions over rating, keywords,
//!   sentiment, and alert frequency
//! - **Evaluator**: pure condition evaluation with explicit alert history
//! - **Alert management**: creation, read/resolved lifecycle, filtering,
//!   statistics, auto-resolve and retention pruning
//! - **Subscriptions**: synchronous change notifications with isolated
//!   subscriber failures
//!
//! ## Example
//!
//! ```rust,no_run
//! use resenha_alerts::{AlertManager, AlertRule, AlertType, RuleCondition};
//! use resenha_core::{Product, Review};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = AlertManager::new();
//!
//!     let rule = AlertRule::new("Nota baixa")
//!         .with_condition(RuleCondition::rating_below(3))
//!         .creating(AlertType::Critical);
//!     manager.add_rule(rule).await;
//!
//!     let product = Product::new("p1", "Fone Bluetooth");
//!     let review = Review::new("r1", "p1", 1, "chegou quebrado");
//!     let created = manager.process_review(&review, &product).await;
//!     println!("{} alert(s) created", created.len());
//! }
//! ```

pub mod alert;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod manager;
pub mod rule;

pub use alert::{Alert, AlertId, AlertPriority, AlertType};
pub use config::{AlertConfig, AlertConfigPatch, BatchFrequency};
pub use error::{Error, Result};
pub use evaluator::evaluate_rule;
pub use manager::{AlertFilter, AlertManager, AlertStats, StatusFilter, Subscription};
pub use rule::{AlertRule, ConditionOperator, ConditionType, RuleAction, RuleCondition, RuleId};

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
