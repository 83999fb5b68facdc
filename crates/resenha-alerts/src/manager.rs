//! Alert manager.
//!
//! Owns the rule set and the alert collection. Each incoming review is run
//! through every enabled rule; firing rules create alerts and subscribers
//! are notified synchronously. A single write lock spans rule evaluation
//! and alert creation so frequency conditions observe alerts appended
//! earlier in the same call.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;

use resenha_core::{Clock, IssueCategory, Product, Review, SystemClock};

use crate::alert::{Alert, AlertId, AlertPriority, AlertType};
use crate::config::{AlertConfig, AlertConfigPatch};
use crate::evaluator::evaluate_rule;
use crate::rule::{AlertRule, RuleAction, RuleCondition, RuleId};

/// Default retention window for [`AlertManager::clear_old_alerts`].
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

type Subscriber = Arc<dyn Fn(&Alert) + Send + Sync>;

/// Handle returned by [`AlertManager::subscribe`]; pass it back to
/// [`AlertManager::unsubscribe`] to stop receiving notifications.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

/// Status filter for alert queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Not yet read
    Unread,
    /// Resolved
    Resolved,
    /// Not resolved, regardless of read state
    Pending,
}

/// Query filter for [`AlertManager::get_filtered_alerts`].
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub alert_type: Option<AlertType>,
    pub status: Option<StatusFilter>,
    pub category: Option<IssueCategory>,
    pub priority: Option<AlertPriority>,
}

impl AlertFilter {
    fn matches(&self, alert: &Alert) -> bool {
        if let Some(t) = self.alert_type {
            if alert.alert_type != t {
                return false;
            }
        }
        if let Some(status) = self.status {
            let ok = match status {
                StatusFilter::Unread => !alert.is_read,
                StatusFilter::Resolved => alert.is_resolved,
                StatusFilter::Pending => alert.is_pending(),
            };
            if !ok {
                return false;
            }
        }
        if let Some(c) = self.category {
            if alert.category != c {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if alert.priority != p {
                return false;
            }
        }
        true
    }
}

/// Derived alert counts.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct AlertStats {
    pub total: usize,
    pub unread: usize,
    pub critical: usize,
    pub pending: usize,
    pub resolved: usize,
}

/// Alert manager for the review stream.
pub struct AlertManager {
    /// Process-wide settings
    config: Arc<RwLock<AlertConfig>>,
    /// Rule set
    rules: Arc<RwLock<Vec<AlertRule>>>,
    /// Alert collection, in creation order
    alerts: Arc<RwLock<Vec<Alert>>>,
    /// Subscribers by subscription id
    subscribers: Arc<RwLock<HashMap<u64, Subscriber>>>,
    /// Next subscription id
    next_subscription_id: AtomicU64,
    /// Injected time source
    clock: Arc<dyn Clock>,
}

impl AlertManager {
    /// Create a manager with the system clock and default configuration.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a manager with an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(RwLock::new(AlertConfig::default())),
            rules: Arc::new(RwLock::new(Vec::new())),
            alerts: Arc::new(RwLock::new(Vec::new())),
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            next_subscription_id: AtomicU64::new(0),
            clock,
        }
    }

    /// Apply a partial configuration update (shallow merge).
    pub async fn set_config(&self, patch: AlertConfigPatch) {
        self.config.write().await.apply(patch);
    }

    /// Get a copy of the current configuration.
    pub async fn get_config(&self) -> AlertConfig {
        self.config.read().await.clone()
    }

    /// Add a rule.
    pub async fn add_rule(&self, rule: AlertRule) {
        if rule.conditions.is_empty() {
            tracing::warn!(rule = %rule.name, "Rule has no conditions and will fire on every review");
        }
        self.rules.write().await.push(rule);
    }

    /// Install the stock rule set derived from the current configuration:
    /// a critical alert for ratings at or below `min_rating_threshold` and
    /// a warning for comments mentioning any configured negative keyword.
    pub async fn install_default_rules(&self) {
        let config = self.config.read().await.clone();
        let mut rules = vec![AlertRule::new("Nota baixa")
            // rating <= threshold, expressed as a strict bound
            .with_condition(RuleCondition::rating_below(
                config.min_rating_threshold.saturating_add(1),
            ))
            .creating(AlertType::Critical)
            .with_priority(AlertPriority::High)];
        if !config.negative_keywords.is_empty() {
            rules.push(
                AlertRule::new("Palavras negativas")
                    .with_condition(RuleCondition::keyword_contains(
                        config.negative_keywords.join(","),
                    ))
                    .creating(AlertType::Warning),
            );
        }
        self.rules.write().await.extend(rules);
    }

    /// Remove a rule by id. No-op if the id is unknown.
    pub async fn remove_rule(&self, id: &RuleId) {
        self.rules.write().await.retain(|r| &r.id != id);
    }

    /// List all rules.
    pub async fn get_rules(&self) -> Vec<AlertRule> {
        self.rules.read().await.clone()
    }

    /// Run every enabled rule against an incoming review.
    ///
    /// One alert is created per (firing rule, create-alert action) pair,
    /// gated by the configured enabled types. Malformed rules are skipped
    /// and logged; they never abort the pass for other rules. Subscribers
    /// are notified synchronously and sequentially after the alerts are
    /// stored; a panicking subscriber is isolated and logged.
    pub async fn process_review(&self, review: &Review, product: &Product) -> Vec<Alert> {
        let config = self.config.read().await.clone();
        let rules = self.rules.read().await.clone();
        let now = self.clock.now();

        let mut created = Vec::new();
        {
            let mut alerts = self.alerts.write().await;
            for rule in rules.iter().filter(|r| r.enabled) {
                match evaluate_rule(rule, review, &alerts, now) {
                    Ok(true) => {
                        for action in &rule.actions {
                            let RuleAction::CreateAlert { alert_type } = action;
                            if !config.enabled_types.contains(alert_type) {
                                continue;
                            }
                            let alert = Alert::from_review(
                                *alert_type,
                                rule.priority,
                                review,
                                product,
                                now,
                            );
                            tracing::debug!(
                                rule = %rule.name,
                                alert_id = %alert.id,
                                alert_type = %alert.alert_type,
                                "Rule fired"
                            );
                            alerts.push(alert.clone());
                            created.push(alert);
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(rule = %rule.name, error = %e, "Skipping malformed rule");
                    }
                }
            }
        }

        if !created.is_empty() {
            self.notify_subscribers(&created).await;
        }

        created
    }

    /// Notify all subscribers, isolating failures per subscriber.
    async fn notify_subscribers(&self, alerts: &[Alert]) {
        let subscribers: Vec<(u64, Subscriber)> = self
            .subscribers
            .read()
            .await
            .iter()
            .map(|(id, f)| (*id, f.clone()))
            .collect();

        for alert in alerts {
            for (id, subscriber) in &subscribers {
                let result = catch_unwind(AssertUnwindSafe(|| subscriber(alert)));
                if result.is_err() {
                    tracing::error!(
                        subscription_id = id,
                        alert_id = %alert.id,
                        "Subscriber panicked; continuing with remaining subscribers"
                    );
                }
            }
        }
    }

    /// Register a subscriber. Returns a handle for unsubscribing.
    pub async fn subscribe<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn(&Alert) + Send + Sync + 'static,
    {
        let id = self.next_subscription_id.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .write()
            .await
            .insert(id, Arc::new(subscriber));
        Subscription { id }
    }

    /// Remove a subscriber. No-op if already removed.
    pub async fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers.write().await.remove(&subscription.id);
    }

    /// All alerts in creation order.
    pub async fn get_alerts(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
    }

    /// Alerts matching the filter, in creation order.
    pub async fn get_filtered_alerts(&self, filter: &AlertFilter) -> Vec<Alert> {
        self.alerts
            .read()
            .await
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect()
    }

    /// Mark an alert as read. No-op if the id is unknown.
    pub async fn mark_as_read(&self, id: &AlertId) {
        let mut alerts = self.alerts.write().await;
        if let Some(alert) = alerts.iter_mut().find(|a| &a.id == id) {
            alert.mark_read();
        }
    }

    /// Mark an alert as resolved. No-op if the id is unknown.
    pub async fn mark_as_resolved(&self, id: &AlertId) {
        let mut alerts = self.alerts.write().await;
        if let Some(alert) = alerts.iter_mut().find(|a| &a.id == id) {
            alert.resolve();
        }
    }

    /// Mark every alert as read.
    pub async fn mark_all_as_read(&self) {
        let mut alerts = self.alerts.write().await;
        for alert in alerts.iter_mut() {
            alert.mark_read();
        }
    }

    /// Delete an alert. No-op if the id is unknown.
    pub async fn delete_alert(&self, id: &AlertId) {
        self.alerts.write().await.retain(|a| &a.id != id);
    }

    /// Derived counts over the alert collection.
    pub async fn get_alert_stats(&self) -> AlertStats {
        let alerts = self.alerts.read().await;
        AlertStats {
            total: alerts.len(),
            unread: alerts.iter().filter(|a| !a.is_read).count(),
            critical: alerts
                .iter()
                .filter(|a| a.alert_type == AlertType::Critical)
                .count(),
            pending: alerts.iter().filter(|a| a.is_pending()).count(),
            resolved: alerts.iter().filter(|a| a.is_resolved).count(),
        }
    }

    /// Resolve unread, unresolved alerts older than the configured TTL.
    ///
    /// Does nothing when auto-resolve is disabled. Alerts are resolved,
    /// never deleted. Returns the number of alerts resolved.
    pub async fn auto_resolve_old_alerts(&self) -> usize {
        let config = self.config.read().await.clone();
        if !config.auto_resolve {
            return 0;
        }

        let cutoff = self.clock.now() - Duration::hours(config.auto_resolve_hours);
        let mut alerts = self.alerts.write().await;
        let mut resolved = 0;
        for alert in alerts
            .iter_mut()
            .filter(|a| !a.is_read && !a.is_resolved && a.date < cutoff)
        {
            alert.resolve();
            resolved += 1;
        }

        if resolved > 0 {
            tracing::info!(count = resolved, "Auto-resolved stale alerts");
        }
        resolved
    }

    /// Permanently remove alerts older than the cutoff, irrespective of
    /// state. Returns the number of alerts removed.
    pub async fn clear_old_alerts(&self, days_old: i64) -> usize {
        let cutoff = self.clock.now() - Duration::days(days_old);
        let mut alerts = self.alerts.write().await;
        let before = alerts.len();
        alerts.retain(|a| a.date >= cutoff);
        let removed = before - alerts.len();

        if removed > 0 {
            tracing::info!(count = removed, days_old, "Pruned old alerts");
        }
        removed
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new()
    }
}
