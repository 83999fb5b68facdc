//! Alert types and lifecycle.
//!
//! An alert is a discrete, persisted notification record produced when a
//! rule fires against a review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resenha_core::{categorize, IssueCategory, Product, Review};

/// Unique identifier for an alert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub Uuid);

impl AlertId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alert type, configured per rule action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Serious problem requiring immediate attention
    Critical,
    /// Spike of problems on a single product
    Urgent,
    /// Negative review received
    Negative,
    /// Something worth keeping an eye on
    Warning,
}

impl AlertType {
    /// Get the type as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "critical",
            Self::Urgent => "urgent",
            Self::Negative => "negative",
            Self::Warning => "warning",
        }
    }

    /// Get the type from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "urgent" => Some(Self::Urgent),
            "negative" => Some(Self::Negative),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    /// Templated alert title for this type.
    fn title(&self, product_name: &str) -> String {
        match self {
            Self::Critical => format!("Avaliação crítica em {}", product_name),
            Self::Urgent => format!("Volume de reclamações em {}", product_name),
            Self::Negative => format!("Avaliação negativa em {}", product_name),
            Self::Warning => format!("Atenção para {}", product_name),
        }
    }

    /// Templated alert description for this type.
    fn description(&self, rating: u8) -> String {
        match self {
            Self::Critical => format!(
                "Avaliação de {} estrela(s) recebida e exige atenção imediata.",
                rating
            ),
            Self::Urgent => format!(
                "Nova avaliação de {} estrela(s) em um produto com reclamações recentes.",
                rating
            ),
            Self::Negative => {
                format!("Avaliação de {} estrela(s) recebida de um cliente.", rating)
            }
            Self::Warning => format!(
                "Avaliação de {} estrela(s) atendeu a uma condição de monitoramento.",
                rating
            ),
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert priority, inherited from the firing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl AlertPriority {
    /// Get the priority as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An alert produced by a firing rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert identifier
    pub id: AlertId,
    /// Alert type configured on the rule action
    pub alert_type: AlertType,
    /// Templated title
    pub title: String,
    /// Templated description
    pub description: String,
    /// Product the triggering review belongs to
    pub product_id: String,
    /// Product display name at creation time
    pub product_name: String,
    /// Triggering review identifier
    pub review_id: String,
    /// Review author
    pub author: String,
    /// Review rating snapshot
    pub rating: u8,
    /// Review comment snapshot
    pub comment: String,
    /// When the alert was created (not the review time)
    pub date: DateTime<Utc>,
    /// Whether the alert has been read
    pub is_read: bool,
    /// Whether the alert has been resolved
    pub is_resolved: bool,
    /// Priority inherited from the rule
    pub priority: AlertPriority,
    /// Issue category derived from the comment
    pub category: IssueCategory,
}

impl Alert {
    /// Create an alert from a firing rule's review and product context.
    pub fn from_review(
        alert_type: AlertType,
        priority: AlertPriority,
        review: &Review,
        product: &Product,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AlertId::new(),
            alert_type,
            title: alert_type.title(&product.name),
            description: alert_type.description(review.rating),
            product_id: review.product_id.clone(),
            product_name: product.name.clone(),
            review_id: review.id.clone(),
            author: review.author.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            date: created_at,
            is_read: false,
            is_resolved: false,
            priority,
            category: categorize(&review.comment),
        }
    }

    /// Mark the alert as read.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    /// Resolve the alert.
    pub fn resolve(&mut self) {
        self.is_resolved = true;
    }

    /// Pending means not resolved, regardless of read state.
    pub fn is_pending(&self) -> bool {
        !self.is_resolved
    }
}
