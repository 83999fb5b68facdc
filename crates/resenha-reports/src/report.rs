//! Report artifact types.
//!
//! A report is an immutable aggregation artifact produced on demand over a
//! bounded time window. Its status machine is processing → ready on
//! success or processing → failed on error; both outcomes are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resenha_core::{IssueCategory, KeywordStat, SentimentDistribution};

use crate::insights::Insight;
use crate::trends::{TrendBucket, WindowComparison};

/// Unique identifier for a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub Uuid);

impl ReportId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Report lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Generation in progress
    Processing,
    /// Generation finished successfully; the report is read-only
    Ready,
    /// Generation failed; retained for inspection
    Failed,
}

impl ReportStatus {
    /// Ready and failed are terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Every section: summary, trends, keywords, insights, products
    Complete,
    /// Sentiment distribution and keyword analysis
    Sentiment,
    /// Per-product performance breakdowns
    Performance,
}

/// A registered report template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub id: String,
    pub name: String,
    pub report_type: ReportType,
    pub description: String,
}

/// Built-in report templates.
pub fn builtin_templates() -> Vec<ReportTemplate> {
    vec![
        ReportTemplate {
            id: "complete".to_string(),
            name: "Relatório completo".to_string(),
            report_type: ReportType::Complete,
            description: "Resumo geral, tendências, palavras-chave e insights.".to_string(),
        },
        ReportTemplate {
            id: "sentiment".to_string(),
            name: "Análise de sentimento".to_string(),
            report_type: ReportType::Sentiment,
            description: "Distribuição de sentimento e termos mais citados.".to_string(),
        },
        ReportTemplate {
            id: "performance".to_string(),
            name: "Desempenho por produto".to_string(),
            report_type: ReportType::Performance,
            description: "Notas, sentimento e problemas por produto.".to_string(),
        },
    ]
}

/// Top-level metrics over the report window.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SummaryMetrics {
    pub total_reviews: u64,
    pub average_rating: f64,
    /// Percentage of reviews with a seller response
    pub response_rate: f64,
    /// Percentage of reviews rated 4 or above
    pub satisfaction_score: f64,
    /// Review counts per star, index 0 = 1 star
    pub rating_distribution: [u64; 5],
}

/// Issue count for one category, derived from low-rated reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCount {
    pub category: IssueCategory,
    pub count: u64,
}

/// Per-product aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBreakdown {
    pub product_id: String,
    pub product_name: String,
    pub review_count: u64,
    pub average_rating: f64,
    /// Review counts per star, index 0 = 1 star
    pub rating_distribution: [u64; 5],
    pub sentiment: SentimentDistribution,
    pub top_keywords: Vec<KeywordStat>,
    /// Categorized issues from reviews rated 2 or below
    pub issues: Vec<IssueCount>,
}

/// The aggregate payload of a generated report.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportData {
    pub summary: SummaryMetrics,
    pub sentiment: SentimentDistribution,
    pub keywords: Vec<KeywordStat>,
    pub trends: Vec<TrendBucket>,
    pub comparison: Option<WindowComparison>,
    pub products: Vec<ProductBreakdown>,
}

/// Processing metadata stamped on completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ReportMetadata {
    pub processing_time_ms: u64,
    /// Number of reviews that fed the aggregation
    pub data_points: u64,
}

/// A generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub report_type: ReportType,
    /// Period keyword the report was generated for
    pub period: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    /// Set iff the report reached ready
    pub completed_at: Option<DateTime<Utc>>,
    pub data: ReportData,
    pub insights: Vec<Insight>,
    pub metadata: ReportMetadata,
}

impl Report {
    /// Create a report in the processing state.
    pub fn processing(
        report_type: ReportType,
        period: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReportId::new(),
            report_type,
            period: period.into(),
            status: ReportStatus::Processing,
            created_at,
            completed_at: None,
            data: ReportData::default(),
            insights: Vec::new(),
            metadata: ReportMetadata::default(),
        }
    }

    /// Transition processing → ready. Ignored once terminal.
    pub fn complete(
        &mut self,
        data: ReportData,
        insights: Vec<Insight>,
        metadata: ReportMetadata,
        completed_at: DateTime<Utc>,
    ) {
        if self.status.is_terminal() {
            return;
        }
        self.status = ReportStatus::Ready;
        self.completed_at = Some(completed_at);
        self.data = data;
        self.insights = insights;
        self.metadata = metadata;
    }

    /// Transition processing → failed. Ignored once terminal.
    pub fn fail(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.status = ReportStatus::Failed;
    }
}
