//! Report builder.
//!
//! Orchestrates trend aggregation, keyword aggregation, and insight
//! synthesis over a time-filtered review slice, producing one immutable
//! report per generation request. Failed reports are retained for
//! inspection and the error propagates to the caller; reporting is
//! user-requested, so failures must be visible.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use resenha_core::{
    aggregate_keywords, categorize, sentiment_distribution, Clock, IssueCategory, Product,
    Review, ReviewStore, SystemClock, DEFAULT_TOP_KEYWORDS,
};

use crate::error::{Error, Result};
use crate::insights::{synthesize, Insight};
use crate::report::{
    builtin_templates, IssueCount, ProductBreakdown, Report, ReportData, ReportId,
    ReportMetadata, ReportStatus, ReportTemplate, ReportType, SummaryMetrics,
};
use crate::trends::{bucketize, compare_windows, TrendGranularity};

/// Token length / mention thresholds per keyword call site.
const GLOBAL_KEYWORD_MIN_LEN: usize = 4;
const GLOBAL_KEYWORD_MIN_MENTIONS: u64 = 2;
const PRODUCT_KEYWORD_MIN_LEN: usize = 3;
const PRODUCT_KEYWORD_MIN_MENTIONS: u64 = 3;
const PRODUCT_TOP_KEYWORDS: usize = 5;

/// Export formats. File rendering (PDF/Excel) is external; the builder
/// only hands out serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Csv,
}

/// Serialized report payload.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub format: ExportFormat,
    pub content: String,
}

/// Builds reports over an injected review store.
pub struct ReportBuilder {
    /// Review and product source
    store: Arc<dyn ReviewStore>,
    /// Injected time source
    clock: Arc<dyn Clock>,
    /// Registered templates
    templates: Vec<ReportTemplate>,
    /// Generated reports by id
    reports: Arc<RwLock<HashMap<ReportId, Report>>>,
}

impl ReportBuilder {
    /// Create a builder with the system clock and built-in templates.
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create a builder with an injected clock.
    pub fn with_clock(store: Arc<dyn ReviewStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            templates: builtin_templates(),
            reports: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registered templates.
    pub fn templates(&self) -> &[ReportTemplate] {
        &self.templates
    }

    /// Generate a report from a template over the given lookback period.
    ///
    /// The report is registered in the processing state before any
    /// aggregation runs. On success it transitions to ready; on any step
    /// failing it transitions to failed, stays retained, and the error is
    /// returned to the caller.
    pub async fn generate(&self, template_id: &str, period: TrendGranularity) -> Result<Report> {
        let started = Instant::now();
        let now = self.clock.now();

        // The type is resolved up front so a retained failed report still
        // carries the requested template's type. Unknown templates have no
        // type to carry and fall back to complete.
        let report_type = self
            .templates
            .iter()
            .find(|t| t.id == template_id)
            .map(|t| t.report_type)
            .unwrap_or(ReportType::Complete);
        let mut report = Report::processing(report_type, period.as_str(), now);
        let id = report.id.clone();
        self.reports.write().await.insert(id.clone(), report.clone());

        match self.build(template_id, period, now, started).await {
            Ok((data, insights, metadata)) => {
                report.complete(data, insights, metadata, self.clock.now());
                self.reports.write().await.insert(id.clone(), report.clone());
                tracing::info!(
                    report_id = %id,
                    template = template_id,
                    period = %period,
                    data_points = report.metadata.data_points,
                    "Report generated"
                );
                Ok(report)
            }
            Err(e) => {
                let mut reports = self.reports.write().await;
                if let Some(stored) = reports.get_mut(&id) {
                    stored.fail();
                }
                tracing::error!(report_id = %id, error = %e, "Report generation failed");
                Err(e)
            }
        }
    }

    async fn build(
        &self,
        template_id: &str,
        period: TrendGranularity,
        now: DateTime<Utc>,
        started: Instant,
    ) -> Result<(ReportData, Vec<Insight>, ReportMetadata)> {
        self.templates
            .iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| Error::TemplateNotFound(template_id.to_string()))?;

        let all_reviews = self.store.reviews().await;
        let products = self.store.products().await;

        let window_start = now - Duration::days(period.days());
        let reviews: Vec<Review> = all_reviews
            .iter()
            .filter(|r| r.date >= window_start && r.date <= now)
            .cloned()
            .collect();

        let summary = summary_metrics(&reviews);
        let sentiment = sentiment_distribution(&reviews);
        let trends = bucketize(&reviews, period, now);
        // Comparison windows are fixed at 30/60 days and may extend past
        // the report window, so they read the full collection.
        let comparison = compare_windows(&all_reviews, now);
        let keywords = aggregate_keywords(
            &reviews,
            GLOBAL_KEYWORD_MIN_LEN,
            GLOBAL_KEYWORD_MIN_MENTIONS,
            DEFAULT_TOP_KEYWORDS,
        );
        let insights = synthesize(&summary, &sentiment, &keywords, &trends);
        let breakdowns = product_breakdowns(&reviews, &products);

        let data = ReportData {
            summary,
            sentiment,
            keywords,
            trends,
            comparison: Some(comparison),
            products: breakdowns,
        };
        let metadata = ReportMetadata {
            processing_time_ms: started.elapsed().as_millis() as u64,
            data_points: reviews.len() as u64,
        };
        Ok((data, insights, metadata))
    }

    /// Get a report by id.
    pub async fn get_report(&self, id: &ReportId) -> Option<Report> {
        self.reports.read().await.get(id).cloned()
    }

    /// List all reports, including failed ones.
    pub async fn list_reports(&self) -> Vec<Report> {
        self.reports.read().await.values().cloned().collect()
    }

    /// Delete a report. No-op if the id is unknown.
    pub async fn delete_report(&self, id: &ReportId) {
        self.reports.write().await.remove(id);
    }

    /// Serialize a ready report for external rendering.
    pub async fn export_report(&self, id: &ReportId, format: ExportFormat) -> Result<ExportPayload> {
        let report = self
            .get_report(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("Report not found: {}", id)))?;

        if report.status != ReportStatus::Ready {
            return Err(Error::InvalidState(format!(
                "Report {} is {}, only ready reports can be exported",
                id, report.status
            )));
        }

        let content = match format {
            ExportFormat::Json => serde_json::to_string_pretty(&report)?,
            ExportFormat::Csv => trends_csv(&report),
        };
        Ok(ExportPayload { format, content })
    }
}

fn summary_metrics(reviews: &[Review]) -> SummaryMetrics {
    let total = reviews.len() as u64;
    if total == 0 {
        return SummaryMetrics::default();
    }

    let mut rating_distribution = [0u64; 5];
    let mut rating_sum = 0u64;
    let mut responded = 0u64;
    let mut satisfied = 0u64;
    for review in reviews {
        if (1..=5).contains(&review.rating) {
            rating_distribution[review.rating as usize - 1] += 1;
        }
        rating_sum += review.rating as u64;
        if review.has_response {
            responded += 1;
        }
        if review.rating >= 4 {
            satisfied += 1;
        }
    }

    SummaryMetrics {
        total_reviews: total,
        average_rating: rating_sum as f64 / total as f64,
        response_rate: responded as f64 / total as f64 * 100.0,
        satisfaction_score: satisfied as f64 / total as f64 * 100.0,
        rating_distribution,
    }
}

fn product_breakdowns(reviews: &[Review], products: &[Product]) -> Vec<ProductBreakdown> {
    let names: HashMap<&str, &str> = products
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();

    let mut by_product: HashMap<&str, Vec<Review>> = HashMap::new();
    for review in reviews {
        by_product
            .entry(review.product_id.as_str())
            .or_default()
            .push(review.clone());
    }

    let mut breakdowns: Vec<ProductBreakdown> = by_product
        .into_iter()
        .map(|(product_id, product_reviews)| {
            let summary = summary_metrics(&product_reviews);
            ProductBreakdown {
                product_id: product_id.to_string(),
                product_name: names.get(product_id).unwrap_or(&product_id).to_string(),
                review_count: summary.total_reviews,
                average_rating: summary.average_rating,
                rating_distribution: summary.rating_distribution,
                sentiment: sentiment_distribution(&product_reviews),
                top_keywords: aggregate_keywords(
                    &product_reviews,
                    PRODUCT_KEYWORD_MIN_LEN,
                    PRODUCT_KEYWORD_MIN_MENTIONS,
                    PRODUCT_TOP_KEYWORDS,
                ),
                issues: issue_counts(&product_reviews),
            }
        })
        .collect();

    breakdowns.sort_by(|a, b| b.review_count.cmp(&a.review_count));
    breakdowns
}

/// Count low-rated reviews per issue category, omitting empty categories.
fn issue_counts(reviews: &[Review]) -> Vec<IssueCount> {
    let mut counts: HashMap<IssueCategory, u64> = HashMap::new();
    for review in reviews.iter().filter(|r| r.rating <= 2) {
        *counts.entry(categorize(&review.comment)).or_insert(0) += 1;
    }

    IssueCategory::all()
        .into_iter()
        .filter_map(|category| {
            counts.get(&category).map(|&count| IssueCount { category, count })
        })
        .collect()
}

fn trends_csv(report: &Report) -> String {
    let mut out = String::from("period,positive,neutral,negative,total,average_rating\n");
    for bucket in &report.data.trends {
        out.push_str(&format!(
            "{},{},{},{},{},{:.2}\n",
            bucket.period,
            bucket.positive,
            bucket.neutral,
            bucket.negative,
            bucket.total,
            bucket.average_rating
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::BUCKET_COUNT;
    use resenha_core::InMemoryReviewStore;

    async fn seeded_store(now: DateTime<Utc>) -> Arc<InMemoryReviewStore> {
        let store = Arc::new(InMemoryReviewStore::new());
        store.add_product(Product::new("p1", "Fone Bluetooth")).await;
        store.add_product(Product::new("p2", "Capa de Celular")).await;

        store
            .add_review(
                Review::new("r1", "p1", 5, "excelente qualidade excelente")
                    .with_date(now - Duration::days(1))
                    .with_response(true),
            )
            .await;
        store
            .add_review(
                Review::new("r2", "p1", 1, "chegou com defeito")
                    .with_date(now - Duration::days(2)),
            )
            .await;
        store
            .add_review(
                Review::new("r3", "p2", 4, "boa capa, entrega rápida")
                    .with_date(now - Duration::days(3)),
            )
            .await;
        // Outside any 30-day window.
        store
            .add_review(
                Review::new("r4", "p1", 3, "ok").with_date(now - Duration::days(200)),
            )
            .await;
        store
    }

    #[tokio::test]
    async fn test_generate_complete_report() {
        let now = Utc::now();
        let store = seeded_store(now).await;
        let builder = ReportBuilder::new(store);

        let report = builder
            .generate("complete", TrendGranularity::Month)
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Ready);
        assert!(report.completed_at.is_some());
        assert_eq!(report.report_type, ReportType::Complete);
        assert_eq!(report.period, "30d");
        assert_eq!(report.data.summary.total_reviews, 3);
        assert_eq!(report.data.trends.len(), BUCKET_COUNT);
        assert_eq!(report.metadata.data_points, 3);
        assert!(report.data.comparison.is_some());

        // Per-product breakdowns cover both products, busiest first.
        assert_eq!(report.data.products.len(), 2);
        assert_eq!(report.data.products[0].product_id, "p1");
        assert_eq!(report.data.products[0].product_name, "Fone Bluetooth");
    }

    #[tokio::test]
    async fn test_report_type_follows_template() {
        let store = Arc::new(InMemoryReviewStore::new());
        let builder = ReportBuilder::new(store);

        let report = builder
            .generate("sentiment", TrendGranularity::Week)
            .await
            .unwrap();
        assert_eq!(report.report_type, ReportType::Sentiment);
        let stored = builder.get_report(&report.id).await.unwrap();
        assert_eq!(stored.report_type, ReportType::Sentiment);
    }

    #[tokio::test]
    async fn test_issue_counts_from_low_rated_reviews() {
        let now = Utc::now();
        let store = seeded_store(now).await;
        let builder = ReportBuilder::new(store);

        let report = builder
            .generate("performance", TrendGranularity::Month)
            .await
            .unwrap();
        assert_eq!(report.report_type, ReportType::Performance);

        let p1 = report
            .data
            .products
            .iter()
            .find(|p| p.product_id == "p1")
            .unwrap();
        assert_eq!(p1.issues.len(), 1);
        assert_eq!(p1.issues[0].category, IssueCategory::Quality);
        assert_eq!(p1.issues[0].count, 1);
    }

    #[tokio::test]
    async fn test_unknown_template_fails_and_retains_report() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .try_init();

        let store = Arc::new(InMemoryReviewStore::new());
        let builder = ReportBuilder::new(store);

        let result = builder.generate("nonexistent", TrendGranularity::Week).await;
        assert!(matches!(result, Err(Error::TemplateNotFound(_))));

        let reports = builder.list_reports().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, ReportStatus::Failed);
        assert!(reports[0].completed_at.is_none());
    }

    #[tokio::test]
    async fn test_zero_reviews_report() {
        let store = Arc::new(InMemoryReviewStore::new());
        let builder = ReportBuilder::new(store);

        let report = builder
            .generate("complete", TrendGranularity::Week)
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Ready);
        assert_eq!(report.data.summary.total_reviews, 0);
        assert_eq!(report.data.summary.satisfaction_score, 0.0);
        assert!(report.insights.is_empty());
        assert_eq!(report.data.trends.len(), BUCKET_COUNT);
    }

    #[tokio::test]
    async fn test_export_json_and_csv() {
        let now = Utc::now();
        let store = seeded_store(now).await;
        let builder = ReportBuilder::new(store);

        let report = builder
            .generate("complete", TrendGranularity::Month)
            .await
            .unwrap();

        let json = builder
            .export_report(&report.id, ExportFormat::Json)
            .await
            .unwrap();
        assert!(json.content.contains("\"status\": \"ready\""));

        let csv = builder
            .export_report(&report.id, ExportFormat::Csv)
            .await
            .unwrap();
        assert!(csv.content.starts_with("period,"));
        assert_eq!(csv.content.lines().count(), 1 + BUCKET_COUNT);
    }

    #[tokio::test]
    async fn test_export_requires_ready_status() {
        let store = Arc::new(InMemoryReviewStore::new());
        let builder = ReportBuilder::new(store);

        let _ = builder.generate("nonexistent", TrendGranularity::Week).await;
        let failed_id = builder.list_reports().await[0].id.clone();

        let result = builder.export_report(&failed_id, ExportFormat::Json).await;
        assert!(matches!(result, Err(Error::InvalidState(_))));

        let ghost = ReportId::new();
        let result = builder.export_report(&ghost, ExportFormat::Json).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_report_idempotent() {
        let store = Arc::new(InMemoryReviewStore::new());
        let builder = ReportBuilder::new(store);

        let report = builder
            .generate("complete", TrendGranularity::Week)
            .await
            .unwrap();

        builder.delete_report(&report.id).await;
        builder.delete_report(&report.id).await;
        assert!(builder.get_report(&report.id).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_generations() {
        let now = Utc::now();
        let store = seeded_store(now).await;
        let builder = Arc::new(ReportBuilder::new(store));

        let (a, b) = tokio::join!(
            builder.generate("complete", TrendGranularity::Week),
            builder.generate("sentiment", TrendGranularity::Month),
        );

        assert_eq!(a.unwrap().status, ReportStatus::Ready);
        assert_eq!(b.unwrap().status, ReportStatus::Ready);
        assert_eq!(builder.list_reports().await.len(), 2);
    }
}
