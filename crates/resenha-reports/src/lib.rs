//! Resenha Reports Crate
//!
//! Batch analytics over a review collection:
//!
//! - **Trend aggregation**: fixed-width time buckets with per-bucket
//!   sentiment and rating metrics
//! - **Comparison deltas**: current vs previous 30-day windows
//! - **Insight synthesis**: rule-based, human-readable observations
//! - **Report builder**: one immutable report artifact per generation
//!   request, with a processing → ready/failed state machine
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use resenha_core::{InMemoryReviewStore, Review};
//! use resenha_reports::{ReportBuilder, TrendGranularity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryReviewStore::new());
//!     store.add_review(Review::new("r1", "p1", 5, "excelente")).await;
//!
//!     let builder = ReportBuilder::new(store);
//!     let report = builder.generate("complete", TrendGranularity::Month).await?;
//!     println!("Report {} is {}", report.id, report.status);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod error;
pub mod insights;
pub mod report;
pub mod trends;

pub use builder::{ExportFormat, ExportPayload, ReportBuilder};
pub use error::{Error, Result};
pub use insights::{synthesize, Insight, InsightImpact, InsightType};
pub use report::{
    builtin_templates, IssueCount, ProductBreakdown, Report, ReportData, ReportId,
    ReportMetadata, ReportStatus, ReportTemplate, ReportType, SummaryMetrics,
};
pub use trends::{
    bucketize, compare_windows, ComparisonMetric, TrendBucket, TrendDirection, TrendGranularity,
    WindowComparison, BUCKET_COUNT,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
