//! Review and product types.
//!
//! Reviews are the external input of the platform. They are produced by the
//! marketplace synchronization layer and are read-only to the alerting and
//! reporting engines.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A customer product review, immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// External review identifier (marketplace-assigned)
    pub id: String,
    /// Product the review belongs to
    pub product_id: String,
    /// Star rating, 1-5
    pub rating: u8,
    /// Free-text comment
    pub comment: String,
    /// Review author display name
    pub author: String,
    /// When the review was posted
    pub date: DateTime<Utc>,
    /// Whether the seller has already responded
    #[serde(default)]
    pub has_response: bool,
}

impl Review {
    /// Create a new review with the current timestamp.
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            rating,
            comment: comment.into(),
            author: String::new(),
            date: Utc::now(),
            has_response: false,
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the review date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Set the seller-response flag.
    pub fn with_response(mut self, has_response: bool) -> Self {
        self.has_response = has_response;
        self
    }
}

/// Minimal product metadata needed for alert display and report labeling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: String,
    /// Product display name
    pub name: String,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Read-only source of reviews and products.
///
/// The persistence layer behind this trait is external to the engines; a
/// real deployment backs it with the marketplace sync store.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// All reviews currently known to the store.
    async fn reviews(&self) -> Vec<Review>;

    /// All products currently known to the store.
    async fn products(&self) -> Vec<Product>;
}

/// Simple in-memory review store for tests and embedding.
#[derive(Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<Vec<Review>>,
    products: RwLock<Vec<Product>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a review to the store.
    pub async fn add_review(&self, review: Review) {
        self.reviews.write().await.push(review);
    }

    /// Add a product to the store.
    pub async fn add_product(&self, product: Product) {
        self.products.write().await.push(product);
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn reviews(&self) -> Vec<Review> {
        self.reviews.read().await.clone()
    }

    async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_builder() {
        let review = Review::new("r1", "p1", 5, "excelente")
            .with_author("Maria")
            .with_response(true);

        assert_eq!(review.rating, 5);
        assert_eq!(review.author, "Maria");
        assert!(review.has_response);
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryReviewStore::new();
        store.add_product(Product::new("p1", "Fone Bluetooth")).await;
        store.add_review(Review::new("r1", "p1", 4, "bom")).await;
        store.add_review(Review::new("r2", "p1", 2, "ruim")).await;

        assert_eq!(store.reviews().await.len(), 2);
        assert_eq!(store.products().await.len(), 1);
    }
}
