//! Issue categorization by keyword scan.
//!
//! Shared by the alert engine (Alert.category) and the report builder
//! (per-product issue counts for low-rated reviews).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Issue category of a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Quality,
    Delivery,
    Service,
    Price,
    #[default]
    Other,
}

impl IssueCategory {
    /// Get the category as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Quality => "quality",
            Self::Delivery => "delivery",
            Self::Service => "service",
            Self::Price => "price",
            Self::Other => "other",
        }
    }

    /// All categories in display order.
    pub fn all() -> [IssueCategory; 5] {
        [
            Self::Quality,
            Self::Delivery,
            Self::Service,
            Self::Price,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static CATEGORY_KEYWORDS: Lazy<[(IssueCategory, &'static [&'static str]); 4]> = Lazy::new(|| {
    [
        (
            IssueCategory::Quality,
            &[
                "qualidade", "defeito", "quebrado", "quebrada", "material", "acabamento",
                "durabilidade", "funciona", "falso", "falsificado",
            ][..],
        ),
        (
            IssueCategory::Delivery,
            &[
                "entrega", "prazo", "atraso", "atrasado", "demorou", "correio", "frete",
                "chegou", "embalagem", "extraviado",
            ][..],
        ),
        (
            IssueCategory::Service,
            &[
                "atendimento", "vendedor", "resposta", "suporte", "comunicação",
                "comunicacao", "educado", "grosseiro",
            ][..],
        ),
        (
            IssueCategory::Price,
            &["preço", "preco", "caro", "barato", "valor", "custo", "cobrado"][..],
        ),
    ]
});

/// Derive the issue category of a comment by keyword scan.
///
/// The first category whose keyword group matches wins; comments matching
/// no group fall back to [`IssueCategory::Other`].
pub fn categorize(text: &str) -> IssueCategory {
    let lowered = text.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS.iter() {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return *category;
        }
    }
    IssueCategory::Other
}
