//! Rule-based insight synthesis.
//!
//! Each rule is independent; any subset may fire. Confidence values are
//! fixed per rule. All percentage guards return 0 on empty input, so a
//! zero-review collection produces no threshold insights.

use serde::{Deserialize, Serialize};

use resenha_core::{KeywordStat, Sentiment, SentimentDistribution};

use crate::report::SummaryMetrics;
use crate::trends::TrendBucket;

/// Kind of observation an insight makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Positive,
    Negative,
    Opportunity,
    Warning,
    Trend,
}

/// Business impact of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightImpact {
    High,
    Medium,
    Low,
}

/// A synthesized, human-readable observation. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub impact: InsightImpact,
    /// Fixed per synthesis rule, 0-1
    pub confidence: f64,
    /// Canned follow-up suggestions
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Synthesize insights from aggregate metrics.
pub fn synthesize(
    summary: &SummaryMetrics,
    distribution: &SentimentDistribution,
    keywords: &[KeywordStat],
    trends: &[TrendBucket],
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if distribution.positive_rate() >= 80.0 {
        insights.push(Insight {
            insight_type: InsightType::Positive,
            title: "Alta satisfação dos clientes".to_string(),
            description: format!(
                "{:.0}% das avaliações são positivas.",
                distribution.positive_rate()
            ),
            impact: InsightImpact::High,
            confidence: 0.9,
            recommendations: vec![
                "Destaque as avaliações positivas na página do produto.".to_string(),
                "Incentive clientes satisfeitos a indicar a loja.".to_string(),
            ],
        });
    }

    if distribution.negative_rate() >= 20.0 {
        insights.push(Insight {
            insight_type: InsightType::Negative,
            title: "Volume alto de avaliações negativas".to_string(),
            description: format!(
                "{:.0}% das avaliações são negativas.",
                distribution.negative_rate()
            ),
            impact: InsightImpact::High,
            confidence: 0.9,
            recommendations: vec![
                "Revise as reclamações recentes em busca de causas comuns.".to_string(),
                "Responda as avaliações negativas o quanto antes.".to_string(),
            ],
        });
    }

    if let Some(stat) = keywords.iter().find(|k| k.sentiment == Sentiment::Negative) {
        insights.push(Insight {
            insight_type: InsightType::Warning,
            title: format!("Termo recorrente em críticas: \"{}\"", stat.keyword),
            description: format!(
                "\"{}\" aparece em {} avaliações com sentimento negativo.",
                stat.keyword, stat.mentions
            ),
            impact: InsightImpact::Medium,
            confidence: 0.8,
            recommendations: vec![format!(
                "Investigue os relatos que mencionam \"{}\".",
                stat.keyword
            )],
        });
    }

    if let Some(stat) = keywords.iter().find(|k| k.sentiment == Sentiment::Positive) {
        insights.push(Insight {
            insight_type: InsightType::Opportunity,
            title: format!("Ponto forte percebido: \"{}\"", stat.keyword),
            description: format!(
                "\"{}\" aparece em {} avaliações com sentimento positivo.",
                stat.keyword, stat.mentions
            ),
            impact: InsightImpact::Medium,
            confidence: 0.8,
            recommendations: vec![format!(
                "Use \"{}\" como argumento nos anúncios do produto.",
                stat.keyword
            )],
        });
    }

    if summary.total_reviews > 0 {
        let five_star_share =
            summary.rating_distribution[4] as f64 / summary.total_reviews as f64 * 100.0;
        if five_star_share >= 60.0 {
            insights.push(Insight {
                insight_type: InsightType::Positive,
                title: "Maioria de avaliações 5 estrelas".to_string(),
                description: format!(
                    "{:.0}% das avaliações deram nota máxima.",
                    five_star_share
                ),
                impact: InsightImpact::High,
                confidence: 0.85,
                recommendations: vec![
                    "Mantenha o padrão atual de produto e atendimento.".to_string(),
                ],
            });
        }

        if summary.response_rate < 50.0 {
            insights.push(Insight {
                insight_type: InsightType::Warning,
                title: "Taxa de resposta baixa".to_string(),
                description: format!(
                    "Apenas {:.0}% das avaliações receberam resposta.",
                    summary.response_rate
                ),
                impact: InsightImpact::Medium,
                confidence: 0.85,
                recommendations: vec![
                    "Responda avaliações para aumentar a confiança dos compradores.".to_string(),
                    "Priorize respostas às avaliações negativas.".to_string(),
                ],
            });
        }
    }

    if trends.len() >= 2 {
        let latest = &trends[trends.len() - 1];
        let prior = &trends[trends.len() - 2];
        if latest.total > 0 && prior.total > 0 && latest.average_rating > prior.average_rating {
            insights.push(Insight {
                insight_type: InsightType::Trend,
                title: "Nota média em alta".to_string(),
                description: format!(
                    "A nota média subiu de {:.1} para {:.1} no período mais recente.",
                    prior.average_rating, latest.average_rating
                ),
                impact: InsightImpact::Medium,
                confidence: 0.8,
                recommendations: vec![
                    "Identifique o que mudou recentemente e preserve a melhoria.".to_string(),
                ],
            });
        }
    }

    insights
}
