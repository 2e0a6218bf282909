// src/market/mod.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::filters::CityTier;

pub mod client;
pub mod query;

pub use client::{decode_report, MarketClient};
pub use query::{build_query, QuerySpec, REPORT_SCHEMA_VERSION};

/// One analyzed city tier. Schema v1: this exact field set is what the
/// backend is asked to produce and what validation enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierAnalysis {
    pub tier: CityTier,
    pub demand_level: DemandLevel,
    pub estimated_openings: u32,
    pub salary_range: String,
    pub top_employers: Vec<String>,
    pub market_insight: String,
}

/// Structured result of one analysis request, in backend order.
///
/// An empty report means the backend found no significant results for the
/// selected filters; it is not a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketReport {
    pub tier_analyses: Vec<TierAnalysis>,
}

impl MarketReport {
    pub fn is_empty(&self) -> bool {
        self.tier_analyses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl DemandLevel {
    pub const ALL: [DemandLevel; 4] = [
        DemandLevel::Low,
        DemandLevel::Moderate,
        DemandLevel::High,
        DemandLevel::VeryHigh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DemandLevel::Low => "Low",
            DemandLevel::Moderate => "Moderate",
            DemandLevel::High => "High",
            DemandLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure classes of one report acquisition. Classification happens in the
/// fetcher and nowhere else; callers store or display, they do not reclassify.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// Transport-level failure (timeout, refused connection). Recoverable by
    /// re-invoking the analysis.
    #[error("could not reach the market analysis backend: {0}")]
    Network(String),
    /// Error reported by the backend itself; the message is backend-supplied
    /// and shown verbatim.
    #[error("{0}")]
    Backend(String),
    /// The backend answered, but its payload does not conform to the report
    /// schema. The message names the defect, never the raw payload.
    #[error("market report failed validation: {0}")]
    SchemaViolation(String),
}

impl MarketError {
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::Network(_) => "NETWORK_ERROR",
            MarketError::Backend(_) => "BACKEND_ERROR",
            MarketError::SchemaViolation(_) => "SCHEMA_VIOLATION",
        }
    }
}
