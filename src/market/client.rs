// src/market/client.rs
use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

use super::query::{QuerySpec, REPORT_SCHEMA_VERSION};
use super::{MarketError, MarketReport};
use crate::filters::CityTier;

const ANALYZE_ENDPOINT: &str = "/v1/analyze";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client for the generative market-analysis backend.
pub struct MarketClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct AnalysisApiRequest<'a> {
    prompt: &'a str,
    response_schema: &'a serde_json::Value,
}

/// Backend envelope. On success `message` carries the structured report
/// payload; on a backend-reported failure it carries the error text.
#[derive(Deserialize)]
struct AnalysisApiResponse {
    status: String,
    message: String,
}

#[derive(Deserialize)]
struct AnalysisApiError {
    error: String,
}

impl MarketClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("MARKET_API_KEY")
            .context("MARKET_API_KEY environment variable not set")?;

        let base_url =
            env::var("MARKET_API_URL").unwrap_or_else(|_| "https://api0.ai".to_string());

        Self::new(base_url, api_key)
    }

    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Issue exactly one analysis request and validate the answer into a
    /// typed report. No internal retry; callers re-invoke if they want one.
    pub async fn fetch_report(&self, query: &QuerySpec) -> Result<MarketReport, MarketError> {
        let url = format!("{}{}", self.base_url, ANALYZE_ENDPOINT);

        let request = AnalysisApiRequest {
            prompt: &query.prompt,
            response_schema: &query.response_schema,
        };

        info!("Requesting market analysis from {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let outcome = interpret_response(status, &body);
        match &outcome {
            Ok(report) => info!(
                "Market analysis returned {} tier analyses",
                report.tier_analyses.len()
            ),
            Err(e) => {
                error!("Market analysis failed: {}", e);
                debug!("Rejected backend body: {}", body);
            }
        }

        outcome
    }
}

/// Classify one backend answer. Split out of `fetch_report` so the whole
/// failure ladder is exercisable without a live backend.
fn interpret_response(status: StatusCode, body: &str) -> Result<MarketReport, MarketError> {
    if !status.is_success() {
        let message = match serde_json::from_str::<AnalysisApiError>(body) {
            Ok(envelope) => envelope.error,
            Err(_) => format!("market backend returned HTTP {}", status),
        };
        return Err(MarketError::Backend(message));
    }

    let envelope: AnalysisApiResponse = serde_json::from_str(body).map_err(|_| {
        MarketError::SchemaViolation("backend response envelope is not valid JSON".to_string())
    })?;

    if envelope.status != "success" {
        return Err(MarketError::Backend(envelope.message));
    }

    decode_report(&envelope.message)
}

/// Validation boundary between generative output and the typed report.
///
/// The payload must conform to report schema v1 exactly: all fields present
/// and typed, no unknown fields, known tier and demand labels, unique tiers.
/// Zero tier analyses is a valid "no results" report. Backend order is kept.
pub fn decode_report(payload: &str) -> Result<MarketReport, MarketError> {
    let report: MarketReport = serde_json::from_str(payload).map_err(|e| {
        MarketError::SchemaViolation(format!(
            "payload does not conform to report schema {}: {}",
            REPORT_SCHEMA_VERSION, e
        ))
    })?;

    let mut seen: Vec<CityTier> = Vec::with_capacity(report.tier_analyses.len());
    for analysis in &report.tier_analyses {
        if seen.contains(&analysis.tier) {
            return Err(MarketError::SchemaViolation(format!(
                "duplicate analysis for {}",
                analysis.tier.label()
            )));
        }
        seen.push(analysis.tier);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::DemandLevel;

    fn tier_entry(tier: &str) -> String {
        format!(
            r#"{{
                "tier": "{}",
                "demand_level": "High",
                "estimated_openings": 1200,
                "salary_range": "INR 2.5-4.0 LPA",
                "top_employers": ["Infosys", "TCS"],
                "market_insight": "Steady hiring."
            }}"#,
            tier
        )
    }

    fn payload(entries: &[String]) -> String {
        format!(r#"{{ "tier_analyses": [{}] }}"#, entries.join(","))
    }

    #[test]
    fn test_decode_valid_report_preserves_order() {
        let body = payload(&[tier_entry("Tier 1 (Metros)"), tier_entry("Tier 3")]);
        let report = decode_report(&body).unwrap();

        assert_eq!(report.tier_analyses.len(), 2);
        assert_eq!(report.tier_analyses[0].tier, CityTier::Tier1);
        assert_eq!(report.tier_analyses[1].tier, CityTier::Tier3);
        assert_eq!(report.tier_analyses[0].demand_level, DemandLevel::High);
        assert_eq!(report.tier_analyses[0].estimated_openings, 1200);
    }

    #[test]
    fn test_decode_empty_report_is_valid() {
        let report = decode_report(r#"{ "tier_analyses": [] }"#).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let body = r#"{ "tier_analyses": [{
            "tier": "Tier 2",
            "demand_level": "Low",
            "salary_range": "INR 2.0-3.0 LPA",
            "top_employers": [],
            "market_insight": "Slow quarter."
        }] }"#;
        assert!(matches!(
            decode_report(body),
            Err(MarketError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_type() {
        let body = r#"{ "tier_analyses": [{
            "tier": "Tier 2",
            "demand_level": "Low",
            "estimated_openings": "many",
            "salary_range": "INR 2.0-3.0 LPA",
            "top_employers": [],
            "market_insight": "Slow quarter."
        }] }"#;
        assert!(matches!(
            decode_report(body),
            Err(MarketError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_tier_label() {
        let body = payload(&[tier_entry("Tier 5")]);
        assert!(matches!(
            decode_report(&body),
            Err(MarketError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_tier() {
        let body = payload(&[tier_entry("Tier 2"), tier_entry("Tier 2")]);
        let err = decode_report(&body).unwrap_err();
        match err {
            MarketError::SchemaViolation(message) => {
                assert!(message.contains("duplicate"));
                assert!(message.contains("Tier 2"));
            }
            other => panic!("expected SchemaViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_extra_fields() {
        let body = r#"{ "tier_analyses": [{
            "tier": "Tier 2",
            "demand_level": "Low",
            "estimated_openings": 40,
            "salary_range": "INR 2.0-3.0 LPA",
            "top_employers": [],
            "market_insight": "Slow quarter.",
            "confidence": 0.8
        }] }"#;
        assert!(matches!(
            decode_report(body),
            Err(MarketError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_decode_never_echoes_payload_in_error() {
        let secret = "UNPARSEABLE-MARKER-XYZ";
        let err = decode_report(&format!(r#"{{ "wrong": "{}" }}"#, secret)).unwrap_err();
        assert!(!err.to_string().contains(secret));
    }

    #[test]
    fn test_http_error_with_envelope_is_backend_error() {
        let outcome = interpret_response(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{ "error": "rate limit exceeded, retry later" }"#,
        );
        match outcome {
            Err(MarketError::Backend(message)) => {
                assert_eq!(message, "rate limit exceeded, retry later");
            }
            other => panic!("expected Backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_http_error_without_envelope_reports_status() {
        let outcome = interpret_response(StatusCode::BAD_GATEWAY, "upstream exploded");
        match outcome {
            Err(MarketError::Backend(message)) => assert!(message.contains("502")),
            other => panic!("expected Backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_status_in_success_envelope_is_backend_error() {
        let body = r#"{ "status": "error", "message": "content policy rejection" }"#;
        let outcome = interpret_response(StatusCode::OK, body);
        assert_eq!(
            outcome.unwrap_err(),
            MarketError::Backend("content policy rejection".to_string())
        );
    }

    #[test]
    fn test_garbage_envelope_is_schema_violation() {
        let outcome = interpret_response(StatusCode::OK, "<html>definitely not json</html>");
        assert!(matches!(
            outcome,
            Err(MarketError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_success_envelope_decodes_payload() {
        let body = serde_json::json!({
            "status": "success",
            "message": payload(&[tier_entry("Tier 4")]),
        })
        .to_string();
        let report = interpret_response(StatusCode::OK, &body).unwrap();
        assert_eq!(report.tier_analyses.len(), 1);
        assert_eq!(report.tier_analyses[0].tier, CityTier::Tier4);
    }

    #[test]
    fn test_error_codes_match_taxonomy() {
        assert_eq!(MarketError::Network(String::new()).code(), "NETWORK_ERROR");
        assert_eq!(MarketError::Backend(String::new()).code(), "BACKEND_ERROR");
        assert_eq!(
            MarketError::SchemaViolation(String::new()).code(),
            "SCHEMA_VIOLATION"
        );
    }
}
