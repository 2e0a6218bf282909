// src/market/query.rs
use serde_json::json;

use crate::filters::{CityTier, Filters};
use crate::market::DemandLevel;

/// Version tag of the tier-analysis field set the backend is asked for.
pub const REPORT_SCHEMA_VERSION: &str = "v1";

/// One fully-built backend query: the analysis intent plus the explicit
/// output-schema descriptor the generative backend must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub prompt: String,
    pub response_schema: serde_json::Value,
}

/// Constraint clauses for every selected dimension. Unconstrained dimensions
/// produce no clause at all; they must not surface as a literal "All ..."
/// restriction in the prompt.
pub fn constraint_clauses(filters: &Filters) -> Vec<String> {
    let mut clauses = Vec::new();

    if let Some(qualification) = filters.qualification {
        clauses.push(format!(
            "candidates holding a {} degree",
            qualification.label()
        ));
    }
    if let Some(sector) = filters.sector {
        clauses.push(format!("openings in the {} sector", sector.label()));
    }
    if let Some(tier) = filters.location {
        clauses.push(format!("cities classified as {}", tier.label()));
    }
    if let Some(role) = filters.job_role {
        clauses.push(format!("the job role \"{}\"", role.label()));
    }

    clauses
}

/// Build the backend query for the given filter selection.
///
/// Pure and total: every `Filters` value yields a query, no I/O involved.
pub fn build_query(filters: &Filters) -> QuerySpec {
    let clauses = constraint_clauses(filters);

    let scope = if clauses.is_empty() {
        "Consider the entire entry-level job market with no restriction on qualification, sector, city tier or job role.".to_string()
    } else {
        let mut lines = String::from("Restrict the analysis to:\n");
        for clause in &clauses {
            lines.push_str("- ");
            lines.push_str(clause);
            lines.push('\n');
        }
        lines
    };

    let prompt = format!(
        r#"You are a labor-market analyst for the Indian entry-level job market.

{}
Report the current market situation broken down by city tier. For every city tier with significant activity, provide one analysis entry. Omit tiers with no meaningful data rather than inventing figures; an empty list is an acceptable answer.

Respond with structured data only, exactly matching the supplied response schema. Do not add prose around it."#,
        scope
    );

    QuerySpec {
        prompt,
        response_schema: response_schema(),
    }
}

/// JSON descriptor of report schema v1, handed to the backend alongside the
/// prompt so its output can be mechanically validated instead of parsed as
/// free text.
fn response_schema() -> serde_json::Value {
    let tier_labels: Vec<&str> = CityTier::ALL.iter().map(|t| t.label()).collect();
    let demand_labels: Vec<&str> = DemandLevel::ALL.iter().map(|d| d.label()).collect();

    json!({
        "version": REPORT_SCHEMA_VERSION,
        "type": "object",
        "required": ["tier_analyses"],
        "properties": {
            "tier_analyses": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": [
                        "tier",
                        "demand_level",
                        "estimated_openings",
                        "salary_range",
                        "top_employers",
                        "market_insight"
                    ],
                    "properties": {
                        "tier": { "type": "string", "enum": tier_labels },
                        "demand_level": { "type": "string", "enum": demand_labels },
                        "estimated_openings": { "type": "integer", "minimum": 0 },
                        "salary_range": { "type": "string" },
                        "top_employers": { "type": "array", "items": { "type": "string" } },
                        "market_insight": { "type": "string" }
                    }
                }
            }
        }
    })
}
