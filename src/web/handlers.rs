// src/web/handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};
use uuid::Uuid;

use crate::csv_export::{report_to_csv, save_csv};
use crate::market::{MarketClient, MarketError};
use crate::session::run_analysis;
use crate::web::types::{
    CsvResponse, DataResponse, MarketReportData, ServerConfig, SessionView, SetFilterRequest,
    StandardErrorResponse, TextResponse,
};
use crate::web::SessionState;

pub async fn set_filter_handler(
    request: Json<SetFilterRequest>,
    session: &State<SessionState>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    let mut session = session.lock().await;

    match session.set_filter(request.dimension, &request.value) {
        Ok(()) => Ok(Json(TextResponse::success(format!(
            "Filter updated: {}",
            request.value
        )))),
        Err(e) => {
            error!("Rejected filter value: {}", e);
            Err(Json(StandardErrorResponse::new(
                e.to_string(),
                "INVALID_FILTER".to_string(),
                vec!["Pick one of the options offered by the dashboard".to_string()],
            )))
        }
    }
}

pub async fn analyze_handler(
    session: &State<SessionState>,
    client: &State<MarketClient>,
) -> Result<Json<DataResponse<MarketReportData>>, Json<StandardErrorResponse>> {
    let request_id = Uuid::new_v4();

    // The lock is held across the backend round-trip, so a second analyze
    // request serializes behind this one instead of interleaving.
    let mut session = session.lock().await;

    info!("[{}] Running market analysis", request_id);
    run_analysis(client, &mut session).await;

    if let Some(e) = session.last_error() {
        error!("[{}] Market analysis failed: {}", request_id, e);
        return Err(Json(StandardErrorResponse::new(
            e.to_string(),
            e.code().to_string(),
            error_suggestions(e),
        )));
    }

    let report = session.report().cloned().unwrap_or_default();
    let no_results = session.no_results();

    info!(
        "[{}] Market analysis stored {} tier analyses",
        request_id,
        report.tier_analyses.len()
    );

    Ok(Json(DataResponse::success(
        if no_results {
            "No significant results for the selected filters".to_string()
        } else {
            "Market analysis complete".to_string()
        },
        MarketReportData { report, no_results },
    )))
}

pub async fn report_handler(session: &State<SessionState>) -> Json<DataResponse<SessionView>> {
    let session = session.lock().await;

    let state = if session.last_error().is_some() {
        "error"
    } else if session.no_results() {
        "no_results"
    } else if session.report().is_some() {
        "report"
    } else {
        "absent"
    };

    let view = SessionView {
        state,
        filters: *session.filters(),
        has_searched: session.has_searched(),
        report: session.report().cloned(),
        error: session.last_error().map(|e| e.to_string()),
        error_code: session.last_error().map(|e| e.code()),
    };

    Json(DataResponse::success("Current session".to_string(), view))
}

pub async fn export_csv_handler(
    session: &State<SessionState>,
    config: &State<ServerConfig>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    let session = session.lock().await;

    let rows = match session.report() {
        Some(report) if !report.is_empty() => &report.tier_analyses,
        _ => {
            return Err(Json(StandardErrorResponse::new(
                "No market report data to export".to_string(),
                "NO_REPORT_DATA".to_string(),
                vec!["Run an analysis that returns results first".to_string()],
            )));
        }
    };

    let content = match report_to_csv(rows) {
        Ok(content) => content,
        Err(e) => {
            error!("CSV serialization failed: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to serialize the market report".to_string(),
                "CSV_EXPORT_ERROR".to_string(),
                vec!["Re-run the analysis and try again".to_string()],
            )));
        }
    };

    let path = match save_csv(&content, &config.output_dir).await {
        Ok(path) => path,
        Err(e) => {
            error!("CSV save failed: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to write the export file".to_string(),
                "CSV_EXPORT_ERROR".to_string(),
                vec!["Check that the output directory is writable".to_string()],
            )));
        }
    };

    info!("Market report exported to {}", path.display());

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("market_report.csv")
        .to_string();

    Ok(CsvResponse::new(content.into_bytes(), filename))
}

fn error_suggestions(error: &MarketError) -> Vec<String> {
    let suggestions: &[&str] = match error {
        MarketError::Network(_) => &[
            "Check connectivity to the market analysis backend",
            "Run the analysis again",
        ],
        MarketError::Backend(_) => &[
            "Try again in a few moments",
            "Try a different filter combination",
        ],
        MarketError::SchemaViolation(_) => &[
            "Run the analysis again",
            "Report this if it keeps happening",
        ],
    };
    suggestions.iter().map(|s| s.to_string()).collect()
}
