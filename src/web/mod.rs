// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, options, post, routes, Request, Response, State};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::info;

use crate::market::MarketClient;
use crate::session::Session;

/// The one dashboard session, serialized behind a mutex so only a single
/// analysis can be in flight.
pub type SessionState = Mutex<Session>;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/filters", data = "<request>")]
pub async fn set_filter(
    request: Json<SetFilterRequest>,
    session: &State<SessionState>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    handlers::set_filter_handler(request, session).await
}

#[post("/analyze")]
pub async fn analyze(
    session: &State<SessionState>,
    client: &State<MarketClient>,
) -> Result<Json<DataResponse<MarketReportData>>, Json<StandardErrorResponse>> {
    handlers::analyze_handler(session, client).await
}

#[get("/report")]
pub async fn report(session: &State<SessionState>) -> Json<DataResponse<SessionView>> {
    handlers::report_handler(session).await
}

#[post("/export-csv")]
pub async fn export_csv(
    session: &State<SessionState>,
    config: &State<ServerConfig>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    handlers::export_csv_handler(session, config).await
}

#[get("/health")]
pub fn health() -> Json<TextResponse> {
    Json(TextResponse::success("ok".to_string()))
}

#[options("/<_..>")]
pub fn all_options() {}

#[catch(400)]
fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Malformed request".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Check the request body against the API contract".to_string()],
    ))
}

#[catch(500)]
fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

pub async fn start_web_server(output_dir: PathBuf, port: u16) -> Result<()> {
    let server_config = ServerConfig {
        output_dir: output_dir.clone(),
    };

    let client = MarketClient::from_env()?;

    info!("Starting JobScope market dashboard API server");
    info!("Exports: {}", output_dir.display());
    info!("Server: http://0.0.0.0:{}", port);

    let figment = rocket::Config::figment().merge(("port", port));

    let _rocket = rocket::custom(figment)
        .attach(Cors)
        .manage(server_config)
        .manage(client)
        .manage(SessionState::new(Session::new()))
        .register("/api", catchers![bad_request, internal_error])
        .mount(
            "/api",
            routes![set_filter, analyze, report, export_csv, health, all_options],
        )
        .launch()
        .await?;

    Ok(())
}
