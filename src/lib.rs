// src/lib.rs
pub mod cli;
pub mod csv_export;
pub mod environment;
pub mod filters;
pub mod market;
pub mod session;
pub mod web;

pub use filters::{FilterDimension, Filters};
pub use market::{
    build_query, decode_report, MarketClient, MarketError, MarketReport, QuerySpec, TierAnalysis,
};
pub use session::{run_analysis, SearchState, Session};
