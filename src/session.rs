// src/session.rs
use anyhow::Result;
use tracing::info;

use crate::filters::{FilterDimension, Filters};
use crate::market::{build_query, MarketClient, MarketError, MarketReport};

/// Outcome of the most recent analysis. Exactly one of these is held at any
/// time; an error never coexists with stale report data.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// No analysis has produced an outcome yet (or one is being replaced).
    Absent,
    Report(MarketReport),
    Failed(MarketError),
}

/// Owner of the dashboard session: the current filter selection, the single
/// stored outcome, and whether an analysis was ever attempted. The pipeline
/// components stay stateless; everything mutable lives here.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    filters: Filters,
    state: SearchState,
    has_searched: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            filters: Filters::new(),
            state: SearchState::Absent,
            has_searched: false,
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Apply one dashboard filter change. Rejects values outside the
    /// dimension's catalog.
    pub fn set_filter(&mut self, dimension: FilterDimension, raw: &str) -> Result<()> {
        self.filters.set(dimension, raw)
    }

    /// Start a new analysis: clear the previous outcome, mark the session as
    /// searched, and return the immutable filter snapshot for this fetch.
    pub fn begin_search(&mut self) -> Filters {
        self.state = SearchState::Absent;
        self.has_searched = true;
        self.filters
    }

    /// Store the outcome of the fetch started by `begin_search`.
    pub fn complete_search(&mut self, outcome: Result<MarketReport, MarketError>) {
        self.state = match outcome {
            Ok(report) => SearchState::Report(report),
            Err(error) => SearchState::Failed(error),
        };
    }

    pub fn report(&self) -> Option<&MarketReport> {
        match &self.state {
            SearchState::Report(report) => Some(report),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&MarketError> {
        match &self.state {
            SearchState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Export is only reachable with at least one tier analysis in store.
    pub fn is_data_available(&self) -> bool {
        self.report().is_some_and(|report| !report.is_empty())
    }

    /// A search ran, nothing failed, and no tier analyses came back. Distinct
    /// from the untried state and from the error state.
    pub fn no_results(&self) -> bool {
        self.has_searched
            && self.last_error().is_none()
            && self.report().is_none_or(|report| report.is_empty())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one full analysis pass for the session: snapshot filters, build the
/// query, fetch, store the outcome. The caller holds the session for the
/// whole pass, so no second analysis can interleave.
pub async fn run_analysis(client: &MarketClient, session: &mut Session) {
    let filters = session.begin_search();
    let query = build_query(&filters);

    info!("Starting market analysis");
    let outcome = client.fetch_report(&query).await;
    session.complete_search(outcome);
}
