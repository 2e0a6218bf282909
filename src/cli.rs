// src/cli.rs
use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::csv_export::export_market_report;
use crate::environment::EnvironmentConfig;
use crate::filters::FilterDimension;
use crate::market::MarketClient;
use crate::session::{run_analysis, Session};
use crate::web::start_web_server;

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(name = "jobscope")]
#[command(about = "Tiered labor-market analysis for the Indian entry-level job market")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Start the dashboard API server
    Serve,
    /// Run a single market analysis from the terminal
    Analyze {
        /// Qualification label, e.g. "BSC"
        #[arg(long)]
        qualification: Option<String>,
        /// Sector label, e.g. "IT"
        #[arg(long)]
        sector: Option<String>,
        /// Location tier label, e.g. "Tier 2"
        #[arg(long)]
        location: Option<String>,
        /// Job role label, e.g. "KYC Analyst"
        #[arg(long)]
        job_role: Option<String>,
        /// Also write the report as CSV into the configured output directory
        #[arg(long)]
        csv: bool,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = EnvironmentConfig::load()?;
    config.ensure_directories().await?;

    match cli.command.unwrap_or(CliCommand::Serve) {
        CliCommand::Serve => {
            let port = std::env::var("ROCKET_PORT")
                .ok()
                .and_then(|raw| raw.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);

            start_web_server(config.output_path, port).await
        }
        CliCommand::Analyze {
            qualification,
            sector,
            location,
            job_role,
            csv,
        } => {
            let mut session = Session::new();
            if let Some(raw) = qualification {
                session.set_filter(FilterDimension::Qualification, &raw)?;
            }
            if let Some(raw) = sector {
                session.set_filter(FilterDimension::Sector, &raw)?;
            }
            if let Some(raw) = location {
                session.set_filter(FilterDimension::Location, &raw)?;
            }
            if let Some(raw) = job_role {
                session.set_filter(FilterDimension::JobRole, &raw)?;
            }

            let client = MarketClient::from_env()?;
            run_analysis(&client, &mut session).await;

            if let Some(e) = session.last_error() {
                anyhow::bail!("Market analysis failed: {}", e);
            }

            if session.no_results() {
                println!("No significant results for the selected filters.");
                return Ok(());
            }

            let Some(report) = session.report() else {
                return Ok(());
            };
            for analysis in &report.tier_analyses {
                println!("== {} ==", analysis.tier);
                println!("  Demand:    {}", analysis.demand_level);
                println!("  Openings:  ~{}", analysis.estimated_openings);
                println!("  Salary:    {}", analysis.salary_range);
                println!("  Employers: {}", analysis.top_employers.join(", "));
                println!("  {}", analysis.market_insight);
            }

            if csv && session.is_data_available() {
                let path =
                    export_market_report(&report.tier_analyses, &config.output_path).await?;
                println!("✓ Report exported to {}", path.display());
            }

            Ok(())
        }
    }
}
