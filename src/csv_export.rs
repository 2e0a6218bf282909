// src/csv_export.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::market::TierAnalysis;

/// Column order of the exported file; mirrors report schema v1.
const CSV_HEADERS: [&str; 6] = [
    "tier",
    "demand_level",
    "estimated_openings",
    "salary_range",
    "top_employers",
    "market_insight",
];

const EMPLOYER_SEPARATOR: &str = "; ";

/// Render tier analyses as CSV text: header row plus one record per analysis,
/// in the given order. Quoting and quote-doubling follow RFC 4180 via the
/// csv crate.
///
/// An empty slice is refused: export must be gated on data availability, so
/// reaching this with no rows is an upstream defect, not a user condition.
pub fn report_to_csv(rows: &[TierAnalysis]) -> Result<String> {
    if rows.is_empty() {
        anyhow::bail!("cannot export an empty market report");
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;

    for row in rows {
        let record: [String; 6] = [
            row.tier.label().to_string(),
            row.demand_level.label().to_string(),
            row.estimated_openings.to_string(),
            row.salary_range.clone(),
            row.top_employers.join(EMPLOYER_SEPARATOR),
            row.market_insight.clone(),
        ];
        writer
            .write_record(&record)
            .context("Failed to write CSV record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.into_error()))?;

    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Hand finished CSV content to the host filesystem under the configured
/// output directory, with a timestamped filename. Returns the written path.
pub async fn save_csv(content: &str, output_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let path = output_dir.join(format!(
        "market_report_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));

    tokio::fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(path)
}

/// Serialize and save in one step.
pub async fn export_market_report(rows: &[TierAnalysis], output_dir: &Path) -> Result<PathBuf> {
    let content = report_to_csv(rows)?;
    let path = save_csv(&content, output_dir).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::CityTier;
    use crate::market::DemandLevel;

    fn analysis(tier: CityTier) -> TierAnalysis {
        TierAnalysis {
            tier,
            demand_level: DemandLevel::Moderate,
            estimated_openings: 350,
            salary_range: "INR 2.0-3.5 LPA".to_string(),
            top_employers: vec!["Wipro".to_string(), "HCL".to_string()],
            market_insight: "Hiring is stable.".to_string(),
        }
    }

    #[test]
    fn test_empty_report_is_refused() {
        assert!(report_to_csv(&[]).is_err());
    }

    #[test]
    fn test_header_plus_one_line_per_row() {
        let rows = vec![analysis(CityTier::Tier1), analysis(CityTier::Tier3)];
        let content = report_to_csv(&rows).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("tier,demand_level,estimated_openings"));
    }

    #[test]
    fn test_row_order_is_preserved() {
        let rows = vec![
            analysis(CityTier::Tier3),
            analysis(CityTier::Tier1),
            analysis(CityTier::Tier4),
        ];
        let content = report_to_csv(&rows).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[1].starts_with("Tier 3"));
        assert!(lines[2].starts_with("\"Tier 1 (Metros)\"") || lines[2].starts_with("Tier 1"));
        assert!(lines[3].starts_with("Tier 4"));
    }

    #[test]
    fn test_round_trip_with_quoting_hazards() {
        let mut tricky = analysis(CityTier::Tier2);
        tricky.salary_range = "INR 2.5-4.0 LPA, negotiable".to_string();
        tricky.top_employers = vec!["Tata \"TCS\"".to_string(), "Flipkart".to_string()];
        tricky.market_insight = "Line one\nline two".to_string();

        let content = report_to_csv(&[tricky.clone()]).unwrap();

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        assert_eq!(
            reader.headers().unwrap(),
            &csv::StringRecord::from(CSV_HEADERS.to_vec())
        );

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(&record[0], "Tier 2");
        assert_eq!(&record[1], "Moderate");
        assert_eq!(&record[2], "350");
        assert_eq!(&record[3], "INR 2.5-4.0 LPA, negotiable");
        assert_eq!(&record[4], "Tata \"TCS\"; Flipkart");
        assert_eq!(&record[5], "Line one\nline two");
    }

    #[tokio::test]
    async fn test_save_csv_writes_file() {
        let dir = std::env::temp_dir().join("market_analyzer_csv_test");
        let content = report_to_csv(&[analysis(CityTier::Tier2)]).unwrap();

        let path = save_csv(&content, &dir).await.unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with(".csv"));

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written, content);

        tokio::fs::remove_file(&path).await.ok();
    }
}
