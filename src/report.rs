//! Analysis output: doughnut chart series, the real-vs-sample comparison
//! table and the short textual summaries shown next to them.

use crate::statistics::{ComparisonRow, StatisticsTable};
use crate::types::{Borough, Category};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Data for one doughnut chart, ready for a chart widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<&'static str>,
    pub values: Vec<usize>,
    pub colors: Vec<&'static str>,
    pub percentages: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisCharts {
    pub overall: ChartSeries,
    pub boroughs: Vec<ChartSeries>,
}

fn series(title: String, values: Vec<usize>, shares: Vec<(Category, f64)>) -> ChartSeries {
    ChartSeries {
        title,
        labels: Category::ALL.iter().map(|c| c.descriptor().name).collect(),
        values,
        colors: Category::ALL.iter().map(|c| c.descriptor().color).collect(),
        percentages: shares.into_iter().map(|(_, share)| share).collect(),
    }
}

pub fn borough_chart(table: &StatisticsTable, borough: Borough) -> ChartSeries {
    series(
        borough.to_string(),
        Category::ALL.iter().map(|c| table.count(borough, *c)).collect(),
        table.proportions(borough),
    )
}

pub fn overall_chart(table: &StatisticsTable) -> ChartSeries {
    series(
        "Overall NYC Distribution".to_string(),
        Category::ALL.iter().map(|c| table.category_total(*c)).collect(),
        table.overall_proportions(),
    )
}

pub fn analysis_charts(table: &StatisticsTable) -> AnalysisCharts {
    AnalysisCharts {
        overall: overall_chart(table),
        boroughs: Borough::ALL.iter().map(|b| borough_chart(table, *b)).collect(),
    }
}

/// "Brooklyn (62 locations), Queens (43 locations), Manhattan (28 locations)"
pub fn sample_summary(table: &StatisticsTable) -> String {
    Borough::ALL
        .iter()
        .map(|b| format!("{} ({} locations)", b, table.total(*b)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plain-text table for terminal output.
pub fn render_text(table: &StatisticsTable) -> String {
    let mut out = format!("Sample Summary: {}\n\n", sample_summary(table));
    out.push_str(&format!(
        "{:<10} {:<16} {:>12} {:>8} {:>10}\n",
        "Borough", "Category", "Real Count", "Sample", "Rate"
    ));
    for row in table.comparison() {
        out.push_str(&format!(
            "{:<10} {:<16} {:>12} {:>8} {:>9.3}%\n",
            row.borough.as_str(),
            row.category.descriptor().name,
            row.baseline,
            row.sampled,
            row.sample_rate_percent
        ));
    }
    out.push_str(&format!(
        "\nTotal of {} locations representing ~{:.3}% of estimated real data\n",
        table.grand_total(),
        table.sample_fraction_percent()
    ));
    out
}

pub fn write_comparison_csv<W: Write>(writer: W, rows: &[ComparisonRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "Borough",
        "Category",
        "Estimated Real Count",
        "Sample Count",
        "Sample Rate",
    ])?;
    for row in rows {
        wtr.write_record([
            row.borough.as_str().to_string(),
            row.category.descriptor().name.to_string(),
            row.baseline.to_string(),
            row.sampled.to_string(),
            format!("{:.3}%", row.sample_rate_percent),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    Ok(BufWriter::new(file))
}

pub fn write_comparison_csv_file(path: &Path, table: &StatisticsTable) -> Result<()> {
    let rows = table.comparison();
    write_comparison_csv(create_output(path)?, &rows)
        .with_context(|| format!("Failed to write comparison table to {:?}", path))?;
    info!("Wrote comparison table ({} rows) to {:?}", rows.len(), path);
    Ok(())
}

pub fn write_charts_json(path: &Path, table: &StatisticsTable) -> Result<()> {
    serde_json::to_writer_pretty(create_output(path)?, &analysis_charts(table))
        .with_context(|| format!("Failed to write chart data to {:?}", path))?;
    info!("Wrote chart data to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::generate;
    use crate::statistics::aggregate;

    #[test]
    fn summary_lists_every_borough() {
        let table = aggregate(&generate());
        assert_eq!(
            sample_summary(&table),
            "Brooklyn (62 locations), Queens (43 locations), Manhattan (28 locations)"
        );
    }

    #[test]
    fn borough_chart_uses_descriptor_styling() {
        let table = aggregate(&generate());
        let chart = borough_chart(&table, Borough::Manhattan);
        assert_eq!(chart.title, "Manhattan");
        assert_eq!(chart.labels, vec!["Schools", "Supermarkets", "Police Stations", "Parks"]);
        assert_eq!(chart.colors, vec!["#3B82F6", "#10B981", "#EF4444", "#22C55E"]);
        assert_eq!(chart.values, vec![7, 16, 1, 4]);
        assert!((chart.percentages[1] - 16.0 / 28.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn overall_chart_sums_boroughs() {
        let charts = analysis_charts(&aggregate(&generate()));
        assert_eq!(charts.overall.values, vec![35, 69, 3, 26]);
        assert_eq!(charts.boroughs.len(), 3);
    }

    #[test]
    fn csv_has_header_and_twelve_rows() {
        let table = aggregate(&generate());
        let mut buf = Vec::new();
        write_comparison_csv(&mut buf, &table.comparison()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(
            lines[0],
            "Borough,Category,Estimated Real Count,Sample Count,Sample Rate"
        );
        assert_eq!(lines[1], "Brooklyn,Schools,685,17,2.482%");
        assert_eq!(lines[3], "Brooklyn,Police Stations,23,1,4.348%");
    }

    #[test]
    fn text_report_mentions_totals() {
        let text = render_text(&aggregate(&generate()));
        assert!(text.contains("Total of 133 locations"));
        assert!(text.contains("Police Stations"));
    }

    #[test]
    fn text_report_has_one_line_per_stratum() {
        let text = render_text(&aggregate(&generate()));
        let lines: Vec<&str> = text.lines().collect();

        // summary, blank, header, 12 rows, blank, total
        assert_eq!(lines.len(), 17);
        assert!(lines[0].starts_with("Sample Summary: Brooklyn (62 locations)"));
        assert!(lines[3].starts_with("Brooklyn   Schools"));
        assert!(lines[3].ends_with("2.482%"));
        assert!(lines[16].starts_with("Total of 133 locations"));
    }
}
