//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::map::ClusterSummary;
use crate::proximity::ProximityMatch;
use crate::report::Report;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

fn report_line(report: &Report) -> String {
    format!(
        "{}  {:<12} {:<6} {:<8} ({:.6}, {:.6}) {}",
        report.id,
        report.issue_type,
        report.severity,
        report.status,
        report.latitude,
        report.longitude,
        report.geohash
    )
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format_reports(&self, reports: &[Report], _config: &Config) -> Result<String> {
        if reports.is_empty() {
            return Ok("No reports.\n".to_string());
        }

        let mut output = format!("{} report(s)\n\n", reports.len());
        for report in reports {
            output.push_str(&report_line(report));
            output.push('\n');
            if !report.description.is_empty() {
                output.push_str(&format!("    {}\n", report.description));
            }
        }
        Ok(output)
    }

    fn format_matches(&self, matches: &[ProximityMatch], config: &Config) -> Result<String> {
        if matches.is_empty() {
            return Ok("No reports nearby.\n".to_string());
        }

        let mut output = format!("{} report(s) nearby\n\n", matches.len());
        for m in matches {
            output.push_str(&format!("{:>8.1}m  {}\n", m.distance, report_line(&m.report)));
            if let Ok(url) = config.format_url(None, m.report.latitude, m.report.longitude) {
                output.push_str(&format!("           {}\n", url));
            }
        }
        Ok(output)
    }

    fn format_clusters(
        &self,
        clusters: &[ClusterSummary],
        grid_size: f64,
        _config: &Config,
    ) -> Result<String> {
        let mut output = format!("Grid size: {}°\n", grid_size);
        output.push_str(&format!("Clusters: {}\n\n", clusters.len()));

        for cluster in clusters {
            output.push_str(&format!(
                "  ({:.4}, {:.4})  count {:<4} avg severity {:.2}\n",
                cluster.lat, cluster.lng, cluster.count, cluster.avg_severity
            ));
        }
        Ok(output)
    }
}
