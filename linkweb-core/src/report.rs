// Report generation from a finished crawl

use crate::config::CrawlConfig;
use crate::graph::{GraphMap, LinkGraph};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const BANNER: &str = "###########################################";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub graph: String,
    pub scraper: String,
    pub strategy: String,
    pub elapsed_secs: f64,
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: GraphMap,
}

impl CrawlReport {
    pub fn new(config: &CrawlConfig, graph: &dyn LinkGraph, elapsed: Duration) -> Self {
        let nodes = graph.as_map();
        let edge_count = nodes.values().map(|edges| edges.len()).sum();

        Self {
            seed: config.seed.to_string(),
            graph: config.graph.to_string(),
            scraper: config.scraper.to_string(),
            strategy: config.strategy.to_string(),
            elapsed_secs: elapsed.as_secs_f64(),
            node_count: nodes.len(),
            edge_count,
            nodes,
        }
    }

    fn elapsed_rounded(&self) -> f64 {
        (self.elapsed_secs * 1000.0).round() / 1000.0
    }
}

/// Sorted node list followed by a summary banner.
pub fn generate_text_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    // GraphMap keys are already ordered
    for url in report.nodes.keys() {
        out.push_str(url);
        out.push('\n');
    }

    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&format!(
        "Graph: {} | Scraper: {} | Strategy: {}\n",
        report.graph, report.scraper, report.strategy
    ));
    out.push_str(&format!(
        "Nodes: {} | Edges: {}\n",
        report.node_count, report.edge_count
    ));
    out.push_str(&format!(
        "Time to complete: {} seconds.\n",
        report.elapsed_rounded()
    ));
    out.push_str(BANNER);
    out.push('\n');

    out
}

pub fn generate_json_report(report: &CrawlReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn generate_report(report: &CrawlReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(report),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Render several reports at once, as consecutive text blocks or a JSON array.
pub fn generate_batch_report(
    reports: &[CrawlReport],
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match (format, reports) {
        (_, [single]) => generate_report(single, format),
        (ReportFormat::Text, _) => Ok(reports
            .iter()
            .map(generate_text_report)
            .collect::<Vec<_>>()
            .join("\n")),
        (ReportFormat::Json, _) => serde_json::to_string_pretty(reports),
    }
}
