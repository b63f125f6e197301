//! Terminal rendering of listing progress and results

use crate::format::{format_data_size, format_duration, format_integer};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use queue_listing_core::application::ResultSet;
use queue_listing_core::domain::{FlowFileDetails, FlowFileSummary, ListingResult};
use queue_listing_core::port::{Notice, RenderSink};
use std::sync::{Mutex, PoisonError};
use tabled::builder::Builder;
use tabled::{Table, Tabled};

const LISTING_HEADERS: [&str; 7] = [
    "Position",
    "UUID",
    "Filename",
    "File Size",
    "Queued Duration",
    "Lineage Duration",
    "Penalized",
];

const PROGRESS_TEMPLATE: &str = "{bar:40.cyan/blue} {pos:>3}% {msg}";

/// Progress bar on stderr, the listing itself on stdout
pub struct TerminalSink {
    results: Mutex<ResultSet>,
    bar: ProgressBar,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::with_progress_bar(ProgressBar::new(100))
    }

    fn with_progress_bar(bar: ProgressBar) -> Self {
        bar.set_length(100);
        bar.set_style(
            ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self {
            results: Mutex::new(ResultSet::new()),
            bar,
        }
    }

    /// Remove the progress bar; a cancelled job never reaches the sink's
    /// terminal calls
    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }

    /// The listing table plus its footer, or `None` when nothing was listed
    pub fn render(&self) -> Option<String> {
        let results = self.results.lock().unwrap_or_else(PoisonError::into_inner);
        if results.is_empty() {
            return None;
        }
        Some(format!("{}\n{}", listing_table(&results), footer(&results)))
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalSink {
    fn progress(&self, percent: u8, state_label: &str) {
        self.bar.set_position(u64::from(percent));
        self.bar.set_message(state_label.to_string());
    }

    fn replace_items(&self, result: &ListingResult) {
        self.finish();
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace_all(result);
    }

    fn notify(&self, notice: Notice) {
        self.finish();
        match notice {
            Notice::NoItems => eprintln!("{}", notice.to_string().yellow()),
            Notice::Failed(_) => eprintln!("{} {}", "✗".red(), notice.to_string().red()),
        }
    }
}

fn listing_table(results: &ResultSet) -> String {
    let clustered = results.is_clustered();
    let mut builder = Builder::default();

    let mut headers: Vec<String> = LISTING_HEADERS.iter().map(|h| h.to_string()).collect();
    if clustered {
        headers.push("Node".to_string());
    }
    builder.push_record(headers);

    for item in results.iter() {
        let mut row = listing_row(item);
        if clustered {
            row.push(item.cluster_node_address.clone().unwrap_or_default());
        }
        builder.push_record(row);
    }
    builder.build().to_string()
}

fn listing_row(item: &FlowFileSummary) -> Vec<String> {
    vec![
        item.position.map(|p| p.to_string()).unwrap_or_default(),
        item.uuid.clone(),
        item.filename.clone().unwrap_or_default(),
        size_label(item.size),
        duration_label(item.queued_duration),
        duration_label(item.lineage_duration),
        if item.is_penalized() { "Yes" } else { "No" }.to_string(),
    ]
}

/// `Displaying 3 of 1,204 (900 bytes)`
fn footer(results: &ResultSet) -> String {
    format!(
        "Displaying {} of {} ({})",
        format_integer(results.len() as u64),
        format_integer(results.total_count()),
        format_data_size(results.total_bytes())
    )
}

fn size_label(size: Option<i64>) -> String {
    size.map(|s| format_data_size(s.max(0) as u64)).unwrap_or_default()
}

fn duration_label(millis: Option<i64>) -> String {
    millis.map(format_duration).unwrap_or_default()
}

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Details of one flow unit followed by its attribute table
pub fn details_view(details: &FlowFileDetails) -> String {
    let mut lines = vec![
        format!("{} {}", "UUID:".bold(), details.uuid),
        format!("{} {}", "Filename:".bold(), details.filename.as_deref().unwrap_or("-")),
        format!(
            "{} {}",
            "Position:".bold(),
            details.position.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
        ),
        format!("{} {}", "File Size:".bold(), size_label(details.size)),
        format!("{} {}", "Queued Duration:".bold(), duration_label(details.queued_duration)),
        format!("{} {}", "Lineage Duration:".bold(), duration_label(details.lineage_duration)),
        format!(
            "{} {}",
            "Penalized:".bold(),
            if details.penalized.unwrap_or(false) { "Yes" } else { "No" }
        ),
    ];
    if let Some(node) = details.cluster_node_address.as_deref() {
        lines.push(format!("{} {}", "Node:".bold(), node));
    }

    if details.has_content_claim() {
        lines.push(String::new());
        lines.push(format!("{}", "Content Claim".cyan().bold()));
        lines.push(format!(
            "  {} {}",
            "Container:".bold(),
            details.content_claim_container.as_deref().unwrap_or("-")
        ));
        lines.push(format!(
            "  {} {}",
            "Section:".bold(),
            details.content_claim_section.as_deref().unwrap_or("-")
        ));
        lines.push(format!(
            "  {} {}",
            "Identifier:".bold(),
            details.content_claim_identifier.as_deref().unwrap_or("-")
        ));
        lines.push(format!(
            "  {} {}",
            "Offset:".bold(),
            details
                .content_claim_offset
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
        let claim_size = details
            .content_claim_file_size_bytes
            .map(|b| format_data_size(b.max(0) as u64))
            .or_else(|| details.content_claim_file_size.clone())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("  {} {}", "Size:".bold(), claim_size));
    }

    if !details.attributes.is_empty() {
        let rows: Vec<AttributeRow> = details
            .attributes
            .iter()
            .map(|(name, value)| AttributeRow {
                name: name.clone(),
                value: value.clone().unwrap_or_else(|| "No value set".to_string()),
            })
            .collect();
        lines.push(String::new());
        lines.push(Table::new(rows).to_string());
    }

    lines.join("\n")
}
