use colored::Colorize;
use serde::Serialize;

use crate::controller::{Controller, LoadState};
use crate::fetcher::{Record, RecordFetcher};
use crate::utils;

pub const TITLE: &str = "Pokédex";
pub const GRID_COLUMNS: usize = 4;
const CARD_WIDTH: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub id: u32,
    pub name: String,
    pub display_name: String,
    pub image: Option<String>,
}

pub fn build_records(records: &[&Record]) -> Vec<OutputRecord> {
    records
        .iter()
        .map(|r| OutputRecord {
            id: r.id,
            name: r.name.clone(),
            display_name: utils::capitalize(&r.name),
            image: r.image.clone(),
        })
        .collect()
}

// one "#id name" line per record
pub fn render_text(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!("#{} {}\n", r.id, r.display_name));
    }
    out.into_bytes()
}

pub fn render_json(records: &[OutputRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = serde_json::to_vec_pretty(records)?;
    out.push(b'\n');
    Ok(out)
}

pub fn render(
    format: OutputFormat,
    records: &[OutputRecord],
) -> Result<Vec<u8>, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(records)),
        OutputFormat::Json => render_json(records),
    }
}

fn fit(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return format!("{value:<width$}");
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn image_label(image: Option<&str>) -> String {
    match image {
        Some(url) => url.rsplit('/').next().unwrap_or(url).to_string(),
        None => "no image".to_string(),
    }
}

/// Lays cards out `columns` per row: name, `#id`, then the image reference.
pub fn render_grid(records: &[&Record], columns: usize) -> String {
    let mut out = String::new();
    for row in records.chunks(columns.max(1)) {
        let names: Vec<String> = row
            .iter()
            .map(|r| fit(&utils::capitalize(&r.name), CARD_WIDTH).bold().to_string())
            .collect();
        let ids: Vec<String> = row
            .iter()
            .map(|r| fit(&format!("#{}", r.id), CARD_WIDTH).dimmed().to_string())
            .collect();
        let images: Vec<String> = row
            .iter()
            .map(|r| fit(&image_label(r.image.as_deref()), CARD_WIDTH).cyan().to_string())
            .collect();
        for line in [names, ids, images] {
            out.push_str("  ");
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// The whole screen: title, filter, grid, page indicator and the
/// navigation hints that currently apply.
pub fn render_page<F: RecordFetcher>(ctrl: &Controller<F>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", TITLE.bold().red()));

    if ctrl.is_loading() {
        out.push_str("Loading...\n");
        return out;
    }

    let view = ctrl.view();
    if !view.filter_text().is_empty() {
        out.push_str(&format!(
            ":: {:<10}: {} ({} matches)\n\n",
            "Filter",
            view.filter_text(),
            view.filtered_count()
        ));
    }

    let visible = ctrl.compute_visible_slice();
    if visible.is_empty() {
        out.push_str("  no records\n\n");
    } else {
        out.push_str(&render_grid(&visible, GRID_COLUMNS));
    }

    let (page, total) = ctrl.page_label();
    let mut controls: Vec<String> = Vec::new();
    if ctrl.has_prev_page() {
        controls.push(format!("[{}] Previous", "p".bold()));
    }
    controls.push(format!("page {page}/{total}"));
    if ctrl.has_next_page() {
        controls.push(format!("[{}] Next", "n".bold()));
    }
    out.push_str(&controls.join("  "));
    out.push('\n');

    if let LoadState::Failed(message) = ctrl.load_state() {
        out.push_str(&format!("{} {}\n", "last load failed:".red(), message));
    }
    out
}
