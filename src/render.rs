//! Plain-text rendering of query outcomes.
//!
//! Renders one page of a tabular result as a bordered grid with
//! auto-sized columns, and status or error outcomes as a summary line with
//! the raw diagnostic underneath.

use crate::controller::ExecutionState;
use crate::error::ConsoleError;
use crate::pagination::{Page, PageCursor};
use crate::result::{format_value, QueryResult, Record, StatusResult, TabularResult};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Renders whatever the controller currently holds.
pub fn render_state(state: &ExecutionState, cursor: &PageCursor) -> Vec<String> {
    match state {
        ExecutionState::Idle => vec![],
        ExecutionState::Loading => vec!["Executing...".to_string()],
        ExecutionState::Succeeded(result) => render_result(result, cursor),
        ExecutionState::Failed(error) => render_error(error),
    }
}

/// Renders a classified result, paging tabular rows through `cursor`.
pub fn render_result(result: &QueryResult, cursor: &PageCursor) -> Vec<String> {
    match result {
        QueryResult::Tabular(tabular) => render_table(tabular, &cursor.page(&tabular.records)),
        QueryResult::Status(status) => render_status(status),
    }
}

/// Renders a failed attempt.
pub fn render_error(error: &ConsoleError) -> Vec<String> {
    with_detail(format!("✗ {}: {error}", error.category()), error.detail())
}

fn render_status(status: &StatusResult) -> Vec<String> {
    let marker = if status.is_success() { '✓' } else { '✗' };
    with_detail(
        format!("{marker} {}", status.message),
        status.detail.as_deref(),
    )
}

fn with_detail(summary: String, detail: Option<&str>) -> Vec<String> {
    let mut lines = vec![summary];
    if let Some(detail) = detail {
        lines.extend(detail.split('\n').map(|l| format!("  {l}")));
    }
    lines
}

/// Footer line such as `Showing 1 to 3 of 3 | Page 1 of 1`.
pub fn footer<T>(page: &Page<'_, T>) -> String {
    format!(
        "Showing {} | Page {} of {}",
        page.range_label(),
        page.page_index(),
        page.total_pages()
    )
}

/// Renders one page of a tabular result.
pub fn render_table(result: &TabularResult, page: &Page<'_, Record>) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(name) = &result.table_name {
        lines.push(format!("Table: {name}"));
    }

    if result.columns.is_empty() || page.items.is_empty() {
        lines.push("(no rows)".to_string());
        lines.push(footer(page));
        return lines;
    }

    let cells: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|row| row.iter().map(format_value).collect())
        .collect();
    let widths = column_widths(result, &cells);

    lines.push(border(&widths, '┌', '┬', '┐'));
    let header: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
    lines.push(row_line(&header, &widths));
    lines.push(border(&widths, '├', '┼', '┤'));
    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(row_line(&row, &widths));
    }
    lines.push(border(&widths, '└', '┴', '┘'));
    lines.push(footer(page));

    lines
}

/// Width of each column over the header and the visible cells.
fn column_widths(result: &TabularResult, cells: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = result
        .columns
        .iter()
        .map(|col| col.name.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();

    for row in cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
}

/// Truncates a string to fit within the given width, adding ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{head}...")
    }
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, &width) in widths.iter().enumerate() {
        line.push_str(&"─".repeat(width + 2));
        if i < widths.len() - 1 {
            line.push(mid);
        }
    }
    line.push(right);
    line
}

fn row_line(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("│");
    for (i, &width) in widths.iter().enumerate() {
        let cell = truncate(cells.get(i).copied().unwrap_or(""), width);
        line.push_str(&format!(" {cell:width$} │"));
    }
    line
}
