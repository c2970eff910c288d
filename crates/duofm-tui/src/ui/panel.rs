//! File list panel rendering.
//!
//! Draws one panel as a bordered box holding the visible slice of entries
//! (starting at the panel's top row) and a two-line footer: the directory
//! path, then a description of the entry under the cursor.

use std::fmt::Write as _;
use std::path::MAIN_SEPARATOR;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use duofm_core::{FileEntry, Panel};

/// Panels wider than this show name, date and size.
const FULL_DETAIL_WIDTH: usize = 50;
/// Panels wider than this (but not full width) show name and size.
const SIZE_DETAIL_WIDTH: usize = 30;
/// Right-aligned size column.
const SIZE_COLUMN: usize = 9;

const FOOTER_ROWS: u16 = 2;

const FALLBACK_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S";
/// The footer always shows the long form, e.g. `Mon, 02 Jan 2006 15:04:05`.
const FOOTER_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Display settings shared by both panels.
#[derive(Debug, Clone, Copy)]
pub struct PanelStyle<'a> {
    pub show_details: bool,
    pub date_format: &'a str,
}

/// Number of list rows a panel drawn into `area` can show.
pub fn list_rows(area: Rect) -> usize {
    // two border rows and the footer
    usize::from(area.height.saturating_sub(2 + FOOTER_ROWS))
}

/// Renders `panel` into `area`. The active panel gets a highlighted border
/// and cursor bar.
pub fn render_panel(f: &mut Frame, area: Rect, panel: &Panel, style: PanelStyle<'_>, is_active: bool) {
    let border_color = if is_active { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(FOOTER_ROWS)])
        .split(inner);

    let rows = usize::from(chunks[0].height);
    let width = usize::from(chunks[0].width);
    let top = panel.top();

    let items: Vec<ListItem> = panel
        .entries()
        .iter()
        .enumerate()
        .skip(top)
        .take(rows)
        .map(|(index, entry)| {
            let text = format_row(entry, panel.is_selected(index), width, style);
            ListItem::new(Line::styled(text, entry_style(entry, panel.is_selected(index))))
        })
        .collect();

    let highlight = if is_active {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    };
    let list = List::new(items).highlight_style(highlight);

    let mut state = ListState::default();
    if !panel.entries().is_empty() {
        state.select(Some(panel.cursor().saturating_sub(top)));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    let info = panel
        .cursor_entry()
        .map(format_footer)
        .unwrap_or_default();
    let footer = vec![
        Line::styled(
            panel.path().display().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(info),
    ];
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::Gray)),
        chunks[1],
    );
}

fn entry_style(entry: &FileEntry, selected: bool) -> Style {
    let style = if entry.is_dir() {
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    if selected {
        style.fg(Color::Yellow)
    } else {
        style
    }
}

/// One list row: selection marker, name (with a trailing separator for
/// directories) and, if there is room, size and date columns.
pub(crate) fn format_row(entry: &FileEntry, selected: bool, width: usize, style: PanelStyle<'_>) -> String {
    let marker = if selected { '*' } else { ' ' };
    let mut name = format!("{marker}{}", entry.name());
    if entry.is_dir() {
        name.push(MAIN_SEPARATOR);
    }

    if !style.show_details || width <= SIZE_DETAIL_WIDTH {
        return truncate(&name, width);
    }

    let size = if entry.is_dir() {
        String::new()
    } else {
        format_size(entry.size())
    };
    let size = format!("{size:>width$}", width = SIZE_COLUMN);

    if width <= FULL_DETAIL_WIDTH {
        let name_width = width - SIZE_COLUMN - 1;
        return format!("{} {size}", pad(&name, name_width));
    }

    let date = entry
        .modified()
        .map(|t| format_time(t, style.date_format))
        .unwrap_or_default();
    let date_width = date.chars().count();
    let name_width = width.saturating_sub(SIZE_COLUMN + date_width + 2);
    if name_width == 0 {
        return format!("{} {size}", pad(&name, width - SIZE_COLUMN - 1));
    }
    format!("{} {date} {size}", pad(&name, name_width))
}

/// Footer: permissions, modification time, byte size and name.
pub(crate) fn format_footer(entry: &FileEntry) -> String {
    let date = entry
        .modified()
        .map(|t| format_time(t, FOOTER_DATE_FORMAT))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {date} {} {}",
        entry.permissions(),
        entry.size(),
        entry.name()
    )
}

/// Formats `time` in local time. A format string chrono rejects falls back
/// to the default format.
pub(crate) fn format_time(time: SystemTime, format: &str) -> String {
    let local: DateTime<Local> = time.into();
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_ok() {
        return out;
    }
    out.clear();
    let _ = write!(out, "{}", local.format(FALLBACK_DATE_FORMAT));
    out
}

pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn pad(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    format!("{cut:<width$}")
}
