//! Status bar rendering.
//!
//! The status bar occupies the bottom row. It shows the latest prompt or
//! error from the dispatcher, or the key legend when there is nothing to
//! report.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

pub const LEGEND: &str = "[ESC,q quit] [TAB switch] [SPC select] [a all] [ARROWS nav] \
[r refresh] [c Copy] [m Move] [DD Delete] [: Shell] [b/B Bookmarks]";

/// Renders `status`, or the legend when `status` is `None`.
pub fn render_statusbar(f: &mut Frame, area: Rect, status: Option<&str>) {
    let span = match status {
        Some(message) => Span::styled(
            message.to_owned(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(LEGEND, Style::default().fg(Color::Gray)),
    };
    f.render_widget(Paragraph::new(span), area);
}

/// Paints a progress line straight onto the status row, bypassing the
/// frame buffer. Used while a batch runs and the dispatcher is busy; the
/// caller must force a full redraw afterwards.
pub fn paint_progress<W: Write>(out: &mut W, row: u16, width: u16, line: &str) -> io::Result<()> {
    let text: String = line.chars().take(usize::from(width)).collect();
    queue!(out, MoveTo(0, row), Clear(ClearType::CurrentLine), Print(text))?;
    out.flush()
}
