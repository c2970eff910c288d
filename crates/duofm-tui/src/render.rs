use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use duofm_core::{Dispatcher, Side};

use crate::ui::panel::{list_rows, render_panel, PanelStyle};
use crate::ui::statusbar::render_statusbar;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub left: Rect,
    pub right: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    /// Splits `area` into two side-by-side panels above a one-row status bar.
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        Self {
            left: panes[0],
            right: panes[1],
            status: rows[1],
        }
    }

    /// List rows per panel; also the page size.
    pub fn list_height(&self) -> usize {
        list_rows(self.left)
    }
}

/// Composes the full UI: both panels and the status bar.
pub fn render(f: &mut Frame, dispatcher: &Dispatcher, style: PanelStyle<'_>, status: Option<&str>) {
    let layout = ScreenLayout::new(f.area());
    let active = dispatcher.active_side();

    render_panel(
        f,
        layout.left,
        dispatcher.panel(Side::Left),
        style,
        active == Side::Left,
    );
    render_panel(
        f,
        layout.right,
        dispatcher.panel(Side::Right),
        style,
        active == Side::Right,
    );
    render_statusbar(f, layout.status, status);
}
