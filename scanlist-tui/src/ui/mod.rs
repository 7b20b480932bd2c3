//! Top-level UI layout: frozen pane, scrollable pane, status bar.

pub mod overlays;
pub mod panes;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use scanlist_core::registry::IDENTITY_COLUMN_WIDTH;
use scanlist_core::Pane;

use crate::app::{AppState, Overlay, PIXELS_PER_CELL};

/// Outer rectangles of both panes. Borders take one cell on each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneAreas {
    pub frozen: Rect,
    pub scroll: Rect,
    pub status: Rect,
}

impl PaneAreas {
    pub fn outer(&self, pane: Pane) -> Rect {
        match pane {
            Pane::Frozen => self.frozen,
            Pane::Scrollable => self.scroll,
        }
    }

    pub fn inner(&self, pane: Pane) -> Rect {
        shrink(self.outer(pane))
    }

    pub fn scroll_inner(&self) -> Rect {
        self.inner(Pane::Scrollable)
    }

    /// Main area, both panes together.
    pub fn main(&self) -> Rect {
        self.frozen.union(self.scroll)
    }
}

fn shrink(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

/// Split the terminal: a fixed-width identity pane on the left, the
/// attribute pane filling the rest, and a 1-line status bar.
pub fn pane_areas(area: Rect) -> PaneAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let frozen_width = (IDENTITY_COLUMN_WIDTH as i32 / PIXELS_PER_CELL) as u16 + 2;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(frozen_width), Constraint::Min(4)])
        .split(rows[0]);
    PaneAreas {
        frozen: cols[0],
        scroll: cols[1],
        status: rows[1],
    }
}

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let areas = pane_areas(f.area());

    let frozen = app.table.frozen_pane();
    let scroll = app.table.scroll_pane();
    panes::render_frozen(f, areas.frozen, app, &frozen);
    panes::render_scrollable(f, areas.scroll, app, &scroll);

    status_bar::render(f, areas.status, app);

    if let Some(tooltip) = app.table.tooltip() {
        overlays::render_tooltip(f, areas.scroll_inner(), areas.main(), tooltip);
    }

    match &app.overlay {
        Overlay::Help => overlays::render_help(f, areas.main()),
        Overlay::Columns { dialog, cursor } => overlays::render_column_dialog(f, areas.main(), dialog, *cursor),
        Overlay::ContextMenu { entries, cursor, anchor } => {
            overlays::render_context_menu(f, areas.main(), entries, *cursor, *anchor)
        }
        Overlay::None => {}
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
