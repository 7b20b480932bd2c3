//! The two table panes. Both draw from snapshots of the same display list,
//! so row `i` of the frozen pane is always row `i` of the scrollable pane.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use scanlist_core::panel::{HeaderCell, PaneRow, PaneSnapshot};
use scanlist_core::Pane;

use crate::app::{AppState, PIXELS_PER_CELL};
use crate::theme;

/// Fixed-width cell text: truncated or right-padded to `width` chars.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len.min(width)));
    out
}

fn cells(width: u32) -> usize {
    (width as i32 / PIXELS_PER_CELL).max(1) as usize
}

fn header_text(cell: &HeaderCell) -> String {
    match cell.sort {
        Some(direction) => format!("{} {}", cell.label, direction.arrow()),
        None => cell.label.clone(),
    }
}

/// Drop the first `skip` chars across styled segments and keep at most `take`.
fn clip(segments: Vec<(String, Style)>, skip: usize, take: usize) -> Line<'static> {
    let mut spans = Vec::new();
    let mut to_skip = skip;
    let mut room = take;
    for (text, style) in segments {
        if room == 0 {
            break;
        }
        let len = text.chars().count();
        if to_skip >= len {
            to_skip -= len;
            continue;
        }
        let part: String = text.chars().skip(to_skip).take(room).collect();
        to_skip = 0;
        room -= part.chars().count();
        spans.push(Span::styled(part, style));
    }
    Line::from(spans)
}

fn row_style(row: &PaneRow, selected: Option<&str>) -> Option<Style> {
    if selected == Some(row.identity.as_str()) {
        Some(theme::selected_row())
    } else if row.aggregate {
        Some(theme::aggregate_row())
    } else {
        None
    }
}

fn pane_block(title: String, active: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(active))
        .title(title)
        .title_style(theme::panel_title(active))
}

fn visible_rows<'a>(snapshot: &'a PaneSnapshot, height: u16) -> impl Iterator<Item = &'a PaneRow> {
    let body = height.saturating_sub(1) as usize;
    snapshot.rows.iter().skip(snapshot.scroll_top).take(body)
}

pub fn render_frozen(f: &mut Frame, area: Rect, app: &AppState, snapshot: &PaneSnapshot) {
    let active = app.focus == Pane::Frozen;
    let block = pane_block(format!(" Symbols ({}) ", app.table.row_count()), active);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let mut lines = Vec::new();
    if let Some(header) = snapshot.header.first() {
        lines.push(Line::from(Span::styled(fit(&header_text(header), width), theme::accent_bold())));
    }
    for row in visible_rows(snapshot, inner.height) {
        let text = fit(row.cells.first().map_or("", String::as_str), width);
        let style = row_style(row, snapshot.selected.as_deref()).unwrap_or_else(theme::text);
        lines.push(Line::from(Span::styled(text, style)));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

pub fn render_scrollable(f: &mut Frame, area: Rect, app: &AppState, snapshot: &PaneSnapshot) {
    let active = app.focus == Pane::Scrollable;
    let title = if app.table.columns_enabled() {
        format!(" {} ", app.table.label_mode())
    } else {
        " columns off ".to_string()
    };
    let block = pane_block(title, active);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let skip = app.h_scroll as usize;
    let take = inner.width as usize;
    let dragged = app.table.dragged_column();

    let header: Vec<(String, Style)> = snapshot
        .header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let style = if dragged == Some(cell.key.as_str()) {
                theme::drag_indicator()
            } else if active && i == app.column_cursor {
                theme::selected_row()
            } else {
                theme::accent_bold()
            };
            (fit(&header_text(cell), cells(cell.width)), style)
        })
        .collect();

    let mut lines = vec![clip(header, skip, take)];
    for row in visible_rows(snapshot, inner.height) {
        let override_style = row_style(row, snapshot.selected.as_deref());
        let segments = snapshot
            .header
            .iter()
            .zip(&row.cells)
            .map(|(cell, value)| {
                let style = override_style.unwrap_or_else(|| theme::cell_style(&cell.key, value));
                (fit(value, cells(cell.width)), style)
            })
            .collect();
        lines.push(clip(segments, skip, take));
    }
    f.render_widget(Paragraph::new(lines), inner);

    if let Some(x) = app.table.drag_indicator() {
        draw_indicator(f, inner, x);
    }
}

/// Vertical insertion marker at viewport pixel `x`.
fn draw_indicator(f: &mut Frame, inner: Rect, x: i32) {
    let offset = x / PIXELS_PER_CELL;
    if offset < 0 || offset >= i32::from(inner.width) {
        return;
    }
    let column = inner.x + offset as u16;
    let buf = f.buffer_mut();
    for y in inner.y..inner.y + inner.height {
        if let Some(cell) = buf.cell_mut((column, y)) {
            cell.set_symbol("┃").set_style(theme::drag_indicator());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("AAPL", 6), "AAPL  ");
        assert_eq!(fit("Total Breakouts", 8), "Total B ");
        assert_eq!(fit("", 0), "");
    }

    #[test]
    fn clip_skips_across_segments() {
        let segs = vec![
            ("abc ".to_string(), Style::default()),
            ("defg ".to_string(), Style::default()),
        ];
        assert_eq!(text(&clip(segs.clone(), 0, 100)), "abc defg ");
        assert_eq!(text(&clip(segs.clone(), 5, 100)), "efg ");
        assert_eq!(text(&clip(segs, 2, 4)), "c de");
    }

    #[test]
    fn header_shows_sort_arrow() {
        let cell = HeaderCell {
            key: "max_quality".into(),
            label: "Max Quality".into(),
            width: 120,
            sort: Some(scanlist_core::SortDirection::Descending),
        };
        assert!(header_text(&cell).starts_with("Max Quality "));
        assert_eq!(cells(cell.width), 12);
    }
}
