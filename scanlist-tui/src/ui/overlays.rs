//! Overlay widgets: help, column dialog, header context menu, tooltip.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use scanlist_core::tooltip::Tooltip;
use scanlist_core::ColumnDialog;

use crate::app::{MenuEntry, PIXELS_PER_CELL};
use crate::theme;
use crate::ui::centered_rect;

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help [any key closes] ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();
    section(&mut lines, "Navigation");
    key(&mut lines, "j / k", "Select next / previous symbol");
    key(&mut lines, "PgDn / PgUp", "Scroll both panes");
    key(&mut lines, "Tab", "Switch focus between panes");
    key(&mut lines, "h / l", "Move column cursor");
    key(&mut lines, "< / >", "Scroll columns left / right");
    lines.push(Line::from(""));

    section(&mut lines, "Table");
    key(&mut lines, "s / Enter", "Sort by focused column (again to flip)");
    key(&mut lines, "m", "Cycle label mode (avg, max, best quality, latest)");
    key(&mut lines, "c", "Choose visible columns");
    key(&mut lines, "C", "Switch all columns on / off");
    key(&mut lines, "r", "Reload scan file");
    key(&mut lines, "e", "Export table to CSV");
    lines.push(Line::from(""));

    section(&mut lines, "Aggregate row");
    key(&mut lines, "a", "Summarize selected symbol's breakouts");
    key(&mut lines, "+ / -", "Raise / lower minimum breakout quality");
    key(&mut lines, "u", "Write aggregate stats into the symbol row");
    key(&mut lines, "x", "Hide aggregate row");
    lines.push(Line::from(""));

    section(&mut lines, "Mouse");
    key(&mut lines, "click header", "Sort by column");
    key(&mut lines, "drag header", "Move column");
    key(&mut lines, "right-click header", "Show / hide columns");
    key(&mut lines, "hover header", "Column description");
    key(&mut lines, "Esc", "Cancel column drag");
    key(&mut lines, "q", "Quit");

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn render_column_dialog(f: &mut Frame, area: Rect, dialog: &ColumnDialog, cursor: usize) {
    let popup = centered_rect(50, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Columns [Space]toggle [a]all [n]none [d]default [Enter]apply [Esc]cancel ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if dialog.is_empty() {
        let text = Paragraph::new(Span::styled("No columns discovered yet.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let height = inner.height as usize;
    let first = cursor.saturating_sub(height.saturating_sub(1));
    let lines: Vec<Line> = dialog
        .entries()
        .iter()
        .enumerate()
        .skip(first)
        .take(height)
        .map(|(i, entry)| {
            let style = if i == cursor { theme::selected_row() } else { theme::text() };
            Line::from(vec![
                Span::styled(format!(" {} ", checkbox(entry.checked)), theme::accent()),
                Span::styled(entry.label.clone(), style),
                Span::styled(format!("  {}", entry.key), theme::muted()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

/// Where the context menu opened at `anchor` lands, kept inside `bounds`.
pub fn context_menu_area(anchor: (u16, u16), entries: &[MenuEntry], bounds: Rect) -> Rect {
    let label_width = entries.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);
    let width = (label_width as u16 + 6).min(bounds.width);
    let height = (entries.len() as u16 + 2).min(bounds.height);
    let x = anchor.0.min(bounds.right().saturating_sub(width)).max(bounds.x);
    let y = anchor.1.min(bounds.bottom().saturating_sub(height)).max(bounds.y);
    Rect::new(x, y, width, height)
}

/// Entry index under a terminal cell, if the cell is inside the menu body.
pub fn context_menu_hit(menu: Rect, entries: &[MenuEntry], column: u16, row: u16) -> Option<usize> {
    let inside = column > menu.x && column + 1 < menu.right() && row > menu.y && row + 1 < menu.bottom();
    if !inside {
        return None;
    }
    let index = (row - menu.y - 1) as usize;
    (index < entries.len()).then_some(index)
}

pub fn render_context_menu(f: &mut Frame, area: Rect, entries: &[MenuEntry], cursor: usize, anchor: (u16, u16)) {
    let menu = context_menu_area(anchor, entries, area);
    f.render_widget(Clear, menu);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::neutral());
    let inner = block.inner(menu);
    f.render_widget(block, menu);

    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == cursor { theme::selected_row() } else { theme::text() };
            Line::from(vec![
                Span::styled(format!("{} ", checkbox(entry.visible)), theme::accent()),
                Span::styled(entry.label.clone(), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

/// Tooltip box near the pointer. `pane` is the scrollable pane's inner area.
pub fn render_tooltip(f: &mut Frame, pane: Rect, bounds: Rect, tooltip: &Tooltip) {
    let width = (tooltip.text.chars().count() as u16 + 2).min(bounds.width);
    let height = 3.min(bounds.height);
    let col = i32::from(pane.x) + tooltip.anchor.x / PIXELS_PER_CELL;
    let row = i32::from(pane.y) + tooltip.anchor.y / PIXELS_PER_CELL;
    let max_x = i32::from(bounds.right().saturating_sub(width));
    let max_y = i32::from(bounds.bottom().saturating_sub(height));
    let x = col.clamp(i32::from(bounds.x), max_x.max(i32::from(bounds.x)));
    let y = row.clamp(i32::from(bounds.y), max_y.max(i32::from(bounds.y)));
    let area = Rect::new(x as u16, y as u16, width, height);

    f.render_widget(Clear, area);
    let para = Paragraph::new(Span::styled(tooltip.text.as_str(), theme::text())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted()),
    );
    f.render_widget(para, area);
}
