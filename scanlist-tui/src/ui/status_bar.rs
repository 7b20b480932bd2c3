//! Bottom status bar: selection, sort, key hints, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    if let Some((symbol, breakouts)) = &app.last_selected {
        spans.push(Span::styled(format!(" {symbol}"), theme::accent_bold()));
        spans.push(Span::styled(format!(" ({breakouts} bo)"), theme::muted()));
    }

    if let Some(sort) = app.table.sort_state() {
        spans.push(Span::styled(
            format!(" {} {}", sort.column, sort.direction.arrow()),
            theme::neutral(),
        ));
    }

    if app.table.aggregate_row().is_some() {
        spans.push(Span::styled(format!(" q>={:.0}", app.min_quality), theme::neutral()));
    }

    let max_scroll = app.max_h_scroll();
    if max_scroll > 0 {
        spans.push(Span::styled(format!(" cols {}/{}", app.h_scroll, max_scroll), theme::muted()));
    }

    spans.push(Span::styled(" ?:Help c:Columns m:Label a:Agg e:Export q:Quit", theme::muted()));
    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
