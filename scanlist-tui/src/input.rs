//! Input dispatch: overlays first, then global keys, then mouse gestures.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use scanlist_core::Pane;

use crate::app::{AppState, Overlay, PIXELS_PER_CELL};
use crate::ui::overlays;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            app.help_seen = true;
            return;
        }
        Overlay::Columns { .. } => {
            handle_dialog_key(app, key);
            return;
        }
        Overlay::ContextMenu { .. } => {
            handle_menu_key(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Table keys.
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Esc => {
            app.table.cancel_drag();
            app.mouse_capture = None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.table.select_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.table.select_previous();
        }
        KeyCode::PageDown => page(app, 1),
        KeyCode::PageUp => page(app, -1),
        KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.other(),
        KeyCode::Char('h') | KeyCode::Left => app.move_column_cursor(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_column_cursor(1),
        KeyCode::Char('<') => app.scroll_horizontal(-4),
        KeyCode::Char('>') => app.scroll_horizontal(4),
        KeyCode::Char('s') | KeyCode::Enter => app.sort_focused(),
        KeyCode::Char('m') => app.cycle_label_mode(),
        KeyCode::Char('c') => app.open_column_dialog(),
        KeyCode::Char('C') => app.toggle_columns(),
        KeyCode::Char('a') => app.show_aggregate(),
        KeyCode::Char('x') => app.table.hide_aggregate_row(),
        KeyCode::Char('u') => app.commit_aggregate(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_min_quality(10.0),
        KeyCode::Char('-') => app.adjust_min_quality(-10.0),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('e') => app.export(),
        _ => {}
    }
}

fn page(app: &mut AppState, direction: i32) {
    let rows = app.table.layout().viewport_rows.max(1) as i32;
    app.table.scroll_by(direction * rows);
}

fn handle_dialog_key(app: &mut AppState, key: KeyEvent) {
    let Overlay::Columns { dialog, cursor } = &mut app.overlay else {
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.overlay = Overlay::None,
        KeyCode::Char('j') | KeyCode::Down => {
            if *cursor + 1 < dialog.len() {
                *cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => *cursor = cursor.saturating_sub(1),
        KeyCode::Char(' ') => dialog.toggle(*cursor),
        KeyCode::Char('a') => dialog.select_all(),
        KeyCode::Char('n') => dialog.clear_all(),
        KeyCode::Char('d') => dialog.reset_default(),
        KeyCode::Enter => {
            let columns = dialog.apply();
            app.overlay = Overlay::None;
            app.table.set_visible_columns(&columns);
            app.column_cursor = 0;
            app.set_status(format!("{} columns visible", columns.len()));
        }
        _ => {}
    }
}

fn handle_menu_key(app: &mut AppState, key: KeyEvent) {
    let Overlay::ContextMenu { entries, cursor, .. } = &mut app.overlay else {
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.overlay = Overlay::None,
        KeyCode::Char('j') | KeyCode::Down => {
            if *cursor + 1 < entries.len() {
                *cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => *cursor = cursor.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let index = *cursor;
            choose_menu_entry(app, index);
        }
        _ => {}
    }
}

fn choose_menu_entry(app: &mut AppState, index: usize) {
    let Overlay::ContextMenu { entries, .. } = std::mem::replace(&mut app.overlay, Overlay::None) else {
        return;
    };
    if let Some(entry) = entries.get(index) {
        app.table.toggle_column(&entry.key);
        let verb = if entry.visible { "Hid" } else { "Showing" };
        app.set_status(format!("{verb} {}", entry.label));
    }
}

pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);

    if let Overlay::ContextMenu { entries, anchor, .. } = &app.overlay {
        if let MouseEventKind::Down(_) = mouse.kind {
            let menu = overlays::context_menu_area(*anchor, entries, app.panes.main());
            match overlays::context_menu_hit(menu, entries, column, row) {
                Some(index) => choose_menu_entry(app, index),
                None => app.overlay = Overlay::None,
            }
        }
        return;
    }
    if app.overlay != Overlay::None {
        return;
    }

    let now = Instant::now();
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some((pane, point)) = app.hit(column, row) {
                app.mouse_capture = Some(pane);
                app.focus = pane;
                let outcome = app.table.pointer_press(pane, point);
                app.note_pointer(outcome);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(pane) = app.mouse_capture {
                let point = app.point_in(pane, column, row);
                app.table.pointer_move(pane, point, now);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(pane) = app.mouse_capture.take() {
                let point = app.point_in(pane, column, row);
                let outcome = app.table.pointer_release(pane, point);
                app.note_pointer(outcome);
            }
        }
        MouseEventKind::Down(MouseButton::Right) => {
            if let Some((Pane::Scrollable, point)) = app.hit(column, row) {
                if point.y < PIXELS_PER_CELL {
                    app.open_context_menu((column, row));
                }
            }
        }
        MouseEventKind::Moved => match app.hit(column, row) {
            Some((pane, point)) => {
                if let Some(previous) = app.hover.replace(pane).filter(|p| *p != pane) {
                    app.table.pointer_leave(previous);
                }
                app.table.pointer_move(pane, point, now);
            }
            None => {
                if let Some(previous) = app.hover.take() {
                    app.table.pointer_leave(previous);
                }
            }
        },
        MouseEventKind::ScrollDown => app.table.scroll_by(3),
        MouseEventKind::ScrollUp => app.table.scroll_by(-3),
        MouseEventKind::ScrollRight => app.scroll_horizontal(4),
        MouseEventKind::ScrollLeft => app.scroll_horizontal(-4),
        _ => {}
    }
}

/// Terminal resized: pane rectangles and the table viewport follow.
pub fn handle_resize(app: &mut AppState, width: u16, height: u16) {
    app.resize(Rect::new(0, 0, width, height));
}
