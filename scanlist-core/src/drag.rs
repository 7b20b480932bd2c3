//! ColumnDragController: press / threshold-gated drag / drop state machine
//! for reordering the scrollable pane's columns.
//!
//! ```text
//! Idle --press on a header column--> Pressed
//! Pressed --move, |dx| < threshold--> Pressed
//! Pressed --move, |dx| >= threshold--> Dragging
//! Dragging --move--> Dragging (insertion slot recomputed)
//! Pressed --release on the pressed column--> Idle (plain click: caller sorts)
//! Pressed --release elsewhere--> Idle (nothing)
//! Dragging --release--> Idle (reorder committed)
//! ```
//!
//! The column order is only ever produced at release; cancelling or
//! releasing in an unchanged slot leaves it untouched.

use crate::geometry::{HeaderGeometry, Point};

/// Minimum horizontal travel that turns a press into a drag.
pub const DRAG_THRESHOLD: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pressed {
        column: String,
        start_x: i32,
    },
    Dragging {
        column: String,
        start_x: i32,
        target: usize,
    },
}

/// What a release meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// No gesture was in progress.
    None,
    /// Released before crossing the threshold: treat as a header click.
    Click { column: String },
    /// Dropped into the slot it came from, a column vanished meanwhile, or
    /// a press was released off its column.
    Unchanged,
    /// Dropped elsewhere: the new full column order.
    Reordered { column: String, order: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct ColumnDragController {
    state: DragState,
    threshold: i32,
}

impl Default for ColumnDragController {
    fn default() -> Self {
        Self::new(DRAG_THRESHOLD)
    }
}

impl ColumnDragController {
    pub fn new(threshold: i32) -> Self {
        Self {
            state: DragState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether the threshold has been crossed in the current gesture.
    pub fn is_armed(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The column being pressed or dragged.
    pub fn column(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pressed { column, .. } | DragState::Dragging { column, .. } => Some(column),
        }
    }

    /// Pointer press. Only a press on a header column starts a gesture;
    /// anything else resets to idle. Returns whether a gesture started.
    pub fn press(&mut self, point: Point, geometry: &HeaderGeometry, columns: &[String]) -> bool {
        self.state = DragState::Idle;
        if !geometry.in_header(point) {
            return false;
        }
        let Some(column) = geometry.column_at(point.x).and_then(|i| columns.get(i)) else {
            return false;
        };
        self.state = DragState::Pressed {
            column: column.clone(),
            start_x: point.x,
        };
        true
    }

    /// Pointer motion with the button held. Returns the insertion slot while
    /// dragging.
    pub fn motion(&mut self, x: i32, geometry: &HeaderGeometry) -> Option<usize> {
        match &mut self.state {
            DragState::Idle => None,
            DragState::Pressed { column, start_x } => {
                if (x - *start_x).abs() < self.threshold {
                    return None;
                }
                let target = geometry.insert_index(x);
                tracing::debug!(column = %column, target, "column drag started");
                self.state = DragState::Dragging {
                    column: std::mem::take(column),
                    start_x: *start_x,
                    target,
                };
                Some(target)
            }
            DragState::Dragging { target, .. } => {
                *target = geometry.insert_index(x);
                Some(*target)
            }
        }
    }

    /// Pointer release. Always returns the controller to idle.
    pub fn release(&mut self, x: i32, geometry: &HeaderGeometry, columns: &[String]) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragOutcome::None,
            DragState::Pressed { column, .. } => {
                let pressed = columns.iter().position(|c| *c == column);
                if pressed.is_some() && geometry.column_at(x) == pressed {
                    DragOutcome::Click { column }
                } else {
                    DragOutcome::Unchanged
                }
            }
            DragState::Dragging { column, .. } => {
                let target = geometry.insert_index(x);
                match reorder(columns, &column, target) {
                    Some(order) => {
                        tracing::info!(column = %column, target, "column moved");
                        DragOutcome::Reordered { column, order }
                    }
                    None => DragOutcome::Unchanged,
                }
            }
        }
    }

    /// Drop any gesture in progress without producing an order.
    pub fn cancel(&mut self) {
        if self.state != DragState::Idle {
            tracing::debug!("column drag cancelled");
        }
        self.state = DragState::Idle;
    }

    /// Viewport x of the insertion indicator while dragging.
    pub fn indicator_x(&self, geometry: &HeaderGeometry) -> Option<i32> {
        match &self.state {
            DragState::Dragging { target, .. } => Some(geometry.slot_x(*target)),
            _ => None,
        }
    }
}

/// Move `column` to insertion slot `target` (a slot index in the original
/// order). Returns `None` when the column is unknown or the slot is the
/// column's own position or the one right after it.
pub fn reorder(columns: &[String], column: &str, target: usize) -> Option<Vec<String>> {
    let current = columns.iter().position(|c| c == column)?;
    let target = target.min(columns.len());
    if target == current || target == current + 1 {
        return None;
    }
    let mut order = columns.to_vec();
    let moved = order.remove(current);
    let adjusted = if target > current { target - 1 } else { target };
    order.insert(adjusted, moved);
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols() -> Vec<String> {
        ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect()
    }

    // Four 100px columns, header 30px tall.
    fn geometry() -> HeaderGeometry {
        HeaderGeometry::new(vec![100; 4], 0, 30)
    }

    #[test]
    fn reorder_after_later_column() {
        assert_eq!(
            reorder(&cols(), "A", 3),
            Some(vec!["B".into(), "C".into(), "A".into(), "D".into()])
        );
    }

    #[test]
    fn reorder_to_front_and_end() {
        assert_eq!(
            reorder(&cols(), "C", 0),
            Some(vec!["C".into(), "A".into(), "B".into(), "D".into()])
        );
        assert_eq!(
            reorder(&cols(), "B", 4),
            Some(vec!["A".into(), "C".into(), "D".into(), "B".into()])
        );
    }

    #[test]
    fn reorder_noop_slots() {
        assert_eq!(reorder(&cols(), "B", 1), None);
        assert_eq!(reorder(&cols(), "B", 2), None);
        assert_eq!(reorder(&cols(), "Z", 0), None);
    }

    #[test]
    fn press_outside_header_stays_idle() {
        let mut drag = ColumnDragController::default();
        assert!(!drag.press(Point::new(50, 40), &geometry(), &cols()));
        assert_eq!(drag.state(), &DragState::Idle);
        assert!(!drag.press(Point::new(450, 5), &geometry(), &cols()));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn sub_threshold_release_is_a_click() {
        let mut drag = ColumnDragController::default();
        assert!(drag.press(Point::new(150, 5), &geometry(), &cols()));
        assert_eq!(drag.motion(159, &geometry()), None);
        assert!(!drag.is_armed());
        assert_eq!(
            drag.release(159, &geometry(), &cols()),
            DragOutcome::Click { column: "B".into() }
        );
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn sub_threshold_release_across_a_border_is_not_a_click() {
        let mut drag = ColumnDragController::default();
        drag.press(Point::new(195, 5), &geometry(), &cols());
        assert_eq!(drag.motion(203, &geometry()), None);
        assert_eq!(drag.release(203, &geometry(), &cols()), DragOutcome::Unchanged);
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn threshold_crossing_arms_and_drop_commits() {
        let mut drag = ColumnDragController::default();
        drag.press(Point::new(20, 5), &geometry(), &cols());
        assert_eq!(drag.motion(30, &geometry()), Some(0));
        assert!(drag.is_armed());
        assert_eq!(drag.motion(260, &geometry()), Some(3));
        assert_eq!(drag.indicator_x(&geometry()), Some(300));
        assert_eq!(
            drag.release(260, &geometry(), &cols()),
            DragOutcome::Reordered {
                column: "A".into(),
                order: vec!["B".into(), "C".into(), "A".into(), "D".into()],
            }
        );
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn leftward_threshold_counts_too() {
        let mut drag = ColumnDragController::default();
        drag.press(Point::new(250, 5), &geometry(), &cols());
        assert_eq!(drag.motion(240, &geometry()), Some(2));
        assert!(drag.is_armed());
    }

    #[test]
    fn drop_in_own_slot_is_unchanged() {
        let mut drag = ColumnDragController::default();
        drag.press(Point::new(150, 5), &geometry(), &cols());
        drag.motion(180, &geometry());
        assert_eq!(drag.release(180, &geometry(), &cols()), DragOutcome::Unchanged);
    }

    #[test]
    fn cancel_drops_gesture() {
        let mut drag = ColumnDragController::default();
        drag.press(Point::new(150, 5), &geometry(), &cols());
        drag.motion(300, &geometry());
        drag.cancel();
        assert_eq!(drag.release(300, &geometry(), &cols()), DragOutcome::None);
    }
}
