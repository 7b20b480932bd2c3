//! Delayed hover tooltips for column headers.
//!
//! There is at most one outstanding timer. Time is passed in by the caller,
//! so the host's event loop decides when a due timer fires.

use std::time::{Duration, Instant};

use crate::geometry::Point;

/// Hover delay before a tooltip appears.
pub const TOOLTIP_DELAY: Duration = Duration::from_millis(500);

/// Offset of the tooltip from the pointer.
pub const TOOLTIP_OFFSET: Point = Point { x: 10, y: 20 };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub column: String,
    pub text: String,
    pub anchor: Point,
}

#[derive(Debug, Clone)]
struct Pending {
    column: String,
    due: Instant,
    pointer: Point,
}

#[derive(Debug, Clone)]
pub struct TooltipController {
    delay: Duration,
    hovered: Option<String>,
    pending: Option<Pending>,
    shown: Option<Tooltip>,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new(TOOLTIP_DELAY)
    }
}

impl TooltipController {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            hovered: None,
            pending: None,
            shown: None,
        }
    }

    /// Pointer moved over the header. `column` is the key under the
    /// pointer; `None` behaves like leaving.
    pub fn motion(&mut self, column: Option<&str>, pointer: Point, now: Instant) {
        let Some(column) = column else {
            self.leave();
            return;
        };
        if self.hovered.as_deref() == Some(column) {
            if let Some(pending) = self.pending.as_mut() {
                pending.pointer = pointer;
            }
            return;
        }
        self.shown = None;
        self.hovered = Some(column.to_string());
        self.pending = Some(Pending {
            column: column.to_string(),
            due: now + self.delay,
            pointer,
        });
    }

    /// Pointer left the header: cancel the timer and hide.
    pub fn leave(&mut self) {
        self.hovered = None;
        self.pending = None;
        self.shown = None;
    }

    /// Fire the timer if it is due. `lookup` returns the tooltip text for a
    /// column at firing time; columns without text show nothing. Returns
    /// whether the visible tooltip changed.
    pub fn tick<F>(&mut self, now: Instant, lookup: F) -> bool
    where
        F: FnOnce(&str) -> Option<String>,
    {
        match &self.pending {
            Some(pending) if now >= pending.due => {}
            _ => return false,
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let text = lookup(&pending.column).filter(|t| !t.is_empty());
        let Some(text) = text else {
            return false;
        };
        self.shown = Some(Tooltip {
            column: pending.column,
            text,
            anchor: Point::new(
                pending.pointer.x + TOOLTIP_OFFSET.x,
                pending.pointer.y + TOOLTIP_OFFSET.y,
            ),
        });
        true
    }

    pub fn shown(&self) -> Option<&Tooltip> {
        self.shown.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_for(column: &str) -> Option<String> {
        match column {
            "max_quality" => Some("Highest quality".to_string()),
            "blank" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn shows_after_delay() {
        let t0 = Instant::now();
        let mut tips = TooltipController::default();
        tips.motion(Some("max_quality"), Point::new(40, 5), t0);
        assert!(tips.is_pending());

        assert!(!tips.tick(t0 + Duration::from_millis(499), text_for));
        assert!(tips.shown().is_none());

        assert!(tips.tick(t0 + TOOLTIP_DELAY, text_for));
        let shown = tips.shown().unwrap();
        assert_eq!(shown.text, "Highest quality");
        assert_eq!(shown.anchor, Point::new(50, 25));
        assert!(!tips.is_pending());
    }

    #[test]
    fn motion_within_same_column_does_not_rearm() {
        let t0 = Instant::now();
        let mut tips = TooltipController::default();
        tips.motion(Some("max_quality"), Point::new(40, 5), t0);
        tips.motion(Some("max_quality"), Point::new(45, 6), t0 + Duration::from_millis(300));
        assert!(tips.tick(t0 + TOOLTIP_DELAY, text_for));
        assert_eq!(tips.shown().unwrap().anchor, Point::new(55, 26));
    }

    #[test]
    fn changing_column_restarts_timer_and_hides() {
        let t0 = Instant::now();
        let mut tips = TooltipController::default();
        tips.motion(Some("max_quality"), Point::new(40, 5), t0);
        tips.tick(t0 + TOOLTIP_DELAY, text_for);
        assert!(tips.shown().is_some());

        let t1 = t0 + Duration::from_secs(1);
        tips.motion(Some("sector"), Point::new(200, 5), t1);
        assert!(tips.shown().is_none());
        assert!(!tips.tick(t1 + Duration::from_millis(100), text_for));
        // No text for "sector": the timer fires but nothing shows.
        assert!(!tips.tick(t1 + TOOLTIP_DELAY, text_for));
        assert!(tips.shown().is_none());
        assert!(!tips.is_pending());
    }

    #[test]
    fn leave_cancels_pending_timer() {
        let t0 = Instant::now();
        let mut tips = TooltipController::default();
        tips.motion(Some("max_quality"), Point::new(40, 5), t0);
        tips.leave();
        assert!(!tips.tick(t0 + Duration::from_secs(2), text_for));
        assert!(tips.shown().is_none());
    }

    #[test]
    fn empty_text_never_shows() {
        let t0 = Instant::now();
        let mut tips = TooltipController::default();
        tips.motion(Some("blank"), Point::new(0, 0), t0);
        assert!(!tips.tick(t0 + TOOLTIP_DELAY, text_for));
        assert!(tips.shown().is_none());
    }

    #[test]
    fn motion_without_column_is_a_leave() {
        let t0 = Instant::now();
        let mut tips = TooltipController::default();
        tips.motion(Some("max_quality"), Point::new(40, 5), t0);
        tips.motion(None, Point::new(40, 50), t0);
        assert!(tips.hovered().is_none());
        assert!(!tips.is_pending());
    }
}
