//! SelectionCoordinator: one selected identity shared by two panes.
//!
//! Each pane keeps its own highlighted row and scroll offset because each is
//! rendered separately, but every change made through this type is applied
//! to both before it returns. The `propagating` flag guards the window in
//! which the second pane is being forced to follow the first: selection
//! events arriving in that window are echoes and are dropped.

use crate::aggregate::owner_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Frozen,
    Scrollable,
}

impl Pane {
    pub fn other(self) -> Pane {
        match self {
            Pane::Frozen => Pane::Scrollable,
            Pane::Scrollable => Pane::Frozen,
        }
    }
}

/// Per-pane render state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaneState {
    pub selected: Option<String>,
    /// First visible display row.
    pub scroll_top: usize,
}

impl PaneState {
    /// Scroll the minimum amount that brings `index` into a viewport of
    /// `viewport` rows.
    pub fn see(&mut self, index: usize, viewport: usize) {
        let viewport = viewport.max(1);
        if index < self.scroll_top {
            self.scroll_top = index;
        } else if index >= self.scroll_top + viewport {
            self.scroll_top = index + 1 - viewport;
        }
    }
}

/// What a selection event turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Echo, stale identity or nothing to do.
    Ignored,
    /// An aggregate row was picked while its owner was already selected;
    /// the owner was reselected silently.
    Redirected { owner: String },
    /// Same identity as the last selection.
    Unchanged,
    /// A new selection; the callback ran.
    Selected { identity: String },
}

#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    frozen: PaneState,
    scrollable: PaneState,
    last_selected: Option<String>,
    propagating: bool,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pane(&self, pane: Pane) -> &PaneState {
        match pane {
            Pane::Frozen => &self.frozen,
            Pane::Scrollable => &self.scrollable,
        }
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut PaneState {
        match pane {
            Pane::Frozen => &mut self.frozen,
            Pane::Scrollable => &mut self.scrollable,
        }
    }

    /// The selected identity. Never an aggregate identity.
    pub fn selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    pub fn is_propagating(&self) -> bool {
        self.propagating
    }

    /// A selection event from `source`.
    ///
    /// `locate` maps an identity to its display index, `notify` receives the
    /// identity of a genuinely new selection.
    pub fn select(
        &mut self,
        source: Pane,
        identity: &str,
        locate: impl Fn(&str) -> Option<usize>,
        viewport: usize,
        notify: impl FnOnce(&str),
    ) -> SelectionOutcome {
        if self.propagating {
            return SelectionOutcome::Ignored;
        }
        if let Some(owner) = owner_of(identity) {
            // Only an aggregate row that is actually displayed redirects.
            if locate(identity).is_none() || locate(owner).is_none() {
                return SelectionOutcome::Ignored;
            }
            if self.last_selected.as_deref() != Some(owner) {
                return self.select(source, owner, locate, viewport, notify);
            }
            let owner = owner.to_string();
            self.restore(Some(&owner), locate, viewport);
            return SelectionOutcome::Redirected { owner };
        }
        let Some(index) = locate(identity) else {
            return SelectionOutcome::Ignored;
        };
        if self.last_selected.as_deref() == Some(identity) {
            return SelectionOutcome::Unchanged;
        }

        self.propagating = true;
        for pane in [source, source.other()] {
            let state = self.pane_mut(pane);
            state.selected = Some(identity.to_string());
            state.see(index, viewport);
        }
        self.last_selected = Some(identity.to_string());
        notify(identity);
        self.propagating = false;

        SelectionOutcome::Selected {
            identity: identity.to_string(),
        }
    }

    /// Programmatic selection: both panes follow, the callback never runs.
    /// `None` or an identity that cannot be located clears the selection.
    pub fn restore(
        &mut self,
        identity: Option<&str>,
        locate: impl Fn(&str) -> Option<usize>,
        viewport: usize,
    ) {
        self.propagating = true;
        let located = identity.and_then(|id| locate(id).map(|index| (id, index)));
        match located {
            Some((id, index)) => {
                for pane in [Pane::Frozen, Pane::Scrollable] {
                    let state = self.pane_mut(pane);
                    state.selected = Some(id.to_string());
                    state.see(index, viewport);
                }
                self.last_selected = Some(id.to_string());
            }
            None => self.clear(),
        }
        self.propagating = false;
    }

    /// Keep the selection across a reload if its identity still exists.
    /// Returns whether it survived.
    pub fn after_reload(&mut self, locate: impl Fn(&str) -> Option<usize>, viewport: usize) -> bool {
        let current = self.last_selected.clone();
        self.restore(current.as_deref(), &locate, viewport);
        let survived = self.last_selected.is_some();
        if current.is_some() && !survived {
            tracing::debug!(symbol = current.as_deref(), "selection dropped by reload");
        }
        survived
    }

    fn clear(&mut self) {
        self.frozen.selected = None;
        self.scrollable.selected = None;
        self.last_selected = None;
    }

    /// Vertical scroll from either pane; the other pane follows.
    pub fn scroll_to(&mut self, top: usize) {
        self.frozen.scroll_top = top;
        self.scrollable.scroll_top = top;
    }

    pub fn scroll_top(&self) -> usize {
        self.scrollable.scroll_top
    }
}
