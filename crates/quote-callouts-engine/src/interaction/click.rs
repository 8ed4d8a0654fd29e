use std::time::{Duration, Instant};

/// Two clicks closer together than this are a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Single click on the title: flip the collapsed state.
    ToggleCollapse,
    /// Double click: hand focus to the editor so the directive can be typed.
    EnterEdit,
}

/// Tells single clicks from double clicks on one title.
///
/// A first click starts a pending timer. A second click inside the window
/// cancels it and yields [`ClickAction::EnterEdit`]; otherwise the pending
/// click fires as [`ClickAction::ToggleCollapse`] once the window has passed.
#[derive(Debug, Clone)]
pub struct ClickDisambiguator {
    window: Duration,
    pending: Option<Instant>,
}

impl Default for ClickDisambiguator {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_WINDOW)
    }
}

impl ClickDisambiguator {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Registers a click.
    ///
    /// Returns `EnterEdit` for the second click of a double click, and
    /// `ToggleCollapse` when an earlier single click expired without being
    /// polled (the new click then becomes the pending one).
    pub fn click(&mut self, now: Instant) -> Option<ClickAction> {
        match self.pending.take() {
            Some(first) if now.saturating_duration_since(first) < self.window => {
                Some(ClickAction::EnterEdit)
            }
            Some(_) => {
                self.pending = Some(now);
                Some(ClickAction::ToggleCollapse)
            }
            None => {
                self.pending = Some(now);
                None
            }
        }
    }

    /// Fires the pending single click once its window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<ClickAction> {
        let first = self.pending?;
        if now.saturating_duration_since(first) >= self.window {
            self.pending = None;
            Some(ClickAction::ToggleCollapse)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
