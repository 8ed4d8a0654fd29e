use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const KEYSTROKE_DEBOUNCE: Duration = Duration::from_millis(300);
pub const PASTE_DEBOUNCE: Duration = Duration::from_millis(100);

/// What kind of edit produced a text change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChange {
    Keystroke,
    Paste,
}

/// Per-element trailing debounce. Each new change replaces the element's
/// deadline, so only the last change in a burst is processed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    keystroke: Duration,
    paste: Duration,
    deadlines: BTreeMap<String, Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(KEYSTROKE_DEBOUNCE, PASTE_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(keystroke: Duration, paste: Duration) -> Self {
        Self {
            keystroke,
            paste,
            deadlines: BTreeMap::new(),
        }
    }

    fn delay(&self, change: TextChange) -> Duration {
        match change {
            TextChange::Keystroke => self.keystroke,
            TextChange::Paste => self.paste,
        }
    }

    /// Returns the new deadline for `id`.
    pub fn schedule(&mut self, id: &str, change: TextChange, now: Instant) -> Instant {
        let deadline = now + self.delay(change);
        self.deadlines.insert(id.to_string(), deadline);
        deadline
    }

    /// Removes and returns every id whose deadline has passed, earliest
    /// first.
    pub fn due(&mut self, now: Instant) -> Vec<String> {
        let mut fired: Vec<(Instant, String)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, id.clone()))
            .collect();
        fired.sort();
        for (_, id) in &fired {
            self.deadlines.remove(id);
        }
        fired.into_iter().map(|(_, id)| id).collect()
    }

    pub fn cancel(&mut self, id: &str) -> bool {
        self.deadlines.remove(id).is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    pub fn pending_count(&self) -> usize {
        self.deadlines.len()
    }
}
