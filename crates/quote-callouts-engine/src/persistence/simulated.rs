use std::cell::{Ref, RefCell, RefMut};
use std::time::Duration;

use async_trait::async_trait;

use super::bridge::{CommandUpdate, PersistOutcome, prepare};
use super::{EditEvent, EditSurface, PersistError, TextCommitPort};
use crate::dom::ElementLookup;
use crate::io::HostError;
use crate::models::TypeRegistry;

/// Pause between simulated input steps, giving the host's handlers time to
/// settle before the next event.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy)]
enum Step {
    Focus,
    SelectAll,
    SetText,
    Dispatch(EditEvent),
    Blur,
}

const SEQUENCE: [Step; 7] = [
    Step::Focus,
    Step::SelectAll,
    Step::SetText,
    Step::Dispatch(EditEvent::Input),
    Step::Dispatch(EditEvent::CompositionEnd),
    Step::Dispatch(EditEvent::Change),
    Step::Blur,
];

/// Commits text by replaying what a user typing into the title would
/// produce: focus, select all, set text, input, compositionend, change,
/// blur.
///
/// If the title node disappears at any point (the host re-rendered it) the
/// sequence stops quietly; the attribute change already made still shows,
/// only durability is lost.
pub struct SimulatedInputCommit<S: EditSurface> {
    surface: RefCell<S>,
    step_delay: Duration,
}

impl<S: EditSurface> SimulatedInputCommit<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface: RefCell::new(surface),
            step_delay: DEFAULT_STEP_DELAY,
        }
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    /// Must not be held across an await on this commit.
    pub fn surface_mut(&self) -> RefMut<'_, S> {
        self.surface.borrow_mut()
    }

    pub fn into_inner(self) -> S {
        self.surface.into_inner()
    }

    fn run_step(&self, node_id: &str, text: &str, step: Step) -> Result<bool, HostError> {
        let mut surface = self.surface.borrow_mut();
        if !surface.contains(node_id) {
            return Ok(false);
        }
        match step {
            Step::Focus => surface.focus(node_id)?,
            Step::SelectAll => surface.select_all(node_id)?,
            Step::SetText => surface.set_text(node_id, text)?,
            Step::Dispatch(event) => surface.dispatch(node_id, event)?,
            Step::Blur => surface.blur(node_id)?,
        }
        Ok(true)
    }
}

impl<S: EditSurface + ElementLookup> SimulatedInputCommit<S> {
    /// Prepares against the surface's own copy of the element, releases it,
    /// then replays the input sequence.
    pub async fn persist(
        &self,
        registry: &TypeRegistry,
        node_id: &str,
        update: &CommandUpdate,
    ) -> Result<PersistOutcome, PersistError> {
        let outcome = {
            let surface = self.surface.borrow();
            match surface.element(node_id) {
                Some(element) => prepare(registry, element, update),
                None => PersistOutcome::NoTitle,
            }
        };
        if let Some(pending) = outcome.pending() {
            pending.send(self).await?;
        }
        Ok(outcome)
    }
}

#[async_trait(?Send)]
impl<S: EditSurface> TextCommitPort for SimulatedInputCommit<S> {
    async fn commit_title_text(&self, node_id: &str, text: &str) -> Result<(), HostError> {
        for (index, step) in SEQUENCE.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.step_delay).await;
            }
            if !self.run_step(node_id, text, step)? {
                log::debug!("title node {node_id} vanished before {step:?}, commit dropped");
                return Ok(());
            }
        }
        Ok(())
    }
}
