//! Round-trips state changes made outside the text (collapse clicks, drag
//! resizes) back into the title directive so they survive a reload.
//!
//! The core never writes title text itself. It computes the new directive
//! ([`prepare`]) and hands it to a [`TextCommitPort`], which owns the
//! host-specific way of getting text into the editor's save pipeline.

pub mod bridge;
pub mod simulated;

use async_trait::async_trait;

use crate::io::HostError;

pub use bridge::{CommandUpdate, PendingCommit, PersistOutcome, persist, prepare};
pub use simulated::{DEFAULT_STEP_DELAY, SimulatedInputCommit};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to commit title text for block {node_id}")]
    Commit {
        node_id: String,
        #[source]
        source: HostError,
    },
}

/// Writes a title paragraph's text through the host's own edit pipeline.
#[async_trait(?Send)]
pub trait TextCommitPort {
    async fn commit_title_text(&self, node_id: &str, text: &str) -> Result<(), HostError>;
}

/// DOM-level events the host's input handlers listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    Input,
    CompositionEnd,
    Change,
}

/// The editable title nodes of a document, addressed by block id.
pub trait EditSurface {
    /// Whether `node_id` still has a title node to edit.
    fn contains(&self, node_id: &str) -> bool;
    fn focus(&mut self, node_id: &str) -> Result<(), HostError>;
    fn select_all(&mut self, node_id: &str) -> Result<(), HostError>;
    fn set_text(&mut self, node_id: &str, text: &str) -> Result<(), HostError>;
    fn dispatch(&mut self, node_id: &str, event: EditEvent) -> Result<(), HostError>;
    fn blur(&mut self, node_id: &str) -> Result<(), HostError>;
}
