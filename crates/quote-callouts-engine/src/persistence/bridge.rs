use serde::Serialize;

use super::{PersistError, TextCommitPort};
use crate::dom::CalloutElement;
use crate::models::{ParsedCommand, TypeRegistry};
use crate::parsing::{clean_title, directive_width, generate, recognize};

/// The fields one interaction changes. Everything left `None` keeps the
/// value parsed from the current title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandUpdate {
    pub width: Option<String>,
    pub height: Option<String>,
    pub spacing: Option<String>,
    /// `Some(None)` removes the marker; `None` leaves it as typed.
    pub collapsed: Option<Option<bool>>,
}

impl CommandUpdate {
    pub fn collapsed(collapsed: bool) -> Self {
        Self {
            collapsed: Some(Some(collapsed)),
            ..Self::default()
        }
    }

    pub fn width(width: impl Into<String>) -> Self {
        Self {
            width: Some(width.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overlays this update on `baseline`. A width the directive cannot
    /// carry as a width is dropped.
    pub fn apply_to(&self, baseline: &ParsedCommand) -> ParsedCommand {
        let mut updated = baseline.clone();
        if let Some(width) = self.width.as_deref().and_then(directive_width) {
            updated.width = Some(width);
        }
        if let Some(height) = &self.height {
            updated.height = Some(height.clone());
        }
        if let Some(spacing) = &self.spacing {
            updated.spacing = Some(spacing.clone());
        }
        if let Some(collapsed) = self.collapsed {
            updated.collapsed = collapsed;
        }
        updated
    }
}

/// New title text waiting to go through a [`TextCommitPort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingCommit {
    pub node_id: String,
    pub text: String,
}

impl PendingCommit {
    pub async fn send<P: TextCommitPort + ?Sized>(&self, port: &P) -> Result<(), PersistError> {
        log::debug!("committing title of {}: {}", self.node_id, self.text);
        port.commit_title_text(&self.node_id, &self.text)
            .await
            .map_err(|source| PersistError::Commit {
                node_id: self.node_id.clone(),
                source,
            })
    }
}

/// Result of preparing (and possibly sending) a persistence round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PersistOutcome {
    /// The title needs this new text.
    Commit(PendingCommit),
    /// Regenerated text equals what is already there.
    Unchanged,
    /// No title node to read or write.
    NoTitle,
    /// The element has no block id, so nothing durable to key against.
    NoNodeId,
    /// The current title is not a directive, so there is nothing to update.
    NotACallout,
}

impl PersistOutcome {
    pub fn pending(&self) -> Option<&PendingCommit> {
        match self {
            PersistOutcome::Commit(pending) => Some(pending),
            _ => None,
        }
    }
}

/// Computes the title text that carries `update`.
///
/// The baseline is re-parsed from the element's current title, never from a
/// value captured earlier, so parameters set since then are kept.
pub fn prepare(
    registry: &TypeRegistry,
    element: &dyn CalloutElement,
    update: &CommandUpdate,
) -> PersistOutcome {
    let Some(node_id) = element.node_id() else {
        return PersistOutcome::NoNodeId;
    };
    let Some(current) = element.title_text() else {
        return PersistOutcome::NoTitle;
    };
    let Some(baseline) = recognize(&current, registry) else {
        return PersistOutcome::NotACallout;
    };

    let text = generate(&update.apply_to(&baseline));
    if text == clean_title(&current) {
        return PersistOutcome::Unchanged;
    }
    PersistOutcome::Commit(PendingCommit { node_id, text })
}

/// [`prepare`] then send.
///
/// `element` stays borrowed until the commit completes. When the port edits
/// the same document the element lives in, call [`prepare`] and
/// [`PendingCommit::send`] separately instead.
pub async fn persist<P: TextCommitPort + ?Sized>(
    registry: &TypeRegistry,
    element: &dyn CalloutElement,
    update: &CommandUpdate,
    port: &P,
) -> Result<PersistOutcome, PersistError> {
    let outcome = prepare(registry, element, update);
    if let Some(pending) = outcome.pending() {
        pending.send(port).await?;
    }
    Ok(outcome)
}
