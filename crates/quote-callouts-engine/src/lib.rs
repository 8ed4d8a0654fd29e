pub mod dom;
pub mod interaction;
pub mod io;
pub mod logging;
pub mod menu;
pub mod models;
pub mod parsing;
pub mod persistence;
pub mod processor;
pub mod reconcile;
pub mod style;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use dom::{CalloutElement, ElementLookup, HeadlessDocument, HeadlessElement};
pub use interaction::{ClickAction, DragAbort, TextChange};
pub use io::{
    AttributeStateStore, BlockAttributeApi, BlockRef, BlockTextApi, BlockTreeApi,
    CalloutStateStore, HostError, StoredCallout, TextStateStore, prune_empty_quote,
};
pub use menu::{CommandPalette, MenuAction, MenuOutcome, plan_menu_action};
pub use models::{CalloutTypeDescriptor, ParsedCommand, TypeRegistry};
pub use parsing::{generate, parse, recognize};
pub use persistence::{
    CommandUpdate, EditEvent, EditSurface, PendingCommit, PersistError, PersistOutcome,
    SimulatedInputCommit, TextCommitPort, persist, prepare,
};
pub use processor::{CalloutContext, CalloutProcessor, ElementEvents, Timings};
pub use reconcile::{Transition, clear_all, reconcile, reconcile_title};
pub use style::{icon_markup, theme_css};
