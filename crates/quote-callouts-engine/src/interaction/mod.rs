//! Timing-driven state machines. None of them own a timer: the caller
//! passes the current [`std::time::Instant`] in and polls for what fired.

pub mod click;
pub mod debounce;
pub mod resize;

pub use click::{ClickAction, ClickDisambiguator, DOUBLE_CLICK_WINDOW};
pub use debounce::{Debouncer, KEYSTROKE_DEBOUNCE, PASTE_DEBOUNCE, TextChange};
pub use resize::{DragAbort, MAX_WIDTH_PERCENT, MIN_WIDTH_PERCENT, ResizeDrag, format_percent};
