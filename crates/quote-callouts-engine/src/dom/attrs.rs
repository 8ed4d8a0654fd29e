//! Attribute and CSS property names shared by the reconciler, the
//! interaction state machines and the style generator.

/// Type marker on the quote container.
pub const TYPE: &str = "data-callout-type";
/// `"true"` / `"false"`; absent means no explicit state.
pub const COLLAPSED: &str = "data-callout-collapsed";
/// Marks the title paragraph of a callout.
pub const TITLE_MARKER: &str = "data-callout-title";
pub const WIDTH: &str = "data-margin-width";
pub const HEIGHT: &str = "data-margin-height";
pub const SPACING: &str = "data-margin-spacing";

/// Host structural attributes.
pub const NODE_ID: &str = "data-node-id";
pub const NODE_TYPE: &str = "data-type";
pub const CLASS: &str = "class";
pub const QUOTE_NODE_TYPE: &str = "NodeBlockquote";
pub const QUOTE_CLASS: &str = "bq";
pub const PARAGRAPH_NODE_TYPE: &str = "NodeParagraph";

/// CSS custom properties mirroring the size attributes.
pub mod css {
    pub const WIDTH: &str = "--margin-width";
    pub const HEIGHT: &str = "--margin-height";
    pub const MIN_HEIGHT: &str = "min-height";
    pub const SPACING: &str = "--margin-spacing";

    /// Every property the reconciler may write.
    pub const ALL: [&str; 4] = [WIDTH, HEIGHT, MIN_HEIGHT, SPACING];
}

pub fn format_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
