//! Narrow view of the host editor's DOM.
//!
//! The core only ever touches a quote container through [`CalloutElement`].
//! A browser host implements it over real nodes; [`HeadlessElement`] and
//! [`HeadlessDocument`] implement it in memory.

pub mod attrs;
pub mod headless;

pub use headless::{HeadlessDocument, HeadlessElement, SurfaceEvent};

/// A quote container plus its title paragraph.
pub trait CalloutElement {
    /// Stable block id (`data-node-id`), if the host rendered one.
    fn node_id(&self) -> Option<String>;

    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&mut self, name: &str, value: &str);
    fn remove_attr(&mut self, name: &str);

    fn style_property(&self, name: &str) -> Option<String>;
    fn set_style_property(&mut self, name: &str, value: &str);
    fn remove_style_property(&mut self, name: &str);

    /// Text of the title paragraph; `None` when there is no title node.
    fn title_text(&self) -> Option<String>;
    /// Returns `false` when there is no title node to write to.
    fn set_title_text(&mut self, text: &str) -> bool;
    fn title_marked(&self) -> bool;
    fn mark_title(&mut self, marked: bool);

    fn has_collapse_toggle(&self) -> bool;
    /// Attaches or detaches the click-driven collapse toggle on the title.
    fn set_collapse_toggle(&mut self, attached: bool);

    /// Quote containers carry `data-type="NodeBlockquote"` or class `bq`.
    fn is_quote(&self) -> bool {
        self.attr(attrs::NODE_TYPE).as_deref() == Some(attrs::QUOTE_NODE_TYPE)
            || self
                .attr(attrs::CLASS)
                .is_some_and(|class| class.split_whitespace().any(|c| c == attrs::QUOTE_CLASS))
    }
}

/// Resolves block ids to live elements.
pub trait ElementLookup {
    fn element(&self, id: &str) -> Option<&dyn CalloutElement>;
    fn element_mut(&mut self, id: &str) -> Option<&mut dyn CalloutElement>;
}
