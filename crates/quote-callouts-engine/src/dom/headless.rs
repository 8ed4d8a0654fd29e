use std::collections::BTreeMap;

use super::{CalloutElement, ElementLookup, attrs};
use crate::io::HostError;
use crate::persistence::{EditEvent, EditSurface};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct HeadlessTitle {
    text: String,
    marked: bool,
}

/// In-memory quote container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessElement {
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    title: Option<HeadlessTitle>,
    collapse_toggle: bool,
}

impl HeadlessElement {
    /// A quote block with id `id` whose title paragraph reads `title`.
    pub fn quote(id: &str, title: &str) -> Self {
        let mut element = Self::detached_quote(title);
        element.set_attr(attrs::NODE_ID, id);
        element
    }

    /// A quote block the host has not assigned an id to yet.
    pub fn detached_quote(title: &str) -> Self {
        let mut element = Self {
            title: Some(HeadlessTitle {
                text: title.to_string(),
                marked: false,
            }),
            ..Self::default()
        };
        element.set_attr(attrs::NODE_TYPE, attrs::QUOTE_NODE_TYPE);
        element.set_attr(attrs::CLASS, attrs::QUOTE_CLASS);
        element
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_style(mut self, name: &str, value: &str) -> Self {
        self.set_style_property(name, value);
        self
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn styles(&self) -> &BTreeMap<String, String> {
        &self.style
    }
}

impl CalloutElement for HeadlessElement {
    fn node_id(&self) -> Option<String> {
        self.attrs.get(attrs::NODE_ID).cloned()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs.get(name).cloned()
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(name);
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.style.get(name).cloned()
    }

    fn set_style_property(&mut self, name: &str, value: &str) {
        self.style.insert(name.to_string(), value.to_string());
    }

    fn remove_style_property(&mut self, name: &str) {
        self.style.remove(name);
    }

    fn title_text(&self) -> Option<String> {
        self.title.as_ref().map(|t| t.text.clone())
    }

    fn set_title_text(&mut self, text: &str) -> bool {
        match &mut self.title {
            Some(title) => {
                title.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn title_marked(&self) -> bool {
        self.title.as_ref().is_some_and(|t| t.marked)
    }

    fn mark_title(&mut self, marked: bool) {
        if let Some(title) = &mut self.title {
            title.marked = marked;
        }
    }

    fn has_collapse_toggle(&self) -> bool {
        self.collapse_toggle
    }

    fn set_collapse_toggle(&mut self, attached: bool) {
        self.collapse_toggle = attached;
    }
}

/// What a [`HeadlessDocument`] saw through its edit surface, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Focus(String),
    SelectAll(String),
    SetText(String, String),
    Dispatch(String, EditEvent),
    Blur(String),
}

/// A set of headless elements keyed by block id, doubling as an edit
/// surface that journals every simulated input step.
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    elements: BTreeMap<String, HeadlessElement>,
    journal: Vec<SurfaceEvent>,
    focused: Option<String>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `element` under its node id. Elements without one are
    /// unreachable by id and are dropped.
    pub fn insert(&mut self, element: HeadlessElement) -> Option<String> {
        let id = element.node_id()?;
        self.elements.insert(id.clone(), element);
        Some(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<HeadlessElement> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&HeadlessElement> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut HeadlessElement> {
        self.elements.get_mut(id)
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn journal(&self) -> &[SurfaceEvent] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.journal)
    }

    fn title_mut(&mut self, node_id: &str) -> Result<&mut HeadlessElement, HostError> {
        self.elements
            .get_mut(node_id)
            .filter(|e| e.title.is_some())
            .ok_or_else(|| HostError::NotFound(node_id.to_string()))
    }
}

impl ElementLookup for HeadlessDocument {
    fn element(&self, id: &str) -> Option<&dyn CalloutElement> {
        self.elements.get(id).map(|e| e as &dyn CalloutElement)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut dyn CalloutElement> {
        self.elements
            .get_mut(id)
            .map(|e| e as &mut dyn CalloutElement)
    }
}

impl EditSurface for HeadlessDocument {
    fn contains(&self, node_id: &str) -> bool {
        self.elements
            .get(node_id)
            .is_some_and(|e| e.title.is_some())
    }

    fn focus(&mut self, node_id: &str) -> Result<(), HostError> {
        self.title_mut(node_id)?;
        self.focused = Some(node_id.to_string());
        self.journal.push(SurfaceEvent::Focus(node_id.to_string()));
        Ok(())
    }

    fn select_all(&mut self, node_id: &str) -> Result<(), HostError> {
        self.title_mut(node_id)?;
        self.journal
            .push(SurfaceEvent::SelectAll(node_id.to_string()));
        Ok(())
    }

    fn set_text(&mut self, node_id: &str, text: &str) -> Result<(), HostError> {
        self.title_mut(node_id)?.set_title_text(text);
        self.journal.push(SurfaceEvent::SetText(
            node_id.to_string(),
            text.to_string(),
        ));
        Ok(())
    }

    fn dispatch(&mut self, node_id: &str, event: EditEvent) -> Result<(), HostError> {
        self.title_mut(node_id)?;
        self.journal
            .push(SurfaceEvent::Dispatch(node_id.to_string(), event));
        Ok(())
    }

    fn blur(&mut self, node_id: &str) -> Result<(), HostError> {
        if self.focused.as_deref() == Some(node_id) {
            self.focused = None;
        }
        self.journal.push(SurfaceEvent::Blur(node_id.to_string()));
        Ok(())
    }
}
