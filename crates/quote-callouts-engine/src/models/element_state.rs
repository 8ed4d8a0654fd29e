use serde::Serialize;

use crate::dom::{CalloutElement, attrs};

/// Callout-related state currently held by an element's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalloutElementState {
    pub type_id: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub spacing: Option<String>,
    pub collapsed: Option<bool>,
}

impl CalloutElementState {
    pub fn read(element: &dyn CalloutElement) -> Self {
        Self {
            type_id: element.attr(attrs::TYPE).filter(|t| !t.is_empty()),
            width: element.attr(attrs::WIDTH),
            height: element.attr(attrs::HEIGHT),
            spacing: element.attr(attrs::SPACING),
            collapsed: element
                .attr(attrs::COLLAPSED)
                .and_then(|c| attrs::parse_bool(&c)),
        }
    }

    pub fn is_callout(&self) -> bool {
        self.type_id.is_some()
    }

    /// True when a size parameter survived (or was set without) a type marker.
    pub fn has_size(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}
