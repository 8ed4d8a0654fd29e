//! Brings a quote container's attributes in line with its title directive.
//!
//! Parameters are merged, never implied: a directive without a width leaves
//! an existing width alone, because the user may be halfway through retyping
//! the bracket text. Only an explicit value overwrites, and only the "native
//! style" action removes sizes.

use serde::Serialize;

use crate::dom::{CalloutElement, attrs};
use crate::models::{CalloutElementState, ParsedCommand, TypeRegistry};
use crate::parsing::recognize;

/// Which branch of the reconciliation table ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transition {
    /// Nothing to do.
    Unchanged,
    /// Empty, untyped block: leftover size CSS removed.
    StrayStyleCleared,
    /// Plain quote became a callout.
    Applied,
    /// Existing callout re-applied, possibly with a new type.
    Updated,
    /// Title no longer matches: type markers removed, sizes kept.
    ConservativeClear,
}

/// Reconciles `element` against an already recognized directive.
///
/// Idempotent: running it twice with the same input yields the same
/// attributes as running it once.
pub fn reconcile(element: &mut dyn CalloutElement, parsed: Option<&ParsedCommand>) -> Transition {
    let state = CalloutElementState::read(element);

    match (state.is_callout(), parsed) {
        (was_callout, Some(parsed)) => {
            apply(element, parsed);
            log::debug!(
                "callout {:?}: {} type {}",
                element.node_id(),
                if was_callout { "updated" } else { "applied" },
                parsed.type_id
            );
            if was_callout {
                Transition::Updated
            } else {
                Transition::Applied
            }
        }
        (true, None) => {
            conservative_clear(element);
            log::debug!("callout {:?}: conservative clear", element.node_id());
            Transition::ConservativeClear
        }
        (false, None) => {
            let title_empty = element
                .title_text()
                .is_none_or(|t| crate::parsing::clean_title(&t).is_empty());
            if title_empty && has_stray_style(element) {
                for property in attrs::css::ALL {
                    element.remove_style_property(property);
                }
                Transition::StrayStyleCleared
            } else {
                Transition::Unchanged
            }
        }
    }
}

/// Reads the element's title and reconciles against [`recognize`], which
/// already includes the legacy-prefix fallback.
pub fn reconcile_title(element: &mut dyn CalloutElement, registry: &TypeRegistry) -> Transition {
    let parsed = element
        .title_text()
        .and_then(|text| recognize(&text, registry));
    reconcile(element, parsed.as_ref())
}

/// The "native style" action: removes every callout attribute, sizes
/// included, and blanks the title if it still holds a directive.
///
/// Returns `true` when the title text was blanked, in which case the caller
/// must persist the new text.
pub fn clear_all(element: &mut dyn CalloutElement, registry: &TypeRegistry) -> bool {
    for name in [
        attrs::TYPE,
        attrs::COLLAPSED,
        attrs::WIDTH,
        attrs::HEIGHT,
        attrs::SPACING,
    ] {
        element.remove_attr(name);
    }
    for property in attrs::css::ALL {
        element.remove_style_property(property);
    }
    element.mark_title(false);
    element.set_collapse_toggle(false);

    let holds_directive = element
        .title_text()
        .is_some_and(|text| recognize(&text, registry).is_some());
    if holds_directive {
        element.set_title_text("")
    } else {
        false
    }
}

fn apply(element: &mut dyn CalloutElement, parsed: &ParsedCommand) {
    element.set_attr(attrs::TYPE, &parsed.type_id);

    merge_size(element, attrs::WIDTH, parsed.width.as_deref(), &[attrs::css::WIDTH]);
    merge_size(
        element,
        attrs::HEIGHT,
        parsed.height.as_deref(),
        &[attrs::css::HEIGHT, attrs::css::MIN_HEIGHT],
    );
    merge_size(element, attrs::SPACING, parsed.spacing.as_deref(), &[attrs::css::SPACING]);

    if let Some(collapsed) = parsed.collapsed {
        element.set_attr(attrs::COLLAPSED, attrs::format_bool(collapsed));
    }

    element.mark_title(true);
    // Collapse state is persisted by id; without one there is nothing to
    // re-sync a toggle against.
    if element.node_id().is_some() && !element.has_collapse_toggle() {
        element.set_collapse_toggle(true);
    }
}

/// Writes `incoming` when present; otherwise keeps the existing attribute
/// and re-mirrors it into CSS in case the host re-rendered the node.
fn merge_size(
    element: &mut dyn CalloutElement,
    attr: &str,
    incoming: Option<&str>,
    properties: &[&str],
) {
    let value = match incoming {
        Some(value) => {
            element.set_attr(attr, value);
            value.to_string()
        }
        None => match element.attr(attr) {
            Some(existing) => existing,
            None => return,
        },
    };
    for property in properties {
        element.set_style_property(property, &value);
    }
}

fn conservative_clear(element: &mut dyn CalloutElement) {
    element.remove_attr(attrs::TYPE);
    element.remove_attr(attrs::COLLAPSED);
    element.mark_title(false);
    element.set_collapse_toggle(false);
}

fn has_stray_style(element: &dyn CalloutElement) -> bool {
    attrs::css::ALL
        .iter()
        .any(|property| element.style_property(property).is_some())
}
