//! Command palette filtering and the menu actions a host widget can fire.
//!
//! Presentation belongs to the host. This module only decides which types
//! a query shows and what a chosen action does to the element and its
//! title text.

use serde::Serialize;

use crate::dom::{CalloutElement, attrs};
use crate::models::{CalloutTypeDescriptor, LEGACY_SIGIL, ParsedCommand, TypeRegistry};
use crate::parsing::{clean_title, directive_width, generate, recognize};
use crate::reconcile::clear_all;

/// How well a type matched the palette query. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MatchRank {
    Exact,
    Prefix,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry<'a> {
    pub descriptor: &'a CalloutTypeDescriptor,
    pub rank: MatchRank,
}

pub struct CommandPalette<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> CommandPalette<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Types matching `query`, best first. An empty query lists every type
    /// in registry order.
    ///
    /// The query may be typed with its `[!` or `@` lead-in; it is matched
    /// case-insensitively against triggers, id and display name.
    pub fn filter(&self, query: &str) -> Vec<PaletteEntry<'a>> {
        let query = normalize_query(query);
        let mut entries: Vec<PaletteEntry<'a>> = self
            .registry
            .iter()
            .filter_map(|descriptor| {
                rank(descriptor, &query).map(|rank| PaletteEntry { descriptor, rank })
            })
            .collect();
        // Stable, so registry order breaks ties.
        entries.sort_by_key(|entry| entry.rank);
        entries
    }
}

fn normalize_query(query: &str) -> String {
    let query = query.trim();
    let query = query
        .strip_prefix("[!")
        .or_else(|| query.strip_prefix(LEGACY_SIGIL))
        .unwrap_or(query);
    query.trim_end_matches(']').trim().to_lowercase()
}

fn rank(descriptor: &CalloutTypeDescriptor, query: &str) -> Option<MatchRank> {
    if query.is_empty() {
        return Some(MatchRank::Exact);
    }
    let names: Vec<String> = descriptor
        .trigger_commands
        .iter()
        .chain([&descriptor.id, &descriptor.display_name])
        .map(|name| name.to_lowercase())
        .collect();

    if names.iter().any(|name| name == query) {
        Some(MatchRank::Exact)
    } else if names.iter().any(|name| name.starts_with(query)) {
        Some(MatchRank::Prefix)
    } else if names.iter().any(|name| name.contains(query)) {
        Some(MatchRank::Substring)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MenuAction {
    /// Turn the quote into (or switch it to) the type with this id.
    SetType(String),
    /// A percentage or bare number in `(0, 100]`; other units are ignored.
    /// `None` removes the width.
    SetWidth(Option<String>),
    /// `None` removes the collapse marker.
    SetCollapsed(Option<bool>),
    /// Back to a plain quote; every callout attribute goes, sizes included.
    NativeStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MenuOutcome {
    /// The title should now read this; feed it through the parser.
    Retitle(String),
    /// Attributes were cleared; `title_blanked` means the title held a
    /// directive and is now empty.
    Cleared { title_blanked: bool },
    /// Unknown type, or a parameter action on a quote that is not a callout.
    Ignored,
}

/// Works out what `action` does to `element`.
///
/// Only `NativeStyle` and removing a width touch the element directly; every
/// other change is expressed as new title text so the reconciler stays the
/// single writer of callout attributes.
pub fn plan_menu_action(
    registry: &TypeRegistry,
    element: &mut dyn CalloutElement,
    action: &MenuAction,
) -> MenuOutcome {
    if let MenuAction::NativeStyle = action {
        let title_blanked = clear_all(element, registry);
        return MenuOutcome::Cleared { title_blanked };
    }

    let current = element.title_text().unwrap_or_default();
    let baseline = recognize(&current, registry);

    let updated = match (action, baseline) {
        (MenuAction::SetType(id), baseline) => {
            let Some(descriptor) = registry.get(id) else {
                return MenuOutcome::Ignored;
            };
            match baseline {
                Some(baseline) => baseline.with_type(descriptor),
                None => {
                    let mut fresh = ParsedCommand::new(descriptor);
                    let title = clean_title(&current);
                    fresh.title = (!title.is_empty()).then(|| title.to_string());
                    fresh
                }
            }
        }
        (MenuAction::SetWidth(Some(width)), Some(mut baseline)) => {
            let Some(width) = directive_width(width) else {
                return MenuOutcome::Ignored;
            };
            baseline.width = Some(width);
            baseline
        }
        (MenuAction::SetWidth(None), Some(mut baseline)) => {
            baseline.width = None;
            element.remove_attr(attrs::WIDTH);
            element.remove_style_property(attrs::css::WIDTH);
            baseline
        }
        (MenuAction::SetCollapsed(collapsed), Some(mut baseline)) => {
            baseline.collapsed = *collapsed;
            baseline
        }
        _ => return MenuOutcome::Ignored,
    };
    MenuOutcome::Retitle(generate(&updated))
}
