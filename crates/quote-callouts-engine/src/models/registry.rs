use quote_callouts_config::PluginConfig;

use super::callout_type::{CalloutTypeDescriptor, LEGACY_SIGIL, builtin_types};

/// Ordered table of known callout types.
///
/// Lookups are case-insensitive. The parser never mutates the registry; only
/// configuration changes add, replace or remove entries.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Vec<CalloutTypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self {
            types: builtin_types(),
        }
    }

    /// Built-ins minus `hidden_types`, then `custom_types` added or
    /// replacing built-ins with the same id.
    pub fn from_config(config: &PluginConfig) -> Self {
        let mut registry = Self::builtin();
        registry.types.retain(|t| !config.is_hidden(&t.id));
        for custom in &config.custom_types {
            registry.insert(CalloutTypeDescriptor::from(custom));
        }
        registry
    }

    /// Adds a descriptor, replacing any existing one with the same id in place.
    pub fn insert(&mut self, descriptor: CalloutTypeDescriptor) {
        match self.position(&descriptor.id) {
            Some(index) => self.types[index] = descriptor,
            None => self.types.push(descriptor),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<CalloutTypeDescriptor> {
        self.position(id).map(|index| self.types.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&CalloutTypeDescriptor> {
        self.position(id).map(|index| &self.types[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalloutTypeDescriptor> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Exact lookup of a bracket key such as `[!info]`.
    pub fn find_by_command(&self, key: &str) -> Option<&CalloutTypeDescriptor> {
        self.types.iter().find(|t| t.matches_command(key))
    }

    /// Lookup of the token between `[!` and the first `|` or `]`.
    pub fn find_by_type_token(&self, token: &str) -> Option<&CalloutTypeDescriptor> {
        self.find_by_command(&format!("[!{token}]"))
    }

    /// Finds the type whose legacy command (`@info`) prefixes `text`.
    ///
    /// The longest matching command wins. Returns the descriptor, the
    /// trigger that matched and the text following the command.
    pub fn find_legacy_prefix<'t>(
        &self,
        text: &'t str,
    ) -> Option<(&CalloutTypeDescriptor, &str, &'t str)> {
        let after_sigil = text.strip_prefix(LEGACY_SIGIL)?;

        self.types
            .iter()
            .flat_map(|t| t.trigger_commands.iter().map(move |cmd| (t, cmd.as_str())))
            .filter_map(|(t, cmd)| {
                strip_prefix_ignore_case(after_sigil, cmd).map(|rest| (t, cmd, rest))
            })
            .max_by_key(|(_, cmd, _)| cmd.chars().count())
    }

    fn position(&self, id: &str) -> Option<usize> {
        let id = id.to_lowercase();
        self.types.iter().position(|t| t.id.to_lowercase() == id)
    }
}

/// Strips `prefix` from `text` comparing characters case-insensitively, so
/// the returned remainder always starts on a char boundary of `text`.
fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    if prefix.is_empty() {
        return None;
    }
    let mut chars = text.char_indices();
    let mut end = 0;
    for expected in prefix.chars() {
        let (index, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = index + actual.len_utf8();
    }
    Some(&text[end..])
}
