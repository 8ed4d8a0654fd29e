use std::fmt;

use serde::Serialize;

use super::callout_type::CalloutTypeDescriptor;

/// Structured form of one title directive, e.g. `[!info|30%|120px]- Heads up`.
///
/// Produced fresh for every parse and never mutated afterwards; an update is
/// a new value built with [`ParsedCommand::with_type`] or
/// [`crate::persistence::CommandUpdate::apply_to`].
#[derive(Debug, Clone, Serialize)]
pub struct ParsedCommand {
    /// Registry id of the matched type.
    pub type_id: String,
    /// The trigger exactly as typed between `[!` and `|`/`]`, kept so a
    /// localized trigger survives regeneration.
    pub type_token: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub spacing: Option<String>,
    /// `Some(true)` forced collapsed (`-`), `Some(false)` forced expanded
    /// (`+`), `None` leaves the current state alone.
    pub collapsed: Option<bool>,
    /// Free text after the directive.
    pub title: Option<String>,
    pub original_text: String,
}

impl ParsedCommand {
    /// A bare directive for `descriptor` with no parameters.
    pub fn new(descriptor: &CalloutTypeDescriptor) -> Self {
        let type_token = descriptor.primary_trigger().to_string();
        Self {
            type_id: descriptor.id.clone(),
            original_text: format!("[!{type_token}]"),
            type_token,
            width: None,
            height: None,
            spacing: None,
            collapsed: None,
            title: None,
        }
    }

    /// Same parameters, different type.
    pub fn with_type(&self, descriptor: &CalloutTypeDescriptor) -> Self {
        Self {
            type_id: descriptor.id.clone(),
            type_token: descriptor.primary_trigger().to_string(),
            ..self.clone()
        }
    }

    pub fn has_params(&self) -> bool {
        self.width.is_some() || self.height.is_some() || self.spacing.is_some()
    }

    /// Canonical text form; see [`crate::parsing::generate`].
    pub fn to_command_string(&self) -> String {
        self.to_string()
    }
}

/// Equality compares the parsed fields; `original_text` is provenance only.
impl PartialEq for ParsedCommand {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
            && self.type_token == other.type_token
            && self.width == other.width
            && self.height == other.height
            && self.spacing == other.spacing
            && self.collapsed == other.collapsed
            && self.title == other.title
    }
}

impl Eq for ParsedCommand {}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[!{}", self.type_token)?;
        for param in [&self.width, &self.height, &self.spacing]
            .into_iter()
            .flatten()
        {
            write!(f, "|{param}")?;
        }
        f.write_str("]")?;
        match self.collapsed {
            Some(true) => f.write_str("-")?,
            Some(false) => f.write_str("+")?,
            None => {}
        }
        if let Some(title) = &self.title {
            write!(f, " {title}")?;
        }
        Ok(())
    }
}
