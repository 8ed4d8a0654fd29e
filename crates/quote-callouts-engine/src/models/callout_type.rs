use quote_callouts_config::{BackgroundConfig, CustomTypeConfig};
use serde::Serialize;

/// Prefix that turns a trigger command into its legacy, bracket-free form
/// (`@info`).
pub const LEGACY_SIGIL: char = '@';

/// Something that can be rendered as the callout icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Icon {
    Emoji(String),
    /// Inline SVG markup, trusted as-is.
    Svg(String),
}

impl Icon {
    /// Interprets a configured icon string: anything starting with `<svg`
    /// is markup, everything else is text.
    pub fn from_config(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("<svg") {
            Icon::Svg(raw.to_string())
        } else {
            Icon::Emoji(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BackgroundStyle {
    Gradient { from: String, to: String },
    Solid(String),
}

impl BackgroundStyle {
    pub fn css(&self) -> String {
        match self {
            BackgroundStyle::Gradient { from, to } => {
                format!("linear-gradient(135deg, {from} 0%, {to} 100%)")
            }
            BackgroundStyle::Solid(color) => color.clone(),
        }
    }

    /// Single representative color, used for menu swatches and flat themes.
    pub fn swatch(&self) -> &str {
        match self {
            BackgroundStyle::Gradient { from, .. } => from,
            BackgroundStyle::Solid(color) => color,
        }
    }
}

/// Immutable description of one callout type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalloutTypeDescriptor {
    pub id: String,
    pub display_name: String,
    /// Raw trigger words; `[!word]` and `@word` both select this type.
    /// Never empty.
    pub trigger_commands: Vec<String>,
    pub color: String,
    pub icon: Icon,
    pub border_color: String,
    pub background: BackgroundStyle,
}

impl CalloutTypeDescriptor {
    /// Every bracket form that selects this type, e.g. `[!info]`.
    pub fn canonical_commands(&self) -> impl Iterator<Item = String> + '_ {
        self.trigger_commands.iter().map(|t| format!("[!{t}]"))
    }

    /// Every legacy form that selects this type, e.g. `@info`.
    pub fn legacy_commands(&self) -> impl Iterator<Item = String> + '_ {
        self.trigger_commands
            .iter()
            .map(|t| format!("{LEGACY_SIGIL}{t}"))
    }

    /// Exact, case-insensitive match of a bracket key such as `[!Info]`.
    pub fn matches_command(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.canonical_commands().any(|c| c.to_lowercase() == key)
    }

    /// The primary bracket command, used when inserting a new callout.
    pub fn primary_command(&self) -> String {
        format!("[!{}]", self.primary_trigger())
    }

    pub fn primary_trigger(&self) -> &str {
        self.trigger_commands
            .first()
            .map(String::as_str)
            .unwrap_or(self.id.as_str())
    }
}

impl From<&CustomTypeConfig> for CalloutTypeDescriptor {
    fn from(custom: &CustomTypeConfig) -> Self {
        let mut trigger_commands: Vec<String> = custom
            .commands
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if trigger_commands.is_empty() {
            trigger_commands.push(custom.id.clone());
        }

        let background = match &custom.background {
            Some(BackgroundConfig::Solid(color)) => BackgroundStyle::Solid(color.clone()),
            Some(BackgroundConfig::Gradient { from, to }) => BackgroundStyle::Gradient {
                from: from.clone(),
                to: to.clone(),
            },
            None => BackgroundStyle::Solid("transparent".to_string()),
        };

        Self {
            id: custom.id.clone(),
            display_name: custom.display_name.clone(),
            trigger_commands,
            color: custom.color.clone(),
            icon: Icon::from_config(&custom.icon),
            border_color: custom
                .border_color
                .clone()
                .unwrap_or_else(|| custom.color.clone()),
            background,
        }
    }
}

struct Builtin {
    id: &'static str,
    name: &'static str,
    commands: &'static [&'static str],
    color: &'static str,
    icon: &'static str,
    border: &'static str,
    from: &'static str,
    to: &'static str,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        id: "info",
        name: "Info",
        commands: &["info", "信息"],
        color: "#1971c2",
        icon: "ℹ️",
        border: "#74c0fc",
        from: "#e7f5ff",
        to: "#d0ebff",
    },
    Builtin {
        id: "note",
        name: "Note",
        commands: &["note", "笔记"],
        color: "#495057",
        icon: "📝",
        border: "#adb5bd",
        from: "#f8f9fa",
        to: "#e9ecef",
    },
    Builtin {
        id: "tip",
        name: "Tip",
        commands: &["tip", "提示"],
        color: "#2b8a3e",
        icon: "💡",
        border: "#8ce99a",
        from: "#ebfbee",
        to: "#d3f9d8",
    },
    Builtin {
        id: "success",
        name: "Success",
        commands: &["success", "成功"],
        color: "#087f5b",
        icon: "✅",
        border: "#63e6be",
        from: "#e6fcf5",
        to: "#c3fae8",
    },
    Builtin {
        id: "question",
        name: "Question",
        commands: &["question", "问题"],
        color: "#5f3dc4",
        icon: "❓",
        border: "#b197fc",
        from: "#f3f0ff",
        to: "#e5dbff",
    },
    Builtin {
        id: "warning",
        name: "Warning",
        commands: &["warning", "警告"],
        color: "#e67700",
        icon: "⚠️",
        border: "#ffd43b",
        from: "#fff9db",
        to: "#fff3bf",
    },
    Builtin {
        id: "danger",
        name: "Danger",
        commands: &["danger", "危险"],
        color: "#c92a2a",
        icon: "🚨",
        border: "#ffa8a8",
        from: "#fff5f5",
        to: "#ffe3e3",
    },
    Builtin {
        id: "bug",
        name: "Bug",
        commands: &["bug", "缺陷"],
        color: "#a61e4d",
        icon: "🐛",
        border: "#faa2c1",
        from: "#fff0f6",
        to: "#ffdeeb",
    },
    Builtin {
        id: "example",
        name: "Example",
        commands: &["example", "示例"],
        color: "#0b7285",
        icon: "📋",
        border: "#66d9e8",
        from: "#e3fafc",
        to: "#c5f6fa",
    },
    Builtin {
        id: "quote",
        name: "Quote",
        commands: &["quote", "引用"],
        color: "#343a40",
        icon: "💬",
        border: "#ced4da",
        from: "#f1f3f5",
        to: "#e9ecef",
    },
    Builtin {
        id: "todo",
        name: "Todo",
        commands: &["todo", "待办"],
        color: "#1864ab",
        icon: "☑️",
        border: "#a5d8ff",
        from: "#e7f5ff",
        to: "#dbe4ff",
    },
    Builtin {
        id: "abstract",
        name: "Abstract",
        commands: &["abstract", "摘要"],
        color: "#364fc7",
        icon: "📑",
        border: "#91a7ff",
        from: "#edf2ff",
        to: "#dbe4ff",
    },
];

/// The built-in type table, in menu order.
pub fn builtin_types() -> Vec<CalloutTypeDescriptor> {
    BUILTINS
        .iter()
        .map(|b| CalloutTypeDescriptor {
            id: b.id.to_string(),
            display_name: b.name.to_string(),
            trigger_commands: b.commands.iter().map(|c| c.to_string()).collect(),
            color: b.color.to_string(),
            icon: Icon::Emoji(b.icon.to_string()),
            border_color: b.border.to_string(),
            background: BackgroundStyle::Gradient {
                from: b.from.to_string(),
                to: b.to.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtins_have_triggers() {
        for descriptor in builtin_types() {
            assert!(!descriptor.trigger_commands.is_empty(), "{}", descriptor.id);
            assert_eq!(descriptor.trigger_commands[0], descriptor.id);
        }
    }

    #[test]
    fn canonical_and_legacy_forms() {
        let info = builtin_types().remove(0);
        assert_eq!(
            info.canonical_commands().collect::<Vec<_>>(),
            vec!["[!info]".to_string(), "[!信息]".to_string()]
        );
        assert_eq!(
            info.legacy_commands().collect::<Vec<_>>(),
            vec!["@info".to_string(), "@信息".to_string()]
        );
    }

    #[test]
    fn command_match_ignores_case() {
        let info = builtin_types().remove(0);
        assert!(info.matches_command("[!INFO]"));
        assert!(info.matches_command("[!信息]"));
        assert!(!info.matches_command("[!inf]"));
        assert!(!info.matches_command("info"));
    }

    #[test]
    fn custom_type_without_commands_uses_id() {
        let custom = CustomTypeConfig {
            id: "deadline".to_string(),
            display_name: "Deadline".to_string(),
            commands: vec!["  ".to_string()],
            color: "#d9480f".to_string(),
            icon: "<svg viewBox=\"0 0 1 1\"></svg>".to_string(),
            border_color: None,
            background: None,
        };
        let descriptor = CalloutTypeDescriptor::from(&custom);

        assert_eq!(descriptor.trigger_commands, vec!["deadline".to_string()]);
        assert_eq!(descriptor.border_color, "#d9480f");
        assert!(matches!(descriptor.icon, Icon::Svg(_)));
        assert_eq!(descriptor.background.swatch(), "transparent");
    }

    #[test]
    fn gradient_css() {
        let bg = BackgroundStyle::Gradient {
            from: "#fff".to_string(),
            to: "#000".to_string(),
        };
        assert_eq!(bg.css(), "linear-gradient(135deg, #fff 0%, #000 100%)");
        assert_eq!(bg.swatch(), "#fff");
    }
}
