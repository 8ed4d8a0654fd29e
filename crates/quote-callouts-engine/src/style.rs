//! Theme stylesheet and icon markup generation.

use quote_callouts_config::{MAX_GRID_COLUMNS, PluginConfig, ThemeChoice};

use crate::dom::attrs;
use crate::models::{CalloutTypeDescriptor, Icon, TypeRegistry};

pub const ICON_CLASS: &str = "callout-icon";
pub const MENU_GRID_CLASS: &str = "callout-menu-grid";

/// Escapes a value for use inside a double-quoted CSS string.
fn css_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\a "),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn container_selector(type_id: &str) -> String {
    format!(".{}[{}=\"{}\"]", attrs::QUOTE_CLASS, attrs::TYPE, css_string(type_id))
}

/// Rules for one type under `theme`.
pub fn type_rules(descriptor: &CalloutTypeDescriptor, theme: ThemeChoice) -> String {
    let selector = container_selector(&descriptor.id);
    let border = &descriptor.border_color;

    let mut css = match theme {
        ThemeChoice::Modern => format!(
            "{selector} {{ background: {}; border-left: 4px solid {border}; border-radius: 8px; }}\n",
            descriptor.background.css()
        ),
        ThemeChoice::Classic => format!(
            "{selector} {{ background: {}; border-left: 6px solid {border}; border-radius: 0; }}\n",
            descriptor.background.swatch()
        ),
        ThemeChoice::Minimal => format!(
            "{selector} {{ background: transparent; border: 1px solid {border}; border-radius: 4px; }}\n"
        ),
    };
    css.push_str(&format!(
        "{selector} [{}] {{ color: {}; font-weight: 600; }}\n",
        attrs::TITLE_MARKER,
        descriptor.color
    ));
    if let Icon::Emoji(emoji) = &descriptor.icon {
        css.push_str(&format!(
            "{selector} [{}]::before {{ content: \"{}\"; margin-right: 0.4em; }}\n",
            attrs::TITLE_MARKER,
            css_string(emoji)
        ));
    }
    css
}

/// Layout rules shared by every type: margin notes, explicit heights,
/// collapsing and the type picker grid.
fn shared_rules(grid_columns: u8) -> String {
    let quote = attrs::QUOTE_CLASS;
    let columns = grid_columns.clamp(1, MAX_GRID_COLUMNS);

    [
        format!(
            ".{quote}[{}] {{ width: var({}); float: right; clear: right; margin-left: var({}, 1em); }}\n",
            attrs::WIDTH,
            attrs::css::WIDTH,
            attrs::css::SPACING
        ),
        format!(
            ".{quote}[{}] {{ min-height: var({}); }}\n",
            attrs::HEIGHT,
            attrs::css::HEIGHT
        ),
        format!(
            ".{quote}[{}=\"true\"] > :not([{}]) {{ display: none; }}\n",
            attrs::COLLAPSED,
            attrs::TITLE_MARKER
        ),
        format!(
            ".{quote}[{}] [{}] {{ cursor: pointer; }}\n",
            attrs::TYPE,
            attrs::TITLE_MARKER
        ),
        format!(
            ".{MENU_GRID_CLASS} {{ display: grid; grid-template-columns: repeat({columns}, minmax(0, 1fr)); }}\n"
        ),
    ]
    .concat()
}

/// The full stylesheet for `registry` under the configured theme.
pub fn theme_css(registry: &TypeRegistry, config: &PluginConfig) -> String {
    let mut css = shared_rules(config.grid_columns);
    for descriptor in registry.iter() {
        css.push_str(&type_rules(descriptor, config.theme));
    }
    css
}

/// The icon as an HTML fragment. Emoji are escaped; SVG markup is
/// configured by the user and inserted as-is.
pub fn icon_markup(descriptor: &CalloutTypeDescriptor) -> String {
    let inner = match &descriptor.icon {
        Icon::Emoji(emoji) => html_escape::encode_text(emoji).into_owned(),
        Icon::Svg(svg) => svg.clone(),
    };
    format!(
        "<span class=\"{ICON_CLASS}\" data-callout-icon=\"{}\">{inner}</span>",
        html_escape::encode_double_quoted_attribute(&descriptor.id)
    )
}
