//! Normalization rules for directive parameters.
//!
//! None of these fail: a malformed token degrades to a documented default so
//! a good type with a bad parameter still renders.

use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_WIDTH: &str = "10%";
pub const DEFAULT_SPACING: &str = "1em";
pub const MIN_HEIGHT_PX: f64 = 50.0;
pub const MAX_HEIGHT_PX: f64 = 1000.0;

static LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.]+(%|px|em|rem|vw)$").unwrap());

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d.]+$").unwrap());

/// Parses an unsigned decimal made only of digits and dots.
fn number(token: &str) -> Option<f64> {
    if !NUMBER.is_match(token) {
        return None;
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether `token` is a number with one of the accepted length units.
pub fn is_length(token: &str) -> bool {
    LENGTH.is_match(token)
}

fn in_width_range(value: f64) -> bool {
    value > 0.0 && value <= 100.0
}

/// Width rule. Percentages must lie in `(0, 100]`; other units pass
/// verbatim; bare numbers in range gain `%`. Anything else is `10%`.
pub fn normalize_width(token: &str) -> String {
    if let Some(num) = token.strip_suffix('%') {
        return match number(num) {
            Some(v) if in_width_range(v) => token.to_string(),
            _ => DEFAULT_WIDTH.to_string(),
        };
    }
    if LENGTH.is_match(token) {
        return token.to_string();
    }
    match number(token) {
        Some(v) if in_width_range(v) => format!("{token}%"),
        _ => DEFAULT_WIDTH.to_string(),
    }
}

/// A width that survives a trip through title text: a percentage or bare
/// number in `(0, 100]`, written as `N%`. Other units would read back as a
/// height or spacing, so they give `None`.
pub fn directive_width(token: &str) -> Option<String> {
    let token = token.trim();
    let num = token.strip_suffix('%').unwrap_or(token);
    number(num)
        .filter(|v| in_width_range(*v))
        .map(|_| format!("{num}%"))
}

/// Height rule. Only `px` (or bare) values within `[50, 1000]` count as a
/// height; everything else is `None` so the spacing rule can claim it.
pub fn normalize_height(token: &str) -> Option<String> {
    let num = token.strip_suffix("px").unwrap_or(token);
    let value = number(num)?;
    (MIN_HEIGHT_PX..=MAX_HEIGHT_PX)
        .contains(&value)
        .then(|| format!("{num}px"))
}

/// Spacing rule. Lengths pass verbatim, bare numbers gain `em`, anything
/// else is `1em`.
pub fn normalize_spacing(token: &str) -> String {
    if LENGTH.is_match(token) {
        return token.to_string();
    }
    match number(token) {
        Some(_) => format!("{token}em"),
        None => DEFAULT_SPACING.to_string(),
    }
}

/// Whether an unsuffixed token is claimed by the width rule.
///
/// Unsuffixed numbers up to 100 are always widths, never heights.
fn is_bare_width(token: &str) -> bool {
    number(token).is_some_and(in_width_range)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pub width: Option<String>,
    pub height: Option<String>,
    pub spacing: Option<String>,
}

/// Classifies parameter tokens into width, height and spacing.
///
/// Order of the checks matters and each category keeps its first match:
/// `%` is width; `px` is height when in range and the slot is free,
/// otherwise spacing; bare numbers in `(0, 100]` are width; the rest is
/// spacing. Empty tokens are skipped.
pub fn classify<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Params {
    let mut params = Params::default();

    for raw in tokens {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }

        if token.ends_with('%') {
            if params.width.is_none() {
                params.width = Some(normalize_width(token));
            }
            continue;
        }

        if token.ends_with("px") {
            if params.height.is_none()
                && let Some(height) = normalize_height(token)
            {
                params.height = Some(height);
                continue;
            }
            if params.spacing.is_none() {
                params.spacing = Some(normalize_spacing(token));
            }
            continue;
        }

        if is_bare_width(token) {
            if params.width.is_none() {
                params.width = Some(normalize_width(token));
            }
            continue;
        }

        if params.spacing.is_none() {
            params.spacing = Some(normalize_spacing(token));
        }
    }

    params
}
