use crate::models::{ParsedCommand, TypeRegistry};

use super::lexer::{DirectiveToken, lex};
use super::params;

const ZERO_WIDTH_SPACE: char = '\u{200b}';

/// Title text with surrounding whitespace and zero-width spaces removed.
pub fn clean_title(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == ZERO_WIDTH_SPACE)
}

/// Parses a bracket directive `"[!" TYPE ("|" PARAM)* "]" ["+" | "-"] [TITLE]`.
///
/// Returns `None` when the text does not start with a directive or when the
/// type token is not an exact (case-insensitive) trigger in `registry`.
/// Never fails on parameters: bad ones fall back to defaults.
pub fn parse(text: &str, registry: &TypeRegistry) -> Option<ParsedCommand> {
    let source = clean_title(text);
    let tokens = lex(source);

    let first = tokens.first()?;
    if first.kind != DirectiveToken::Open {
        return None;
    }

    let mut segments = Vec::new();
    let mut segment_start = first.span.end;
    let mut close_end = None;
    for token in &tokens[1..] {
        match token.kind {
            DirectiveToken::Pipe => {
                segments.push(&source[segment_start..token.span.start]);
                segment_start = token.span.end;
            }
            DirectiveToken::Close => {
                segments.push(&source[segment_start..token.span.start]);
                close_end = Some(token.span.end);
                break;
            }
            _ => {}
        }
    }
    let close_end = close_end?;

    let (type_segment, param_segments) = segments.split_first()?;
    let type_token = type_segment.trim();
    if type_token.is_empty() {
        return None;
    }
    let descriptor = registry.find_by_type_token(type_token)?;

    let params::Params {
        width,
        height,
        spacing,
    } = params::classify(param_segments.iter().copied());

    let rest = &source[close_end..];
    let (collapsed, rest) = match rest.chars().next() {
        Some('-') => (Some(true), &rest[1..]),
        Some('+') => (Some(false), &rest[1..]),
        _ => (None, rest),
    };
    let title = clean_title(rest);

    Some(ParsedCommand {
        type_id: descriptor.id.clone(),
        type_token: type_token.to_string(),
        width,
        height,
        spacing,
        collapsed,
        title: (!title.is_empty()).then(|| title.to_string()),
        original_text: text.to_string(),
    })
}

/// Parses old-style `@type` titles that predate the bracket syntax.
///
/// Legacy titles carry no parameters or collapse marker; whatever follows
/// the command becomes the title.
pub fn parse_legacy(text: &str, registry: &TypeRegistry) -> Option<ParsedCommand> {
    let source = clean_title(text);
    let (descriptor, trigger, rest) = registry.find_legacy_prefix(source)?;
    let title = clean_title(rest);

    Some(ParsedCommand {
        type_id: descriptor.id.clone(),
        type_token: trigger.to_string(),
        width: None,
        height: None,
        spacing: None,
        collapsed: None,
        title: (!title.is_empty()).then(|| title.to_string()),
        original_text: text.to_string(),
    })
}

/// Bracket parse first, then the legacy prefix match. `None` means the
/// title is not a callout.
pub fn recognize(text: &str, registry: &TypeRegistry) -> Option<ParsedCommand> {
    parse(text, registry).or_else(|| parse_legacy(text, registry))
}

/// Inverse of [`parse`]: `[!type]`, `[!type|p1|p2]`, with `-`/`+` only when
/// `collapsed` is set and the title after one space.
pub fn generate(parsed: &ParsedCommand) -> String {
    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::registry;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parsed(text: &str) -> ParsedCommand {
        parse(text, &registry()).unwrap_or_else(|| panic!("expected a callout: {text}"))
    }

    #[test]
    fn bare_type() {
        let cmd = parsed("[!info]");
        assert_eq!(cmd.type_id, "info");
        assert_eq!(cmd.width, None);
        assert_eq!(cmd.height, None);
        assert_eq!(cmd.spacing, None);
        assert_eq!(cmd.collapsed, None);
        assert_eq!(cmd.title, None);
        assert_eq!(cmd.original_text, "[!info]");
    }

    #[test]
    fn full_directive() {
        let cmd = parsed("[!warning|25%|200px]-");
        assert_eq!(cmd.type_id, "warning");
        assert_eq!(cmd.width.as_deref(), Some("25%"));
        assert_eq!(cmd.height.as_deref(), Some("200px"));
        assert_eq!(cmd.spacing, None);
        assert_eq!(cmd.collapsed, Some(true));
    }

    #[test]
    fn height_below_floor_is_spacing() {
        let cmd = parsed("[!warning|25%|40px]-");
        assert_eq!(cmd.width.as_deref(), Some("25%"));
        assert_eq!(cmd.height, None);
        assert_eq!(cmd.spacing.as_deref(), Some("40px"));
        assert_eq!(cmd.collapsed, Some(true));
    }

    #[test]
    fn small_px_only_is_spacing() {
        let cmd = parsed("[!info|30px]");
        assert_eq!(cmd.height, None);
        assert_eq!(cmd.spacing.as_deref(), Some("30px"));
    }

    #[rstest]
    #[case("[!info|0%]")]
    #[case("[!info|150%]")]
    fn width_out_of_range_falls_back(#[case] text: &str) {
        assert_eq!(parsed(text).width.as_deref(), Some("10%"));
    }

    #[rstest]
    #[case("[!tip]+", Some(false))]
    #[case("[!tip]-", Some(true))]
    #[case("[!tip]", None)]
    fn collapse_markers(#[case] text: &str, #[case] expected: Option<bool>) {
        assert_eq!(parsed(text).collapsed, expected);
    }

    #[rstest]
    #[case("[!nonexistent-type]")]
    #[case("[!]")]
    #[case("[!info")]
    #[case("info")]
    #[case("see [!info]")]
    #[case("")]
    fn not_a_callout(#[case] text: &str) {
        assert_eq!(parse(text, &registry()), None);
    }

    #[test]
    fn case_insensitive_type_keeps_token() {
        let cmd = parsed("[!INFO|30%]");
        assert_eq!(cmd.type_id, "info");
        assert_eq!(cmd.type_token, "INFO");
        assert_eq!(generate(&cmd), "[!INFO|30%]");
    }

    #[test]
    fn localized_trigger() {
        let cmd = parsed("[!警告|50%]+");
        assert_eq!(cmd.type_id, "warning");
        assert_eq!(generate(&cmd), "[!警告|50%]+");
    }

    #[test]
    fn title_after_directive() {
        let cmd = parsed("  [!tip]- Remember this \u{200b}");
        assert_eq!(cmd.collapsed, Some(true));
        assert_eq!(cmd.title.as_deref(), Some("Remember this"));
        assert_eq!(generate(&cmd), "[!tip]- Remember this");
    }

    #[test]
    fn title_may_start_with_marker_characters() {
        let cmd = parsed("[!tip] - not a marker");
        assert_eq!(cmd.collapsed, None);
        assert_eq!(cmd.title.as_deref(), Some("- not a marker"));
        assert_eq!(parsed(&generate(&cmd)), cmd);
    }

    #[test]
    fn empty_params_are_skipped() {
        let cmd = parsed("[!info||30%|]");
        assert_eq!(cmd.width.as_deref(), Some("30%"));
        assert_eq!(generate(&cmd), "[!info|30%]");
    }

    #[test]
    fn padded_type_token() {
        let cmd = parsed("[! note |20%]");
        assert_eq!(cmd.type_id, "note");
        assert_eq!(cmd.type_token, "note");
    }

    #[rstest]
    #[case("[!tip|20%]-")]
    #[case("[!tip]+")]
    #[case("[!info|30%|120px]-")]
    #[case("[!warning|25%|40px]")]
    fn generate_reproduces_canonical_text(#[case] text: &str) {
        assert_eq!(generate(&parsed(text)), text);
    }

    #[test]
    fn generate_without_marker_has_none() {
        let regenerated = generate(&parsed("[!tip]"));
        assert_eq!(regenerated, "[!tip]");
        assert_eq!(parsed(&regenerated).collapsed, None);
    }

    #[rstest]
    #[case("[!info|abc%|abcpx]")]
    #[case("[!info|40px|120px|2rem]")]
    #[case("[!info|0|7]")]
    #[case("[!info|150|2.5]")]
    #[case("[!note|300px|99.5%]+ Side note")]
    #[case("[!INFO|33]")]
    fn parse_generate_parse_is_stable(#[case] text: &str) {
        let first = parsed(text);
        let second = parsed(&generate(&first));
        assert_eq!(first, second);
        assert_eq!(generate(&first), generate(&second));
    }

    #[test]
    fn legacy_prefix_fallback() {
        assert_eq!(parse("@warning watch out", &registry()), None);

        let cmd = recognize("@warning watch out", &registry()).unwrap();
        assert_eq!(cmd.type_id, "warning");
        assert_eq!(cmd.title.as_deref(), Some("watch out"));
        assert_eq!(cmd.collapsed, None);
        assert!(!cmd.has_params());
        assert_eq!(generate(&cmd), "[!warning] watch out");
    }

    #[test]
    fn recognize_prefers_brackets() {
        let cmd = recognize("[!tip|40%]", &registry()).unwrap();
        assert_eq!(cmd.width.as_deref(), Some("40%"));
        assert_eq!(recognize("plain text", &registry()), None);
    }
}
