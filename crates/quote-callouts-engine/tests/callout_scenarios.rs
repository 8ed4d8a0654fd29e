use pretty_assertions::assert_eq;
use quote_callouts_engine::dom::attrs;
use quote_callouts_engine::interaction::{DragAbort, ResizeDrag};
use quote_callouts_engine::{
    CalloutElement, HeadlessElement, MenuAction, MenuOutcome, Transition, TypeRegistry, generate,
    parse, plan_menu_action, reconcile, reconcile_title,
};
use rstest::rstest;

fn registry() -> TypeRegistry {
    TypeRegistry::builtin()
}

/// Regenerating any accepted directive and parsing it again gives the same
/// command.
#[rstest]
#[case("[!info]")]
#[case("[!warning|30%]")]
#[case("[!info|30%|120px]-")]
#[case("[!tip]+")]
#[case("[!note|25|2em]- Side note")]
#[case("[!warning|25%|40px]-")]
#[case("[!Info|0%|abc]")]
#[case("[!提示|50%] 中文标题")]
fn regenerate_then_reparse_is_stable(#[case] title: &str) {
    let registry = registry();
    let first = parse(title, &registry).unwrap();
    let second = parse(&generate(&first), &registry).unwrap();
    assert_eq!(first, second);
    assert_eq!(generate(&first), generate(&second));
}

#[test]
fn reconcile_without_width_keeps_existing_width() {
    let registry = registry();
    let mut element = HeadlessElement::quote("b1", "[!info]").with_attr(attrs::TYPE, "info");
    element.set_attr(attrs::WIDTH, "42%");

    let parsed = parse("[!info]", &registry).unwrap();
    reconcile(&mut element, Some(&parsed));

    assert_eq!(element.attr(attrs::WIDTH).as_deref(), Some("42%"));
}

#[rstest]
#[case("[!info|0%]")]
#[case("[!info|150%]")]
fn out_of_range_widths_fall_back(#[case] title: &str) {
    let parsed = parse(title, &registry()).unwrap();
    assert_eq!(parsed.width.as_deref(), Some("10%"));
}

#[test]
fn short_height_becomes_spacing() {
    let parsed = parse("[!info|30px]", &registry()).unwrap();
    assert_eq!(parsed.height, None);
    assert_eq!(parsed.spacing.as_deref(), Some("30px"));
}

#[test]
fn collapse_markers_round_trip() {
    let registry = registry();
    let regenerate = |t: &str| generate(&parse(t, &registry).unwrap());

    assert_eq!(regenerate("[!tip|20%]-"), "[!tip|20%]-");
    assert_eq!(regenerate("[!tip]+"), "[!tip]+");
    assert_eq!(parse("[!tip]", &registry).unwrap().collapsed, None);
    assert_eq!(regenerate("[!tip]"), "[!tip]");
}

#[test]
fn unknown_type_is_not_a_callout() {
    assert_eq!(parse("[!nonexistent-type]", &registry()), None);
}

#[test]
fn retyping_title_clears_conservatively() {
    let registry = registry();
    let mut element = HeadlessElement::quote("b1", "[!warning|25%|200px]- Careful");
    assert_eq!(reconcile_title(&mut element, &registry), Transition::Applied);

    element.set_title_text("just some prose");
    assert_eq!(
        reconcile_title(&mut element, &registry),
        Transition::ConservativeClear
    );

    assert_eq!(element.attr(attrs::TYPE), None);
    assert_eq!(element.attr(attrs::COLLAPSED), None);
    assert!(!element.title_marked());
    assert_eq!(element.attr(attrs::WIDTH).as_deref(), Some("25%"));
    assert_eq!(element.attr(attrs::HEIGHT).as_deref(), Some("200px"));
}

#[test]
fn native_style_clears_sizes_too() {
    let registry = registry();
    let mut element = HeadlessElement::quote("b1", "[!warning|25%|200px]- Careful");
    reconcile_title(&mut element, &registry);

    let outcome = plan_menu_action(&registry, &mut element, &MenuAction::NativeStyle);

    assert_eq!(outcome, MenuOutcome::Cleared { title_blanked: true });
    for name in [
        attrs::TYPE,
        attrs::COLLAPSED,
        attrs::WIDTH,
        attrs::HEIGHT,
        attrs::SPACING,
    ] {
        assert_eq!(element.attr(name), None, "{name} should be gone");
    }
    for property in attrs::css::ALL {
        assert_eq!(element.style_property(property), None, "{property} should be gone");
    }
}

#[test]
fn warning_with_width_and_height() {
    let parsed = parse("[!warning|25%|200px]-", &registry()).unwrap();
    assert_eq!(parsed.type_id, "warning");
    assert_eq!(parsed.width.as_deref(), Some("25%"));
    assert_eq!(parsed.height.as_deref(), Some("200px"));
    assert_eq!(parsed.collapsed, Some(true));
}

#[test]
fn warning_with_height_below_floor() {
    let parsed = parse("[!warning|25%|40px]-", &registry()).unwrap();
    assert_eq!(parsed.height, None);
    assert_eq!(parsed.spacing.as_deref(), Some("40px"));
    assert_eq!(parsed.collapsed, Some(true));
}

#[test]
fn corrupted_width_aborts_drag() {
    let mut element = HeadlessElement::quote("b1", "[!info]").with_attr(attrs::WIDTH, "abc%");
    let mut drag = ResizeDrag::default();

    assert!(matches!(
        drag.begin(&element, 0.0, 640.0),
        Err(DragAbort::MalformedBaseline(_))
    ));
    drag.drag_to(&mut element, 320.0);
    drag.finish(&mut element);

    assert!(element.styles().values().all(|v| !v.contains("NaN")));
    assert!(element.attrs().values().all(|v| !v.contains("NaN")));
    assert_eq!(element.style_property(attrs::css::WIDTH), None);
}

#[test]
fn reconcile_is_idempotent() {
    let registry = registry();
    let mut once = HeadlessElement::quote("b1", "[!question|60%|2em]+ Why?");
    reconcile_title(&mut once, &registry);
    let mut twice = once.clone();
    assert_eq!(reconcile_title(&mut twice, &registry), Transition::Updated);
    assert_eq!(once, twice);
}
