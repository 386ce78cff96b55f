use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use xmlbind::access::typed::*;
use xmlbind::access::Slot;
use xmlbind::document::node::XmlElement;
use xmlbind::document::parse_xml;

fn settings() -> XmlElement {
    parse_xml(
        r#"<settings>
            <window width="640" height="480" fullscreen="false">main</window>
            <audio volume="0.75" muted="1"/>
            <player name="one" level="3"/>
            <player name="two" level="-1"/>
        </settings>"#,
    )
    .unwrap()
    .into_root()
}

// ============================================================================
// Getters through path helpers
// ============================================================================

#[test]
fn test_get_through_paths() {
    let root = settings();
    assert_eq!(get_attr_uint(child(&root, "window", 0), "width", 0), 640);
    assert_eq!(get_text_string(child(&root, "window", 0), ""), "main");
    assert!(!get_attr_bool(child(&root, "window", 0), "fullscreen", true));
    assert!(get_attr_bool(child(&root, "audio", 0), "muted", false));
    assert_eq!(get_attr_float(child(&root, "audio", 0), "volume", 0.0), 0.75);
    assert_eq!(get_attr_string(child(&root, "player", 1), "name", ""), "two");
}

#[test]
fn test_type_mismatch_returns_default() {
    let root = settings();
    // negative level is not a uint, nor a byte
    assert_eq!(get_attr_uint(child(&root, "player/1", 0), "level", 99), 99);
    assert_eq!(get_attr_byte(child(&root, "player/1", 0), "level", 7), 7);
    assert_eq!(get_attr_int(child(&root, "player/1", 0), "level", 0), -1);
    // text "main" is not a number
    assert_eq!(get_text_double(child(&root, "window", 0), 1.25), 1.25);
}

#[test]
fn test_missing_nodes_return_default() {
    let root = settings();
    let before = root.clone();
    assert_eq!(get_attr_int(child(&root, "nothing", 0), "x", 5), 5);
    assert_eq!(get_text_string(child(&root, "player/4", 0), "none"), "none");
    assert!(get_attr_bool(child(&root, "audio", 0), "missing", true));
    assert_eq!(root, before);
}

// ============================================================================
// Setters
// ============================================================================

#[test]
fn test_set_creates_structure() {
    let mut root = settings();
    set_text_int(obtain_child(Some(&mut root), "stats/games", 0), 12);
    set_attr_double(obtain_child(Some(&mut root), "player/2", 0), "score", 2.5);

    assert_eq!(get_text_int(child(&root, "stats/games", 0), 0), 12);
    assert_eq!(num_children(Some(&root), "", "player"), 3);
    assert_eq!(get_attr_double(child(&root, "player/2", 0), "score", 0.0), 2.5);
}

#[test]
fn test_set_bool_writes_words() {
    let mut root = settings();
    set_attr_bool(child_mut(&mut root, "audio", 0), "muted", false);
    assert_eq!(
        child(&root, "audio", 0).and_then(|e| e.attribute("muted")),
        Some("false")
    );
}

#[test]
fn test_slots_follow_their_variables() {
    let mut root = settings();
    let width = Rc::new(Cell::new(0u32));
    let title = Rc::new(RefCell::new(String::new()));

    assert!(get_attr(child(&root, "window", 0), "width", &Slot::from(&width)));
    assert!(get_text(child(&root, "window", 0), &Slot::from(&title)));
    assert_eq!(width.get(), 640);
    assert_eq!(title.borrow().as_str(), "main");

    width.set(1024);
    set_attr(child_mut(&mut root, "window", 0), "width", &Slot::from(&width));
    assert_eq!(get_attr_uint(child(&root, "window", 0), "width", 0), 1024);
}

// ============================================================================
// Round trips
// ============================================================================

proptest! {
    #[test]
    fn int_round_trip(value in any::<i32>()) {
        let mut e = XmlElement::new("v");
        set_text_int(Some(&mut e), value);
        prop_assert_eq!(get_text_int(Some(&e), !value), value);
    }

    #[test]
    fn uint_round_trip(value in any::<u32>()) {
        let mut e = XmlElement::new("v");
        set_attr_uint(Some(&mut e), "n", value);
        prop_assert_eq!(get_attr_uint(Some(&e), "n", !value), value);
    }

    #[test]
    fn byte_round_trip(value in any::<u8>()) {
        let mut e = XmlElement::new("v");
        set_attr_byte(Some(&mut e), "b", value);
        prop_assert_eq!(get_attr_byte(Some(&e), "b", !value), value);
    }

    #[test]
    fn float_round_trip(value in prop::num::f32::NORMAL | prop::num::f32::ZERO) {
        let mut e = XmlElement::new("v");
        set_text_float(Some(&mut e), value);
        prop_assert_eq!(get_text_float(Some(&e), f32::NAN), value);
    }

    #[test]
    fn double_round_trip(value in prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL) {
        let mut e = XmlElement::new("v");
        set_attr_double(Some(&mut e), "d", value);
        prop_assert_eq!(get_attr_double(Some(&e), "d", f64::NAN), value);
    }

    #[test]
    fn bool_round_trip(value in any::<bool>()) {
        let mut e = XmlElement::new("v");
        set_text_bool(Some(&mut e), value);
        prop_assert_eq!(get_text_bool(Some(&e), !value), value);
    }

    #[test]
    fn string_attribute_round_trip(value in "[^\u{0}]{0,32}") {
        let mut e = XmlElement::new("v");
        set_attr_string(Some(&mut e), "s", &value);
        prop_assert_eq!(get_attr_string(Some(&e), "s", "default"), value);
    }
}
