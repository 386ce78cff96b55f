use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;
use xmlbind::document::node::XmlElement;
use xmlbind::document::parse_xml;
use xmlbind::object::{DocumentVisitor, ObjectArena, ObjectId, XmlObject};

/// Variables of a small settings tree, shared with the bound objects.
#[derive(Default)]
struct Settings {
    title: Rc<RefCell<String>>,
    version: Rc<Cell<u32>>,
    volume: Rc<Cell<f32>>,
    muted: Rc<Cell<bool>>,
    players: Vec<(Rc<RefCell<String>>, Rc<Cell<i32>>)>,
}

fn bind(arena: &mut ObjectArena, settings: &Settings) -> ObjectId {
    let mut root = XmlObject::new("settings");
    root.subscribe_attribute("", "version", &settings.version, false);
    root.subscribe_element("title", &settings.title, false);
    root.subscribe_attribute("audio", "volume", &settings.volume, false);
    root.subscribe_attribute("audio", "muted", &settings.muted, false);
    let root = arena.insert(root);

    for (name, score) in &settings.players {
        let mut player = XmlObject::new("player");
        player.subscribe_attribute("", "name", name, false);
        player.subscribe_element("score", score, false);
        let player = arena.insert(player);
        assert!(arena.add_child(root, player));
    }
    root
}

fn sample_settings() -> Settings {
    Settings {
        title: Rc::new(RefCell::new("demo".to_string())),
        version: Rc::new(Cell::new(3)),
        volume: Rc::new(Cell::new(0.25)),
        muted: Rc::new(Cell::new(true)),
        players: vec![
            (Rc::new(RefCell::new("ann".to_string())), Rc::new(Cell::new(10))),
            (Rc::new(RefCell::new("bob".to_string())), Rc::new(Cell::new(-4))),
        ],
    }
}

fn empty_settings(players: usize) -> Settings {
    Settings {
        players: (0..players)
            .map(|_| (Rc::default(), Rc::default()))
            .collect(),
        ..Settings::default()
    }
}

// ============================================================================
// Save / load round trip
// ============================================================================

#[test]
fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.xml");
    let path = path.to_str().unwrap();

    let source = sample_settings();
    let mut arena = ObjectArena::new();
    let root = bind(&mut arena, &source);
    assert!(arena.save_file(root, path).unwrap());

    let target = empty_settings(2);
    let mut arena = ObjectArena::new();
    let root = bind(&mut arena, &target);
    assert!(arena.load_file(root, path).unwrap());

    assert_eq!(target.title.borrow().as_str(), "demo");
    assert_eq!(target.version.get(), 3);
    assert_eq!(target.volume.get(), 0.25);
    assert!(target.muted.get());
    let players: Vec<_> = target
        .players
        .iter()
        .map(|(name, score)| (name.borrow().clone(), score.get()))
        .collect();
    assert_eq!(
        players,
        vec![("ann".to_string(), 10), ("bob".to_string(), -4)]
    );
}

#[test]
fn test_saved_document_layout() {
    let source = sample_settings();
    let mut arena = ObjectArena::new();
    let root = bind(&mut arena, &source);

    let mut element = XmlElement::new("settings");
    assert!(arena.save(root, &mut element));

    assert_eq!(element.attribute("version"), Some("3"));
    assert_eq!(element.count_child_elements("player"), 2);
    let second = element.child_element("player", 1).unwrap();
    assert_eq!(second.attribute("name"), Some("bob"));
    assert_eq!(
        second.first_child_element("score").and_then(|e| e.text()),
        Some("-4")
    );
    assert_eq!(
        element.first_child_element("audio").and_then(|e| e.attribute("muted")),
        Some("true")
    );
}

#[test]
fn test_save_reuses_loaded_elements() {
    let doc = parse_xml(
        r#"<settings version="1"><title>old</title><extra keep="yes"/></settings>"#,
    )
    .unwrap();
    let source = sample_settings();
    let mut arena = ObjectArena::new();
    let root = bind(&mut arena, &source);

    let mut element = doc.into_root();
    arena.save(root, &mut element);
    assert_eq!(element.count_child_elements("title"), 1);
    assert_eq!(
        element.first_child_element("title").and_then(|e| e.text()),
        Some("demo")
    );
    // unbound content is left alone
    assert_eq!(
        element.first_child_element("extra").and_then(|e| e.attribute("keep")),
        Some("yes")
    );
}

// ============================================================================
// Mismatches and missing content
// ============================================================================

#[test]
fn test_wrong_root_name_changes_nothing() {
    let target = empty_settings(1);
    target.version.set(8);
    let mut arena = ObjectArena::new();
    let root = bind(&mut arena, &target);

    let doc = parse_xml(r#"<other version="2"><player name="x"/></other>"#).unwrap();
    assert!(!arena.load(root, doc.root()));
    assert_eq!(target.version.get(), 8);
    assert_eq!(target.players[0].0.borrow().as_str(), "");

    let mut element = doc.root().clone();
    assert!(!arena.save(root, &mut element));
    assert_eq!(&element, doc.root());
}

#[test]
fn test_missing_children_keep_defaults() {
    let target = empty_settings(3);
    target.players[2].1.set(77);
    let mut arena = ObjectArena::new();
    let root = bind(&mut arena, &target);

    let doc = parse_xml(
        r#"<settings><player name="a"><score>1</score></player><player name="b"/></settings>"#,
    )
    .unwrap();
    assert!(arena.load(root, doc.root()));
    assert_eq!(target.players[0].1.get(), 1);
    assert_eq!(target.players[1].0.borrow().as_str(), "b");
    assert_eq!(target.players[2].1.get(), 77);
}

// ============================================================================
// Shared elements
// ============================================================================

#[test]
fn test_siamese_children_share_element() {
    let width = Rc::new(Cell::new(0u32));
    let height = Rc::new(Cell::new(0u32));

    let mut arena = ObjectArena::new();
    let window = arena.insert(XmlObject::new("window"));

    let mut size = XmlObject::new("");
    size.subscribe_attribute("", "width", &width, false);
    let size = arena.insert(size);

    let mut same_name = XmlObject::new("window");
    same_name.subscribe_attribute("", "height", &height, false);
    let same_name = arena.insert(same_name);

    arena.add_child(window, size);
    arena.add_child(window, same_name);

    let doc = parse_xml(r#"<window width="800" height="600"/>"#).unwrap();
    assert!(arena.load(window, doc.root()));
    assert_eq!((width.get(), height.get()), (800, 600));

    width.set(1024);
    let mut element = XmlElement::new("window");
    assert!(arena.save(window, &mut element));
    assert_eq!(element.attribute("width"), Some("1024"));
    assert_eq!(element.attribute("height"), Some("600"));
    assert!(element.children().is_empty());
}

// ============================================================================
// Read-only bindings
// ============================================================================

#[test]
fn test_read_only_loaded_but_not_saved() {
    let build = Rc::new(Cell::new(0i32));
    let name = Rc::new(RefCell::new(String::new()));
    let mut object = XmlObject::new("app");
    object.subscribe_element("build", &build, true);
    object.subscribe_attribute("", "name", &name, true);

    let mut arena = ObjectArena::new();
    let id = arena.insert(object);

    let doc = parse_xml(r#"<app name="tool"><build>41</build></app>"#).unwrap();
    arena.load(id, doc.root());
    assert_eq!(build.get(), 41);
    assert_eq!(name.borrow().as_str(), "tool");

    build.set(42);
    *name.borrow_mut() = "changed".to_string();
    let mut element = doc.root().clone();
    arena.save(id, &mut element);
    assert_eq!(
        element.first_child_element("build").and_then(|e| e.text()),
        Some("41")
    );
    assert_eq!(element.attribute("name"), Some("tool"));
}

// ============================================================================
// Hooks
// ============================================================================

struct Recorder {
    loads: Rc<Cell<u32>>,
    accept: bool,
}

impl DocumentVisitor for Recorder {
    fn on_load(&mut self, element: &XmlElement) -> bool {
        self.loads.set(self.loads.get() + 1);
        self.accept && element.attribute("ok").is_some()
    }

    fn on_save(&mut self, element: &mut XmlElement) -> bool {
        element.set_attribute("ok", "1");
        self.accept
    }
}

#[test]
fn test_hook_result_is_load_result() {
    let loads = Rc::new(Cell::new(0));
    let value = Rc::new(Cell::new(0i32));
    let mut object = XmlObject::with_visitor(
        "node",
        Recorder {
            loads: Rc::clone(&loads),
            accept: true,
        },
    );
    object.subscribe_element("value", &value, false);

    let mut arena = ObjectArena::new();
    let id = arena.insert(object);

    let doc = parse_xml("<node><value>5</value></node>").unwrap();
    assert!(!arena.load(id, doc.root()));
    // bindings are applied even when the hook rejects
    assert_eq!(value.get(), 5);

    let doc = parse_xml(r#"<node ok=""><value>6</value></node>"#).unwrap();
    assert!(arena.load(id, doc.root()));
    assert_eq!(loads.get(), 2);
}

#[test]
fn test_save_hook_result_is_not_masked() {
    let mut arena = ObjectArena::new();
    let id = arena.insert(XmlObject::with_visitor(
        "node",
        Recorder {
            loads: Rc::default(),
            accept: false,
        },
    ));

    let mut element = XmlElement::new("node");
    assert!(!arena.save(id, &mut element));
    assert_eq!(element.attribute("ok"), Some("1"));
}

#[test]
fn test_child_results_do_not_propagate() {
    let mut arena = ObjectArena::new();
    let parent = arena.insert(XmlObject::new("parent"));
    let child = arena.insert(XmlObject::with_visitor(
        "child",
        Recorder {
            loads: Rc::default(),
            accept: false,
        },
    ));
    arena.add_child(parent, child);

    let doc = parse_xml("<parent><child/></parent>").unwrap();
    assert!(arena.load(parent, doc.root()));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_load_file_rejects_wrong_root() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wrong.xml");
    fs::write(&path, "<other/>").unwrap();

    let mut arena = ObjectArena::new();
    let id = arena.insert(XmlObject::new("settings"));
    assert!(arena.load_file(id, path.to_str().unwrap()).is_err());

    let object = arena.get(id).unwrap();
    assert!(!object.is_document_loaded());
    assert_eq!(object.filename(), "");
}

#[test]
fn test_empty_filename_reuses_stored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("count.xml");
    let count = Rc::new(Cell::new(1u32));

    let mut object = XmlObject::new("counter");
    object.subscribe_element("", &count, false);
    let mut arena = ObjectArena::new();
    let id = arena.insert(object);

    assert!(arena.save_file(id, "").is_err());
    assert!(arena.load_file(id, "").is_err());

    arena.save_file(id, path.to_str().unwrap()).unwrap();
    assert_eq!(arena.get(id).unwrap().filename(), path.to_str().unwrap());

    count.set(2);
    arena.save_file(id, "").unwrap();
    count.set(0);
    arena.load_file(id, "").unwrap();
    assert_eq!(count.get(), 2);

    let object = arena.get(id).unwrap();
    assert_eq!(object.root_element().and_then(|e| e.text()), Some("2"));
}

#[test]
fn test_save_file_keeps_unbound_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keep.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0"?><config><!-- hand written --><note>hi</note><level>1</level></config>"#,
    )
    .unwrap();

    let level = Rc::new(Cell::new(0i32));
    let mut object = XmlObject::new("config");
    object.subscribe_element("level", &level, false);
    let mut arena = ObjectArena::new();
    let id = arena.insert(object);

    arena.load_file(id, path.to_str().unwrap()).unwrap();
    assert_eq!(level.get(), 1);
    level.set(9);
    arena.save_file(id, "").unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("<!-- hand written -->"));
    assert!(written.contains("<note>hi</note>"));
    assert!(written.contains("<level>9</level>"));
}

#[test]
fn test_close_releases_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("c.xml");
    fs::write(&path, "<c/>").unwrap();

    let mut arena = ObjectArena::new();
    let id = arena.insert(XmlObject::new("c"));
    arena.load_file(id, path.to_str().unwrap()).unwrap();
    assert!(arena.get(id).unwrap().is_document_loaded());

    arena.close(id);
    let object = arena.get(id).unwrap();
    assert!(!object.is_document_loaded());
    assert!(object.root_element().is_none());
}

#[test]
fn test_removed_child_is_skipped() {
    let a = Rc::new(Cell::new(0i32));
    let b = Rc::new(Cell::new(0i32));

    let mut arena = ObjectArena::new();
    let root = arena.insert(XmlObject::new("root"));
    let mut first = XmlObject::new("item");
    first.subscribe_element("", &a, false);
    let first = arena.insert(first);
    let mut second = XmlObject::new("item");
    second.subscribe_element("", &b, false);
    let second = arena.insert(second);
    arena.add_child(root, first);
    arena.add_child(root, second);

    assert!(arena.remove(first).is_some());

    let doc = parse_xml("<root><item>1</item><item>2</item></root>").unwrap();
    assert!(arena.load(root, doc.root()));
    // the surviving child is now the first item
    assert_eq!((a.get(), b.get()), (0, 1));
    assert_eq!(arena.get(root).unwrap().children(), &[second]);
}
