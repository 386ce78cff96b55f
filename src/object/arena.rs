//! Object storage and document traversal.
//!
//! Objects are stored in a slot arena and referred to by [`ObjectId`]
//! handles. A handle carries the generation of the slot it was issued for,
//! so a handle to a removed object never aliases whatever reuses the slot;
//! it simply stops resolving. Parents hold child handles, and traversal
//! prunes handles that no longer resolve.
//!
//! Load and save walk an object tree depth first. Each object handles its
//! own subscriptions, then its children, then its hook. A child with an
//! element name binds to the `n`-th same-named child element of its
//! parent's element, where `n` counts earlier siblings with that name; a
//! child without one, or with the parent element's own name, shares the
//! parent's element.

use super::binding::XmlObject;
use crate::config::Config;
use crate::document::node::XmlElement;
use crate::file::{load_xml_file, save_xml_file};
use crate::xmlpath::{self, PathStep, XmlPath};
use anyhow::{anyhow, bail, Context, Result};
use std::collections::{HashMap, HashSet};

/// Handle to an object stored in an [`ObjectArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

struct Entry {
    generation: u32,
    object: Option<XmlObject>,
}

/// Owns bound objects and runs load and save over object trees.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use xmlbind::document::parse_xml;
/// use xmlbind::object::{ObjectArena, XmlObject};
///
/// let width = Rc::new(Cell::new(0u32));
/// let mut window = XmlObject::new("window");
/// window.subscribe_attribute("", "width", &width, false);
///
/// let mut arena = ObjectArena::new();
/// let root = arena.insert(XmlObject::new("settings"));
/// let child = arena.insert(window);
/// assert!(arena.add_child(root, child));
///
/// let doc = parse_xml(r#"<settings><window width="640"/></settings>"#).unwrap();
/// assert!(arena.load(root, doc.root()));
/// assert_eq!(width.get(), 640);
/// ```
pub struct ObjectArena {
    entries: Vec<Entry>,
    free: Vec<u32>,
    config: Config,
}

impl Default for ObjectArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an arena whose file saves follow `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.object.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------------
    // Storage
    // ------------------------------------------------------------------------

    pub fn insert(&mut self, object: XmlObject) -> ObjectId {
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.object = Some(object);
            return ObjectId {
                index,
                generation: entry.generation,
            };
        }

        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            object: Some(object),
        });
        ObjectId {
            index,
            generation: 0,
        }
    }

    /// Removes an object, invalidating every handle to it.
    ///
    /// Parents still listing the handle drop it the next time they are
    /// loaded or saved.
    pub fn remove(&mut self, id: ObjectId) -> Option<XmlObject> {
        let entry = self.entry_mut(id)?;
        let object = entry.object.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(object)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&XmlObject> {
        self.entries
            .get(id.index as usize)
            .filter(|e| e.generation == id.generation)
            .and_then(|e| e.object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut XmlObject> {
        self.entry_mut(id).and_then(|e| e.object.as_mut())
    }

    fn entry_mut(&mut self, id: ObjectId) -> Option<&mut Entry> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|e| e.generation == id.generation)
    }

    // ------------------------------------------------------------------------
    // Object tree
    // ------------------------------------------------------------------------

    /// Appends `child` to `parent`'s children.
    ///
    /// Fails if either handle is stale, if `child` is already a child of
    /// `parent`, or if the link would make an object its own descendant.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> bool {
        if !self.contains(child) {
            tracing::warn!("xml: cannot add child, object handle is stale");
            return false;
        }
        if parent == child || self.reaches(child, parent) {
            tracing::warn!("xml: cannot add child, the link would form a cycle");
            return false;
        }
        let Some(object) = self.get_mut(parent) else {
            tracing::warn!("xml: cannot add child, parent handle is stale");
            return false;
        };
        if object.children.contains(&child) {
            tracing::warn!(
                "xml \"{}\": cannot add child, already attached",
                object.element_name()
            );
            return false;
        }
        object.children.push(child);
        true
    }

    /// Detaches `child` from `parent`. The child object itself is kept.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> bool {
        let Some(object) = self.get_mut(parent) else {
            return false;
        };
        match object.children.iter().position(|&c| c == child) {
            Some(position) => {
                object.children.remove(position);
                true
            }
            None => false,
        }
    }

    /// True if `target` is `from` or one of its descendants.
    fn reaches(&self, from: ObjectId, target: ObjectId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(object) = self.get(id) {
                stack.extend(object.children.iter().copied());
            }
        }
        false
    }

    /// Resolves a child handle to its element name, collecting stale ones.
    fn child_name(&self, child: ObjectId, stale: &mut Vec<ObjectId>) -> Option<String> {
        match self.get(child) {
            Some(object) => Some(object.element_name().to_string()),
            None => {
                stale.push(child);
                None
            }
        }
    }

    fn prune_children(&mut self, id: ObjectId, stale: &[ObjectId], during: &str) {
        if stale.is_empty() {
            return;
        }
        if let Some(object) = self.get_mut(id) {
            object.children.retain(|c| !stale.contains(c));
            tracing::warn!(
                "xml \"{}\" {}: removed {} stale xml object(s)",
                object.element_name(),
                during,
                stale.len()
            );
        }
    }

    // ------------------------------------------------------------------------
    // Load
    // ------------------------------------------------------------------------

    /// Loads an object tree from `element`.
    ///
    /// Fails without touching any variable when the object has an element
    /// name that differs from the element's. Otherwise the result is the
    /// object's `on_load` hook result, `true` without a hook; child results
    /// do not propagate.
    pub fn load(&mut self, id: ObjectId, element: &XmlElement) -> bool {
        let Some(object) = self.get(id) else {
            tracing::warn!("xml: cannot load, object handle is stale");
            return false;
        };
        let name = object.element_name();
        if !name.is_empty() && name != element.name() {
            tracing::warn!(
                "xml \"{}\": wrong xml element name \"{}\" for object with element name \"{}\"",
                name,
                element.name(),
                name
            );
            return false;
        }

        tracing::debug!(object = name, "xml: loading");
        for subscription in &object.elements {
            subscription.load(element);
        }

        let children = object.children.clone();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut stale = Vec::new();
        for child in children {
            let Some(child_name) = self.child_name(child, &mut stale) else {
                continue;
            };
            if child_name.is_empty() || child_name == element.name() {
                self.load(child, element);
                continue;
            }

            let index = next_sibling_index(&mut counts, &child_name);
            match element.child_element(&child_name, index) {
                Some(child_element) => {
                    self.load(child, child_element);
                }
                None => {
                    tracing::warn!("xml: element not found for \"{}\" object", child_name);
                }
            }
        }
        self.prune_children(id, &stale, "load");

        match self.get_mut(id).and_then(|o| o.visitor.as_mut()) {
            Some(visitor) => visitor.on_load(element),
            None => true,
        }
    }

    /// Opens `filename` as the object's document and loads it.
    ///
    /// An empty `filename` reuses the object's stored filename. Any open
    /// document is closed first. On success the document stays open on the
    /// object and the filename is remembered; the returned flag is the
    /// result of [`load`](Self::load) on the root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale, no filename is known, the
    /// file cannot be read or parsed, or its root element does not match the
    /// object's element name.
    pub fn load_file(&mut self, id: ObjectId, filename: &str) -> Result<bool> {
        let object = self
            .get_mut(id)
            .ok_or_else(|| anyhow!("cannot load, object handle is stale"))?;
        object.close();

        let filename = if filename.is_empty() {
            object.filename().to_string()
        } else {
            filename.to_string()
        };
        if filename.is_empty() {
            bail!("xml \"{}\": no filename to load from", object.element_name());
        }

        let document = load_xml_file(&filename).with_context(|| {
            format!("xml \"{}\": could not load \"{}\"", object.element_name(), filename)
        })?;
        let name = object.element_name();
        if !name.is_empty() && document.root().name() != name {
            bail!(
                "xml \"{}\": xml file \"{}\" does not have \"{}\" as the root element",
                name,
                filename,
                name
            );
        }
        object.set_filename(filename);

        let loaded = self.load(id, document.root());
        if let Some(object) = self.get_mut(id) {
            object.document = Some(document);
        }
        Ok(loaded)
    }

    // ------------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------------

    /// Saves an object tree into `element`, creating elements as needed.
    ///
    /// Mirrors [`load`](Self::load): the same element name check, sibling
    /// counting and hook rules apply. Read-only bindings are not written.
    pub fn save(&mut self, id: ObjectId, element: &mut XmlElement) -> bool {
        let Some(object) = self.get(id) else {
            tracing::warn!("xml: cannot save, object handle is stale");
            return false;
        };
        let name = object.element_name();
        if !name.is_empty() && name != element.name() {
            tracing::warn!(
                "xml \"{}\": xml element name \"{}\" is not \"{}\"",
                name,
                element.name(),
                name
            );
            return false;
        }

        tracing::debug!(object = name, "xml: saving");
        for subscription in &object.elements {
            subscription.save(element);
        }

        let children = object.children.clone();
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut stale = Vec::new();
        for child in children {
            let Some(child_name) = self.child_name(child, &mut stale) else {
                continue;
            };
            if child_name.is_empty() || child_name == element.name() {
                self.save(child, element);
                continue;
            }

            let index = next_sibling_index(&mut counts, &child_name);
            let path = XmlPath::new(vec![PathStep::new(child_name, 0)]);
            let Some(child_element) = xmlpath::obtain(element, &path, index) else {
                tracing::warn!("xml: cannot create child element \"{}\", skipping", path);
                continue;
            };
            self.save(child, child_element);
        }
        self.prune_children(id, &stale, "save");

        match self.get_mut(id).and_then(|o| o.visitor.as_mut()) {
            Some(visitor) => visitor.on_save(element),
            None => true,
        }
    }

    /// Saves the object tree into the object's document and writes it to
    /// `filename`.
    ///
    /// An empty `filename` reuses the stored one. Without an open document a
    /// new one is created, rooted at the object's element name. After a
    /// successful write the document stays open and the filename is
    /// remembered. The returned flag is the result of [`save`](Self::save)
    /// on the root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale, no filename is known, a
    /// document cannot be created, or the file cannot be written.
    pub fn save_file(&mut self, id: ObjectId, filename: &str) -> Result<bool> {
        let declaration = self.config.write_declaration;
        let object = self
            .get_mut(id)
            .ok_or_else(|| anyhow!("cannot save, object handle is stale"))?;

        let filename = if filename.is_empty() {
            object.filename().to_string()
        } else {
            filename.to_string()
        };
        if filename.is_empty() {
            bail!("xml \"{}\": no filename to save to", object.element_name());
        }
        if !object.init_document(declaration) {
            bail!("xml: cannot save an object without an element name and no open document");
        }
        let Some(mut document) = object.document.take() else {
            bail!("xml \"{}\": no document to save", object.element_name());
        };

        let saved = self.save(id, document.root_mut());
        let written = save_xml_file(&filename, &document, &self.config);

        let object = self
            .get_mut(id)
            .ok_or_else(|| anyhow!("cannot save, object handle is stale"))?;
        object.document = Some(document);
        written.with_context(|| {
            format!("xml \"{}\": could not save to \"{}\"", object.element_name(), filename)
        })?;
        object.set_filename(filename);
        Ok(saved)
    }

    /// Releases the object's document. Subscriptions and children are kept.
    pub fn close(&mut self, id: ObjectId) {
        if let Some(object) = self.get_mut(id) {
            object.close();
        }
    }
}

/// Returns the next index for a child named `name` and advances the count.
fn next_sibling_index(counts: &mut HashMap<String, usize>, name: &str) -> usize {
    let count = counts.entry(name.to_string()).or_insert(0);
    let index = *count;
    *count += 1;
    index
}
