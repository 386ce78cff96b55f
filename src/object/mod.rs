//! Declarative binding between objects and XML elements.
//!
//! An [`XmlObject`] subscribes caller variables to element text and
//! attributes by path. Objects are kept in an [`ObjectArena`], linked into
//! trees that mirror the document's element nesting, and loaded or saved in
//! one pass. A [`DocumentVisitor`] adds custom processing at the end of each
//! object's load or save.
//!
//! # Example
//!
//! ```no_run
//! use std::cell::{Cell, RefCell};
//! use std::rc::Rc;
//! use xmlbind::object::{ObjectArena, XmlObject};
//!
//! let title = Rc::new(RefCell::new(String::from("untitled")));
//! let volume = Rc::new(Cell::new(0.8f32));
//!
//! let mut settings = XmlObject::new("settings");
//! settings.subscribe_element("title", &title, false);
//! settings.subscribe_attribute("audio", "volume", &volume, false);
//!
//! let mut arena = ObjectArena::new();
//! let id = arena.insert(settings);
//! arena.save_file(id, "settings.xml").unwrap();
//!
//! volume.set(0.0);
//! arena.load_file(id, "").unwrap();
//! assert_eq!(volume.get(), 0.8);
//! ```

mod arena;
mod binding;
mod subscription;
mod visitor;

pub use arena::{ObjectArena, ObjectId};
pub use binding::XmlObject;
pub use visitor::DocumentVisitor;
