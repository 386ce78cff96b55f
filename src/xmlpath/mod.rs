//! Element path parsing and resolution.
//!
//! A deliberately small addressing language, not XPath: a path is a list of
//! element names separated by `/`, each optionally followed by a numeric
//! token selecting among same-named siblings.
//!
//! # Supported Syntax
//!
//! - `name` - first child element called `name`
//! - `name/N` - the N-th (0-based) child element called `name`
//! - `a/b/c` - nested lookup, one level per name
//!
//! # Examples
//!
//! ```
//! // "window/size"          - <size> inside the first <window>
//! // "window/1/size"        - <size> inside the second <window>
//! // "track/2/note/4"       - fifth <note> of the third <track>
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod resolver;

pub use ast::{PathStep, XmlPath};
pub use error::XmlPathError;
pub use parser::{parse_path, Parser};
pub use resolver::{add_at_index, obtain, resolve, resolve_mut, MAX_NEW_SIBLINGS};
