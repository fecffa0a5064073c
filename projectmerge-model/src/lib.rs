//! Project document model for projectmerge.
//!
//! Defines the types every other crate in the workspace works on:
//! - [`Project`]: the top-level document (settings, style dictionaries, components)
//! - [`Component`] / [`Graph`]: an id-stable subtree with its node roots and connections
//! - [`Node`], [`Port`], [`Connection`]: the typed elements of a component graph
//! - [`Conflict`]: a structured annotation attached by the three-way merger
//! - [`EntityKey`] / [`IdentityMap`]: matching entities across document versions
//! - [`TypeCatalog`]: lookup seam deciding which parameters hold source code
//!
//! All types deserialize from (and serialize back to) the persisted project
//! JSON. Fields the model does not name are kept in an `extra` map so that
//! unmerged subtrees survive a round trip unchanged.

mod catalog;
mod component;
mod conflict;
mod error;
mod identity;
mod node;
mod project;

pub use catalog::{ParameterKind, SourceCodeParameter, StaticTypeCatalog, TypeCatalog};
pub use component::{Component, Graph};
pub use conflict::{Conflict, ConflictKind, ConflictLocation};
pub use error::{Error, Result};
pub use identity::{resolve, resolve_map, EntityKey, Identified, IdentityMap, Side, Triplet};
pub use node::{Connection, Node, Plug, Port};
pub use project::{Metadata, Project, Styles};

/// JSON object type used for parameters, settings and unknown fields.
pub type Map = serde_json::Map<String, serde_json::Value>;
