//! tracepin-ast: from host document text to a position-exact syntax tree
//!
//! The crate owns the first three pipeline stages:
//! - [`extract`] finds the script region of container formats (Vue, Svelte,
//!   Astro, HTML) and reports how to map its positions back to the host.
//! - [`builder`] parses the region with swc, lowers the result into the
//!   generic [`SourceNode`] tree and remaps every position into host
//!   coordinates.
//! - [`walker`] traverses that tree.

pub mod builder;
pub mod error;
pub mod extract;
pub mod lines;
mod lower;
pub mod node;
pub mod normalize;
pub mod walker;

pub use builder::{build_ast, parse_document, parse_script, ParsedDocument};
pub use error::{AstError, AstResult};
pub use extract::{extract_script, ExtractionResult};
pub use lines::LineIndex;
pub use node::{Field, NodeId, NodeKind, Position, SourceLocation, SourceNode};
pub use walker::{collect, find_first, walk, walk_mut};
