//! Document trees for tinct.
//!
//! This crate provides the mutable tree that highlighting operates on:
//! - An arena-backed [`Document`] of element and text nodes with DOM-style edits
//! - Mutation observers that queue child-list changes per subtree
//! - A small CSS selector engine for `query_selector`
//! - Loading from markdown (via pulldown-cmark) and plain text
//! - HTML serialization

#![warn(missing_docs)]

mod build;
mod error;
mod node;
mod observe;
mod parse;
mod render;
mod selector;
mod slug;
mod tree;

pub use build::append_markdown;
pub use error::{DocumentError, SelectorError, TreeError};
pub use node::{ElementData, NodeData, NodeId, NodeKind};
pub use observe::{MutationRecord, ObserverId};
pub use parse::{parse_file, parse_markdown, parse_text};
pub use render::{inner_html, to_html};
pub use selector::SelectorList;
pub use slug::Slugifier;
pub use tree::{Ancestors, Descendants, Document, ROOT_TAG};
