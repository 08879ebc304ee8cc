//! Literal-term highlighting for tinct.
//!
//! The pieces, leaf first:
//! - [`Matcher`] splits a text run into plain and highlighted [`Fragment`]s
//! - [`Applicator`] splices fragments into a [`HostTree`] and keeps watching for insertions
//! - [`Highlighter`] is the entry point: [`create_highlighter`], then `highlight`,
//!   `update_options` and `destroy`
//! - [`terminal`] renders fragments and source text for a terminal

#![warn(missing_docs)]

mod applicator;
mod highlighter;
mod host;
mod matcher;
mod search;
pub mod terminal;

pub use applicator::{Applicator, ApplyReport};
pub use highlighter::{
    Highlighter, HighlighterOptions, MARKER_VALUE, Target, create_highlighter, resolve_target,
};
pub use host::{BACKGROUND_PROPERTY, HostTree, WRAPPER_TAG};
pub use matcher::{Fragment, Match, Matcher, match_fragments};
pub use search::{SearchSpec, SearchSpecPatch};
