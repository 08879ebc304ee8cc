//! Error types for document loading, tree edits and selectors.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::NodeId;

/// Errors that can occur when loading documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Unsupported file type.
    #[error("unsupported file type: {path}")]
    UnsupportedFileType {
        /// Path to the unsupported file.
        path: PathBuf,
    },
}

/// A structure edit that would break the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Only elements can have children.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// The child is the parent or one of its ancestors.
    #[error("cannot insert {child} under {parent}: it would contain itself")]
    Cycle {
        /// Intended parent.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },

    /// A reference node is not a child of the given parent.
    #[error("node {node} is not a child of {parent}")]
    NotAChild {
        /// Expected parent.
        parent: NodeId,
        /// Offending node.
        node: NodeId,
    },

    /// The operation needs a parent but the node is detached.
    #[error("node {0} has no parent")]
    Detached(NodeId),
}

/// A selector string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector (or one entry of a list) is empty.
    #[error("empty selector")]
    Empty,

    /// A character that cannot start or continue a selector.
    #[error("unexpected '{ch}' at position {position} in selector")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset in the selector.
        position: usize,
    },

    /// A `#`, `.` or `[` not followed by a name.
    #[error("expected a name at position {position} in selector")]
    ExpectedName {
        /// Byte offset in the selector.
        position: usize,
    },

    /// A combinator with nothing after it.
    #[error("dangling combinator at position {position} in selector")]
    DanglingCombinator {
        /// Byte offset of the combinator.
        position: usize,
    },

    /// An attribute selector or quoted value that never closes.
    #[error("unterminated attribute selector starting at position {position}")]
    UnterminatedAttribute {
        /// Byte offset of the opening bracket.
        position: usize,
    },
}
