//! tinct: literal-term highlighting for documents.
//!
//! tinct loads markdown or plain-text files into a small element tree, wraps every
//! occurrence of a configured set of literal terms in a colored `span`, and keeps doing so
//! as content is appended under a highlighted element. The command-line interface renders
//! the result as HTML or reports which text would be highlighted.

#![warn(missing_docs)]

pub mod cli;
