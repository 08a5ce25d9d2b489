//! The emission engine.
//!
//! - [`CodeBlock`] - Format-string IR: a token stream of text and
//!   placeholders plus a positional argument list
//! - [`CodeWriter`] - Interprets code blocks, resolving type and member
//!   references against lexical scope and import tables
//! - [`LineWrapper`] - Column-aware soft line wrapping over any sink
//! - [`Import`] - One entry of a file's import table

mod block;
mod import;
mod line_wrapper;
mod writer;

pub use block::{Arg, CodeBlock, CodeBlockBuilder};
pub use import::Import;
pub use line_wrapper::LineWrapper;
pub(crate) use line_wrapper::Sink;
pub use writer::{CodeWriter, DEFAULT_COLUMN_LIMIT, DEFAULT_INDENT, TypeScope};
