//! Error type for rendering failures.
//!
//! Only genuinely fallible operations surface here: pushing text into a
//! caller-provided sink and writing files to disk. Structural misuse of
//! the model (a wildcard with no producer bound, an unbalanced statement
//! marker, an argument that doesn't match its placeholder) is a bug in
//! the calling code and panics with a descriptive message instead.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type for kotgen operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to write generated code to the output sink")]
    #[diagnostic(code(kotgen::write))]
    Write(#[from] std::fmt::Error),

    #[error("failed to write '{path}'")]
    #[diagnostic(
        code(kotgen::io),
        help("check that the target directory exists and is writable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
