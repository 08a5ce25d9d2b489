//! Import table entries.

use std::cmp::Ordering;
use std::fmt;

use kotgen_core::escape::{escape_if_necessary, escape_segments_if_necessary};

/// One import line: a qualified name, optionally aliased.
///
/// Imports order by their rendered form, which puts `a.B as c` entries
/// in a stable place alongside plain `a.B` entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    qualified_name: String,
    alias: Option<String>,
}

impl Import {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            alias: None,
        }
    }

    pub fn aliased(qualified_name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape_segments_if_necessary(&self.qualified_name))?;
        if let Some(alias) = &self.alias {
            write!(f, " as {}", escape_if_necessary(alias))?;
        }
        Ok(())
    }
}

impl Ord for Import {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for Import {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
