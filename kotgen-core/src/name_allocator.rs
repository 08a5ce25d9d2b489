//! Collision-free identifier allocation.

use std::collections::{HashMap, HashSet};

use miette::Diagnostic;
use thiserror::Error;

use crate::escape::{is_identifier_part, is_identifier_start};
use crate::keywords::KEYWORDS;

/// Raised when a tag is bound to a second name. The allocator is left
/// unmodified, so a caller that handles the error can keep using it.
#[derive(Debug, Error, Diagnostic)]
pub enum AllocationError {
    #[error("tag '{tag}' cannot be used for both '{existing}' and '{requested}'")]
    #[diagnostic(
        code(kotgen::tag_reuse),
        help("allocate one name per tag; look up the earlier name with get()")
    )]
    TagReuse {
        tag: String,
        existing: String,
        requested: String,
    },
}

/// Assigns Kotlin identifier names while avoiding collisions, keywords,
/// and invalid characters.
///
/// Allocate all the names you need up front, typically a mix of
/// user-supplied names and constants, then look them up by tag while
/// generating code:
///
/// ```
/// use kotgen_core::NameAllocator;
///
/// let mut allocator = NameAllocator::new();
/// let sb = allocator.new_name_tagged("sb", "string builder").unwrap();
/// let ab = allocator.new_name("ab");
/// assert_eq!(sb, "sb");
/// assert_eq!(ab, "ab");
/// assert_eq!(allocator.get("string builder"), "sb");
/// ```
///
/// A suggestion that collides with an earlier allocation (or, by default,
/// with a Kotlin keyword) is suffixed with underscores until it is
/// unique. Underscores also replace name-unsafe characters like space or
/// dash, and are prefixed to names that start with a digit.
///
/// For independent inner scopes, [`clone`](Clone::clone) the allocator
/// used for the outer scope and refine the copy; allocations in the copy
/// never pollute the parent.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    allocated_names: HashSet<String>,
    tag_to_name: HashMap<String, String>,
    next_auto_tag: u64,
}

impl NameAllocator {
    /// Creates an allocator with every Kotlin keyword preallocated, so
    /// suggestions matching a keyword are suffixed:
    ///
    /// ```
    /// use kotgen_core::NameAllocator;
    ///
    /// assert_eq!(NameAllocator::new().new_name("when"), "when_");
    /// ```
    pub fn new() -> Self {
        Self {
            allocated_names: KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            tag_to_name: HashMap::new(),
            next_auto_tag: 0,
        }
    }

    /// Creates an allocator that gives keywords no special treatment.
    ///
    /// Names produced this way must be emitted through `%N` so they are
    /// escaped when they do land on a keyword.
    pub fn without_keywords() -> Self {
        Self {
            allocated_names: HashSet::new(),
            tag_to_name: HashMap::new(),
            next_auto_tag: 0,
        }
    }

    /// Allocates a new name from `suggestion` under a fresh internal tag.
    pub fn new_name(&mut self, suggestion: &str) -> String {
        let tag = loop {
            let candidate = format!("__auto_{}", self.next_auto_tag);
            self.next_auto_tag += 1;
            if !self.tag_to_name.contains_key(&candidate) {
                break candidate;
            }
        };
        self.new_name_tagged(suggestion, tag)
            .expect("fresh tag cannot collide")
    }

    /// Allocates a new name from `suggestion`, bound to `tag` so it can
    /// be retrieved later with [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::TagReuse`] if `tag` is already bound,
    /// leaving the allocator untouched.
    pub fn new_name_tagged(
        &mut self,
        suggestion: &str,
        tag: impl Into<String>,
    ) -> Result<String, AllocationError> {
        let tag = tag.into();
        let mut result = to_identifier(suggestion);
        while self.allocated_names.contains(&result) {
            result.push('_');
        }

        if let Some(existing) = self.tag_to_name.get(&tag) {
            return Err(AllocationError::TagReuse {
                tag,
                existing: existing.clone(),
                requested: result,
            });
        }

        self.allocated_names.insert(result.clone());
        self.tag_to_name.insert(tag, result.clone());
        Ok(result)
    }

    /// Retrieves a name allocated with [`new_name_tagged`](Self::new_name_tagged).
    ///
    /// # Panics
    ///
    /// Panics if `tag` was never bound.
    pub fn get(&self, tag: &str) -> &str {
        self.tag_to_name
            .get(tag)
            .unwrap_or_else(|| panic!("unknown tag: {tag}"))
    }

    /// Whether `tag` has a name bound to it.
    pub fn contains(&self, tag: &str) -> bool {
        self.tag_to_name.contains_key(tag)
    }
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_identifier(suggestion: &str) -> String {
    let mut result = String::with_capacity(suggestion.len());
    for (i, c) in suggestion.chars().enumerate() {
        if i == 0 && !is_identifier_start(c) && is_identifier_part(c) {
            result.push('_');
        }
        result.push(if is_identifier_part(c) { c } else { '_' });
    }
    result
}
