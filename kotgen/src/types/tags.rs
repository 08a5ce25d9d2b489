//! Side-channel metadata for type names.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

/// A type-keyed heterogeneous map for attaching arbitrary metadata to a
/// type name.
///
/// Tags are side-channel data: two type names that differ only in their
/// tags compare equal and hash identically, so tagging never disturbs
/// structural equality or rendering.
///
/// ```
/// use kotgen::ClassName;
/// use kotgen::types::Tags;
///
/// #[derive(Debug, PartialEq)]
/// struct SourceLine(u32);
///
/// let mut tags = Tags::new();
/// tags.insert(SourceLine(42));
/// let tagged = ClassName::new("com.example", ["Taco"]).with_tags(tags);
/// assert_eq!(tagged.tags().get::<SourceLine>(), Some(&SourceLine(42)));
/// assert_eq!(tagged, ClassName::new("com.example", ["Taco"]));
/// ```
#[derive(Clone, Default)]
pub struct Tags {
    entries: IndexMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under its own type, replacing any earlier value of
    /// the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Retrieves the value stored under type `T`, if any.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// Tags are excluded from equality and hashing by design: they carry
// side-channel data only.
impl PartialEq for Tags {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Tags {}

impl Hash for Tags {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tags").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_retrieves_by_type() {
        let mut tags = Tags::new();
        tags.insert(7u32);
        tags.insert("label");
        assert_eq!(tags.get::<u32>(), Some(&7));
        assert_eq!(tags.get::<&str>(), Some(&"label"));
        assert_eq!(tags.get::<i64>(), None);
    }

    #[test]
    fn tags_never_affect_equality() {
        let mut tagged = Tags::new();
        tagged.insert(1u8);
        assert_eq!(tagged, Tags::new());
    }
}
