//! Source texts visited during one expansion

use std::collections::HashMap;

use crate::store::PlaceholderKey;

/// Handle to a source text held by a [`SourceArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

/// Borrowed template and placeholder texts, each stored once.
///
/// Context frames refer to sources by [`SourceId`]. The texts are borrowed
/// for the whole expansion, so a handle can never dangle.
#[derive(Debug)]
pub struct SourceArena<'a> {
    sources: Vec<&'a str>,
    by_key: HashMap<PlaceholderKey, SourceId>,
}

impl<'a> SourceArena<'a> {
    /// The top-level template is always registered first
    pub const ROOT: SourceId = SourceId(0);

    pub fn new(template: &'a str) -> Self {
        Self {
            sources: vec![template],
            by_key: HashMap::new(),
        }
    }

    /// Register the value of placeholder `key`, reusing an earlier handle
    pub fn intern(&mut self, key: PlaceholderKey, text: &'a str) -> SourceId {
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = SourceId(self.sources.len());
        self.sources.push(text);
        self.by_key.insert(key, id);
        id
    }

    pub fn get(&self, id: SourceId) -> &'a str {
        self.sources[id.0]
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_the_template() {
        let arena = SourceArena::new("top");
        assert_eq!(arena.get(SourceArena::ROOT), "top");
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_values_are_interned_once_per_key() {
        let mut arena = SourceArena::new("top");
        let a = arena.intern(PlaceholderKey::of("a"), "value a");
        let b = arena.intern(PlaceholderKey::of("b"), "value b");
        let again = arena.intern(PlaceholderKey::of("a"), "value a");

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(arena.get(b), "value b");
        assert_eq!(arena.len(), 3);
    }
}
