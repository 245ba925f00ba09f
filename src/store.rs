//! Placeholder lookup
//!
//! The engine never compares identifier text. It hashes the identifier one
//! byte at a time while scanning and asks the store about the resulting
//! [`PlaceholderKey`].

use std::collections::{BTreeMap, HashMap};
use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::Deserialize;
use thiserror::Error;

use crate::config::MAX_PLACEHOLDER_LENGTH;

/// Lookup key derived from a placeholder identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderKey(u32);

impl PlaceholderKey {
    /// Hash a whole identifier
    pub fn of(identifier: &str) -> Self {
        let mut hasher = KeyHasher::new();
        for byte in identifier.bytes() {
            hasher.push(byte);
        }
        hasher.finish()
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Incremental identifier hash, fed one character at a time while scanning
#[derive(Clone, Default)]
pub struct KeyHasher {
    inner: FxHasher,
}

impl KeyHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the next identifier character into the hash
    pub fn push(&mut self, byte: u8) {
        self.inner.write_u8(byte);
    }

    pub fn finish(self) -> PlaceholderKey {
        let hash = self.inner.finish();
        PlaceholderKey((hash ^ (hash >> 32)) as u32)
    }
}

/// Source of placeholder values
///
/// Values are borrowed for as long as the store is, so an expansion can hold
/// on to them while it scans.
pub trait PlaceholderStore {
    fn exists(&self, key: PlaceholderKey) -> bool;

    fn value_for(&self, key: PlaceholderKey) -> Option<&str>;
}

impl<T: PlaceholderStore + ?Sized> PlaceholderStore for &T {
    fn exists(&self, key: PlaceholderKey) -> bool {
        (**self).exists(key)
    }

    fn value_for(&self, key: PlaceholderKey) -> Option<&str> {
        (**self).value_for(key)
    }
}

/// Errors raised while building a [`PlaceholderTable`]
#[derive(Error, Debug)]
pub enum TableError {
    #[error("'{name}' is not a valid placeholder identifier")]
    InvalidIdentifier { name: String },

    #[error("placeholder '{name}' hashes to the same key as '{existing}'")]
    KeyCollision { name: String, existing: String },

    #[error("failed to parse placeholder TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Top-level shape of a placeholder TOML document
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct PlaceholderFile(BTreeMap<String, String>);

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    value: String,
}

/// In-memory placeholder store keyed by identifier hash
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTable {
    entries: HashMap<PlaceholderKey, Entry>,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, value)` pairs
    pub fn from_pairs<I, N, V>(pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (name, value) in pairs {
            table.insert(name, value)?;
        }
        Ok(table)
    }

    /// Load a table from a flat TOML document of string values
    ///
    /// ```toml
    /// greeting = "Hello, @@name@@!"
    /// name = "World"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, TableError> {
        let file: PlaceholderFile = toml::from_str(content)?;
        Self::from_pairs(file.0)
    }

    /// Define or redefine a placeholder.
    ///
    /// Returns the previous value when `name` was already defined. Fails if
    /// `name` is not an identifier the engine can recognise, or if it hashes
    /// to the key of a different name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, TableError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(TableError::InvalidIdentifier { name });
        }

        let key = PlaceholderKey::of(&name);
        if let Some(existing) = self.entries.get(&key) {
            if existing.name != name {
                return Err(TableError::KeyCollision {
                    name,
                    existing: existing.name.clone(),
                });
            }
        }

        let previous = self.entries.insert(
            key,
            Entry {
                name,
                value: value.into(),
            },
        );
        Ok(previous.map(|entry| entry.value))
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let key = PlaceholderKey::of(name);
        match self.entries.get(&key) {
            Some(entry) if entry.name == name => self.entries.remove(&key).map(|e| e.value),
            _ => None,
        }
    }

    /// Look up a value by identifier text
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&PlaceholderKey::of(name))
            .filter(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlaceholderStore for PlaceholderTable {
    fn exists(&self, key: PlaceholderKey) -> bool {
        self.entries.contains_key(&key)
    }

    fn value_for(&self, key: PlaceholderKey) -> Option<&str> {
        self.entries.get(&key).map(|entry| entry.value.as_str())
    }
}

/// `letter ( letter | digit | '_' )*`, at most [`MAX_PLACEHOLDER_LENGTH`] long
pub fn is_identifier(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.len() <= MAX_PLACEHOLDER_LENGTH
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}
