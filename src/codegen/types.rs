//! Primitive type tables
//!
//! Map the notation's short type keywords to the spelling of each target.

use std::collections::HashMap;

use crate::errors::{CompileError, CompileResult};

/// Type keyword to target spelling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    entries: HashMap<String, String>,
}

impl TypeTable {
    /// French pseudocode spellings
    pub fn algorithmic() -> Self {
        Self::from_iter([
            ("int", "Entier"),
            ("float", "Réel"),
            ("string", "Chaîne de caractères"),
            ("bool", "Booléen"),
            ("char", "Caractère"),
        ])
    }

    /// C++ spellings
    pub fn cpp() -> Self {
        Self::from_iter([
            ("int", "int"),
            ("float", "float"),
            ("string", "std::string"),
            ("bool", "bool"),
            ("char", "char"),
        ])
    }

    pub fn insert(&mut self, keyword: impl Into<String>, spelling: impl Into<String>) {
        self.entries.insert(keyword.into(), spelling.into());
    }

    /// Overlay `other` on this table
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, String)>) {
        self.entries.extend(other);
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries.get(keyword).map(String::as_str)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    /// Look up a keyword, failing with a type error naming `line`
    pub fn resolve(&self, keyword: &str, line: usize) -> CompileResult<&str> {
        self.get(keyword)
            .ok_or_else(|| CompileError::type_error(keyword, line))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TypeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
