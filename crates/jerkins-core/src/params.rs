//! Job parameters.
//!
//! A job's parameter names come from an external declaration. Values may be
//! left empty, which asks the resolver to derive them from the working copy.
//! Only a small, closed set of names is understood; everything else is passed
//! through untouched.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// A parameter name as understood by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
    /// Current branch of the working copy.
    Branch,
    /// Short commit id of the resolved branch.
    Tag,
    /// Any name the resolver does not derive values for.
    Other(String),
}

impl ParamKey {
    /// Classify a declared parameter name. Matching is case-insensitive.
    pub fn classify(name: &str) -> Self {
        if name.eq_ignore_ascii_case("branch") {
            ParamKey::Branch
        } else if name.eq_ignore_ascii_case("tag") {
            ParamKey::Tag
        } else {
            ParamKey::Other(name.to_string())
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> ParamKey {
        ParamKey::classify(&self.name)
    }

    /// An empty value means "resolve me".
    pub fn is_unset(&self) -> bool {
        self.value.is_empty()
    }
}

/// Parameters for a single build, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<Parameter>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing the value of an entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Parameter { name, value }),
        }
    }

    /// Look up a value by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Parameter> {
        self.entries.iter_mut()
    }

    /// Name/value pairs suitable for form encoding.
    pub fn as_pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for p in &self.entries {
            map.serialize_entry(&p.name, &p.value)?;
        }
        map.end()
    }
}
