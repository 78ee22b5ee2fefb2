use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use super::text::fold_case;

/// Key → value translation table with case-insensitive keys.
///
/// Entries keep the order in which they were read or inserted, so a file that
/// is loaded and saved without changes serializes identically. Lookups fold
/// the key with [`fold_case`]; the stored key keeps its original spelling.
#[derive(Debug, Clone, Default)]
pub struct TextDictionary {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TextDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&fold_case(key))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(&fold_case(key))
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Look up `key`, falling back to a visible `*key*` sentinel.
    ///
    /// A missing key is not an error: a warning is logged and the sentinel is
    /// returned so the gap shows up in the UI instead of aborting.
    pub fn lookup<'a>(&'a self, key: &str) -> Cow<'a, str> {
        match self.get(key) {
            Some(value) => Cow::Borrowed(value),
            None => {
                warn!(key, "no localization text found");
                Cow::Owned(missing_sentinel(key))
            }
        }
    }

    /// Insert or replace a value. Replacing keeps the stored key spelling and
    /// position; returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        let folded = fold_case(&key);
        match self.index.get(&folded) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(folded, self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let i = self.index.remove(&fold_case(key))?;
        let (_, value) = self.entries.remove(i);
        self.reindex();
        Some(value)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        let before = self.entries.len();
        self.entries.retain(|(k, v)| keep(k.as_str(), v.as_str()));
        if self.entries.len() != before {
            self.reindex();
        }
    }

    pub(crate) fn contains_folded(&self, folded: &str) -> bool {
        self.index.contains_key(folded)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (fold_case(k), i))
            .collect();
    }
}

/// The value shown for a key that has no translation.
pub fn missing_sentinel(key: &str) -> String {
    format!("*{}*", key)
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = TextDictionary::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

/// Equality ignores entry order and key case, matching lookup semantics.
impl PartialEq for TextDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for TextDictionary {}

impl Serialize for TextDictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TextDictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DictionaryVisitor)
    }
}

struct DictionaryVisitor;

impl<'de> Visitor<'de> for DictionaryVisitor {
    type Value = TextDictionary;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping text keys to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut dict = TextDictionary::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            // Later duplicates win, like re-assigning the key by hand would.
            if dict.insert(key.as_str(), value).is_some() {
                warn!(key = %key, "duplicate text key (ignoring case), keeping last value");
            }
        }
        Ok(dict)
    }
}
