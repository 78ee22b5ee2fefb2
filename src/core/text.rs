//! Case-insensitive text keys.
//!
//! Two strings that differ only in letter case are the same key. Keys are
//! normalized with [`fold_case`] before they are hashed or compared, which maps
//! every character through its simple uppercase form. The spelling that was
//! inserted first is the one that is kept and reported.

use std::collections::BTreeMap;

/// Fold `text` to its canonical case for hashing and comparison.
///
/// ```
/// use loctext::core::fold_case;
///
/// assert_eq!(fold_case("Hello"), fold_case("HELLO"));
/// assert_ne!(fold_case("Hello"), fold_case("Hallo"));
/// assert_ne!(fold_case("Maße"), fold_case("Masse"));
/// ```
pub fn fold_case(text: &str) -> String {
    text.chars().map(simple_uppercase).collect()
}

/// Uppercase of `c` when it is a single character, `c` itself otherwise.
///
/// Multi-character expansions such as `ß` to `SS` would equate strings that
/// differ by more than letter case.
fn simple_uppercase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Case-insensitive set of discovered strings.
///
/// Built fresh for every extraction pass. Iteration is ordered by the folded
/// key so that newly inserted dictionary keys land in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySet {
    items: BTreeMap<String, String>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `text`, returning false if an equal key (ignoring case) exists.
    pub fn insert(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        let folded = fold_case(&text);
        if self.items.contains_key(&folded) {
            return false;
        }
        self.items.insert(folded, text);
        true
    }

    pub fn contains(&self, text: &str) -> bool {
        self.items.contains_key(&fold_case(text))
    }

    pub(crate) fn contains_folded(&self, folded: &str) -> bool {
        self.items.contains_key(folded)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate the kept spellings.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.values().map(String::as_str)
    }

    pub(crate) fn iter_folded(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Union `other` into this set. Returns how many keys were new.
    pub fn union_with(&mut self, other: DiscoverySet) -> usize {
        let mut added = 0;
        for (folded, text) in other.items {
            if !self.items.contains_key(&folded) {
                self.items.insert(folded, text);
                added += 1;
            }
        }
        added
    }
}

impl<S: Into<String>> Extend<S> for DiscoverySet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for text in iter {
            self.insert(text);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for DiscoverySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = DiscoverySet::new();
        set.extend(iter);
        set
    }
}
