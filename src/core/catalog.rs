use std::collections::HashMap;

use super::entry::Entry;
use super::text::fold_case;
use crate::error::{ExtractError, ExtractResult};

/// Loaded entries addressable by title (ignoring case).
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<Entry>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Load every entry and index it by title.
    pub fn load(entries: Vec<Entry>) -> ExtractResult<Self> {
        if entries.is_empty() {
            return Err(ExtractError::NoEntriesConfigured);
        }

        let mut by_title = HashMap::with_capacity(entries.len());
        let mut loaded = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if by_title
                .insert(fold_case(entry.title()), loaded.len())
                .is_some()
            {
                return Err(ExtractError::DuplicateEntry(entry.title().to_string()));
            }
            entry.load()?;
            loaded.push(entry);
        }

        Ok(Self {
            entries: loaded,
            by_title,
        })
    }

    pub fn select(&self, title: &str) -> ExtractResult<&Entry> {
        self.by_title
            .get(&fold_case(title))
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ExtractError::UnknownEntry(title.to_string()))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Entry::title)
    }
}
