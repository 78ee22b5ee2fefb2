use super::dictionary::TextDictionary;
use super::text::{DiscoverySet, fold_case};

/// What a reconciliation pass changed in one dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Keys inserted with their own text as placeholder value.
    pub added: usize,
    /// Keys kept with their value untouched.
    pub retained: usize,
    /// Keys removed because nothing references them anymore.
    pub pruned: usize,
}

impl ReconcileSummary {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.pruned > 0
    }
}

/// Bring `dict` in line with `discovery`, ignoring case on both sides.
///
/// Afterwards the key set of `dict` equals `discovery`. Values of keys that
/// were already present are left byte-for-byte untouched; new keys get their
/// own text as value, to be replaced by a translator later.
pub fn reconcile(dict: &mut TextDictionary, discovery: &DiscoverySet) -> ReconcileSummary {
    let before = dict.len();
    dict.retain(|key, _| discovery.contains_folded(&fold_case(key)));
    let retained = dict.len();

    let mut added = 0;
    for (folded, text) in discovery.iter_folded() {
        if !dict.contains_folded(folded) {
            dict.insert(text, text);
            added += 1;
        }
    }

    ReconcileSummary {
        added,
        retained,
        pruned: before - retained,
    }
}
