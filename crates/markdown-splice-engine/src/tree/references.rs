use std::collections::BTreeMap;

use serde::Serialize;

/// Target of a link reference definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub url: String,
    pub title: Option<String>,
}

/// Document-wide map from normalized label to reference.
///
/// Read-only outside the crate; the parser fills it and the rewrite engine
/// keeps it in step with the reference-definition blocks in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceMap {
    entries: BTreeMap<String, Reference>,
}

impl ReferenceMap {
    /// Looks up a label, normalizing it first.
    pub fn get(&self, label: &str) -> Option<&Reference> {
        self.entries.get(&normalize_label(label))
    }

    /// Looks up an already-normalized label.
    pub(crate) fn get_normalized(&self, label: &str) -> Option<&Reference> {
        self.entries.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized labels and their references, in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reference)> {
        self.entries.iter().map(|(label, r)| (label.as_str(), r))
    }

    /// Registers `label`. The first definition of a label wins; returns false
    /// when the label was already defined.
    pub(crate) fn insert(&mut self, label: String, reference: Reference) -> bool {
        if self.entries.contains_key(&label) {
            return false;
        }
        self.entries.insert(label, reference);
        true
    }

    pub(crate) fn remove(&mut self, label: &str) -> Option<Reference> {
        self.entries.remove(label)
    }
}

/// Normalizes a link label for matching: surrounding whitespace stripped,
/// internal whitespace runs collapsed to one space, Unicode case folded.
pub fn normalize_label(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    let mut last_space = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !last_space {
                collapsed.push(' ');
                last_space = true;
            }
            continue;
        }
        last_space = false;
        collapsed.push(ch);
    }
    collapsed.to_lowercase().to_uppercase().to_lowercase()
}
