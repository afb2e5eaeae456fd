use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered dictionary from canonical feature name to integer id.
///
/// Ids are handed out in first-seen order starting at `first_index` (some
/// backends reserve index 0, so their encoders start at 1) and are never
/// reassigned or reused. Freezing closes the id space: lookups of unseen
/// names return `None` instead of growing the map, which is what keeps
/// training-time and classification-time indices identical. The map
/// serializes in insertion order, so a deserialized dictionary preserves
/// every id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameIndexMap {
    #[serde(with = "indexmap::map::serde_seq")]
    indices: IndexMap<String, usize>,
    first_index: usize,
    frozen: bool,
}

impl NameIndexMap {
    pub fn new(first_index: usize) -> Self {
        Self {
            indices: IndexMap::new(),
            first_index,
            frozen: false,
        }
    }

    /// Looks up a name without ever growing the map.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Returns the id for `name`, assigning the next free id if the name is
    /// new and the map is not frozen. Returns `None` only for an unseen
    /// name after [`freeze`](Self::freeze).
    pub fn get_or_insert(&mut self, name: &str) -> Option<usize> {
        if let Some(index) = self.get(name) {
            return Some(index);
        }
        if self.frozen {
            return None;
        }
        let index = self.first_index + self.indices.len();
        self.indices.insert(name.to_string(), index);
        Some(index)
    }

    /// Closes the id space. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates `(name, id)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.indices.iter().map(|(name, &index)| (name.as_str(), index))
    }

    /// The largest assigned id, if any name has been seen.
    pub fn highest_index(&self) -> Option<usize> {
        if self.indices.is_empty() {
            None
        } else {
            Some(self.first_index + self.indices.len() - 1)
        }
    }
}
