use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::Identified;

/// Insertion-ordered collection indexed by entity id.
///
/// Serializes as a plain JSON array, so a snapshot reads the same as the
/// collections it holds.
#[derive(Debug, Clone)]
pub struct Table<T> {
    entries: IndexMap<String, T>,
}

impl<T: Identified> Table<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.entries.get_mut(id)
    }

    /// Appends `item`, replacing in place any entry that already has its id.
    pub fn insert(&mut self, item: T) {
        self.entries.insert(item.id().to_string(), item);
    }

    /// Removes the entry and closes the gap, keeping the others in order.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.entries.shift_remove(id)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, T> {
        self.entries.values()
    }
}

impl<T: Identified> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified> From<Vec<T>> for Table<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Identified> FromIterator<T> for Table<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|item| (item.id().to_string(), item))
                .collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl<T: PartialEq> PartialEq for Table<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.values().eq(other.entries.values())
    }
}

impl<T: Serialize> Serialize for Table<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de, T> Deserialize<'de> for Table<T>
where
    T: Deserialize<'de> + Identified,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Table::from)
    }
}
