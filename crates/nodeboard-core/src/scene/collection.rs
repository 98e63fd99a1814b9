//! Insertion-ordered, id-keyed entity storage.

use crate::entities::EntityId;
use std::collections::HashMap;

/// An id-keyed arena that remembers insertion order.
///
/// Order matters: hit-testing walks it in reverse so later entities win, and
/// serialization writes it front to back so a round trip keeps the order.
#[derive(Debug, Clone)]
pub struct EntityMap<T> {
    items: HashMap<EntityId, T>,
    order: Vec<EntityId>,
}

impl<T> Default for EntityMap<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> EntityMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity. Re-inserting an existing id replaces it in place.
    pub fn insert(&mut self, id: EntityId, item: T) {
        if self.items.insert(id.clone(), item).is_none() {
            self.order.push(id);
        }
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<T> {
        let item = self.items.remove(id)?;
        self.order.retain(|other| other != id);
        Some(item)
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &EntityId> {
        self.order.iter()
    }

    /// Entities in insertion order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Mutable access in no particular order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut map = EntityMap::new();
        map.insert(EntityId::new("a"), 1);
        map.insert(EntityId::new("b"), 2);
        map.insert(EntityId::new("c"), 3);
        assert_eq!(map.remove(&EntityId::new("b")), Some(2));
        let values: Vec<_> = map.iter().copied().collect();
        assert_eq!(values, vec![1, 3]);
        assert_eq!(map.iter().next_back(), Some(&3));
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut map = EntityMap::new();
        map.insert(EntityId::new("a"), 1);
        map.insert(EntityId::new("b"), 2);
        map.insert(EntityId::new("a"), 10);
        assert_eq!(map.len(), 2);
        let values: Vec<_> = map.iter().copied().collect();
        assert_eq!(values, vec![10, 2]);
    }
}
