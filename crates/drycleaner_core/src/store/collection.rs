//! In-memory collection of one entity type.
//!
//! # Invariants
//! - No two entries share an id.
//! - Insertion order is preserved and is the snapshot order.

use crate::model::entity::{Entity, EntityId};
use crate::store::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from already-unique items, e.g. a decoded
    /// snapshot.
    pub(crate) fn from_unique(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub(crate) fn push(&mut self, entity: T) -> Result<(), StoreError> {
        if self.contains(entity.id()) {
            return Err(StoreError::DuplicateId {
                slot: T::SLOT,
                id: entity.id(),
            });
        }
        self.items.push(entity);
        Ok(())
    }

    /// Overwrites the entry carrying the same id, keeping its position.
    pub(crate) fn replace(&mut self, entity: T) -> Result<(), StoreError> {
        let id = entity.id();
        let entry = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(StoreError::NotFound { slot: T::SLOT, id })?;
        *entry = entity;
        Ok(())
    }

    /// Resolves positions to ids, rejecting the whole set if any is out of
    /// range. Repeated positions collapse.
    pub(crate) fn ids_at(&self, positions: &[usize]) -> Result<Vec<EntityId>, StoreError> {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        sorted
            .into_iter()
            .map(|position| {
                self.items
                    .get(position)
                    .map(|item| item.id())
                    .ok_or(StoreError::PositionOutOfRange {
                        slot: T::SLOT,
                        position,
                        len: self.items.len(),
                    })
            })
            .collect()
    }

    /// Removes every entry whose id is listed; returns the removed ids in
    /// collection order.
    pub(crate) fn remove_ids(&mut self, ids: &[EntityId]) -> Vec<EntityId> {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            if ids.contains(&item.id()) {
                removed.push(item.id());
                false
            } else {
                true
            }
        });
        removed
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Collection;
    use crate::model::customer::Customer;
    use crate::store::error::StoreError;

    fn three() -> Collection<Customer> {
        let mut collection = Collection::new();
        for name in ["a", "b", "c"] {
            collection
                .push(Customer::new(name, "", ""))
                .expect("fresh ids should be accepted");
        }
        collection
    }

    #[test]
    fn ids_at_collapses_duplicates_and_sorts() {
        let collection = three();
        let ids = collection.ids_at(&[2, 0, 2]).expect("positions in range");
        assert_eq!(ids, vec![collection.as_slice()[0].id, collection.as_slice()[2].id]);
    }

    #[test]
    fn ids_at_rejects_out_of_range_without_partial_result() {
        let collection = three();
        let err = collection.ids_at(&[0, 3]).expect_err("position 3 is out of range");
        assert!(matches!(
            err,
            StoreError::PositionOutOfRange { position: 3, len: 3, .. }
        ));
    }

    #[test]
    fn replace_keeps_position() {
        let mut collection = three();
        let mut edited = collection.as_slice()[1].clone();
        edited.name = "renamed".to_string();
        collection.replace(edited.clone()).expect("id exists");
        assert_eq!(collection.as_slice()[1], edited);
        assert_eq!(collection.len(), 3);
    }
}
