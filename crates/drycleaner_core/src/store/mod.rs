//! Store owning the customer, order and payment collections.
//!
//! # Responsibility
//! - Hold the three collections in memory for the life of the process.
//! - Persist a full snapshot of a collection after every mutation.
//! - Load every collection once at construction.
//! - Notify subscribers after each mutation.
//!
//! # Invariants
//! - Ids are unique within each collection at all times.
//! - A rejected mutation (`StoreError`) changes nothing and writes nothing.
//! - A failed snapshot write never rolls back the in-memory change.
//! - Absent or malformed snapshots load as empty collections.

pub mod collection;
pub mod config;
pub mod error;
pub mod events;
pub mod snapshot;

use crate::model::customer::Customer;
use crate::model::entity::{Entity, EntityId, Slot};
use crate::model::order::Order;
use crate::model::payment::Payment;
use crate::repo::slot_repo::SlotRepository;
use collection::Collection;
use config::{ReferencePolicy, StoreConfig};
use error::{SaveOutcome, StoreError, StoreResult};
use events::{ChangeEvent, ChangeKind, Listeners, SubscriptionId};
use log::{debug, info, warn};
use std::collections::HashSet;

mod sealed {
    use super::Collection;

    /// Mutable access stays inside the store so every change is persisted.
    pub trait CollectionMut<T> {
        fn collection_mut(&mut self) -> &mut Collection<T>;
    }
}

/// Gives generic store operations read access to the collection of `T`.
///
/// Sealed: only `Store` implements it, and mutation goes through `Store`
/// methods.
///
/// ```compile_fail
/// use drycleaner_core::{Collection, CollectionOf, Customer, MemorySlotRepository, Store, StoreConfig};
///
/// let mut store = Store::open(MemorySlotRepository::new(), StoreConfig::default());
/// *CollectionOf::<Customer>::collection_mut(&mut store) = Collection::new();
/// ```
pub trait CollectionOf<T: Entity>: sealed::CollectionMut<T> {
    fn collection(&self) -> &Collection<T>;

    /// Orders and payments that reference any of `ids` in this collection.
    fn dependents_of(&self, _ids: &[EntityId]) -> Dependents {
        Dependents::default()
    }
}

/// Records that would dangle if their parent were deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependents {
    pub orders: Vec<EntityId>,
    pub payments: Vec<EntityId>,
}

impl Dependents {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.payments.is_empty()
    }
}

/// Long-lived owner of all dry-cleaning records.
///
/// Construct one per process with [`Store::open`] and pass it by reference
/// to whatever needs it.
pub struct Store<R: SlotRepository> {
    repo: R,
    config: StoreConfig,
    customers: Collection<Customer>,
    orders: Collection<Order>,
    payments: Collection<Payment>,
    listeners: Listeners,
}

impl<R: SlotRepository> Store<R> {
    /// Creates the store and loads every collection from `repo`.
    pub fn open(repo: R, config: StoreConfig) -> Self {
        let customers: Collection<Customer> = load_collection(&repo);
        let orders: Collection<Order> = load_collection(&repo);
        let payments: Collection<Payment> = load_collection(&repo);
        info!(
            "event=store_open module=store status=ok customers={} orders={} payments={} reference_policy={:?}",
            customers.len(),
            orders.len(),
            payments.len(),
            config.reference_policy
        );

        Self {
            repo,
            config,
            customers,
            orders,
            payments,
            listeners: Listeners::default(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Drops the in-memory state and returns the storage backend.
    pub fn into_repository(self) -> R {
        self.repo
    }

    pub fn customers(&self) -> &[Customer] {
        self.customers.as_slice()
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.as_slice()
    }

    pub fn payments(&self) -> &[Payment] {
        self.payments.as_slice()
    }

    pub fn find<T: Entity>(&self, id: EntityId) -> Option<&T>
    where
        Self: CollectionOf<T>,
    {
        self.entries::<T>().get(id)
    }

    /// Orders placed by `customer_id`, in collection order.
    pub fn orders_for_customer(&self, customer_id: EntityId) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.is_for(customer_id))
            .collect()
    }

    /// Payments recorded against `order_id`, in collection order.
    pub fn payments_for_order(&self, order_id: EntityId) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|payment| payment.is_for(order_id))
            .collect()
    }

    /// Orders whose customer no longer exists.
    pub fn dangling_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| !self.customers.contains(order.customer_id))
            .collect()
    }

    /// Payments whose order no longer exists.
    pub fn dangling_payments(&self) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|payment| !self.orders.contains(payment.order_id))
            .collect()
    }

    /// Appends `entity` and persists its collection.
    ///
    /// The caller supplies the id.
    ///
    /// # Errors
    /// - `StoreError::DuplicateId` when the id is already present.
    pub fn add<T: Entity>(&mut self, entity: T) -> StoreResult<SaveOutcome>
    where
        Self: CollectionOf<T>,
    {
        let id = entity.id();
        self.entries_mut::<T>().push(entity)?;
        let outcome = self.save::<T>();
        self.emit(T::SLOT, ChangeKind::Added, vec![id], &outcome);
        Ok(outcome)
    }

    /// Overwrites the entry with the same id in place and persists.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no entry carries that id; nothing is
    ///   written.
    pub fn update<T: Entity>(&mut self, entity: T) -> StoreResult<SaveOutcome>
    where
        Self: CollectionOf<T>,
    {
        let id = entity.id();
        self.entries_mut::<T>().replace(entity)?;
        let outcome = self.save::<T>();
        self.emit(T::SLOT, ChangeKind::Updated, vec![id], &outcome);
        Ok(outcome)
    }

    /// Deletes the entry with `id`, applying the configured reference policy.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when `id` is absent.
    /// - `StoreError::HasDependents` under `ReferencePolicy::Restrict`.
    pub fn delete<T: Entity>(&mut self, id: EntityId) -> StoreResult<SaveOutcome>
    where
        Self: CollectionOf<T>,
    {
        if !self.entries::<T>().contains(id) {
            return Err(StoreError::NotFound { slot: T::SLOT, id });
        }
        self.remove_entries::<T>(vec![id])
    }

    /// Deletes the entries at `positions`, applying the reference policy.
    ///
    /// An empty position set is a no-op returning `SaveOutcome::Unchanged`.
    ///
    /// # Errors
    /// - `StoreError::PositionOutOfRange` if any position is out of range;
    ///   nothing is removed.
    /// - `StoreError::HasDependents` under `ReferencePolicy::Restrict`.
    pub fn delete_at<T: Entity>(&mut self, positions: &[usize]) -> StoreResult<SaveOutcome>
    where
        Self: CollectionOf<T>,
    {
        let ids = self.entries::<T>().ids_at(positions)?;
        if ids.is_empty() {
            return Ok(SaveOutcome::Unchanged);
        }
        self.remove_entries::<T>(ids)
    }

    /// Writes the full collection of `T` as one snapshot.
    pub fn save<T: Entity>(&self) -> SaveOutcome
    where
        Self: CollectionOf<T>,
    {
        let entries = self.entries::<T>();
        let text = match snapshot::encode(entries.as_slice()) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error slot={} error_code=snapshot_encode_failed error={}",
                    T::SLOT,
                    err
                );
                return SaveOutcome::Failed {
                    slot: T::SLOT,
                    reason: err.to_string(),
                };
            }
        };

        match self.repo.write_slot(T::SLOT, &text) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok slot={} entries={} bytes={}",
                    T::SLOT,
                    entries.len(),
                    text.len()
                );
                SaveOutcome::Persisted
            }
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error slot={} error_code=slot_write_failed error={}",
                    T::SLOT,
                    err
                );
                SaveOutcome::Failed {
                    slot: T::SLOT,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Writes every collection.
    pub fn save_all(&self) -> SaveOutcome {
        self.save::<Customer>()
            .and(self.save::<Order>())
            .and(self.save::<Payment>())
    }

    /// Re-reads every collection from storage, discarding in-memory state.
    ///
    /// Subscribers are not notified.
    pub fn reload(&mut self) {
        self.customers = load_collection(&self.repo);
        self.orders = load_collection(&self.repo);
        self.payments = load_collection(&self.repo);
    }

    /// Registers `listener` for every subsequent change event.
    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.listeners.add(Box::new(listener))
    }

    /// Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    fn entries<T: Entity>(&self) -> &Collection<T>
    where
        Self: CollectionOf<T>,
    {
        <Self as CollectionOf<T>>::collection(self)
    }

    fn entries_mut<T: Entity>(&mut self) -> &mut Collection<T>
    where
        Self: CollectionOf<T>,
    {
        <Self as sealed::CollectionMut<T>>::collection_mut(self)
    }

    fn remove_entries<T: Entity>(&mut self, ids: Vec<EntityId>) -> StoreResult<SaveOutcome>
    where
        Self: CollectionOf<T>,
    {
        let mut outcome = SaveOutcome::Unchanged;

        match self.config.reference_policy {
            ReferencePolicy::AllowDangling => {}
            ReferencePolicy::Restrict => {
                let dependents = <Self as CollectionOf<T>>::dependents_of(self, &ids);
                if !dependents.is_empty() {
                    return Err(StoreError::HasDependents {
                        slot: T::SLOT,
                        orders: dependents.orders.len(),
                        payments: dependents.payments.len(),
                    });
                }
            }
            ReferencePolicy::Cascade => {
                let dependents = <Self as CollectionOf<T>>::dependents_of(self, &ids);
                if !dependents.payments.is_empty() {
                    outcome = outcome.and(self.remove_and_save::<Payment>(&dependents.payments));
                }
                if !dependents.orders.is_empty() {
                    outcome = outcome.and(self.remove_and_save::<Order>(&dependents.orders));
                }
            }
        }

        Ok(outcome.and(self.remove_and_save::<T>(&ids)))
    }

    fn remove_and_save<T: Entity>(&mut self, ids: &[EntityId]) -> SaveOutcome
    where
        Self: CollectionOf<T>,
    {
        let removed = self.entries_mut::<T>().remove_ids(ids);
        let outcome = self.save::<T>();
        self.emit(T::SLOT, ChangeKind::Deleted, removed, &outcome);
        outcome
    }

    fn emit(&mut self, slot: Slot, kind: ChangeKind, ids: Vec<EntityId>, outcome: &SaveOutcome) {
        let persisted = outcome.is_persisted();
        info!(
            "event=store_change module=store status={} slot={} kind={:?} count={}",
            if persisted { "ok" } else { "degraded" },
            slot,
            kind,
            ids.len()
        );
        self.listeners.emit(&ChangeEvent {
            slot,
            kind,
            ids,
            persisted,
        });
    }
}

impl<R: SlotRepository> sealed::CollectionMut<Customer> for Store<R> {
    fn collection_mut(&mut self) -> &mut Collection<Customer> {
        &mut self.customers
    }
}

impl<R: SlotRepository> CollectionOf<Customer> for Store<R> {
    fn collection(&self) -> &Collection<Customer> {
        &self.customers
    }

    fn dependents_of(&self, ids: &[EntityId]) -> Dependents {
        let orders: Vec<EntityId> = self
            .orders
            .iter()
            .filter(|order| ids.contains(&order.customer_id))
            .map(|order| order.id)
            .collect();
        let order_set: HashSet<EntityId> = orders.iter().copied().collect();
        let payments = self
            .payments
            .iter()
            .filter(|payment| order_set.contains(&payment.order_id))
            .map(|payment| payment.id)
            .collect();
        Dependents { orders, payments }
    }
}

impl<R: SlotRepository> sealed::CollectionMut<Order> for Store<R> {
    fn collection_mut(&mut self) -> &mut Collection<Order> {
        &mut self.orders
    }
}

impl<R: SlotRepository> CollectionOf<Order> for Store<R> {
    fn collection(&self) -> &Collection<Order> {
        &self.orders
    }

    fn dependents_of(&self, ids: &[EntityId]) -> Dependents {
        let payments = self
            .payments
            .iter()
            .filter(|payment| ids.contains(&payment.order_id))
            .map(|payment| payment.id)
            .collect();
        Dependents {
            orders: Vec::new(),
            payments,
        }
    }
}

impl<R: SlotRepository> sealed::CollectionMut<Payment> for Store<R> {
    fn collection_mut(&mut self) -> &mut Collection<Payment> {
        &mut self.payments
    }
}

impl<R: SlotRepository> CollectionOf<Payment> for Store<R> {
    fn collection(&self) -> &Collection<Payment> {
        &self.payments
    }
}

/// Reads one slot; absent, unreadable or malformed data yields an empty
/// collection.
fn load_collection<T: Entity, R: SlotRepository>(repo: &R) -> Collection<T> {
    let text = match repo.read_slot(T::SLOT) {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!(
                "event=store_load module=store status=empty slot={}",
                T::SLOT
            );
            return Collection::new();
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=degraded slot={} error_code=slot_read_failed error={}",
                T::SLOT,
                err
            );
            return Collection::new();
        }
    };

    match snapshot::decode::<T>(&text) {
        Ok(items) => {
            debug!(
                "event=store_load module=store status=ok slot={} entries={}",
                T::SLOT,
                items.len()
            );
            Collection::from_unique(items)
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=degraded slot={} error_code=snapshot_malformed error={}",
                T::SLOT,
                err
            );
            Collection::new()
        }
    }
}
