//! Core record keeping for a dry-cleaning counter.
//! This crate owns customers, orders and payments and their local
//! persistence; presentation layers call into it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::Customer;
pub use model::entity::{Entity, EntityId, ModelValidationError, Slot};
pub use model::order::{
    Order, OrderStatus, MAX_QUANTITY, MIN_QUANTITY, SUGGESTED_SERVICE_TYPES,
};
pub use model::payment::{Payment, PaymentMethod, PaymentStatus};
pub use repo::slot_repo::{
    MemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use service::desk::{
    CustomerForm, Desk, DeskError, DeskResult, OrderForm, OrderLine, PaymentForm, PaymentLine,
    Receipt,
};
pub use store::collection::Collection;
pub use store::config::{ReferencePolicy, StoreConfig};
pub use store::error::{SaveOutcome, StoreError, StoreResult};
pub use store::events::{ChangeEvent, ChangeKind, SubscriptionId};
pub use store::snapshot::SnapshotError;
pub use store::{CollectionOf, Dependents, Store};

/// Minimal health-check API for integration smoke tests.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Opens the SQLite snapshot file at `path` and loads a store from it.
///
/// # Errors
/// - Returns `db::DbError` when the file cannot be opened or migrated.
pub fn open_store(
    path: impl AsRef<std::path::Path>,
    config: StoreConfig,
) -> db::DbResult<Store<SqliteSlotRepository>> {
    let conn = db::open_db(path)?;
    Ok(Store::open(SqliteSlotRepository::new(conn), config))
}
