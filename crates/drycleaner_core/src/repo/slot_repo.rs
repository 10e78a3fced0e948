//! Snapshot slot repository contracts and implementations.
//!
//! # Responsibility
//! - Provide whole-value read/write access to the three collection slots.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A write replaces the previous snapshot of that slot entirely.
//! - Reading a slot that was never written yields `None`, not an error.

use crate::db::DbError;
use crate::model::entity::Slot;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure while reading or writing a snapshot.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Backend refused the operation (quota, read-only media, injected fault).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "snapshot storage unavailable: {reason}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value storage holding one snapshot per slot.
pub trait SlotRepository {
    fn read_slot(&self, slot: Slot) -> RepoResult<Option<String>>;
    fn write_slot(&self, slot: Slot, value: &str) -> RepoResult<()>;
    fn clear_slot(&self, slot: Slot) -> RepoResult<()>;
}

/// SQLite-backed slot repository.
///
/// Owns its connection so it can live as long as the store.
pub struct SqliteSlotRepository {
    conn: Connection,
}

impl SqliteSlotRepository {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotRepository for SqliteSlotRepository {
    fn read_slot(&self, slot: Slot) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1;",
                [slot.key()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, slot: Slot, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![slot.key(), value],
        )?;
        Ok(())
    }

    fn clear_slot(&self, slot: Slot) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1;", [slot.key()])?;
        Ok(())
    }
}

/// In-process slot repository.
///
/// Clones share the same backing map, so a store rebuilt over a clone sees
/// everything the previous store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotRepository {
    slots: Rc<RefCell<BTreeMap<Slot, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with `RepoError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Places a raw value into a slot, bypassing serialization.
    pub fn put_raw(&self, slot: Slot, value: impl Into<String>) {
        self.slots.borrow_mut().insert(slot, value.into());
    }
}

impl SlotRepository for MemorySlotRepository {
    fn read_slot(&self, slot: Slot) -> RepoResult<Option<String>> {
        Ok(self.slots.borrow().get(&slot).cloned())
    }

    fn write_slot(&self, slot: Slot, value: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Unavailable(format!("writes to {slot} disabled")));
        }
        self.slots.borrow_mut().insert(slot, value.to_string());
        Ok(())
    }

    fn clear_slot(&self, slot: Slot) -> RepoResult<()> {
        self.slots.borrow_mut().remove(&slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySlotRepository, SlotRepository};
    use crate::model::entity::Slot;

    #[test]
    fn memory_clones_share_storage() {
        let repo = MemorySlotRepository::new();
        let other = repo.clone();
        repo.write_slot(Slot::Orders, "[]").expect("write should succeed");
        assert_eq!(
            other.read_slot(Slot::Orders).expect("read should succeed"),
            Some("[]".to_string())
        );
        assert_eq!(other.read_slot(Slot::Payments).expect("read"), None);
    }

    #[test]
    fn memory_write_failure_leaves_previous_value() {
        let repo = MemorySlotRepository::new();
        repo.write_slot(Slot::Customers, "[1]").expect("write should succeed");
        repo.set_fail_writes(true);
        assert!(repo.write_slot(Slot::Customers, "[2]").is_err());
        assert_eq!(
            repo.read_slot(Slot::Customers).expect("read should succeed"),
            Some("[1]".to_string())
        );
    }
}
