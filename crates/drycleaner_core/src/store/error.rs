//! Store error and persistence outcome types.

use crate::model::entity::{EntityId, Slot};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory rejection of a store mutation. When returned, nothing changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    DuplicateId {
        slot: Slot,
        id: EntityId,
    },
    NotFound {
        slot: Slot,
        id: EntityId,
    },
    PositionOutOfRange {
        slot: Slot,
        position: usize,
        len: usize,
    },
    /// Raised under `ReferencePolicy::Restrict`.
    HasDependents {
        slot: Slot,
        orders: usize,
        payments: usize,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { slot, id } => write!(f, "{slot} already contains id {id}"),
            Self::NotFound { slot, id } => write!(f, "{slot} has no entry with id {id}"),
            Self::PositionOutOfRange {
                slot,
                position,
                len,
            } => write!(f, "{slot} position {position} is out of range (len {len})"),
            Self::HasDependents {
                slot,
                orders,
                payments,
            } => write!(
                f,
                "{slot} entry is still referenced by {orders} order(s) and {payments} payment(s)"
            ),
        }
    }
}

impl Error for StoreError {}

/// Result of writing a snapshot after a mutation.
///
/// The in-memory change has happened either way; `Failed` means the next
/// load will not see it. `Unchanged` means the call changed nothing, so
/// nothing was written.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Persisted,
    Unchanged,
    Failed { slot: Slot, reason: String },
}

impl SaveOutcome {
    /// `true` when storage matches memory, including `Unchanged`.
    pub fn is_persisted(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Combines outcomes of several slot writes; the first failure wins,
    /// then any write.
    pub fn and(self, other: SaveOutcome) -> SaveOutcome {
        match (self, other) {
            (failed @ Self::Failed { .. }, _) => failed,
            (_, failed @ Self::Failed { .. }) => failed,
            (Self::Unchanged, Self::Unchanged) => Self::Unchanged,
            _ => Self::Persisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SaveOutcome;
    use crate::model::entity::Slot;

    fn failed(slot: Slot) -> SaveOutcome {
        SaveOutcome::Failed {
            slot,
            reason: "disk full".to_string(),
        }
    }

    #[test]
    fn and_keeps_first_failure_then_any_write() {
        assert_eq!(
            failed(Slot::Payments).and(failed(Slot::Orders)),
            failed(Slot::Payments)
        );
        assert_eq!(
            SaveOutcome::Persisted.and(failed(Slot::Orders)),
            failed(Slot::Orders)
        );
        assert_eq!(
            SaveOutcome::Unchanged.and(SaveOutcome::Persisted),
            SaveOutcome::Persisted
        );
        assert_eq!(
            SaveOutcome::Unchanged.and(SaveOutcome::Unchanged),
            SaveOutcome::Unchanged
        );
    }

    #[test]
    fn unchanged_counts_as_persisted() {
        assert!(SaveOutcome::Unchanged.is_persisted());
        assert!(!failed(Slot::Customers).is_persisted());
    }
}
