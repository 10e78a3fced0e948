//! Shared entity identity and collection-slot vocabulary.
//!
//! # Responsibility
//! - Define the stable id type shared by customers, orders and payments.
//! - Bind each entity type to the storage slot holding its snapshot.
//! - Define field validation errors reported by entity constructors.
//!
//! # Invariants
//! - A nil id is never valid for a stored entity.
//! - Each entity type maps to exactly one `Slot`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned once at creation.
pub type EntityId = Uuid;

/// Fixed storage key holding one collection snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Customers,
    Orders,
    Payments,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Customers, Slot::Orders, Slot::Payments];

    /// Storage key string. Part of the persisted layout, never rename.
    pub fn key(self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::Orders => "Orders",
            Self::Payments => "Payments",
        }
    }

    /// Reverse of [`Slot::key`].
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Record type that lives in one top-level collection.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Slot holding this entity's collection snapshot.
    const SLOT: Slot;

    fn id(&self) -> EntityId;

    /// Checks field-level constraints.
    fn validate(&self) -> Result<(), ModelValidationError>;
}

/// Field-level validation failure for customer/order/payment records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    NilId,
    QuantityOutOfRange { quantity: u32 },
    NegativeAmount,
    BlankField(&'static str),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::QuantityOutOfRange { quantity } => write!(
                f,
                "quantity {quantity} must be between {} and {}",
                crate::model::order::MIN_QUANTITY,
                crate::model::order::MAX_QUANTITY
            ),
            Self::NegativeAmount => write!(f, "amount must not be negative"),
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn ensure_not_nil(id: EntityId) -> Result<(), ModelValidationError> {
    if id.is_nil() {
        return Err(ModelValidationError::NilId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Slot;

    #[test]
    fn slot_keys_round_trip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(Slot::from_key("customers"), None);
    }
}
