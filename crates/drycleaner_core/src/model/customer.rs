//! Customer record.
//!
//! # Invariants
//! - `id` is stable and never reassigned.
//! - `name` is non-blank; `contact` and `address` are free text.

use crate::model::entity::{ensure_not_nil, Entity, EntityId, ModelValidationError, Slot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dry-cleaning customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: EntityId,
    pub name: String,
    /// Phone number or email, as typed.
    pub contact: String,
    pub address: String,
}

impl Customer {
    /// Creates a customer with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            contact: contact.into(),
            address: address.into(),
        }
    }

    /// Creates a customer under a caller-provided id.
    ///
    /// # Errors
    /// - Returns `ModelValidationError::NilId` for `Uuid::nil()`.
    pub fn with_id(
        id: EntityId,
        name: impl Into<String>,
        contact: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        ensure_not_nil(id)?;
        let mut customer = Self::new(name, contact, address);
        customer.id = id;
        Ok(customer)
    }
}

impl Entity for Customer {
    const SLOT: Slot = Slot::Customers;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        ensure_not_nil(self.id)?;
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankField("name"));
        }
        Ok(())
    }
}
