//! Order record.
//!
//! # Responsibility
//! - Describe one garment batch dropped off by a customer.
//!
//! # Invariants
//! - `quantity` stays within `MIN_QUANTITY..=MAX_QUANTITY`.
//! - `customer_id` is informational; it may dangle after customer removal.

use crate::model::entity::{ensure_not_nil, Entity, EntityId, ModelValidationError, Slot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 100;

/// Service names offered by the order form. `service_type` is not limited
/// to these.
pub const SUGGESTED_SERVICE_TYPES: &[&str] =
    &["Dry Cleaning", "Laundry", "Ironing", "Stain Removal"];

/// Processing state of an order.
///
/// Serialized as its label. Labels outside the suggested set load as
/// `Other` and are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProcess,
    Completed,
    Other(String),
}

impl OrderStatus {
    /// Suggested statuses, in form order.
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::InProcess, Self::Completed];

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::InProcess => "In Process",
            Self::Completed => "Completed",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => Self::Pending,
            "In Process" => Self::InProcess,
            "Completed" => Self::Completed,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A customer's dry-cleaning order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: EntityId,
    pub customer_id: EntityId,
    pub item_type: String,
    pub quantity: u32,
    pub service_type: String,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
}

impl Order {
    /// Creates a pending order with a freshly generated id.
    pub fn new(
        customer_id: EntityId,
        item_type: impl Into<String>,
        quantity: u32,
        service_type: impl Into<String>,
        order_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            item_type: item_type.into(),
            quantity,
            service_type: service_type.into(),
            status: OrderStatus::default(),
            order_date,
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns whether this order belongs to `customer_id`.
    pub fn is_for(&self, customer_id: EntityId) -> bool {
        self.customer_id == customer_id
    }
}

impl Entity for Order {
    const SLOT: Slot = Slot::Orders;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        ensure_not_nil(self.id)?;
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(ModelValidationError::QuantityOutOfRange {
                quantity: self.quantity,
            });
        }
        if self.item_type.trim().is_empty() {
            return Err(ModelValidationError::BlankField("itemType"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Order, OrderStatus};
    use crate::model::entity::{Entity, ModelValidationError};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date")
    }

    #[test]
    fn quantity_bounds_are_inclusive() {
        let customer = Uuid::new_v4();
        assert!(Order::new(customer, "Shirt", 1, "Laundry", date())
            .validate()
            .is_ok());
        assert!(Order::new(customer, "Shirt", 100, "Laundry", date())
            .validate()
            .is_ok());
        assert_eq!(
            Order::new(customer, "Shirt", 101, "Laundry", date()).validate(),
            Err(ModelValidationError::QuantityOutOfRange { quantity: 101 })
        );
        assert_eq!(
            Order::new(customer, "Shirt", 0, "Laundry", date()).validate(),
            Err(ModelValidationError::QuantityOutOfRange { quantity: 0 })
        );
    }

    #[test]
    fn status_serializes_with_display_label() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_value(&status).expect("status should serialize");
            assert_eq!(json, status.label());
        }
    }

    #[test]
    fn unlisted_status_label_is_kept_verbatim() {
        let status: OrderStatus =
            serde_json::from_value(serde_json::json!("Ready")).expect("any label should decode");
        assert_eq!(status, OrderStatus::Other("Ready".to_string()));
        assert_eq!(serde_json::to_value(&status).expect("status should serialize"), "Ready");

        let known: OrderStatus = serde_json::from_value(serde_json::json!("In Process"))
            .expect("suggested label should decode");
        assert_eq!(known, OrderStatus::InProcess);
    }
}
