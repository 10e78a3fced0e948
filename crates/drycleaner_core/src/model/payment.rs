//! Payment record.
//!
//! # Invariants
//! - `amount` is an exact decimal and never negative.
//! - `order_id` is informational; it may dangle after order removal.

use crate::model::entity::{ensure_not_nil, Entity, EntityId, ModelValidationError, Slot};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Settlement state of a payment. Unlisted labels load as `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
    Other(String),
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 2] = [Self::Paid, Self::Unpaid];

    pub fn label(&self) -> &str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Paid" => Self::Paid,
            "Unpaid" => Self::Unpaid,
            _ => Self::Other(value),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Online,
    Other(String),
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::Card, Self::Online];

    pub fn label(&self) -> &str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Online => "Online",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Cash" => Self::Cash,
            "Card" => Self::Card,
            "Online" => Self::Online,
            _ => Self::Other(value),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A payment recorded against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: EntityId,
    pub order_id: EntityId,
    /// Stored as a decimal string so snapshots round-trip exactly.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
}

impl Payment {
    /// Creates a payment with a freshly generated id.
    pub fn new(
        order_id: EntityId,
        amount: Decimal,
        payment_date: NaiveDate,
        payment_status: PaymentStatus,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            amount,
            payment_date,
            payment_status,
            payment_method,
        }
    }

    /// Returns whether this payment was recorded against `order_id`.
    pub fn is_for(&self, order_id: EntityId) -> bool {
        self.order_id == order_id
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

impl Entity for Payment {
    const SLOT: Slot = Slot::Payments;

    fn id(&self) -> EntityId {
        self.id
    }

    fn validate(&self) -> Result<(), ModelValidationError> {
        ensure_not_nil(self.id)?;
        if self.amount < Decimal::ZERO {
            return Err(ModelValidationError::NegativeAmount);
        }
        Ok(())
    }
}
