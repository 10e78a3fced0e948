//! Front-desk use-case service.
//!
//! # Responsibility
//! - Turn form input into validated customer/order/payment records.
//! - Resolve edits and removals by id against the store.
//! - Map failures to structured errors carrying the desk's user messages.
//!
//! # Invariants
//! - An edit never changes the record id.
//! - Creating an order requires a selected customer, and creating a
//!   payment requires a selected order. Neither checks that the selection
//!   still exists.

use crate::model::customer::Customer;
use crate::model::entity::{Entity, EntityId, ModelValidationError, Slot};
use crate::model::order::{Order, OrderStatus};
use crate::model::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::repo::slot_repo::SlotRepository;
use crate::store::error::{SaveOutcome, StoreError};
use crate::store::{CollectionOf, Store};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DeskResult<T> = Result<T, DeskError>;

/// Desk failure. `user_message()` is the text shown in the alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskError {
    CustomerNotSelected,
    OrderNotSelected,
    CustomerNotFound(EntityId),
    OrderNotFound(EntityId),
    PaymentNotFound(EntityId),
    Invalid(ModelValidationError),
    Store(StoreError),
}

impl DeskError {
    pub fn user_message(&self) -> String {
        match self {
            Self::CustomerNotSelected => "Please select a customer".to_string(),
            Self::OrderNotSelected => "Please select an order".to_string(),
            Self::CustomerNotFound(_) => "Customer not found.".to_string(),
            Self::OrderNotFound(_) => "Order not found.".to_string(),
            Self::PaymentNotFound(_) => "Payment not found.".to_string(),
            Self::Invalid(err) => format!("Invalid input: {err}."),
            Self::Store(StoreError::HasDependents { .. }) => {
                "Cannot delete: other records still refer to it.".to_string()
            }
            Self::Store(err) => format!("Could not save: {err}."),
        }
    }
}

impl Display for DeskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CustomerNotSelected => write!(f, "no customer selected"),
            Self::OrderNotSelected => write!(f, "no order selected"),
            Self::CustomerNotFound(id) => write!(f, "customer not found: {id}"),
            Self::OrderNotFound(id) => write!(f, "order not found: {id}"),
            Self::PaymentNotFound(id) => write!(f, "payment not found: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DeskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for DeskError {
    fn from(value: ModelValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<StoreError> for DeskError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound {
                slot: Slot::Customers,
                id,
            } => Self::CustomerNotFound(id),
            StoreError::NotFound {
                slot: Slot::Orders,
                id,
            } => Self::OrderNotFound(id),
            StoreError::NotFound {
                slot: Slot::Payments,
                id,
            } => Self::PaymentNotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Record written by the desk plus whether its snapshot reached storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<T> {
    pub record: T,
    pub persisted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    pub name: String,
    pub contact: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    pub customer_id: Option<EntityId>,
    pub item_type: String,
    pub quantity: u32,
    pub service_type: String,
    pub status: OrderStatus,
    /// Defaults to today when left empty.
    pub order_date: Option<NaiveDate>,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self {
            customer_id: None,
            item_type: String::new(),
            quantity: 1,
            service_type: String::new(),
            status: OrderStatus::default(),
            order_date: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub order_id: Option<EntityId>,
    pub amount: Decimal,
    /// Defaults to today when left empty.
    pub payment_date: Option<NaiveDate>,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
}

/// Order joined with its customer's name for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub order: Order,
    /// `None` when the customer was deleted.
    pub customer_name: Option<String>,
}

/// Payment joined with its order's item type for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLine {
    pub payment: Payment,
    /// `None` when the order was deleted.
    pub order_item: Option<String>,
}

/// Use-case facade over a borrowed store.
pub struct Desk<'s, R: SlotRepository> {
    store: &'s mut Store<R>,
    today: Option<NaiveDate>,
}

impl<'s, R: SlotRepository> Desk<'s, R> {
    pub fn new(store: &'s mut Store<R>) -> Self {
        Self { store, today: None }
    }

    /// Pins the date used for empty date fields.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn store(&self) -> &Store<R> {
        &*self.store
    }

    pub fn register_customer(&mut self, form: CustomerForm) -> DeskResult<Receipt<Customer>> {
        let customer = Customer::new(form.name.trim(), form.contact.trim(), form.address.trim());
        self.insert(customer)
    }

    pub fn edit_customer(
        &mut self,
        id: EntityId,
        form: CustomerForm,
    ) -> DeskResult<Receipt<Customer>> {
        let customer = Customer {
            id,
            name: form.name.trim().to_string(),
            contact: form.contact.trim().to_string(),
            address: form.address.trim().to_string(),
        };
        self.replace(customer)
    }

    pub fn remove_customer(&mut self, id: EntityId) -> DeskResult<bool> {
        self.remove::<Customer>(id)
    }

    /// # Errors
    /// - `DeskError::CustomerNotSelected` when the form has no customer.
    pub fn place_order(&mut self, form: OrderForm) -> DeskResult<Receipt<Order>> {
        let order = self.order_from_form(form)?;
        self.insert(order)
    }

    /// # Errors
    /// - `DeskError::OrderNotFound` when `id` vanished since the form opened.
    pub fn edit_order(&mut self, id: EntityId, form: OrderForm) -> DeskResult<Receipt<Order>> {
        let mut order = self.order_from_form(form)?;
        order.id = id;
        self.replace(order)
    }

    pub fn remove_order(&mut self, id: EntityId) -> DeskResult<bool> {
        self.remove::<Order>(id)
    }

    /// # Errors
    /// - `DeskError::OrderNotSelected` when the form has no order.
    pub fn record_payment(&mut self, form: PaymentForm) -> DeskResult<Receipt<Payment>> {
        let payment = self.payment_from_form(form)?;
        self.insert(payment)
    }

    /// # Errors
    /// - `DeskError::PaymentNotFound` when `id` vanished since the form
    ///   opened.
    pub fn edit_payment(
        &mut self,
        id: EntityId,
        form: PaymentForm,
    ) -> DeskResult<Receipt<Payment>> {
        let mut payment = self.payment_from_form(form)?;
        payment.id = id;
        self.replace(payment)
    }

    pub fn remove_payment(&mut self, id: EntityId) -> DeskResult<bool> {
        self.remove::<Payment>(id)
    }

    /// Every order with its customer's name, in collection order.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.order_lines_where(|_| true)
    }

    pub fn order_lines_for_customer(&self, customer_id: EntityId) -> Vec<OrderLine> {
        self.order_lines_where(|order| order.is_for(customer_id))
    }

    /// Every payment with its order's item type, in collection order.
    pub fn payment_lines(&self) -> Vec<PaymentLine> {
        self.payment_lines_where(|_| true)
    }

    pub fn payment_lines_for_order(&self, order_id: EntityId) -> Vec<PaymentLine> {
        self.payment_lines_where(|payment| payment.is_for(order_id))
    }

    fn order_lines_where(&self, keep: impl Fn(&Order) -> bool) -> Vec<OrderLine> {
        self.store
            .orders()
            .iter()
            .filter(|order| keep(order))
            .map(|order| OrderLine {
                order: order.clone(),
                customer_name: self
                    .store
                    .find::<Customer>(order.customer_id)
                    .map(|customer| customer.name.clone()),
            })
            .collect()
    }

    fn payment_lines_where(&self, keep: impl Fn(&Payment) -> bool) -> Vec<PaymentLine> {
        self.store
            .payments()
            .iter()
            .filter(|payment| keep(payment))
            .map(|payment| PaymentLine {
                payment: payment.clone(),
                order_item: self
                    .store
                    .find::<Order>(payment.order_id)
                    .map(|order| order.item_type.clone()),
            })
            .collect()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn order_from_form(&self, form: OrderForm) -> DeskResult<Order> {
        let customer_id = form.customer_id.ok_or(DeskError::CustomerNotSelected)?;
        let order_date = form.order_date.unwrap_or_else(|| self.today());
        Ok(Order::new(
            customer_id,
            form.item_type.trim(),
            form.quantity,
            form.service_type.trim(),
            order_date,
        )
        .with_status(form.status))
    }

    fn payment_from_form(&self, form: PaymentForm) -> DeskResult<Payment> {
        let order_id = form.order_id.ok_or(DeskError::OrderNotSelected)?;
        Ok(Payment::new(
            order_id,
            form.amount,
            form.payment_date.unwrap_or_else(|| self.today()),
            form.payment_status,
            form.payment_method,
        ))
    }

    fn insert<T: Entity>(&mut self, record: T) -> DeskResult<Receipt<T>>
    where
        Store<R>: CollectionOf<T>,
    {
        record.validate()?;
        let outcome = self.store.add(record.clone())?;
        Ok(receipt(record, &outcome))
    }

    fn replace<T: Entity>(&mut self, record: T) -> DeskResult<Receipt<T>>
    where
        Store<R>: CollectionOf<T>,
    {
        record.validate()?;
        let outcome = self.store.update(record.clone())?;
        Ok(receipt(record, &outcome))
    }

    /// Returns whether the removal reached storage.
    fn remove<T: Entity>(&mut self, id: EntityId) -> DeskResult<bool>
    where
        Store<R>: CollectionOf<T>,
    {
        let outcome = self.store.delete::<T>(id)?;
        Ok(outcome.is_persisted())
    }
}

fn receipt<T>(record: T, outcome: &SaveOutcome) -> Receipt<T> {
    Receipt {
        record,
        persisted: outcome.is_persisted(),
    }
}

#[cfg(test)]
mod tests {
    use super::DeskError;
    use crate::model::entity::Slot;
    use crate::store::error::StoreError;
    use uuid::Uuid;

    #[test]
    fn not_found_maps_to_slot_specific_message() {
        let id = Uuid::new_v4();
        let order: DeskError = StoreError::NotFound {
            slot: Slot::Orders,
            id,
        }
        .into();
        assert_eq!(order, DeskError::OrderNotFound(id));
        assert_eq!(order.user_message(), "Order not found.");

        let payment: DeskError = StoreError::NotFound {
            slot: Slot::Payments,
            id,
        }
        .into();
        assert_eq!(payment.user_message(), "Payment not found.");
    }

    #[test]
    fn selection_messages_match_desk_alerts() {
        assert_eq!(
            DeskError::CustomerNotSelected.user_message(),
            "Please select a customer"
        );
        assert_eq!(
            DeskError::OrderNotSelected.user_message(),
            "Please select an order"
        );
    }
}
