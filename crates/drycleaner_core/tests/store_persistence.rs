use chrono::NaiveDate;
use drycleaner_core::db::open_db;
use drycleaner_core::store::snapshot::{decode, encode};
use drycleaner_core::{
    open_store, Customer, MemorySlotRepository, Order, OrderStatus, Payment, PaymentMethod,
    PaymentStatus, Slot, SlotRepository, SqliteSlotRepository, Store, StoreConfig,
};
use rust_decimal_macros::dec;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn open(repo: &MemorySlotRepository) -> Store<MemorySlotRepository> {
    Store::open(repo.clone(), StoreConfig::default())
}

fn seeded(repo: &MemorySlotRepository) -> Store<MemorySlotRepository> {
    let mut store = open(repo);
    let alice = Customer::new("Alice", "555-0100", "1 Main St");
    let bob = Customer::new("Bob", "bob@example.com", "");
    let shirt = Order::new(alice.id, "Shirt", 3, "Laundry", day(1));
    let coat = Order::new(bob.id, "Coat", 1, "Dry Cleaning", day(2))
        .with_status(OrderStatus::Completed);
    let paid = Payment::new(
        coat.id,
        dec!(24.75),
        day(3),
        PaymentStatus::Paid,
        PaymentMethod::Card,
    );

    assert!(store.add(alice).unwrap().is_persisted());
    assert!(store.add(bob).unwrap().is_persisted());
    assert!(store.add(shirt).unwrap().is_persisted());
    assert!(store.add(coat).unwrap().is_persisted());
    assert!(store.add(paid).unwrap().is_persisted());
    store
}

#[test]
fn snapshot_round_trip_preserves_order_and_fields() {
    let repo = MemorySlotRepository::new();
    let store = seeded(&repo);

    let customers = decode::<Customer>(&encode(store.customers()).unwrap()).unwrap();
    let orders = decode::<Order>(&encode(store.orders()).unwrap()).unwrap();
    let payments = decode::<Payment>(&encode(store.payments()).unwrap()).unwrap();

    assert_eq!(customers, store.customers());
    assert_eq!(orders, store.orders());
    assert_eq!(payments, store.payments());
}

#[test]
fn add_then_restart_reloads_identical_collections() {
    let repo = MemorySlotRepository::new();
    let mut before = seeded(&repo);
    let extra = Customer::new("Carol", "555-0199", "9 Elm St");
    let _ = before.add(extra.clone()).unwrap();

    let after = open(&repo);
    assert_eq!(after.customers(), before.customers());
    assert_eq!(after.orders(), before.orders());
    assert_eq!(after.payments(), before.payments());
    assert_eq!(after.find::<Customer>(extra.id), Some(&extra));
}

#[test]
fn every_mutation_rewrites_its_own_slot_only() {
    let repo = MemorySlotRepository::new();
    let mut store = open(&repo);

    let _ = store.add(Customer::new("Dana", "", "")).unwrap();
    assert!(repo.read_slot(Slot::Customers).unwrap().is_some());
    assert_eq!(repo.read_slot(Slot::Orders).unwrap(), None);
    assert_eq!(repo.read_slot(Slot::Payments).unwrap(), None);
}

#[test]
fn absent_slots_load_as_empty() {
    let store = open(&MemorySlotRepository::new());
    assert!(store.customers().is_empty());
    assert!(store.orders().is_empty());
    assert!(store.payments().is_empty());
}

#[test]
fn malformed_slot_loads_as_empty_without_touching_others() {
    let repo = MemorySlotRepository::new();
    let seeded_store = seeded(&repo);
    repo.put_raw(Slot::Orders, "{not json");

    let store = open(&repo);
    assert!(store.orders().is_empty());
    assert_eq!(store.customers(), seeded_store.customers());
    assert_eq!(store.payments(), seeded_store.payments());
}

#[test]
fn unlisted_labels_load_and_survive_the_next_save() {
    let repo = MemorySlotRepository::new();
    let customer = uuid::Uuid::new_v4();
    let order = uuid::Uuid::new_v4();
    let raw_orders = serde_json::json!([
        {
            "id": uuid::Uuid::new_v4(),
            "customerId": customer,
            "itemType": "Shirt",
            "quantity": 2,
            "serviceType": "Laundry",
            "status": "Pending",
            "orderDate": "2024-06-01"
        },
        {
            "id": order,
            "customerId": customer,
            "itemType": "Suit",
            "quantity": 1,
            "serviceType": "Pressing",
            "status": "Ready",
            "orderDate": "2024-06-02"
        }
    ]);
    let raw_payments = serde_json::json!([{
        "id": uuid::Uuid::new_v4(),
        "orderId": order,
        "amount": "12.00",
        "paymentDate": "2024-06-03",
        "paymentStatus": "Refunded",
        "paymentMethod": "Voucher"
    }]);
    repo.put_raw(Slot::Orders, raw_orders.to_string());
    repo.put_raw(Slot::Payments, raw_payments.to_string());

    let mut store = open(&repo);
    assert_eq!(store.orders().len(), 2);
    assert_eq!(store.orders()[1].status, OrderStatus::Other("Ready".to_string()));
    assert_eq!(store.payments().len(), 1);
    assert_eq!(
        store.payments()[0].payment_method,
        PaymentMethod::Other("Voucher".to_string())
    );

    let extra = Order::new(customer, "Tie", 1, "Laundry", day(4));
    assert!(store.add(extra).unwrap().is_persisted());

    let stored: serde_json::Value =
        serde_json::from_str(&repo.read_slot(Slot::Orders).unwrap().unwrap()).unwrap();
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[..2], raw_orders.as_array().unwrap()[..]);
    assert_eq!(open(&repo).payments(), store.payments());
}

#[test]
fn snapshot_with_repeated_id_loads_as_empty() {
    let repo = MemorySlotRepository::new();
    let customer = Customer::new("Eve", "", "");
    repo.put_raw(
        Slot::Customers,
        encode(&[customer.clone(), customer]).unwrap(),
    );

    let store = open(&repo);
    assert!(store.customers().is_empty());
}

#[test]
fn failed_write_keeps_memory_state_but_not_storage() {
    let repo = MemorySlotRepository::new();
    let mut store = open(&repo);
    repo.set_fail_writes(true);

    let customer = Customer::new("Frank", "", "");
    let outcome = store.add(customer.clone()).unwrap();
    assert!(!outcome.is_persisted());
    assert!(matches!(
        outcome,
        drycleaner_core::SaveOutcome::Failed {
            slot: Slot::Customers,
            ..
        }
    ));
    assert_eq!(store.find::<Customer>(customer.id), Some(&customer));

    let restarted = open(&repo);
    assert!(restarted.customers().is_empty());
}

#[test]
fn save_all_recovers_after_storage_comes_back() {
    let repo = MemorySlotRepository::new();
    let mut store = open(&repo);
    repo.set_fail_writes(true);
    let _ = store.add(Customer::new("Gina", "", "")).unwrap();

    repo.set_fail_writes(false);
    assert!(store.save_all().is_persisted());
    assert_eq!(open(&repo).customers(), store.customers());
}

#[test]
fn reload_discards_unsaved_memory_state() {
    let repo = MemorySlotRepository::new();
    let mut store = seeded(&repo);
    let saved = store.customers().to_vec();

    repo.set_fail_writes(true);
    let _ = store.add(Customer::new("Hank", "", "")).unwrap();
    assert_eq!(store.customers().len(), saved.len() + 1);

    store.reload();
    assert_eq!(store.customers(), saved.as_slice());
}

#[test]
fn sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drycleaner.db");

    let mut store = open_store(&path, StoreConfig::default()).unwrap();
    let customer = Customer::new("Ivy", "555-0123", "3 Oak Ave");
    let order = Order::new(customer.id, "Dress", 1, "Dry Cleaning", day(9));
    assert!(store.add(customer.clone()).unwrap().is_persisted());
    assert!(store.add(order.clone()).unwrap().is_persisted());
    drop(store);

    let reopened = Store::open(
        SqliteSlotRepository::new(open_db(&path).unwrap()),
        StoreConfig::default(),
    );
    assert_eq!(reopened.customers(), &[customer]);
    assert_eq!(reopened.orders(), &[order]);
    assert!(reopened.payments().is_empty());
}

#[test]
fn sqlite_slot_value_is_a_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drycleaner.db");
    let mut store = open_store(&path, StoreConfig::default()).unwrap();
    let _ = store.add(Customer::new("Jay", "", "")).unwrap();

    let raw: String = store
        .repository()
        .connection()
        .query_row(
            "SELECT value FROM slots WHERE key = 'Customers';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["name"], "Jay");
}

#[test]
fn cleared_slot_reloads_as_empty() {
    let repo = MemorySlotRepository::new();
    let store = seeded(&repo);
    let repo = store.into_repository();

    repo.clear_slot(Slot::Payments).unwrap();
    let reopened = open(&repo);
    assert!(reopened.payments().is_empty());
    assert_eq!(reopened.customers().len(), 2);
}

#[test]
fn sqlite_clear_slot_forgets_snapshot() {
    let repo = SqliteSlotRepository::new(drycleaner_core::db::open_db_in_memory().unwrap());
    repo.write_slot(Slot::Orders, "[]").unwrap();
    repo.write_slot(Slot::Orders, "[ ]").unwrap();
    assert_eq!(repo.read_slot(Slot::Orders).unwrap().as_deref(), Some("[ ]"));

    repo.clear_slot(Slot::Orders).unwrap();
    assert_eq!(repo.read_slot(Slot::Orders).unwrap(), None);
}
