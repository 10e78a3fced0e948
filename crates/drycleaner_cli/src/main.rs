//! Smoke check for `drycleaner_core` linkage.
//!
//! Prints the core version and, given a snapshot database path, the size
//! of each stored collection.

use drycleaner_core::{open_store, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("drycleaner_core ping={}", drycleaner_core::ping());
    println!("drycleaner_core version={}", drycleaner_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match open_store(&path, StoreConfig::default()) {
        Ok(store) => {
            println!(
                "customers={} orders={} payments={} dangling_orders={} dangling_payments={}",
                store.customers().len(),
                store.orders().len(),
                store.payments().len(),
                store.dangling_orders().len(),
                store.dangling_payments().len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to open `{path}`: {err}");
            ExitCode::FAILURE
        }
    }
}
