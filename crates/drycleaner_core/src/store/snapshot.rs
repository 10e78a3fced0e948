//! Snapshot codec for whole collections.
//!
//! # Invariants
//! - Snapshots are UTF-8 JSON arrays of records in collection order.
//! - Decoding rejects snapshots that repeat an id.
//! - No format version is written; the array shape is the format.

use crate::model::entity::{Entity, EntityId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot encode/decode failure.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    DuplicateId(EntityId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "snapshot repeats id {id}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes a full collection into one snapshot value.
pub fn encode<T: Entity>(items: &[T]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(items)?)
}

/// Parses a snapshot back into a collection, preserving order.
pub fn decode<T: Entity>(text: &str) -> Result<Vec<T>, SnapshotError> {
    let items: Vec<T> = serde_json::from_str(text)?;
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(item.id()) {
            return Err(SnapshotError::DuplicateId(item.id()));
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, SnapshotError};
    use crate::model::customer::Customer;

    #[test]
    fn empty_collection_encodes_as_empty_array() {
        assert_eq!(encode::<Customer>(&[]).expect("encode"), "[]");
        assert!(decode::<Customer>("[]").expect("decode").is_empty());
    }

    #[test]
    fn repeated_id_is_rejected() {
        let customer = Customer::new("Alice", "555-0100", "1 Main St");
        let text = encode(&[customer.clone(), customer]).expect("encode");
        assert!(matches!(
            decode::<Customer>(&text),
            Err(SnapshotError::DuplicateId(_))
        ));
    }

    #[test]
    fn non_array_is_rejected() {
        assert!(matches!(
            decode::<Customer>("{\"id\":1}"),
            Err(SnapshotError::Json(_))
        ));
    }
}
