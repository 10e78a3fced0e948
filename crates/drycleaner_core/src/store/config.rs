//! Store configuration.

use serde::{Deserialize, Serialize};

/// What deleting a customer or order does to records that reference it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Children keep their now-dangling `customerId`/`orderId`.
    #[default]
    AllowDangling,
    /// Deleting a referenced customer or order is refused.
    Restrict,
    /// Orders of a deleted customer, and payments of a deleted order, are
    /// deleted too.
    Cascade,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub reference_policy: ReferencePolicy,
}

impl StoreConfig {
    pub fn with_reference_policy(reference_policy: ReferencePolicy) -> Self {
        Self { reference_policy }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReferencePolicy, StoreConfig};

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").expect("empty config parses");
        assert_eq!(config.reference_policy, ReferencePolicy::AllowDangling);

        let config: StoreConfig =
            serde_json::from_str(r#"{"reference_policy":"cascade"}"#).expect("config parses");
        assert_eq!(config.reference_policy, ReferencePolicy::Cascade);
    }
}
