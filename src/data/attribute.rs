//! Attribute metadata: per-attribute defaults and evaluation flags.
//! One row per attribute id in the catalogue pack.

use serde::{Deserialize, Serialize};

use crate::AttributeId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeMeta {
    pub id: AttributeId,
    pub name: String,
    /// Value used when a type carries no base value for this attribute.
    #[serde(default)]
    pub default_value: f64,
    /// When false, multiplicative modifiers of this attribute are subject
    /// to the diminishing-returns stacking penalty.
    #[serde(default = "default_true")]
    pub stackable: bool,
    /// Governs which extreme wins when ordering penalized modifiers.
    #[serde(default = "default_true")]
    pub high_is_good: bool,
}

fn default_true() -> bool {
    true
}
