//! Effect records: catalogue-defined behaviours attached to types. An
//! effect's category decides which environment states evaluate it.

use serde::{Deserialize, Serialize};

use crate::{AttributeId, EffectId, ExpressionId};

pub const CATEGORY_PASSIVE: u8 = 0;
pub const CATEGORY_ACTIVE: u8 = 1;
pub const CATEGORY_TARGET: u8 = 2;
pub const CATEGORY_ONLINE: u8 = 4;
pub const CATEGORY_OVERLOADED: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRecord {
    pub id: EffectId,
    /// Effect category; active iff the owning environment's state has the
    /// corresponding bit set.
    pub category: u8,
    pub pre_expression: ExpressionId,
    /// Carried catalogue metadata. The activator walks `pre_expression`
    /// symmetrically for install and removal.
    #[serde(default)]
    pub post_expression: Option<ExpressionId>,
    #[serde(default)]
    pub is_offensive: bool,
    #[serde(default)]
    pub is_assistance: bool,
    #[serde(default)]
    pub duration_attribute: Option<AttributeId>,
}

impl EffectRecord {
    /// Bitmask this effect contributes to a state check. Categories past
    /// the state width never activate.
    pub fn category_bit(&self) -> u8 {
        if self.category < 8 {
            1u8 << self.category
        } else {
            0
        }
    }
}
