//! Type records: one row per ship, module, charge, drone, skill or implant
//! in the catalogue pack, with base attribute values and attached effects.

use serde::{Deserialize, Serialize};

use crate::{AttributeId, EffectId, TypeId};

/// Skills live in this category; their environments resolve attributes to
/// the character's skill level instead of consulting the modifier store.
pub const CAT_SKILL: u32 = 16;
/// Implants and boosters. Never stacking-penalized as modifier sources.
pub const CAT_IMPLANT: u32 = 20;

/// Required-skill attribute slots checked by skill-requirement filters.
pub const REQUIRED_SKILL_ATTRS: [AttributeId; 3] = [182, 183, 184];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAttribute {
    pub attribute_id: AttributeId,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRecord {
    pub id: TypeId,
    pub name: String,
    pub group_id: u32,
    pub category_id: u32,
    #[serde(default)]
    pub attributes: Vec<TypeAttribute>,
    #[serde(default)]
    pub effects: Vec<EffectId>,
}

impl TypeRecord {
    /// Base value of an attribute on this type, if the dump carries one.
    pub fn attribute(&self, id: AttributeId) -> Option<f64> {
        self.attributes
            .iter()
            .find(|a| a.attribute_id == id)
            .map(|a| a.value)
    }

    pub fn is_skill(&self) -> bool {
        self.category_id == CAT_SKILL
    }

    /// Whether this type lists `skill` in one of its required-skill slots.
    pub fn requires_skill(&self, skill: TypeId) -> bool {
        REQUIRED_SKILL_ATTRS
            .iter()
            .filter_map(|&slot| self.attribute(slot))
            .any(|v| v as TypeId == skill)
    }
}
