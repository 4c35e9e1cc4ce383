//! Expression nodes: immutable trees interpreted by the effect activator.
//! Opcodes split into mutators (install/remove a modifier), attribute
//! specs, and location/filter navigation.

use serde::{Deserialize, Serialize};

use crate::{AttributeId, ExpressionId, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// Evaluate `arg1` then `arg2`.
    Combine,
    // Mutators: `arg1` is the target attribute spec, `arg2` the magnitude
    // attribute spec.
    PreAssign,
    PreMul,
    PreDiv,
    ModAdd,
    ModSub,
    PostMul,
    PostDiv,
    PostPercent,
    PostAssign,
    /// Attribute spec: `arg1` is a location expression, `attribute_id` the
    /// attribute addressed on it.
    Attr,
    // Locations.
    LocSelf,
    LocShip,
    LocChar,
    LocTarget,
    LocOther,
    LocArea,
    // Filters over a base location (`arg1`).
    LocGroup,
    LocSkillReq,
}

impl Opcode {
    pub fn is_mutator(self) -> bool {
        matches!(
            self,
            Opcode::PreAssign
                | Opcode::PreMul
                | Opcode::PreDiv
                | Opcode::ModAdd
                | Opcode::ModSub
                | Opcode::PostMul
                | Opcode::PostDiv
                | Opcode::PostPercent
                | Opcode::PostAssign
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionRecord {
    pub id: ExpressionId,
    pub op: Opcode,
    #[serde(default)]
    pub arg1: Option<ExpressionId>,
    #[serde(default)]
    pub arg2: Option<ExpressionId>,
    #[serde(default)]
    pub attribute_id: Option<AttributeId>,
    #[serde(default)]
    pub group_id: Option<u32>,
    #[serde(default)]
    pub type_id: Option<TypeId>,
}
