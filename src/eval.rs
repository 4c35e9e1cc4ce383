//! Fit descriptions and evaluation reports: the serde surface shared by
//! the CLI `eval` subcommand, the HTTP API and the parallel batch runner.
//! A fit is built into a fresh context, queried, and dropped.

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::data::catalogue;
use crate::engine::state::State;
use crate::{AttributeId, Key, Location, TypeId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillLevelSpec {
    pub skill: TypeId,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub type_id: TypeId,
    #[serde(default = "default_module_state")]
    pub state: State,
    #[serde(default)]
    pub charge: Option<TypeId>,
}

fn default_module_state() -> State {
    State::Online
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneSpec {
    pub type_id: TypeId,
    #[serde(default = "default_drone_quantity")]
    pub quantity: u32,
}

fn default_drone_quantity() -> u32 {
    1
}

/// A complete loadout, in the order it is applied to a fresh context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSpec {
    pub ship: TypeId,
    #[serde(default)]
    pub default_skill_level: Option<u8>,
    #[serde(default)]
    pub skills: Vec<SkillLevelSpec>,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    #[serde(default)]
    pub drones: Vec<DroneSpec>,
    #[serde(default)]
    pub implants: Vec<TypeId>,
}

/// What to query. Modules, charges and implants are addressed by their
/// position in the fit (not by runtime key, which the caller never sees).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuerySubject {
    Character,
    Ship,
    Module { slot: usize },
    Charge { slot: usize },
    Drone { type_id: TypeId },
    Implant { slot: usize },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttributeQuery {
    #[serde(flatten)]
    pub subject: QuerySubject,
    pub attribute: AttributeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRequest {
    pub fit: FitSpec,
    pub queries: Vec<AttributeQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeValue {
    #[serde(flatten)]
    pub query: AttributeQuery,
    /// None when the subject or attribute does not exist.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    pub values: Vec<AttributeValue>,
}

/// Keys allocated while applying a fit, for slot-based queries.
#[derive(Debug, Default)]
pub struct FitKeys {
    pub modules: Vec<Key>,
    pub implants: Vec<Key>,
}

/// Apply a fit to a fresh context.
pub fn build_context(fit: &FitSpec) -> (Context, FitKeys) {
    let mut ctx = Context::new();
    let mut keys = FitKeys::default();

    if let Some(level) = fit.default_skill_level {
        ctx.set_default_skill_level(level);
    }
    for s in &fit.skills {
        ctx.set_skill_level(s.skill, s.level);
    }
    ctx.set_ship(fit.ship);
    for m in &fit.modules {
        let key = ctx.add_module(m.type_id);
        keys.modules.push(key);
        // State first, then charge: charges activate on attach either way.
        let _ = ctx.set_module_state(key, m.state);
        if let Some(charge) = m.charge {
            let _ = ctx.add_charge(key, charge);
        }
    }
    for d in &fit.drones {
        ctx.add_drone(d.type_id, d.quantity);
    }
    for &implant in &fit.implants {
        keys.implants.push(ctx.add_implant(implant));
    }
    (ctx, keys)
}

/// Evaluate every query of a request against one freshly built context.
pub fn evaluate(request: &EvalRequest) -> EvalReport {
    let (ctx, keys) = build_context(&request.fit);
    let values = request
        .queries
        .iter()
        .map(|&query| AttributeValue {
            query,
            value: location_for(&keys, query.subject)
                .and_then(|location| ctx.location_attribute(location, query.attribute).ok()),
        })
        .collect();
    EvalReport {
        data_version: catalogue::global().data_version().map(String::from),
        values,
    }
}

fn location_for(keys: &FitKeys, subject: QuerySubject) -> Option<Location> {
    match subject {
        QuerySubject::Character => Some(Location::Character),
        QuerySubject::Ship => Some(Location::Ship),
        QuerySubject::Module { slot } => keys
            .modules
            .get(slot)
            .map(|&index| Location::Module { index }),
        QuerySubject::Charge { slot } => keys
            .modules
            .get(slot)
            .map(|&index| Location::Charge { index }),
        QuerySubject::Drone { type_id } => Some(Location::Drone { type_id }),
        QuerySubject::Implant { slot } => keys
            .implants
            .get(slot)
            .map(|&index| Location::Implant { index }),
    }
}
