//! One live fitting world: a character with skills, a ship with modules
//! and charges, launched drones and implants, plus the synthetic target
//! and area environments. The mutators here are thin containment
//! bookkeeping over the engine; all state transitions funnel through the
//! activator so modifier presence stays consistent.
//!
//! No category checking is done on type ids: callers may fit a skill book
//! as a module and the engine will evaluate whatever effects it carries.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::catalogue;
use crate::engine::activator;
use crate::engine::env::{EnvArena, EnvId, POSITIONAL_KEY};
use crate::engine::resolve;
use crate::engine::state::{State, STATE_NONE};
use crate::{AttributeId, Error, Key, Result, TypeId};

pub const MIN_SKILL_LEVEL: u8 = 0;
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Addresses an entity in a context for attribute queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Character,
    Ship,
    Implant { index: Key },
    Module { index: Key },
    Charge { index: Key },
    Drone { type_id: TypeId },
}

#[derive(Debug)]
pub(crate) struct DroneEntry {
    pub env: EnvId,
    pub quantity: u32,
}

/// A context owns its whole world; two contexts share only the read-only
/// catalogue and can live on different threads.
#[derive(Debug)]
pub struct Context {
    pub(crate) arena: EnvArena,
    pub(crate) character: EnvId,
    pub(crate) ship: EnvId,
    pub(crate) target: EnvId,
    pub(crate) area: EnvId,
    pub(crate) default_skill_level: u8,
    pub(crate) skill_levels: BTreeMap<TypeId, u8>,
    drones: BTreeMap<TypeId, DroneEntry>,
    implants: BTreeSet<Key>,
}

impl Context {
    /// Create a context and inject every skill in the catalogue at the
    /// default level. Requires [`crate::init`] to have run.
    pub fn new() -> Context {
        let cat = catalogue::global();
        let mut arena = EnvArena::new();
        let character = arena.create(0, None);
        arena.get_mut(character).owner = Some(character);
        let ship = arena.create(0, Some(character));
        arena.attach_at(character, POSITIONAL_KEY, ship);
        let target = arena.create(0, None);
        let area = arena.create(0, None);

        let mut ctx = Context {
            arena,
            character,
            ship,
            target,
            area,
            default_skill_level: MAX_SKILL_LEVEL,
            skill_levels: BTreeMap::new(),
            drones: BTreeMap::new(),
            implants: BTreeSet::new(),
        };

        let skill_ids: Vec<TypeId> = cat
            .iter_types()
            .filter(|t| t.is_skill())
            .map(|t| t.id)
            .collect();
        for skill in skill_ids {
            let env = ctx.arena.create(skill, Some(ctx.character));
            ctx.arena.attach(ctx.character, env);
            activator::set_env_state(&mut ctx, env, State::Online.mask());
        }
        ctx
    }

    // ------------------------------------------------------------------
    // Skills
    // ------------------------------------------------------------------

    /// Default level for every skill without an override. Clamped to
    /// [0, 5].
    pub fn set_default_skill_level(&mut self, level: u8) {
        self.default_skill_level = level.clamp(MIN_SKILL_LEVEL, MAX_SKILL_LEVEL);
    }

    /// Override one skill's level, clamped to [0, 5]. Unknown ids are
    /// stored blindly; they simply never match a skill environment.
    pub fn set_skill_level(&mut self, skill: TypeId, level: u8) {
        self.skill_levels
            .insert(skill, level.clamp(MIN_SKILL_LEVEL, MAX_SKILL_LEVEL));
    }

    /// Forget all overrides. Leaves the default level untouched.
    pub fn reset_skill_levels(&mut self) {
        self.skill_levels.clear();
    }

    pub(crate) fn effective_skill_level(&self, skill: TypeId) -> u8 {
        self.skill_levels
            .get(&skill)
            .copied()
            .unwrap_or(self.default_skill_level)
    }

    // ------------------------------------------------------------------
    // Ship and modules
    // ------------------------------------------------------------------

    /// Swap the hull. Id 0 detaches the current ship's own effects while
    /// leaving fitted modules in place with their states preserved. A
    /// no-op when the id is unchanged.
    pub fn set_ship(&mut self, type_id: TypeId) {
        let ship = self.ship;
        if self.arena.get(ship).type_id == type_id {
            return;
        }
        activator::set_env_state(self, ship, STATE_NONE);
        self.arena.get_mut(ship).type_id = type_id;
        activator::set_env_state(self, ship, State::Online.mask());
    }

    /// Fit a module. It starts in the zero state: not even offline, none
    /// of its effects evaluated until [`Context::set_module_state`].
    pub fn add_module(&mut self, type_id: TypeId) -> Key {
        let env = self.arena.create(type_id, Some(self.character));
        self.arena.attach(self.ship, env)
    }

    pub fn remove_module(&mut self, index: Key) -> Result<()> {
        let env = self.arena.child(self.ship, index).ok_or(Error::NotFound)?;
        self.retire_env(env);
        Ok(())
    }

    pub fn set_module_state(&mut self, index: Key, state: State) -> Result<()> {
        let env = self.arena.child(self.ship, index).ok_or(Error::NotFound)?;
        activator::set_env_state(self, env, state.mask());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Charges
    // ------------------------------------------------------------------

    /// Load a charge into a module, replacing and fully retracting any
    /// charge already loaded. Charges are always active.
    pub fn add_charge(&mut self, module_index: Key, type_id: TypeId) -> Result<()> {
        let module = self
            .arena
            .child(self.ship, module_index)
            .ok_or(Error::NotFound)?;
        self.remove_charge(module_index)?;
        let charge = self.arena.create(type_id, Some(self.character));
        self.arena.attach_at(module, POSITIONAL_KEY, charge);
        activator::set_env_state(self, charge, State::Active.mask());
        Ok(())
    }

    /// Unload a module's charge. No effect when the module is empty.
    pub fn remove_charge(&mut self, module_index: Key) -> Result<()> {
        let module = self
            .arena
            .child(self.ship, module_index)
            .ok_or(Error::NotFound)?;
        debug_assert!(
            self.arena.get(module).children.len() <= 1,
            "module holds more than one charge"
        );
        if let Some(charge) = self.arena.child(module, POSITIONAL_KEY) {
            self.retire_env(charge);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Drones
    // ------------------------------------------------------------------

    /// Launch `quantity` drones of one type. A single environment backs
    /// all drones of a type; quantity is bookkeeping only and never
    /// scales an attribute.
    pub fn add_drone(&mut self, type_id: TypeId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self.drones.get_mut(&type_id) {
            entry.quantity += quantity;
            return;
        }
        let env = self.arena.create(type_id, Some(self.character));
        self.arena.attach(self.character, env);
        self.drones.insert(type_id, DroneEntry { env, quantity });
        activator::set_env_state(self, env, State::Active.mask());
    }

    /// Recall up to `quantity` drones; recalling at least as many as are
    /// launched removes the type entirely. Unknown types are a no-op.
    pub fn remove_drone_partial(&mut self, type_id: TypeId, quantity: u32) {
        let Some(entry) = self.drones.get_mut(&type_id) else {
            return;
        };
        if quantity >= entry.quantity {
            self.remove_drone(type_id);
        } else {
            entry.quantity -= quantity;
        }
    }

    /// Recall all drones of a type, however many were launched.
    pub fn remove_drone(&mut self, type_id: TypeId) {
        let Some(entry) = self.drones.remove(&type_id) else {
            return;
        };
        self.retire_env(entry.env);
    }

    // ------------------------------------------------------------------
    // Implants
    // ------------------------------------------------------------------

    /// Plug in an implant or booster; returns the key for later removal.
    pub fn add_implant(&mut self, type_id: TypeId) -> Key {
        let env = self.arena.create(type_id, Some(self.character));
        let key = self.arena.attach(self.character, env);
        self.implants.insert(key);
        activator::set_env_state(self, env, State::Online.mask());
        key
    }

    pub fn remove_implant(&mut self, index: Key) -> Result<()> {
        if !self.implants.remove(&index) {
            return Err(Error::NotFound);
        }
        let env = self
            .arena
            .child(self.character, index)
            .ok_or(Error::NotFound)?;
        self.retire_env(env);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Attribute queries
    // ------------------------------------------------------------------

    /// Effective value of an attribute anywhere in this world. Every
    /// per-location getter funnels here.
    pub fn location_attribute(&self, location: Location, attribute: AttributeId) -> Result<f64> {
        let env = self.location_env(location)?;
        resolve::attribute(self, env, attribute)
    }

    pub fn character_attribute(&self, attribute: AttributeId) -> Result<f64> {
        self.location_attribute(Location::Character, attribute)
    }

    pub fn ship_attribute(&self, attribute: AttributeId) -> Result<f64> {
        self.location_attribute(Location::Ship, attribute)
    }

    pub fn implant_attribute(&self, index: Key, attribute: AttributeId) -> Result<f64> {
        self.location_attribute(Location::Implant { index }, attribute)
    }

    pub fn module_attribute(&self, index: Key, attribute: AttributeId) -> Result<f64> {
        self.location_attribute(Location::Module { index }, attribute)
    }

    pub fn charge_attribute(&self, index: Key, attribute: AttributeId) -> Result<f64> {
        self.location_attribute(Location::Charge { index }, attribute)
    }

    pub fn drone_attribute(&self, type_id: TypeId, attribute: AttributeId) -> Result<f64> {
        self.location_attribute(Location::Drone { type_id }, attribute)
    }

    fn location_env(&self, location: Location) -> Result<EnvId> {
        match location {
            Location::Character => Ok(self.character),
            Location::Ship => Ok(self.ship),
            Location::Implant { index } => {
                if !self.implants.contains(&index) {
                    return Err(Error::NotFound);
                }
                self.arena.child(self.character, index).ok_or(Error::NotFound)
            }
            Location::Module { index } => {
                self.arena.child(self.ship, index).ok_or(Error::NotFound)
            }
            Location::Charge { index } => {
                let module = self.arena.child(self.ship, index).ok_or(Error::NotFound)?;
                self.arena.child(module, POSITIONAL_KEY).ok_or(Error::NotFound)
            }
            Location::Drone { type_id } => self
                .drones
                .get(&type_id)
                .map(|entry| entry.env)
                .ok_or(Error::NotFound),
        }
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Retire an environment: children first, then its own state to zero
    /// so every installed modifier is retracted while the tree is still
    /// linked, then detach and release.
    fn retire_env(&mut self, env: EnvId) {
        let children: Vec<EnvId> = self.arena.get(env).children.values().copied().collect();
        for child in children {
            self.retire_env(child);
        }
        activator::set_env_state(self, env, STATE_NONE);
        if let Some(parent) = self.arena.get(env).parent {
            let index = self.arena.get(env).index;
            self.arena.detach(parent, index);
        }
        self.arena.release(env);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
