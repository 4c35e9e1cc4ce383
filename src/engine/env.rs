//! The live world: an arena of environment records addressed by stable
//! integer handles. Parent and owner links are handles, never owning
//! references, so the containment graph can point both ways.

use std::collections::BTreeMap;

use crate::engine::modifier::ModifierStore;
use crate::engine::state::STATE_NONE;
use crate::{Key, TypeId};

/// Child keys below this are positional (the ship lives at key 0 under the
/// character); user-facing children (modules, drones, implants, skills)
/// allocate the first free key at or above it.
pub const FIRST_USER_KEY: Key = 8;

/// Key of the ship under the character, and of a charge under its module.
pub const POSITIONAL_KEY: Key = 0;

/// Handle to an environment in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvId(u32);

#[derive(Debug)]
pub struct Environment {
    /// Type this environment represents; 0 for the synthetic character,
    /// target and area.
    pub type_id: TypeId,
    pub parent: Option<EnvId>,
    /// Key under the parent by which this child is addressed.
    pub index: Key,
    pub children: BTreeMap<Key, EnvId>,
    /// Bitmask over effect categories; maintained by the activator only.
    pub state: u8,
    pub modifiers: ModifierStore,
    /// The character environment, for skill-level lookups mid-resolution.
    pub owner: Option<EnvId>,
}

#[derive(Debug, Default)]
pub struct EnvArena {
    slots: Vec<Option<Environment>>,
    free: Vec<u32>,
}

impl EnvArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unattached environment. Containment is established
    /// separately so positional and allocated keys share one path.
    pub fn create(&mut self, type_id: TypeId, owner: Option<EnvId>) -> EnvId {
        let env = Environment {
            type_id,
            parent: None,
            index: 0,
            children: BTreeMap::new(),
            state: STATE_NONE,
            modifiers: ModifierStore::new(),
            owner,
        };
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(env);
                EnvId(slot)
            }
            None => {
                self.slots.push(Some(env));
                EnvId(self.slots.len() as u32 - 1)
            }
        }
    }

    pub fn get(&self, id: EnvId) -> &Environment {
        self.slots[id.0 as usize]
            .as_ref()
            .expect("environment handle used after free")
    }

    pub fn get_mut(&mut self, id: EnvId) -> &mut Environment {
        self.slots[id.0 as usize]
            .as_mut()
            .expect("environment handle used after free")
    }

    /// Attach `child` under `parent` at a fixed positional key.
    pub fn attach_at(&mut self, parent: EnvId, key: Key, child: EnvId) {
        debug_assert!(!self.get(parent).children.contains_key(&key));
        self.get_mut(parent).children.insert(key, child);
        let env = self.get_mut(child);
        env.parent = Some(parent);
        env.index = key;
    }

    /// Attach `child` under `parent` at the first free user key. Returns
    /// the allocated key; keys freed by detach are reused.
    pub fn attach(&mut self, parent: EnvId, child: EnvId) -> Key {
        let key = self.first_free_key(parent);
        self.attach_at(parent, key, child);
        key
    }

    pub fn detach(&mut self, parent: EnvId, key: Key) -> Option<EnvId> {
        let child = self.get_mut(parent).children.remove(&key)?;
        let env = self.get_mut(child);
        env.parent = None;
        Some(child)
    }

    pub fn child(&self, parent: EnvId, key: Key) -> Option<EnvId> {
        self.get(parent).children.get(&key).copied()
    }

    /// Release one environment's slot. Precondition: state already zeroed
    /// and children already released (the context tears down deepest-first
    /// so modifiers retract while the tree is still linked).
    pub fn release(&mut self, id: EnvId) {
        let env = self.slots[id.0 as usize]
            .take()
            .expect("environment released twice");
        debug_assert_eq!(env.state, STATE_NONE, "released environment still has active state");
        debug_assert!(env.children.is_empty(), "released environment still has children");
        self.free.push(id.0);
    }

    fn first_free_key(&self, parent: EnvId) -> Key {
        let mut candidate = FIRST_USER_KEY;
        for &key in self.get(parent).children.keys() {
            if key < candidate {
                continue;
            }
            if key == candidate {
                candidate += 1;
            } else {
                break;
            }
        }
        candidate
    }
}
