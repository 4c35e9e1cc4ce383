//! Modifiers and the per-environment store. A modifier records *where its
//! magnitude comes from*, never a resolved number; the resolver reads the
//! source attribute at query time so chained bonuses stay correct.

use std::collections::BTreeMap;

use crate::engine::env::EnvId;
use crate::{AttributeId, EffectId, TypeId};

/// Modifier operators, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Operator {
    PreAssign,
    PreMul,
    PreDiv,
    ModAdd,
    ModSub,
    PostMul,
    PostDiv,
    PostPercent,
    PostAssign,
}

impl Operator {
    pub const APPLY_ORDER: [Operator; 9] = [
        Operator::PreAssign,
        Operator::PreMul,
        Operator::PreDiv,
        Operator::ModAdd,
        Operator::ModSub,
        Operator::PostMul,
        Operator::PostDiv,
        Operator::PostPercent,
        Operator::PostAssign,
    ];

    /// Operators whose penalized contributions stack with diminishing
    /// returns.
    pub fn is_multiplicative(self) -> bool {
        matches!(
            self,
            Operator::PreMul
                | Operator::PreDiv
                | Operator::PostMul
                | Operator::PostDiv
                | Operator::PostPercent
        )
    }
}

/// Scope of a modifier held on a location environment. Filtered modifiers
/// apply to descendants matched at query time, never to the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Applies directly to the environment holding it.
    Pass,
    /// Applies to descendants of the holder whose type is in this group.
    Group(u32),
    /// Applies to descendants of the holder whose type requires this
    /// skill.
    SkillRequired(TypeId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifier {
    pub operator: Operator,
    /// Environment whose attribute provides the magnitude.
    pub source: EnvId,
    /// Effect that installed this modifier; part of its identity.
    pub effect: EffectId,
    pub source_attribute: AttributeId,
    pub filter: Filter,
    pub penaltied: bool,
}

impl Modifier {
    fn same_identity(&self, other: &Modifier) -> bool {
        self.source == other.source
            && self.effect == other.effect
            && self.operator == other.operator
    }
}

/// Per-environment set of installed modifiers, indexed by the attribute
/// they target.
#[derive(Debug, Default)]
pub struct ModifierStore {
    by_attribute: BTreeMap<AttributeId, Vec<Modifier>>,
}

impl ModifierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a modifier. Idempotent on the
    /// (source, effect, operator, target attribute) identity tuple.
    pub fn add(&mut self, target_attribute: AttributeId, modifier: Modifier) {
        let list = self.by_attribute.entry(target_attribute).or_default();
        if list.iter().any(|m| m.same_identity(&modifier)) {
            return;
        }
        list.push(modifier);
    }

    /// Retract a modifier by identity tuple. A missing entry means the
    /// activator's do/undo symmetry broke.
    pub fn remove(
        &mut self,
        target_attribute: AttributeId,
        source: EnvId,
        effect: EffectId,
        operator: Operator,
    ) {
        let Some(list) = self.by_attribute.get_mut(&target_attribute) else {
            debug_assert!(false, "retracting modifier from empty attribute slot");
            return;
        };
        let before = list.len();
        list.retain(|m| !(m.source == source && m.effect == effect && m.operator == operator));
        debug_assert_eq!(before, list.len() + 1, "modifier retraction did not match exactly one entry");
        if list.is_empty() {
            self.by_attribute.remove(&target_attribute);
        }
    }

    pub fn iter_attribute(&self, target_attribute: AttributeId) -> impl Iterator<Item = &Modifier> {
        self.by_attribute
            .get(&target_attribute)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
    }

    pub fn is_empty(&self) -> bool {
        self.by_attribute.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier(effect: EffectId, operator: Operator) -> Modifier {
        Modifier {
            operator,
            source: test_env(),
            effect,
            source_attribute: 620,
            filter: Filter::Pass,
            penaltied: false,
        }
    }

    fn test_env() -> EnvId {
        let mut arena = crate::engine::env::EnvArena::new();
        arena.create(0, None)
    }

    #[test]
    fn add_is_idempotent_on_identity() {
        let mut store = ModifierStore::new();
        store.add(64, modifier(9001, Operator::PostPercent));
        store.add(64, modifier(9001, Operator::PostPercent));
        assert_eq!(store.iter_attribute(64).count(), 1);
    }

    #[test]
    fn distinct_operators_coexist() {
        let mut store = ModifierStore::new();
        store.add(64, modifier(9001, Operator::PostPercent));
        store.add(64, modifier(9001, Operator::PreMul));
        assert_eq!(store.iter_attribute(64).count(), 2);
    }

    #[test]
    fn remove_clears_exactly_the_identity() {
        let mut store = ModifierStore::new();
        store.add(64, modifier(9001, Operator::PostPercent));
        store.add(64, modifier(9002, Operator::PostPercent));
        store.remove(64, test_env(), 9001, Operator::PostPercent);
        let rest: Vec<_> = store.iter_attribute(64).collect();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].effect, 9002);
    }
}
