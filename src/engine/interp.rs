//! Expression interpreter. Walks an effect's expression tree to resolve
//! locations, filters and operands, and performs the modifier install or
//! removal at the mutator leaves. The same walk serves both directions;
//! in removal mode the mutators retract by identity tuple, which keeps
//! do/undo symmetric by construction.

use crate::context::Context;
use crate::data::catalogue;
use crate::data::effect::EffectRecord;
use crate::data::expression::{ExpressionRecord, Opcode};
use crate::data::types::{CAT_IMPLANT, CAT_SKILL};
use crate::engine::env::{EnvId, POSITIONAL_KEY};
use crate::engine::modifier::{Filter, Modifier, Operator};
use crate::AttributeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Install,
    Remove,
}

/// A resolved location: either one concrete environment, or a location
/// environment plus a filter matched against its descendants at query
/// time.
enum Loc {
    Env(EnvId),
    Filtered(EnvId, Filter),
}

/// Evaluate one effect against the environment entering or leaving the
/// effect's category. Failures (missing rows, unresolvable locations)
/// abort this effect only; the caller continues with its siblings.
pub(crate) fn eval_effect(ctx: &mut Context, env: EnvId, effect: &EffectRecord, mode: Mode) {
    let Some(root) = catalogue::global().lookup_expression(effect.pre_expression) else {
        return;
    };
    let _ = eval_node(ctx, env, effect, root, mode);
}

fn eval_node(
    ctx: &mut Context,
    source_env: EnvId,
    effect: &EffectRecord,
    expr: &ExpressionRecord,
    mode: Mode,
) -> Option<()> {
    match expr.op {
        Opcode::Combine => {
            let first = child(expr.arg1)?;
            eval_node(ctx, source_env, effect, first, mode)?;
            let second = child(expr.arg2)?;
            eval_node(ctx, source_env, effect, second, mode)
        }
        op if op.is_mutator() => {
            let operator = operator_for(op);
            let (target, target_attribute) =
                attribute_spec(ctx, source_env, child(expr.arg1)?)?;
            let (magnitude, source_attribute) =
                match attribute_spec(ctx, source_env, child(expr.arg2)?)? {
                    (Loc::Env(env), attr) => (env, attr),
                    // A filtered set cannot provide a single magnitude.
                    (Loc::Filtered(..), _) => return None,
                };
            let (store_on, filter) = match target {
                Loc::Env(env) => (env, Filter::Pass),
                Loc::Filtered(location, filter) => (location, filter),
            };
            let modifier = Modifier {
                operator,
                source: magnitude,
                effect: effect.id,
                source_attribute,
                filter,
                penaltied: operator.is_multiplicative()
                    && is_penaltied(ctx, target_attribute, magnitude),
            };
            let store = &mut ctx.arena.get_mut(store_on).modifiers;
            match mode {
                Mode::Install => store.add(target_attribute, modifier),
                Mode::Remove => {
                    store.remove(target_attribute, magnitude, effect.id, operator)
                }
            }
            Some(())
        }
        // A bare location or attribute spec at the root mutates nothing.
        _ => None,
    }
}

fn child(id: Option<crate::ExpressionId>) -> Option<&'static ExpressionRecord> {
    catalogue::global().lookup_expression(id?)
}

fn attribute_spec(
    ctx: &Context,
    source_env: EnvId,
    expr: &ExpressionRecord,
) -> Option<(Loc, AttributeId)> {
    if expr.op != Opcode::Attr {
        return None;
    }
    let attribute = expr.attribute_id?;
    let location = resolve_location(ctx, source_env, child(expr.arg1)?)?;
    Some((location, attribute))
}

fn resolve_location(ctx: &Context, source_env: EnvId, expr: &ExpressionRecord) -> Option<Loc> {
    match expr.op {
        Opcode::LocSelf => Some(Loc::Env(source_env)),
        Opcode::LocChar => Some(Loc::Env(ctx.character)),
        Opcode::LocShip => Some(Loc::Env(ctx.ship)),
        Opcode::LocTarget => Some(Loc::Env(ctx.target)),
        Opcode::LocArea => Some(Loc::Env(ctx.area)),
        Opcode::LocOther => other_of(ctx, source_env).map(Loc::Env),
        Opcode::LocGroup => {
            let base = concrete(resolve_location(ctx, source_env, child(expr.arg1)?)?)?;
            Some(Loc::Filtered(base, Filter::Group(expr.group_id?)))
        }
        Opcode::LocSkillReq => {
            let base = concrete(resolve_location(ctx, source_env, child(expr.arg1)?)?)?;
            Some(Loc::Filtered(base, Filter::SkillRequired(expr.type_id?)))
        }
        _ => None,
    }
}

fn concrete(loc: Loc) -> Option<EnvId> {
    match loc {
        Loc::Env(env) => Some(env),
        Loc::Filtered(..) => None,
    }
}

/// The opposite side of a module/charge link: a module's charge sits at
/// the positional key, a charge's module is its parent.
fn other_of(ctx: &Context, env: EnvId) -> Option<EnvId> {
    let record = ctx.arena.get(env);
    if let Some(&charge) = record.children.get(&POSITIONAL_KEY) {
        return Some(charge);
    }
    if record.index == POSITIONAL_KEY {
        return record.parent;
    }
    None
}

/// A modifier is stacking-penalized when its target attribute is flagged
/// non-stackable and its magnitude source is a regular fitted entity.
/// Skills, implants/boosters and the synthetic character are exempt.
fn is_penaltied(ctx: &Context, target_attribute: AttributeId, source: EnvId) -> bool {
    let cat = catalogue::global();
    let stackable = cat
        .lookup_attribute_meta(target_attribute)
        .map(|m| m.stackable)
        .unwrap_or(true);
    if stackable {
        return false;
    }
    match cat.lookup_type(ctx.arena.get(source).type_id) {
        Some(t) => t.category_id != CAT_SKILL && t.category_id != CAT_IMPLANT,
        None => false,
    }
}

fn operator_for(op: Opcode) -> Operator {
    match op {
        Opcode::PreAssign => Operator::PreAssign,
        Opcode::PreMul => Operator::PreMul,
        Opcode::PreDiv => Operator::PreDiv,
        Opcode::ModAdd => Operator::ModAdd,
        Opcode::ModSub => Operator::ModSub,
        Opcode::PostMul => Operator::PostMul,
        Opcode::PostDiv => Operator::PostDiv,
        Opcode::PostPercent => Operator::PostPercent,
        Opcode::PostAssign => Operator::PostAssign,
        _ => unreachable!("operator_for called on a non-mutator opcode"),
    }
}
