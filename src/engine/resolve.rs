//! Attribute resolver: base value, modifier gathering, lazy magnitude
//! resolution and the operator-order fold with stacking penalties.

use crate::context::Context;
use crate::data::catalogue;
use crate::data::types::TypeRecord;
use crate::engine::env::EnvId;
use crate::engine::modifier::{Filter, Modifier, Operator};
use crate::engine::stacking;
use crate::{AttributeId, Error, Result};

/// Effective value of one attribute on one environment.
pub(crate) fn attribute(ctx: &Context, env: EnvId, attribute: AttributeId) -> Result<f64> {
    let mut in_flight = Vec::new();
    resolve(ctx, env, attribute, &mut in_flight)
}

fn resolve(
    ctx: &Context,
    env: EnvId,
    attribute: AttributeId,
    in_flight: &mut Vec<(EnvId, AttributeId)>,
) -> Result<f64> {
    let cat = catalogue::global();
    let record = ctx.arena.get(env);
    let type_record = cat.lookup_type(record.type_id);

    // Owned skills resolve to the character's level for that skill and
    // ignore their modifier store entirely.
    if type_record.is_some_and(TypeRecord::is_skill) && record.owner.is_some() {
        return Ok(f64::from(ctx.effective_skill_level(record.type_id)));
    }

    let base = base_value(type_record, attribute)?;

    // Break magnitude cycles by falling back to the base value.
    if in_flight.contains(&(env, attribute)) {
        return Ok(base);
    }
    in_flight.push((env, attribute));
    let value = apply_modifiers(ctx, env, attribute, base, in_flight);
    in_flight.pop();
    Ok(value)
}

fn base_value(type_record: Option<&TypeRecord>, attribute: AttributeId) -> Result<f64> {
    if let Some(value) = type_record.and_then(|t| t.attribute(attribute)) {
        return Ok(value);
    }
    catalogue::global()
        .lookup_attribute_meta(attribute)
        .map(|meta| meta.default_value)
        .ok_or(Error::NotFound)
}

/// Modifiers applying to `env`: its own direct modifiers, plus filtered
/// modifiers held by its ancestors whose filter matches `env`'s type.
fn gather(ctx: &Context, env: EnvId, attribute: AttributeId) -> Vec<Modifier> {
    let cat = catalogue::global();
    let record = ctx.arena.get(env);
    let env_type = cat.lookup_type(record.type_id);

    let mut gathered: Vec<Modifier> = record
        .modifiers
        .iter_attribute(attribute)
        .filter(|m| m.filter == Filter::Pass)
        .copied()
        .collect();

    let mut ancestor = record.parent;
    while let Some(id) = ancestor {
        let holder = ctx.arena.get(id);
        for m in holder.modifiers.iter_attribute(attribute) {
            let applies = match m.filter {
                Filter::Pass => false,
                Filter::Group(group) => env_type.is_some_and(|t| t.group_id == group),
                Filter::SkillRequired(skill) => env_type.is_some_and(|t| t.requires_skill(skill)),
            };
            if applies {
                gathered.push(*m);
            }
        }
        ancestor = holder.parent;
    }

    // Catalogue order; also the assign tie-break (last write wins).
    gathered.sort_by_key(|m| (m.effect, m.source));
    gathered
}

fn apply_modifiers(
    ctx: &Context,
    env: EnvId,
    attribute: AttributeId,
    base: f64,
    in_flight: &mut Vec<(EnvId, AttributeId)>,
) -> f64 {
    let gathered = gather(ctx, env, attribute);
    if gathered.is_empty() {
        return base;
    }
    let high_is_good = catalogue::global()
        .lookup_attribute_meta(attribute)
        .map(|m| m.high_is_good)
        .unwrap_or(true);

    let mut acc = base;
    for operator in Operator::APPLY_ORDER {
        let mut magnitudes: Vec<(f64, bool)> = Vec::new();
        for m in gathered.iter().filter(|m| m.operator == operator) {
            // A modifier whose magnitude cannot be resolved is skipped,
            // matching the swallow policy for missing catalogue rows.
            if let Ok(value) = resolve(ctx, m.source, m.source_attribute, in_flight) {
                magnitudes.push((value, m.penaltied));
            }
        }
        if magnitudes.is_empty() {
            continue;
        }
        acc = apply_operator(acc, operator, magnitudes, high_is_good);
    }
    acc
}

fn apply_operator(
    acc: f64,
    operator: Operator,
    magnitudes: Vec<(f64, bool)>,
    high_is_good: bool,
) -> f64 {
    match operator {
        Operator::PreAssign | Operator::PostAssign => magnitudes
            .last()
            .map(|&(value, _)| value)
            .unwrap_or(acc),
        Operator::ModAdd => magnitudes.iter().fold(acc, |a, &(v, _)| a + v),
        Operator::ModSub => magnitudes.iter().fold(acc, |a, &(v, _)| a - v),
        Operator::PreMul
        | Operator::PreDiv
        | Operator::PostMul
        | Operator::PostDiv
        | Operator::PostPercent => {
            let mut acc = acc;
            let mut penalized = Vec::new();
            for (value, penaltied) in magnitudes {
                let Some(factor) = factor_for(operator, value) else {
                    continue;
                };
                if penaltied {
                    penalized.push(factor);
                } else {
                    acc *= factor;
                }
            }
            stacking::apply_penalized_chain(acc, penalized, high_is_good)
        }
    }
}

fn factor_for(operator: Operator, value: f64) -> Option<f64> {
    match operator {
        Operator::PreMul | Operator::PostMul => Some(value),
        Operator::PreDiv | Operator::PostDiv => (value != 0.0).then(|| 1.0 / value),
        Operator::PostPercent => Some(1.0 + value / 100.0),
        _ => None,
    }
}
