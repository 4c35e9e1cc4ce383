//! The effect activator: the one place environment states change. A
//! transition diffs the old and new bitmasks and evaluates exactly the
//! effects whose category bit flipped, keeping the invariant that an
//! effect's modifiers are installed iff its category bit is set.

use crate::context::Context;
use crate::data::catalogue;
use crate::engine::env::EnvId;
use crate::engine::interp::{self, Mode};

/// Transition `env` to `new_state`. Effects are independent: one effect
/// failing mid-walk neither rolls back its siblings nor fails the
/// transition.
pub(crate) fn set_env_state(ctx: &mut Context, env: EnvId, new_state: u8) {
    let old_state = ctx.arena.get(env).state;
    if old_state == new_state {
        return;
    }
    let delta_on = new_state & !old_state;
    let delta_off = old_state & !new_state;

    let type_id = ctx.arena.get(env).type_id;
    let effects: Vec<_> = catalogue::global().effects_of(type_id).collect();
    for effect in effects {
        let bit = effect.category_bit();
        if bit == 0 {
            continue;
        }
        if delta_off & bit != 0 {
            interp::eval_effect(ctx, env, effect, Mode::Remove);
        }
        if delta_on & bit != 0 {
            interp::eval_effect(ctx, env, effect, Mode::Install);
        }
    }
    ctx.arena.get_mut(env).state = new_state;
}
