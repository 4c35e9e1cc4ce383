//! The evaluation core: environment arena, state machine, modifier store,
//! effect activator, expression interpreter and attribute resolver.

pub mod activator;
pub mod env;
pub mod interp;
pub mod modifier;
pub mod resolve;
pub mod stacking;
pub mod state;

pub use modifier::{Filter, Modifier, Operator};
pub use state::State;
