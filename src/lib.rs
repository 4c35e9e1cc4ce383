//! Dogma: an attribute evaluation engine for ship fitting.
//!
//! A [`Context`] holds one live world (a character with skills, a ship with
//! modules and charges, launched drones, implants). Static game data comes
//! from a read-only catalogue pack loaded once per process with [`init`].
//! Attribute queries resolve the cascade of modifiers installed by active
//! effects; see the `engine` module for the core machinery.

use std::fmt;

pub mod cli;
pub mod context;
pub mod data;
pub mod engine;
pub mod eval;
pub mod parallel;
pub mod server;

pub use context::{Context, Location};
pub use data::catalogue::{init, init_from_path, Catalogue};
pub use engine::state::State;

/// Catalogue type id (ships, modules, charges, drones, skills, implants).
pub type TypeId = u32;
/// Attribute id.
pub type AttributeId = u16;
/// Effect id.
pub type EffectId = u32;
/// Expression node id.
pub type ExpressionId = u32;
/// Key addressing a child environment under its parent (module slots,
/// implant indexes). Stable until the caller removes the child.
pub type Key = u64;

/// The only caller-visible failure: the requested entity (type, attribute
/// on an entity, key in a container) does not exist. Everything else is
/// swallowed per the evaluation failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
