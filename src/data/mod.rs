pub mod attribute;
pub mod catalogue;
pub mod effect;
pub mod expression;
pub mod loader;
pub mod provenance;
pub mod types;
pub mod validate;

pub use attribute::AttributeMeta;
pub use catalogue::{global, Catalogue, DEFAULT_CATALOGUE_PATH};
pub use effect::EffectRecord;
pub use expression::{ExpressionRecord, Opcode};
pub use loader::{load_pack, CataloguePack, PackError};
pub use types::{TypeRecord, CAT_IMPLANT, CAT_SKILL};
