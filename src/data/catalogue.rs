//! Startup-loaded read-only catalogue. Loaded once per process and shared
//! by every context; contexts have no other shared mutable state.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::data::attribute::AttributeMeta;
use crate::data::effect::EffectRecord;
use crate::data::expression::ExpressionRecord;
use crate::data::loader::{load_pack, CataloguePack, PackError};
use crate::data::types::TypeRecord;
use crate::{AttributeId, EffectId, ExpressionId, TypeId};

pub const DEFAULT_CATALOGUE_PATH: &str = "data/catalogue.json";

/// Environment variable overriding the default pack path.
pub const DATA_PATH_ENV: &str = "DOGMA_DATA";

#[derive(Debug)]
pub struct Catalogue {
    data_version: Option<String>,
    attributes: BTreeMap<AttributeId, AttributeMeta>,
    types: BTreeMap<TypeId, TypeRecord>,
    effects: BTreeMap<EffectId, EffectRecord>,
    expressions: BTreeMap<ExpressionId, ExpressionRecord>,
}

impl Catalogue {
    pub fn from_pack(pack: CataloguePack) -> Self {
        Catalogue {
            data_version: pack.data_version,
            attributes: pack.attributes.into_iter().map(|a| (a.id, a)).collect(),
            types: pack.types.into_iter().map(|t| (t.id, t)).collect(),
            effects: pack.effects.into_iter().map(|e| (e.id, e)).collect(),
            expressions: pack.expressions.into_iter().map(|x| (x.id, x)).collect(),
        }
    }

    pub fn data_version(&self) -> Option<&str> {
        self.data_version.as_deref()
    }

    pub fn lookup_type(&self, id: TypeId) -> Option<&TypeRecord> {
        self.types.get(&id)
    }

    /// All types in ascending id order. Used once per context creation to
    /// inject skills.
    pub fn iter_types(&self) -> impl Iterator<Item = &TypeRecord> {
        self.types.values()
    }

    pub fn lookup_attribute_meta(&self, id: AttributeId) -> Option<&AttributeMeta> {
        self.attributes.get(&id)
    }

    /// Effects attached to a type. Dangling effect ids in the dump are
    /// skipped, matching the swallow-missing-rows policy.
    pub fn effects_of(&self, type_id: TypeId) -> impl Iterator<Item = &EffectRecord> {
        self.types
            .get(&type_id)
            .map(|t| t.effects.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.effects.get(id))
    }

    pub fn lookup_expression(&self, id: ExpressionId) -> Option<&ExpressionRecord> {
        self.expressions.get(&id)
    }
}

static CATALOGUE: OnceLock<Catalogue> = OnceLock::new();

/// Load the catalogue from `DOGMA_DATA` or the default path. Idempotent:
/// the first successful load wins for the lifetime of the process.
pub fn init() -> Result<(), PackError> {
    let path = std::env::var(DATA_PATH_ENV).unwrap_or_else(|_| DEFAULT_CATALOGUE_PATH.to_string());
    init_from_path(Path::new(&path))
}

/// Load the catalogue from an explicit path. No-op if already initialized.
pub fn init_from_path(path: &Path) -> Result<(), PackError> {
    if CATALOGUE.get().is_some() {
        return Ok(());
    }
    let pack = load_pack(path)?;
    let _ = CATALOGUE.set(Catalogue::from_pack(pack));
    Ok(())
}

/// The process-wide catalogue. Creating a context before `init` is a
/// programming error.
pub fn global() -> &'static Catalogue {
    CATALOGUE
        .get()
        .expect("catalogue not initialized; call dogma::init() first")
}

pub fn try_global() -> Option<&'static Catalogue> {
    CATALOGUE.get()
}
