//! Catalogue pack loading. The pack is a single JSON document holding the
//! four static tables (attributes, types, effects, expressions).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::attribute::AttributeMeta;
use crate::data::effect::EffectRecord;
use crate::data::expression::ExpressionRecord;
use crate::data::types::TypeRecord;

#[derive(Debug)]
pub enum PackError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "catalogue pack unreadable: {err}"),
            Self::Parse(err) => write!(f, "catalogue pack malformed: {err}"),
        }
    }
}

impl std::error::Error for PackError {}

/// The raw deserialized pack, before id-indexing. Kept around by the
/// validator, which reports on the flat tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CataloguePack {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeMeta>,
    #[serde(default)]
    pub types: Vec<TypeRecord>,
    #[serde(default)]
    pub effects: Vec<EffectRecord>,
    #[serde(default)]
    pub expressions: Vec<ExpressionRecord>,
}

pub fn load_pack(path: &Path) -> Result<CataloguePack, PackError> {
    let data = fs::read_to_string(path).map_err(PackError::Io)?;
    serde_json::from_str(&data).map_err(PackError::Parse)
}
