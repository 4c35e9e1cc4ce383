//! Pack provenance sidecar. Produced by whatever extracts the catalogue
//! pack from a full dump; `dogma validate` cross-checks it against the
//! pack actually on disk so silent re-exports and truncated tables get
//! caught before a context is ever built.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Row counts of the four static tables at extraction time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableRows {
    pub attributes: usize,
    pub types: usize,
    pub effects: usize,
    pub expressions: usize,
}

/// Provenance of one catalogue pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackProvenance {
    /// Exporter that produced the pack (tool name, URL).
    pub source: String,
    /// Expected to match the pack's own `data_version`.
    #[serde(default)]
    pub data_version: Option<String>,
    /// Date of the dump the pack was extracted from, `YYYY-MM-DD`.
    #[serde(default)]
    pub dump_date: Option<String>,
    /// Pack file this sidecar describes, relative to the repo root.
    pub pack_path: String,
    /// Table sizes recorded at extraction, for truncation detection.
    #[serde(default)]
    pub table_rows: Option<TableRows>,
}

pub const DEFAULT_PROVENANCE_PATH: &str = "data/provenance.json";

/// Load the sidecar, or None when absent or malformed (provenance is
/// advisory metadata, never required at runtime).
pub fn load_provenance(path: &Path) -> Option<PackProvenance> {
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}
