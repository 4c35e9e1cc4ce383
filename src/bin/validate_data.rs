//! Standalone catalogue pack validator. Same checks as `dogma validate`,
//! kept as its own binary so data pipelines can gate on it directly.

use std::path::Path;

use dogma::data::catalogue::{DATA_PATH_ENV, DEFAULT_CATALOGUE_PATH};
use dogma::data::validate::validate_pack_at;

fn main() {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(DATA_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CATALOGUE_PATH.to_string());

    let report = validate_pack_at(Path::new(&path));
    if report.diagnostics.is_empty() {
        println!("{path}: ok");
        return;
    }
    for diag in &report.diagnostics {
        println!("{}: {}: {}", diag.severity, diag.context, diag.message);
    }
    std::process::exit(i32::from(report.has_errors()));
}
