//! Referential-integrity validation for the catalogue pack. Run at server
//! startup and by the `validate` subcommand / `validate_data` binary so a
//! corrupt dump surfaces immediately instead of as silently skipped
//! effects mid-evaluation.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::data::expression::Opcode;
use crate::data::loader::{load_pack, CataloguePack};
use crate::data::provenance::PackProvenance;
use crate::data::types::REQUIRED_SKILL_ATTRS;
use crate::{AttributeId, ExpressionId, TypeId};

/// Dumps older than this many days draw a staleness warning.
const STALE_AFTER_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Cross-check every reference in the pack. Errors here are exactly the
/// rows the evaluator would silently skip.
pub fn validate_pack(pack: &CataloguePack) -> ValidationReport {
    let mut report = ValidationReport::default();

    let attribute_ids: HashSet<AttributeId> = pack.attributes.iter().map(|a| a.id).collect();
    let type_ids: HashSet<TypeId> = pack.types.iter().map(|t| t.id).collect();
    let expression_ids: HashSet<ExpressionId> = pack.expressions.iter().map(|x| x.id).collect();
    let effect_ids: HashSet<u32> = pack.effects.iter().map(|e| e.id).collect();

    check_duplicates(&mut report, "attributes", pack.attributes.iter().map(|a| u64::from(a.id)));
    check_duplicates(&mut report, "types", pack.types.iter().map(|t| u64::from(t.id)));
    check_duplicates(&mut report, "effects", pack.effects.iter().map(|e| u64::from(e.id)));
    check_duplicates(
        &mut report,
        "expressions",
        pack.expressions.iter().map(|x| u64::from(x.id)),
    );

    for t in &pack.types {
        let context = format!("type {} ({})", t.id, t.name);
        for effect in &t.effects {
            if !effect_ids.contains(effect) {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    format!("references unknown effect {effect}"),
                );
            }
        }
        for attr in &t.attributes {
            if !attribute_ids.contains(&attr.attribute_id) {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("carries value for unknown attribute {}", attr.attribute_id),
                );
            }
        }
        for &slot in &REQUIRED_SKILL_ATTRS {
            if let Some(required) = t.attribute(slot) {
                if !type_ids.contains(&(required as TypeId)) {
                    report.push(
                        ValidationSeverity::Error,
                        context.clone(),
                        format!("requires unknown skill {}", required as TypeId),
                    );
                }
            }
        }
    }

    for e in &pack.effects {
        let context = format!("effect {}", e.id);
        if !expression_ids.contains(&e.pre_expression) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("pre expression {} missing", e.pre_expression),
            );
        }
        if let Some(post) = e.post_expression {
            if !expression_ids.contains(&post) {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("post expression {post} missing"),
                );
            }
        }
        if e.category >= 8 {
            report.push(
                ValidationSeverity::Warning,
                context,
                format!("category {} is outside the state mask and never activates", e.category),
            );
        }
    }

    for x in &pack.expressions {
        let context = format!("expression {}", x.id);
        for arg in [x.arg1, x.arg2].into_iter().flatten() {
            if !expression_ids.contains(&arg) {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    format!("child expression {arg} missing"),
                );
            }
        }
        match x.op {
            op if op.is_mutator() => {
                if x.arg1.is_none() || x.arg2.is_none() {
                    report.push(
                        ValidationSeverity::Error,
                        context.clone(),
                        "mutator needs a target (arg1) and a magnitude (arg2)",
                    );
                }
            }
            Opcode::Attr => {
                if x.attribute_id.is_none() || x.arg1.is_none() {
                    report.push(
                        ValidationSeverity::Error,
                        context.clone(),
                        "attribute spec needs a location (arg1) and an attribute_id",
                    );
                } else if let Some(attr) = x.attribute_id {
                    if !attribute_ids.contains(&attr) {
                        report.push(
                            ValidationSeverity::Warning,
                            context.clone(),
                            format!("addresses unknown attribute {attr}"),
                        );
                    }
                }
            }
            Opcode::LocGroup => {
                if x.group_id.is_none() {
                    report.push(ValidationSeverity::Error, context.clone(), "group filter without group_id");
                }
            }
            Opcode::LocSkillReq => {
                if x.type_id.is_none() {
                    report.push(
                        ValidationSeverity::Error,
                        context.clone(),
                        "skill-requirement filter without type_id",
                    );
                } else if let Some(skill) = x.type_id {
                    if !type_ids.contains(&skill) {
                        report.push(
                            ValidationSeverity::Warning,
                            context.clone(),
                            format!("filters on unknown skill {skill}"),
                        );
                    }
                }
            }
            _ => {}
        }
    }

    report
}

fn check_duplicates(
    report: &mut ValidationReport,
    table: &str,
    ids: impl Iterator<Item = u64>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            report.push(
                ValidationSeverity::Error,
                table.to_string(),
                format!("duplicate id {id}"),
            );
        }
    }
}

/// Cross-check the pack against its provenance sidecar: version drift,
/// truncated tables, and dump staleness.
pub fn validate_provenance(provenance: &PackProvenance, pack: &CataloguePack) -> ValidationReport {
    let mut report = ValidationReport::default();
    let context = "provenance";

    if let (Some(recorded), Some(loaded)) = (
        provenance.data_version.as_deref(),
        pack.data_version.as_deref(),
    ) {
        if recorded != loaded {
            report.push(
                ValidationSeverity::Warning,
                context,
                format!("data_version {recorded:?} does not match the pack's {loaded:?}"),
            );
        }
    }

    if let Some(rows) = provenance.table_rows {
        let tables = [
            ("attributes", rows.attributes, pack.attributes.len()),
            ("types", rows.types, pack.types.len()),
            ("effects", rows.effects, pack.effects.len()),
            ("expressions", rows.expressions, pack.expressions.len()),
        ];
        for (table, recorded, loaded) in tables {
            if recorded != loaded {
                report.push(
                    ValidationSeverity::Error,
                    context,
                    format!("{table}: {loaded} rows loaded, {recorded} recorded at extraction"),
                );
            }
        }
    }

    if let Some(date) = provenance.dump_date.as_deref() {
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) => {
                let age = (Utc::now().date_naive() - parsed).num_days();
                if age > STALE_AFTER_DAYS {
                    report.push(
                        ValidationSeverity::Warning,
                        context,
                        format!("dump is {age} days old (from {date})"),
                    );
                }
            }
            Err(_) => report.push(
                ValidationSeverity::Warning,
                context,
                format!("unparseable dump date {date:?}"),
            ),
        }
    }

    report
}

/// Load and validate a pack from disk; parse failures become the report's
/// first error rather than an early return so callers print one shape.
pub fn validate_pack_at(path: &Path) -> ValidationReport {
    match load_pack(path) {
        Ok(pack) => validate_pack(&pack),
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push(ValidationSeverity::Error, path.display().to_string(), err.to_string());
            report
        }
    }
}
