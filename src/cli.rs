//! Command dispatch for the `dogma` binary: `serve`, `eval`, `validate`.
//! Handlers return process exit codes; only `serve` spins up a runtime.

use std::env;
use std::fs;
use std::path::Path;

use crate::data::catalogue::{DATA_PATH_ENV, DEFAULT_CATALOGUE_PATH};
use crate::data::loader::load_pack;
use crate::data::provenance::{load_provenance, DEFAULT_PROVENANCE_PATH};
use crate::data::validate::{
    validate_pack, validate_provenance, ValidationReport, ValidationSeverity,
};
use crate::eval::{evaluate, EvalRequest, QuerySubject};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Eval,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("eval") => Some(Command::Eval),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Eval) => handle_eval(args),
        Some(Command::Validate) => handle_validate(),
        None => {
            eprintln!("usage: dogma <serve|eval|validate>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("DOGMA_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_eval(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: dogma eval <request.json> [--csv]");
        return 2;
    };
    let as_csv = args.iter().any(|arg| arg == "--csv");

    if let Err(err) = crate::init() {
        eprintln!("{err}");
        return 1;
    }
    let request: EvalRequest = match fs::read_to_string(path) {
        Ok(body) => match serde_json::from_str(&body) {
            Ok(request) => request,
            Err(err) => {
                eprintln!("{path}: {err}");
                return 1;
            }
        },
        Err(err) => {
            eprintln!("{path}: {err}");
            return 1;
        }
    };

    let report = evaluate(&request);
    if as_csv {
        if let Err(err) = write_csv(&report) {
            eprintln!("csv export failed: {err}");
            return 1;
        }
    } else {
        for value in &report.values {
            let rendered = value
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "not found".to_string());
            println!(
                "{:<24} attr {:<6} {}",
                subject_label(value.query.subject),
                value.query.attribute,
                rendered
            );
        }
    }
    0
}

fn write_csv(report: &crate::eval::EvalReport) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(["subject", "attribute", "value"])?;
    for value in &report.values {
        writer.write_record([
            subject_label(value.query.subject),
            value.query.attribute.to_string(),
            value
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "not found".to_string()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn subject_label(subject: QuerySubject) -> String {
    match subject {
        QuerySubject::Character => "character".to_string(),
        QuerySubject::Ship => "ship".to_string(),
        QuerySubject::Module { slot } => format!("module[{slot}]"),
        QuerySubject::Charge { slot } => format!("charge[{slot}]"),
        QuerySubject::Drone { type_id } => format!("drone:{type_id}"),
        QuerySubject::Implant { slot } => format!("implant[{slot}]"),
    }
}

fn handle_validate() -> i32 {
    let pack_path =
        env::var(DATA_PATH_ENV).unwrap_or_else(|_| DEFAULT_CATALOGUE_PATH.to_string());
    let report = match load_pack(Path::new(&pack_path)) {
        Ok(pack) => {
            let mut report = validate_pack(&pack);
            if let Some(provenance) = load_provenance(Path::new(DEFAULT_PROVENANCE_PATH)) {
                let cross_checks = validate_provenance(&provenance, &pack);
                report.diagnostics.extend(cross_checks.diagnostics);
            }
            report
        }
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push(ValidationSeverity::Error, pack_path.clone(), err.to_string());
            report
        }
    };

    if report.diagnostics.is_empty() {
        println!("{pack_path}: ok");
        return 0;
    }
    for diag in &report.diagnostics {
        println!("{}: {}: {}", diag.severity, diag.context, diag.message);
    }
    i32::from(report.has_errors())
}
