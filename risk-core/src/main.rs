//! risk-assess - command-line entry point
//!
//! Usage: `risk-assess [FILE]`  (reads stdin when FILE is omitted or `-`)
//!
//! Input is one request object or an array of them. Each result is printed
//! as one JSON line: the assessment, or `{"student_id", "error", "kind"}`.
//! Model and catalog come from MODEL_PATH / REMOTE_MODEL_URL / CATALOG_PATH.

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use serde_json::{json, Value};

use edumind_risk_core::constants;
use edumind_risk_core::{load_model, AdvisoryCatalog, ModelSource, RiskEngine};

fn read_input(path: Option<&str>) -> std::io::Result<String> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(p) => std::fs::read_to_string(p),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("{} v{}", constants::APP_NAME, constants::APP_VERSION);

    let path = std::env::args().nth(1);
    let content = match read_input(path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to read input: {}", e);
            return ExitCode::from(2);
        }
    };

    let input: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Input is not valid JSON: {}", e);
            return ExitCode::from(2);
        }
    };

    let model = match load_model(&ModelSource::from_env()) {
        Ok(m) => m,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let catalog = match AdvisoryCatalog::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load advisory catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let engine = RiskEngine::new(model, Arc::new(catalog));

    let records = match input {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut failures = 0usize;
    for record in &records {
        let line = match engine.assess(record) {
            Ok(assessment) => serde_json::to_string(&assessment),
            Err(e) => {
                failures += 1;
                log::warn!("{}", e);
                serde_json::to_string(&json!({
                    "student_id": record.get("student_id"),
                    "error": e.to_string(),
                    "kind": e.kind(),
                }))
            }
        };
        match line {
            Ok(l) => println!("{}", l),
            Err(e) => log::error!("Failed to serialize result: {}", e),
        }
    }

    log::info!("Assessed {} record(s), {} failed", records.len(), failures);

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
