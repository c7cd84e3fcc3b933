//! `meddebt run` / `meddebt validate` — config-driven classification sessions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use meddebt_classify::table::{load_csv_table, write_csv_table};
use meddebt_classify::{CaseTable, SessionConfig, SessionInput, SessionResult};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_PARTIAL, EXIT_RUNTIME};
use crate::CliError;

fn runtime_err(msg: impl Into<String>) -> CliError {
    CliError::new(EXIT_RUNTIME, msg)
}

fn read_config(config_path: &Path) -> Result<SessionConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| runtime_err(format!("cannot read config {}: {e}", config_path.display())))?;
    SessionConfig::from_toml(&config_str).map_err(|e| {
        CliError::new(EXIT_INVALID_CONFIG, e.to_string())
            .with_hint(format!("check {}", config_path.display()))
    })
}

/// Directory that relative paths in the config resolve against.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

fn read_table(name: &str, csv_path: &Path) -> Result<CaseTable, String> {
    let csv_data = std::fs::read_to_string(csv_path)
        .map_err(|e| format!("cannot read {}: {e}", csv_path.display()))?;
    load_csv_table(name, &csv_data).map_err(|e| format!("{}: {e}", csv_path.display()))
}

/// Tables that cannot be read are left out; the runs that need them fail on
/// their own and the rest of the session still runs.
fn load_input(config: &SessionConfig, base: &Path) -> Result<SessionInput, CliError> {
    let mut input = SessionInput::default();

    for (name, table_config) in &config.tables {
        let csv_path = base.join(&table_config.file);
        match read_table(name, &csv_path) {
            Ok(table) => {
                log::info!("table '{name}': {} rows from {}", table.len(), csv_path.display());
                input.tables.insert(name.clone(), table);
            }
            Err(e) => log::warn!("table '{name}' skipped: {e}"),
        }
    }

    for file in config.term_files() {
        let path = base.join(file);
        let data = std::fs::read_to_string(&path)
            .map_err(|e| runtime_err(format!("cannot read term file {}: {e}", path.display())))?;
        input.term_files.insert(file.to_string(), data);
    }

    Ok(input)
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    no_labeled: bool,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base = base_dir(&config_path);
    let input = load_input(&config, base)?;

    let result = meddebt_classify::run(&config, &input).map_err(|e| runtime_err(e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| runtime_err(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    } else {
        print_reports(&result);
    }

    if !no_labeled {
        write_labeled(&config, &result, base)?;
    }

    print_summary(&result);

    let failed = result.failure_count();
    if failed > 0 {
        return Err(CliError::new(EXIT_PARTIAL, format!("{failed} run(s) failed"))
            .with_hint("failed runs are listed above; rerun with -v for details"));
    }
    Ok(())
}

fn print_reports(result: &SessionResult) {
    for coll in &result.collections {
        println!("== {} (table: {}) ==", coll.name, coll.table);
        print!("{}", coll.report);
        println!();
    }
}

fn write_labeled(config: &SessionConfig, result: &SessionResult, base: &Path) -> Result<(), CliError> {
    // Outcomes are produced in config order.
    for (coll_config, outcome) in config.collections.iter().zip(&result.collections) {
        let (Some(file), Some(labeled)) = (&coll_config.labeled_output, &outcome.labeled) else {
            continue;
        };
        let path = base.join(file);
        let csv = write_csv_table(labeled).map_err(|e| runtime_err(e.to_string()))?;
        std::fs::write(&path, csv)
            .map_err(|e| runtime_err(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {} ({} rows)", path.display(), labeled.len());
    }
    Ok(())
}

/// Human summary to stderr.
fn print_summary(result: &SessionResult) {
    for coll in &result.collections {
        for dup in &coll.duplicate_ids {
            eprintln!(
                "warning: table '{}' has {} duplicate case id(s): {}",
                dup.table,
                dup.ids.len(),
                dup.ids.join(", ")
            );
        }
        for failure in &coll.failures {
            eprintln!("failed: {} / {}: {}", coll.name, failure.label, failure.error);
        }
    }

    let runs: usize = result.collections.iter().map(|c| c.results.len()).sum();
    eprintln!(
        "{}: {} collection(s), {} run(s) completed, {} failed",
        result.meta.config_name,
        result.collections.len(),
        runs,
        result.failure_count(),
    );
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let base = base_dir(&config_path);

    let mut missing = Vec::new();
    let files = config
        .tables
        .values()
        .map(|t| t.file.as_str())
        .chain(config.term_files());
    for file in files {
        if !base.join(file).is_file() {
            missing.push(file.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(CliError::new(
            EXIT_INVALID_CONFIG,
            format!("input file(s) not found: {}", missing.join(", ")),
        )
        .with_hint(format!("paths resolve relative to {}", base.display())));
    }

    let runs: usize = config.collections.iter().map(|c| c.runs.len()).sum();
    let mut methods: BTreeMap<String, usize> = BTreeMap::new();
    for run in config.collections.iter().flat_map(|c| &c.runs) {
        let kind = match run.method {
            Some(m) => m.to_string(),
            None => "all ids".to_string(),
        };
        *methods.entry(kind).or_default() += 1;
    }
    let breakdown: Vec<String> = methods.iter().map(|(k, n)| format!("{n} {k}")).collect();

    eprintln!(
        "ok: {} table(s), {} term set(s), {} collection(s), {} run(s) ({})",
        config.tables.len(),
        config.term_sets.len(),
        config.collections.len(),
        runs,
        breakdown.join(", "),
    );
    Ok(())
}
