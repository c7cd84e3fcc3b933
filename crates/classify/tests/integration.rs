use std::collections::HashMap;
use std::path::PathBuf;

use meddebt_classify::config::SessionConfig;
use meddebt_classify::engine::{run, SessionInput};
use meddebt_classify::model::{CollectionOutcome, FieldValue, SessionResult};
use meddebt_classify::table::{load_csv_table, write_csv_table};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_and_run(config_toml: &str) -> SessionResult {
    let dir = fixtures_dir();
    let config = SessionConfig::from_toml(config_toml).unwrap();

    let mut input = SessionInput::default();
    for (name, table_config) in &config.tables {
        let path = dir.join(&table_config.file);
        let data = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
        input.tables.insert(name.clone(), load_csv_table(name, &data).unwrap());
    }
    for file in config.term_files() {
        let data = std::fs::read_to_string(dir.join(file)).unwrap();
        input.term_files.insert(file.to_string(), data);
    }

    run(&config, &input).unwrap()
}

fn session() -> SessionResult {
    let toml = std::fs::read_to_string(fixtures_dir().join("session.toml")).unwrap();
    load_and_run(&toml)
}

fn ids<'a>(coll: &'a CollectionOutcome, label: &str) -> Vec<&'a str> {
    coll.results
        .get(label)
        .unwrap_or_else(|| panic!("no result for {label}"))
        .ids
        .iter()
        .map(String::as_str)
        .collect()
}

// -------------------------------------------------------------------------
// Medical-only collection
// -------------------------------------------------------------------------

#[test]
fn georgetown_exact_on_med_cases() {
    let result = session();
    let med = &result.collections[0];
    assert_eq!(med.name, "ct_med");
    // 1003 is excluded by CAR inside HEALTHCARE, 1009 by ANIMAL.
    assert_eq!(
        ids(med, "Georgetown CT Med Simple String Match"),
        vec!["1001", "1005", "1006", "1007", "1008"]
    );
}

#[test]
fn georgetown_fuzzy_exclusions_are_fuzzy_too() {
    let result = session();
    let med = &result.collections[0];
    let fuzzy = ids(med, "Georgetown CT Med Regex Exclude Match");

    // Typo "HOSPTAL" is recovered.
    assert!(fuzzy.contains(&"1002"));
    for id in ["1001", "1005", "1006", "1008"] {
        assert!(fuzzy.contains(&id), "expected {id}");
    }
    // "CA" in MEDICAL is one edit from the exclusion term CAR.
    assert!(!fuzzy.contains(&"1007"));
    assert!(!fuzzy.contains(&"1003"));
    assert!(!fuzzy.contains(&"1009"));
    assert!(!fuzzy.contains(&"1004"));
}

#[test]
fn no_exclude_fuzzy_contains_exact() {
    let result = session();
    let med = &result.collections[0];
    let exact = ids(med, "Georgetown CT Med Simple String Match");
    let fuzzy = ids(med, "Georgetown CT Med Regex No Exclude Match");
    for id in &exact {
        assert!(fuzzy.contains(id), "{id} missing from fuzzy");
    }
    for id in ["1002", "1003", "1009"] {
        assert!(fuzzy.contains(&id), "expected {id}");
    }
    assert!(!fuzzy.contains(&"1004"));
}

#[test]
fn guelph_and_registry_lists() {
    let result = session();
    let med = &result.collections[0];
    assert_eq!(
        ids(med, "Guelph CT Med Simple String Match"),
        vec!["1001", "1005", "1006", "1008", "1009"]
    );
    assert_eq!(
        ids(med, "CMS Hospital Names CT Med Simple String Match"),
        vec!["1001", "1006", "1007"]
    );
    assert_eq!(
        ids(med, "CMS Hospital Names CT Med Regex Match"),
        vec!["1001", "1002", "1006", "1007"]
    );
}

#[test]
fn withheld_manual_list_yields_nothing() {
    let result = session();
    let med = &result.collections[0];
    assert!(ids(med, "Top 100 CT Med Simple String Match").is_empty());
}

#[test]
fn verified_cases_cover_whole_table() {
    let result = session();
    let med = &result.collections[0];
    assert_eq!(ids(med, "CT Med Debt Verified Cases").len(), 10);
}

#[test]
fn med_report_overlaps() {
    let result = session();
    let report = &result.collections[0].report;
    assert_eq!(report.labels.len(), 8);
    let gt = "Georgetown CT Med Simple String Match";
    assert_eq!(report.overlap_between(gt, "CT Med Debt Verified Cases"), Some(5));
    assert_eq!(report.overlap_between(gt, "Guelph CT Med Simple String Match"), Some(4));
    assert_eq!(
        report.overlap_between("CMS Hospital Names CT Med Simple String Match", gt),
        Some(3)
    );

    let text = report.to_string();
    assert!(text.contains("Georgetown CT Med Simple String Match # of Cases: 5\n"));
    assert!(text.contains(">>> Top 100 CT Med Simple String Match & CT Med Debt Verified Cases Overlap: 0\n"));
}

#[test]
fn med_labeled_table() {
    let result = session();
    let med = &result.collections[0];
    let labeled = med.labeled.as_ref().unwrap();

    assert_eq!(labeled.len(), 10);
    assert_eq!(labeled.columns.len(), 3 + 8);
    assert_eq!(&labeled.columns[..3], ["case_num", "plaintiff", "court"]);

    let flag = labeled.column_index("Georgetown CT Med Simple String Match").unwrap();
    let verified = labeled.column_index("CT Med Debt Verified Cases").unwrap();
    let row_1001 = &labeled.rows[0];
    let row_1004 = &labeled.rows[3];
    assert_eq!(row_1001.get(flag), &FieldValue::Bool(true));
    assert_eq!(row_1004.get(flag), &FieldValue::Bool(false));
    assert_eq!(row_1004.get(verified), &FieldValue::Bool(true));

    let csv = write_csv_table(labeled).unwrap();
    let first_line = csv.lines().next().unwrap();
    assert!(first_line.starts_with("case_num,plaintiff,court,Georgetown CT Med Simple String Match,"));
    assert_eq!(csv.lines().count(), 11);
}

// -------------------------------------------------------------------------
// All-cases collection
// -------------------------------------------------------------------------

#[test]
fn all_cases_collection() {
    let result = session();
    let all = &result.collections[1];
    assert_eq!(all.name, "ct_all");
    assert!(all.labeled.is_none());
    assert_eq!(
        ids(all, "Georgetown CT All Simple String Match"),
        vec!["1001", "1005", "1006", "1007", "1008"]
    );
    // Source table is explicit in the config, not inferred.
    let verified = all.results.get("CT All Debt Verified Cases").unwrap();
    assert_eq!(verified.source_table, "ct_med");
    assert_eq!(verified.len(), 10);
}

#[test]
fn duplicate_ids_flagged() {
    let result = session();
    assert!(result.collections[0].duplicate_ids.is_empty());
    let dupes = &result.collections[1].duplicate_ids;
    assert_eq!(dupes.len(), 1);
    assert_eq!(dupes[0].table, "ct_all");
    assert_eq!(dupes[0].ids, vec!["2007"]);
}

#[test]
fn session_serializes() {
    let result = session();
    assert_eq!(result.failure_count(), 0);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["meta"]["config_name"], "CT medical debt");
    assert_eq!(json["collections"][0]["name"], "ct_med");
    assert!(json["collections"][0].get("labeled").is_none());
    assert_eq!(
        json["collections"][0]["results"]["entries"][0]["ids"],
        serde_json::json!(["1001", "1005", "1006", "1007", "1008"])
    );
}

#[test]
fn run_with_wrong_text_column_fails_alone() {
    let toml = r#"
name = "Bad column"

[tables.ct_med]
file = "ct_med_cases.csv"
text_column = "party"

[tables.ct_all]
file = "ct_cases.csv"

[term_sets.georgetown]
builtin = "georgetown"

[[collections]]
name = "mixed"
table = "ct_all"

[[collections.runs]]
label = "Med"
terms = "georgetown"
method = "exact"
table = "ct_med"

[[collections.runs]]
label = "All"
terms = "georgetown"
method = "exact"
"#;
    let result = load_and_run(toml);
    let coll = &result.collections[0];
    assert_eq!(coll.failures.len(), 1);
    assert_eq!(coll.failures[0].label, "Med");
    assert!(coll.failures[0].error.contains("missing column 'party'"));
    assert_eq!(coll.results.len(), 1);
    assert_eq!(ids(coll, "All").len(), 5);
}

#[test]
fn term_files_resolved_from_map() {
    let config = SessionConfig::from_toml(
        &std::fs::read_to_string(fixtures_dir().join("session.toml")).unwrap(),
    )
    .unwrap();
    let files: Vec<&str> = config.term_files().into_iter().collect();
    assert_eq!(files, vec!["cms_ct.txt"]);

    let sets = config
        .resolve_term_sets(&HashMap::from([(
            "cms_ct.txt".to_string(),
            std::fs::read_to_string(fixtures_dir().join("cms_ct.txt")).unwrap(),
        )]))
        .unwrap();
    assert_eq!(sets["cms"].include.len(), 4);
    assert!(sets["cms"].exclude.is_empty());
}
