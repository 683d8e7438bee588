use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixture")
        .join("units.json")
}

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::with_suffix(".yaml").expect("create config file");
    std::fs::write(file.path(), contents).expect("write config yaml");
    file
}

fn run_unitq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unitq"))
        .arg("--records")
        .arg(fixture_path())
        .args(args)
        .output()
        .expect("run unitq")
}

fn run_ok(args: &[&str]) -> String {
    let output = run_unitq(args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("unitq failed: {}", stderr);
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn list_names(args: &[&str]) -> Vec<String> {
    let stdout = run_ok(args);
    let records: Vec<serde_json::Value> = serde_json::from_str(&stdout).expect("parse JSON array");
    records
        .iter()
        .map(|r| r["name"].as_str().expect("name").to_string())
        .collect()
}

#[test]
fn lists_everything_without_query() {
    assert_eq!(
        list_names(&[]),
        vec!["Conduit", "Drone", "Engineer", "Gauss Cannon", "Tarsier", "Wall"]
    );
}

#[test]
fn filters_with_aliases_and_numeric_comparison() {
    assert_eq!(list_names(&["--query", "gold>3,fl=1"]), vec!["Tarsier", "Wall"]);
}

#[test]
fn filters_on_multi_word_text() {
    assert_eq!(
        list_names(&["--query", "a=gain XXXX,name!=head"]),
        vec!["Gauss Cannon"]
    );
}

#[test]
fn excludes_with_either_negative_operator() {
    let expected = vec!["Conduit", "Gauss Cannon", "Tarsier"];
    assert_eq!(list_names(&["--query", "au>=4,n<>wall"]), expected);
    assert_eq!(list_names(&["--query", "au>=4,n!=wall"]), expected);
}

#[test]
fn malformed_queries_degrade_to_no_filter() {
    assert_eq!(list_names(&["--query", "5, gold=5"]).len(), 6);
    assert_eq!(list_names(&["--query", "gold=5, 5"]), vec!["Wall"]);
    assert_eq!(list_names(&["--query", "bogus=1"]).len(), 6);
}

#[test]
fn explains_resolved_query() {
    let stdout = run_ok(&["--query", "gold>3,name!=head,fl=1,bogus=2", "--explain"]);
    let resolved: serde_json::Value = serde_json::from_str(&stdout).expect("parse explain");
    assert_eq!(
        resolved,
        serde_json::json!({
            "includes": {"frontline": 1, "gold__gt": 3},
            "excludes": {"name__icontains": "head"},
        })
    );
}

#[test]
fn writes_json_lines() {
    let stdout = run_ok(&["--query", "position=back", "--format", "jsonl"]);
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let record: serde_json::Value = serde_json::from_str(line).expect("parse line");
        assert_eq!(record["position"], "back");
    }
}

#[test]
fn applies_query_config() {
    let config = write_temp_config(
        "synonyms:\n  cost: gold\nallowed_fields: [name, gold]\norder_by: gold\n",
    );
    let config_path = config.path().to_str().expect("utf-8 path");
    assert_eq!(
        list_names(&["--config", config_path, "--query", "cost>=5,fl=1"]),
        vec!["Wall", "Gauss Cannon"]
    );
}

#[test]
fn numeric_contains_policy_from_config_and_flag() {
    let config = write_temp_config("numeric_contains: contains\n");
    let config_path = config.path().to_str().expect("utf-8 path");

    let stdout = run_ok(&["--config", config_path, "--query", "gold=4", "--explain"]);
    let resolved: serde_json::Value = serde_json::from_str(&stdout).expect("parse explain");
    assert_eq!(resolved["includes"], serde_json::json!({"gold__icontains": 4}));

    let stdout = run_ok(&[
        "--config",
        config_path,
        "--query",
        "gold=4",
        "--numeric-contains",
        "exact",
        "--explain",
    ]);
    let resolved: serde_json::Value = serde_json::from_str(&stdout).expect("parse explain");
    assert_eq!(resolved["includes"], serde_json::json!({"gold": 4}));
}

#[test]
fn fails_on_missing_records_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_unitq"))
        .arg("--records")
        .arg("fixture/does_not_exist.json")
        .output()
        .expect("run unitq");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Store:"));
}
