use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PRICE_LIST: &str = "\
BOILERS0
Combi Natural Gas0
AB123 Worcester Combi £850.00 10
AB124 Worcester Combi 30kW £950.00 10
Combi LPG0
LP100 Vaillant LPG Combi £1,020.00 14
Not a row at all
";

/// Command with the user config directory pointed at an empty temp dir.
fn pricebook(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pricebook").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path()).env("HOME", home.path());
    cmd
}

fn write_input(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn parse_writes_partition_csvs() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = write_input(work.path(), "prices.txt", PRICE_LIST);
    let out = work.path().join("out");

    pricebook(&home)
        .arg("parse")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total rows extracted: 3"))
        .stdout(predicate::str::contains("boilers_combi_ng.csv: 2 rows"))
        .stdout(predicate::str::contains("boilers_combi_lpg.csv: 1 rows"));

    let combi = fs::read_to_string(out.join("boilers_combi_ng.csv")).unwrap();
    assert_eq!(combi.lines().count(), 3);
    assert!(combi.contains("BOILERS,Combi Natural Gas,AB123,Worcester Combi,850.00,10"));

    let summary = fs::read_to_string(out.join("summary.json")).unwrap();
    assert!(summary.contains("\"total_records\": 3"));
    assert!(!out.join("unclassified.csv").exists());
}

#[test]
fn parse_dry_run_writes_nothing() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = write_input(work.path(), "prices.txt", PRICE_LIST);
    let out = work.path().join("out");

    pricebook(&home)
        .arg("parse")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total rows extracted: 3"));

    assert!(!out.exists());
}

#[test]
fn parse_reports_unclassified_rows() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = write_input(
        work.path(),
        "spares.txt",
        "Vaillant Spares0\nWorcester Parts0\nMX9 Mystery item £12.50\n",
    );
    let out = work.path().join("out");

    pricebook(&home)
        .arg("parse")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rows could not be classified"));

    let unclassified = fs::read_to_string(out.join("unclassified.csv")).unwrap();
    assert!(unclassified.contains("MX9"));
}

#[test]
fn parse_rejects_unsupported_format() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let input = write_input(work.path(), "prices.docx", PRICE_LIST);

    pricebook(&home)
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: docx"));
}

#[test]
fn parse_missing_input_fails() {
    let home = TempDir::new().unwrap();

    pricebook(&home)
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn rules_route_prints_partition_and_tier() {
    let home = TempDir::new().unwrap();

    pricebook(&home)
        .args(["rules", "route", "Boilers", "Combi Natural Gas"])
        .assert()
        .success()
        .stdout("boilers_combi_ng (section_and_subsection)\n");

    pricebook(&home)
        .args(["rules", "route", "Miscellaneous", "Sundries"])
        .assert()
        .success()
        .stdout("unclassified (fallback)\n");
}

#[test]
fn rules_export_then_route_with_custom_table() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let rules = work.path().join("rules.json");

    pricebook(&home)
        .arg("rules")
        .arg("export")
        .arg("-o")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 13 rules"));

    pricebook(&home)
        .arg("rules")
        .arg("export")
        .arg("-o")
        .arg(&rules)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    fs::write(
        &rules,
        r#"{"rules": [{"name": "spares", "keywords": ["spare"]}]}"#,
    )
    .unwrap();

    pricebook(&home)
        .arg("rules")
        .arg("--rules")
        .arg(&rules)
        .args(["route", "Vaillant", "Boiler spares"])
        .assert()
        .success()
        .stdout("spares (keyword)\n");
}

#[test]
fn batch_writes_per_file_outputs() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_input(work.path(), "march.txt", PRICE_LIST);
    write_input(work.path(), "april.txt", PRICE_LIST);
    let out = work.path().join("out");
    let pattern = work.path().join("*.txt");

    pricebook(&home)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("-o")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed, 6 rows extracted"));

    assert!(out.join("march").join("boilers_combi_ng.csv").exists());
    assert!(out.join("april").join("boilers_combi_lpg.csv").exists());

    let summary = fs::read_to_string(out.join("batch_summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,total_records"));
    assert_eq!(summary.lines().count(), 3);
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();

    pricebook(&home)
        .args(["config", "set", "output.sample_rows", "5"])
        .assert()
        .success();

    pricebook(&home)
        .args(["config", "get", "output.sample_rows"])
        .assert()
        .success()
        .stdout("5\n");

    pricebook(&home)
        .args(["config", "set", "output.colour", "red"])
        .assert()
        .failure();
}

#[test]
fn config_init_with_rules_stores_absolute_path() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    pricebook(&home)
        .current_dir(work.path())
        .args(["config", "init", "-o", "rel/cfg.json", "--with-rules"])
        .assert()
        .success();

    let config_path = work.path().join("rel").join("cfg.json");
    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    let rules_file = Path::new(config["classification"]["rules_file"].as_str().unwrap());
    assert!(rules_file.is_absolute());
    assert!(rules_file.ends_with("rel/rules.json"));

    // Loaded from another directory, the rule table is still found.
    let elsewhere = TempDir::new().unwrap();
    pricebook(&home)
        .current_dir(elsewhere.path())
        .arg("--config")
        .arg(&config_path)
        .args(["rules", "route", "Boilers", "Combi LPG"])
        .assert()
        .success()
        .stdout("boilers_combi_lpg (section_and_subsection)\n");
}
