use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const OFFER: &str = "Importo Mutuo: € 180.000\n\
                     Durata: 30 anni\n\
                     Tasso Fisso: 3,50%\n\
                     TAEG: 3,66%\n\
                     Istruttoria: € 600,00\n\
                     Garanzie\n\
                     Ipoteca di primo grado sull'immobile\n";

fn mutuo() -> Command {
    Command::cargo_bin("mutuo").unwrap()
}

#[test]
fn extract_json_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("offer.txt");
    fs::write(&input, OFFER).unwrap();

    mutuo()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""importo":"180000""#))
        .stdout(predicate::str::contains(r#""tipo_tasso":"fisso""#))
        .stdout(predicate::str::contains("Ipoteca di primo grado"));
}

#[test]
fn extract_text_from_stdin() {
    mutuo()
        .args(["extract", "-", "--format", "text"])
        .write_stdin(OFFER)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fields found (6):"))
        .stdout(predicate::str::contains("[TAN → 3.50% (from closing rate)]"))
        .stdout(predicate::str::contains("📌 Garanzie"));
}

#[test]
fn extract_csv_has_header_and_row() {
    mutuo()
        .args(["extract", "--format", "csv"])
        .write_stdin(OFFER)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("source,tipo_tasso,importo"))
        .stdout(predicate::str::contains("-,fisso,180000,30,3.50,3.66,,600.00,,,"));
}

#[test]
fn extract_merges_into_record() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record.json");
    fs::write(
        &record,
        r#"{"banca": "Banca Esempio", "spese_perizia": "350", "note": "Da confrontare"}"#,
    )
    .unwrap();

    mutuo()
        .args(["extract", "-", "--into"])
        .arg(&record)
        .write_stdin(OFFER)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""banca":"Banca Esempio""#))
        .stdout(predicate::str::contains(r#""spese_istruttoria":"600.00""#))
        .stdout(predicate::str::contains(r#""spese_perizia":"350""#))
        .stdout(predicate::str::contains(r#"Da confrontare\n\n📌 Garanzie"#));
}

#[test]
fn extract_validate_reports_issues() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record.json");
    fs::write(&record, "{}").unwrap();

    mutuo()
        .args(["extract", "-", "--validate", "--into"])
        .arg(&record)
        .write_stdin(OFFER)
        .assert()
        .success()
        .stderr(predicate::str::contains("Missing bank name"))
        .stderr(predicate::str::contains("Property value must be greater than zero"));
}

#[test]
fn extract_missing_file_fails() {
    mutuo()
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_respects_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"extraction": {"collect_notes": false}}"#).unwrap();

    mutuo()
        .arg("--config")
        .arg(&config)
        .args(["extract", "-"])
        .write_stdin(OFFER)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""notes":[]"#));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("banca_a.txt"), OFFER).unwrap();
    fs::write(dir.path().join("banca_b.txt"), "Tasso variabile\nSpread: 0,90%\n").unwrap();
    fs::write(dir.path().join("ignored.md"), OFFER).unwrap();
    let out = dir.path().join("out");

    mutuo()
        .arg("batch")
        .arg(dir.path().join("*").to_str().unwrap())
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(out.join("banca_a.json").exists());
    assert!(out.join("banca_b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("variabile"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = tempfile::tempdir().unwrap();

    mutuo()
        .arg("batch")
        .arg(dir.path().join("*.txt").to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    mutuo()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(fs::read_to_string(&path).unwrap().contains("notes_budget"));

    mutuo()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_set_then_get_and_show_in_user_dir() {
    let home = tempfile::tempdir().unwrap();

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "set", "extraction.notes_budget", "2000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set extraction.notes_budget = 2000"));

    let saved = home.path().join("mutuo").join("config.json");
    assert!(fs::read_to_string(&saved).unwrap().contains(r#""notes_budget": 2000"#));

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "get", "notes_budget"])
        .assert()
        .success()
        .stdout("2000\n");

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""notes_budget": 2000"#))
        .stdout(predicate::str::contains(r#""max_input_chars": 100000"#));
}

#[test]
fn config_set_rejects_zero_input_cap() {
    let home = tempfile::tempdir().unwrap();

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "set", "extraction.max_input_chars", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "extraction.max_input_chars must be greater than zero",
        ));

    assert!(!home.path().join("mutuo").join("config.json").exists());
}

#[test]
fn config_set_rejects_malformed_values() {
    let home = tempfile::tempdir().unwrap();

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "set", "collect_notes", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expects true or false"));

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "get", "extraction.budget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown setting"));
}

#[test]
fn config_get_reads_file_given_with_flag() {
    let home = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("c.json");
    fs::write(&config, r#"{"extraction":{"notes_budget":123}}"#).unwrap();

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.notes_budget"])
        .assert()
        .success()
        .stdout("123\n");
}

#[test]
fn config_set_and_path_follow_flag() {
    let home = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("c.json");

    mutuo()
        .env("XDG_CONFIG_HOME", home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "collect_notes", "false"])
        .assert()
        .success();

    assert!(fs::read_to_string(&config).unwrap().contains(r#""collect_notes": false"#));
    assert!(!home.path().join("mutuo").exists());

    mutuo()
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(config.to_str().unwrap()))
        .stdout(predicate::str::contains("exists"));
}
