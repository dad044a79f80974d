//! Command-line integration tests.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RESPONSE: &str = r#"{
    "nom_client": {"value": "Dupont", "confidence": 0.95},
    "prenom_client": {"value": "Jean", "confidence": 0.95},
    "adresse": {"value": "133 avenue de la République", "confidence": 0.9},
    "code_postal": {"value": "7501", "confidence": 0.8},
    "ville": {"value": "Paris", "confidence": 0.95},
    "date_demande": {"value": "23/09/2025", "confidence": 0.9},
    "objet_devis": {"value": "Demande de devis", "confidence": 0.9},
    "message_principal": {"value": "NETTOYAGE ENTREE et SALLE DE BAIN", "confidence": 0.9}
}"#;

/// Command isolated from the user's real configuration.
fn devis(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("devis").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

fn write_response(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_process_json() {
    let dir = TempDir::new().unwrap();
    let input = write_response(dir.path(), "devis.json", RESPONSE);

    let output = devis(dir.path()).arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["record"]["code_postal"]["value"], "07501");
    assert_eq!(json["record"]["date_demande"]["value"], "2025-09-23");
    assert_eq!(json["report"]["metiers_detected"][0]["matched_value"], "MENAGE");
}

#[test]
fn test_process_fenced_text_report_only() {
    let dir = TempDir::new().unwrap();
    let input = write_response(
        dir.path(),
        "reponse.txt",
        &format!("Voici les données :\n```json\n{}\n```\n", RESPONSE),
    );

    devis(dir.path())
        .args(["process", "--report-only", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Insertion auto possible"))
        .stdout(predicate::str::contains("MENAGE"));
}

#[test]
fn test_process_explicit_sources() {
    let dir = TempDir::new().unwrap();
    let input = write_response(dir.path(), "devis.json", RESPONSE);

    devis(dir.path())
        .args(["process", "--format", "csv", "--source", "Fuite sous évier"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("code_postal"))
        .stdout(predicate::str::contains("PLOMBERIE"))
        .stdout(predicate::str::contains("MENAGE").not());
}

#[test]
fn test_process_missing_field_fails() {
    let dir = TempDir::new().unwrap();
    let broken = RESPONSE.replace(r#""ville": {"value": "Paris", "confidence": 0.95},"#, "");
    let input = write_response(dir.path(), "incomplet.json", &broken);

    devis(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field: ville"));
}

#[test]
fn test_process_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    devis(dir.path())
        .args(["process", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    write_response(&inputs, "a.json", RESPONSE);
    write_response(&inputs, "b.json", RESPONSE);
    write_response(&inputs, "c.json", "pas du json");

    devis(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", inputs.display()))
        .arg("--output-dir")
        .arg(&outputs)
        .args(["--summary", "--continue-on-error", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());
    assert!(!outputs.join("c.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,overall_confidence"));
    assert!(summary.contains("c.json,error"));
}

#[test]
fn test_batch_same_stem_outputs_kept_apart() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    write_response(&inputs, "a.json", RESPONSE);
    write_response(&inputs, "a.txt", &format!("```json\n{}\n```", RESPONSE));

    devis(dir.path())
        .arg("batch")
        .arg(format!("{}/a.*", inputs.display()))
        .arg("--output-dir")
        .arg(&outputs)
        .assert()
        .success();

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("a.txt.json").exists());
}

#[test]
fn test_batch_stops_on_error() {
    let dir = TempDir::new().unwrap();
    write_response(dir.path(), "bad.json", "{}");

    devis(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", dir.path().display()))
        .assert()
        .failure();
}

#[test]
fn test_taxonomy_lists_trades_and_agencies() {
    let dir = TempDir::new().unwrap();
    devis(dir.path())
        .arg("taxonomy")
        .assert()
        .success()
        .stdout(predicate::str::contains("PLOMBERIE"))
        .stdout(predicate::str::contains("VOLET-STORE"));

    devis(dir.path())
        .args(["taxonomy", "--agencies"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IMODIRECT"));
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("devis.json");

    devis(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();

    devis(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "review.auto_insert_threshold", "0.99"])
        .assert()
        .success();

    devis(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "review.auto_insert_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.99"));

    devis(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "mapping.discard_threshold", "2.0"])
        .assert()
        .failure();

    devis(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
