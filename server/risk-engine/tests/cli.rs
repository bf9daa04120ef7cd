//! Binary contract: stdin JSON in, stdout JSON out, exit codes.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const PROFILE_ROW: &str = r#"{
  "profile": {
    "height_cm": 172,
    "weight_kg": 84,
    "date_of_birth": "1972-03-09",
    "exerciseFrequency": "light",
    "chronicConditions": ["Hypertension"],
    "smokingStatus": "former"
  },
  "userLevel": 1,
  "basePremium": 200,
  "userId": "6f1c1a4e-2b7d-4c55-9a57-3f4d0b1d2e8a"
}"#;

fn risk() -> Command {
  let mut cmd = Command::cargo_bin("youmatter-risk").unwrap();
  cmd
    .env_remove("RUST_LOG")
    .env_remove("YOUMATTER_LOG_LEVEL")
    .env_remove("YOUMATTER_CATALOG")
    .env_remove("YOUMATTER_SCORING");
  cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
  serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn assess_is_the_default_command() {
  let output = risk()
    .args(["--as-of", "2025-01-15"])
    .write_stdin(PROFILE_ROW)
    .output()
    .unwrap();
  assert!(output.status.success());

  let json = stdout_json(&output);
  assert_eq!(json["report"]["level"], 4);
  assert_eq!(json["report"]["discountPercentage"], 5);
  assert_eq!(json["plans"][0]["planId"], "chronic-care-plus");
  assert_eq!(json["discountEvent"]["timestamp"], "2025-01-15T00:00:00Z");

  let explicit = risk()
    .args(["assess", "--as-of", "2025-01-15"])
    .write_stdin(PROFILE_ROW)
    .output()
    .unwrap();
  assert_eq!(output.stdout, explicit.stdout);
}

#[test]
fn as_of_sets_the_age_reference_date() {
  let profile = r#"{"date_of_birth": "1980-06-02", "heightCm": 175, "weightKg": 75}"#;
  let age_risk = |as_of: &str| {
    let output = risk()
      .args(["score", "--as-of", as_of])
      .write_stdin(profile)
      .output()
      .unwrap();
    assert!(output.status.success());
    stdout_json(&output)["factors"]["ageRisk"].as_f64().unwrap()
  };
  // 44 the day before the birthday, 45 on it.
  assert_eq!(age_risk("2025-06-01"), 0.0);
  assert_eq!(age_risk("2025-06-02"), 0.02);
}

#[test]
fn incomplete_profile_exits_with_two() {
  let output = risk()
    .arg("score")
    .write_stdin(r#"{"age": 30, "heightCm": 170}"#)
    .output()
    .unwrap();
  assert_eq!(output.status.code(), Some(2));

  let json = stdout_json(&output);
  assert_eq!(json["error"], true);
  assert_eq!(json["kind"], "incomplete_profile");
  assert_eq!(
    json["message"],
    "Complete your health profile to see your personalized risk assessment"
  );
  assert_eq!(json["fields"], serde_json::json!(["weightKg"]));
}

#[test]
fn unknown_smoking_status_exits_with_two() {
  let output = risk()
    .arg("score")
    .write_stdin(r#"{"age": 30, "heightCm": 170, "weightKg": 65, "smokingStatus": "sometimes"}"#)
    .output()
    .unwrap();
  assert_eq!(output.status.code(), Some(2));
  let json = stdout_json(&output);
  assert_eq!(json["kind"], "validation");
  assert_eq!(json["fields"], serde_json::json!(["smokingStatus"]));
}

#[test]
fn malformed_json_exits_with_one() {
  let output = risk().write_stdin("{not json").output().unwrap();
  assert_eq!(output.status.code(), Some(1));
  let json = stdout_json(&output);
  assert_eq!(json["error"], true);
  assert_eq!(json["kind"], "json");
  assert!(json.get("fields").is_none());
}

#[test]
fn catalog_prints_builtin_plans() {
  risk()
    .arg("catalog")
    .assert()
    .success()
    .stdout(predicate::str::contains("chronic-care-plus"))
    .stdout(predicate::str::contains("senior-secure"));
}

#[test]
fn catalog_flag_loads_plans_from_file() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  write!(
    file,
    r#"[{{"id": "only-plan", "name": "Only Plan", "category": "health", "basePremium": 50}}]"#
  )
  .unwrap();

  let output = risk()
    .arg("--catalog")
    .arg(file.path())
    .arg("catalog")
    .output()
    .unwrap();
  assert!(output.status.success());
  let json = stdout_json(&output);
  assert_eq!(json["plans"].as_array().unwrap().len(), 1);
  assert_eq!(json["plans"][0]["id"], "only-plan");
}

#[test]
fn missing_catalog_file_exits_with_one() {
  risk()
    .args(["--catalog", "/nonexistent/plans.json", "catalog"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("\"error\":true"));
}
