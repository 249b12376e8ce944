mod common;

use assert_cmd::Command;
use common::{TestWorkspace, extract_csv, sample_rows};
use gias_establishments::Release;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn gias() -> Command {
    let mut command = Command::cargo_bin("gias").expect("binary exists");
    command.env_remove("RUST_LOG").env_remove("GIAS_RESOURCE_PATH");
    command
}

#[test]
fn columns_lists_current_release() {
    gias()
        .args(["columns"])
        .assert()
        .success()
        .stdout(contains("raw name"))
        .stdout(contains("AccreditationExpiryDate"))
        .stdout(contains("category(sen_need)"));
}

#[test]
fn columns_lists_legacy_release_as_json() {
    let output = gias()
        .args(["columns", "--release", "legacy", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let descriptors: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    let descriptors = descriptors.as_array().expect("array of descriptors");
    assert_eq!(descriptors[0]["raw_name"], "URN");
    assert!(
        descriptors
            .iter()
            .all(|d| d["raw_name"] != "AccreditationExpiryDate")
    );
}

#[test]
fn preview_renders_selected_columns() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("edubase.csv", &extract_csv(Release::Current, &sample_rows()));
    gias()
        .args([
            "preview",
            "-i",
            path.to_str().unwrap(),
            "-C",
            "URN,EstablishmentName",
            "--rows",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("urn     establishment_name"))
        .stdout(contains("100001  City of London School for Girls"))
        .stdout(contains("Westminster").not());
}

#[test]
fn preview_can_keep_raw_names() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("edubase.csv", &extract_csv(Release::Current, &sample_rows()));
    gias()
        .args([
            "preview",
            "-i",
            path.to_str().unwrap(),
            "-C",
            "URN,Postcode",
            "--raw-names",
        ])
        .assert()
        .success()
        .stdout(contains("URN     Postcode"));
}

#[test]
fn preview_finds_resource_in_resource_dir() {
    let workspace = TestWorkspace::new();
    workspace.write(
        "resources/edubasealldata.csv",
        &extract_csv(Release::Current, &sample_rows()),
    );
    gias()
        .args([
            "preview",
            "--resource-dir",
            workspace.path().join("resources").to_str().unwrap(),
            "-C",
            "URN",
        ])
        .assert()
        .success()
        .stdout(contains("130400"));
}

#[test]
fn send_emits_keyed_json() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("edubase.csv", &extract_csv(Release::Current, &sample_rows()));
    let output = gias()
        .args(["send", "-i", path.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let records: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    assert_eq!(records["100000"]["sen_unit"], true);
    assert_eq!(records["100001"]["sen_unit"], false);
    assert_eq!(
        records["100000"]["sen_provision_types"],
        serde_json::json!(["SPLD", "ASD"])
    );
}

#[test]
fn send_renders_table_with_limit() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("edubase.csv", &extract_csv(Release::Current, &sample_rows()));
    gias()
        .args(["send", "-i", path.to_str().unwrap(), "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("sen_provision_types"))
        .stdout(contains("SPLD|ASD"))
        .stdout(contains("130400").not());
}

#[test]
fn parse_failure_exits_with_context() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("bad.csv", "URN,NumberOfPupils\n100000,many\n");
    gias()
        .args(["preview", "-i", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("error: Loading extract"))
        .stderr(contains("Column 'number_of_pupils' row 0: cannot parse 'many'"));
}

#[test]
fn missing_input_reports_source_not_found() {
    let workspace = TestWorkspace::new();
    let path = workspace.path().join("absent.csv");
    gias()
        .args(["send", "-i", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("No readable source found"));
}

#[test]
fn send_reads_legacy_release() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("legacy.csv", &extract_csv(Release::Legacy, &sample_rows()));
    let output = gias()
        .args(["send", "-i", path.to_str().unwrap(), "--release", "legacy", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let records: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    assert_eq!(records["130400"]["sen_unit"], true);
}
