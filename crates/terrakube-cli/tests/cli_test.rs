#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn terrakube(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("terrakube").unwrap();
    cmd.env_remove("TERRAKUBE_ENDPOINT")
        .env_remove("TERRAKUBE_TOKEN")
        .env_remove("TERRAKUBE_INSECURE_HTTP_CLIENT")
        .env_remove("RUST_LOG")
        .arg("--dir")
        .arg(dir);
    cmd
}

fn team_document(name: &str) -> serde_json::Value {
    json!({
        "data": {
            "type": "team",
            "id": "t-1",
            "attributes": {
                "name": name,
                "manageState": false,
                "manageWorkspace": false,
                "manageModule": false,
                "manageProvider": false,
                "manageVcs": false,
                "manageTemplate": false,
                "manageJob": true,
                "manageCollection": false
            }
        }
    })
}

fn write_config(dir: &Path, file: &str, config: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    terrakube(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terrakube"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("schema"));
}

#[test]
fn test_cli_version() {
    let dir = tempfile::tempdir().unwrap();
    terrakube(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("terrakube"));
}

#[test]
fn test_schema_needs_no_connection() {
    let dir = tempfile::tempdir().unwrap();
    terrakube(dir.path())
        .args(["schema", "terrakube_team"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manage_job"))
        .stdout(predicate::str::contains("requires_replace"));

    terrakube(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("terrakube_module"))
        .stdout(predicate::str::contains("terrakube_collection"));
}

#[test]
fn test_schema_unknown_type() {
    let dir = tempfile::tempdir().unwrap();
    terrakube(dir.path())
        .args(["schema", "terrakube_workspace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource type"));
}

#[test]
fn test_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    terrakube(dir.path())
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tracked resources"));
}

#[test]
fn test_missing_token_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    terrakube(dir.path())
        .args(["--endpoint", "https://terrakube.example.com"])
        .args(["import", "terrakube_team", "admins", "org1,t-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TERRAKUBE_TOKEN"));
}

#[test]
fn test_import_rejects_malformed_identifier() {
    let dir = tempfile::tempdir().unwrap();
    terrakube(dir.path())
        .args(["--endpoint", "http://127.0.0.1:1", "--token", "t"])
        .args(["import", "terrakube_team", "admins", "org1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unexpected Import Identifier"));

    assert!(!dir.path().join(".terrakube/state.json").exists());
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "team.json",
        json!({ "organization_id": "org1", "manage_job": "yes" }),
    );

    terrakube(dir.path())
        .args(["--endpoint", "http://127.0.0.1:1", "--token", "t"])
        .args(["create", "terrakube_team", "admins", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required argument"))
        .stderr(predicate::str::contains("Incorrect attribute value type"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_team_lifecycle() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/organization/org1/team"))
        .and(header("Authorization", "Bearer tk-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(team_document("infra-admins")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/organization/org1/team/t-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = write_config(
        dir.path(),
        "team.json",
        json!({ "organization_id": "org1", "name": "infra-admins", "manage_job": true }),
    );
    let uri = mock_server.uri();
    let connect = ["--endpoint", uri.as_str(), "--token", "tk-token"];

    terrakube(dir.path())
        .args(connect)
        .args(["create", "terrakube_team", "admins", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("id: t-1"));

    terrakube(dir.path())
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("terrakube_team.admins"))
        .stdout(predicate::str::contains("id=t-1"));

    // name forces replacement
    let renamed = write_config(
        dir.path(),
        "renamed.json",
        json!({ "organization_id": "org1", "name": "platform", "manage_job": true }),
    );
    terrakube(dir.path())
        .args(connect)
        .args(["update", "terrakube_team", "admins", "--config"])
        .arg(&renamed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("forces replacement"));

    terrakube(dir.path())
        .args(connect)
        .args(["update", "terrakube_team", "admins", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));

    terrakube(dir.path())
        .args(connect)
        .args(["delete", "terrakube_team", "admins"])
        .assert()
        .success();

    terrakube(dir.path())
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tracked resources"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_drops_missing_resource() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/organization/org1/team/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(team_document("infra-admins")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organization/org1/team/t-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let connect = ["--endpoint", uri.as_str(), "--token", "tk-token"];

    terrakube(dir.path())
        .args(connect)
        .args(["import", "terrakube_team", "admins", "org1,t-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported terrakube_team.admins"));

    terrakube(dir.path())
        .args(connect)
        .args(["read", "terrakube_team", "admins"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed from state"))
        .stderr(predicate::str::contains("Resource not found"));

    terrakube(dir.path())
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tracked resources"));
}
