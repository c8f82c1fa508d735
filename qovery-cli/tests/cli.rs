use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const ENV_ID: &str = "5b3a8c9e-4f2d-4e51-9c0a-7d1e2f3a4b5c";

fn qovery(server: &MockServer, home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("qovery").unwrap();
    cmd.env_clear()
        .env("NO_COLOR", "1")
        .arg("--api-url")
        .arg(server.base_url())
        .arg("--token")
        .arg("test-token")
        .arg("--context-file")
        .arg(home.path().join("context.json"));
    cmd
}

fn mock_environment(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path(format!("/environment/{}", ENV_ID));
        then.status(200).json_body(json!({
            "id": ENV_ID,
            "name": "staging",
            "project": {"id": "proj-1"},
            "organization": {"id": "org-1"}
        }));
    });
}

#[test]
fn unknown_cronjob_fails_with_listing_hint() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();
    mock_environment(&server);
    server.mock(|when, then| {
        when.method(GET).path(format!("/environment/{}/job", ENV_ID));
        then.status(200).json_body(json!({"results": []}));
    });
    let mutations = server.mock(|when, then| {
        when.method(POST);
        then.status(500);
    });

    qovery(&server, &home)
        .args(["cronjob", "deploy", "--environment", ENV_ID])
        .args(["--cronjob", "doesnotexist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("doesnotexist"))
        .stderr(predicate::str::contains("qovery cronjob list"));

    mutations.assert_hits(0);
}

#[test]
fn single_and_bulk_targets_are_exclusive() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();
    let any = server.mock(|when, then| {
        when.path_contains("/");
        then.status(500);
    });

    qovery(&server, &home)
        .args(["cronjob", "deploy", "--environment", ENV_ID])
        .args(["--cronjob", "a", "--cronjobs", "a,b"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));

    any.assert_hits(0);
}

#[test]
fn tag_is_rejected_for_applications() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    qovery(&server, &home)
        .args(["application", "deploy", "--environment", ENV_ID])
        .args(["--application", "api", "--tag", "v1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--commit-id"));
}

#[test]
fn missing_environment_points_to_context() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    qovery(&server, &home)
        .args(["container", "stop", "--container", "web"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no environment selected"));
}

#[test]
fn context_set_persists_selection() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(GET).path("/organization");
        then.status(200)
            .json_body(json!({"results": [{"id": "org-1", "name": "acme"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/organization/org-1/project");
        then.status(200)
            .json_body(json!({"results": [
                {"id": "proj-1", "name": "shop", "organization": {"id": "org-1"}}
            ]}));
    });

    qovery(&server, &home)
        .args(["context", "set", "--organization", "acme", "--project", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shop"));

    let saved = std::fs::read_to_string(home.path().join("context.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["organization_id"], "org-1");
    assert_eq!(saved["project_id"], "proj-1");
    assert!(saved.get("access_token").is_none());
}

#[test]
fn unauthorized_token_gets_a_hint() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(GET).path("/organization");
        then.status(401).body("unauthorized");
    });

    qovery(&server, &home)
        .args(["organization", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn usage_errors_exit_with_one() {
    let server = MockServer::start();
    let home = TempDir::new().unwrap();

    qovery(&server, &home)
        .args(["cronjob", "deploy", "--bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}
