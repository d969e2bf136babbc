//! End-to-end CLI tests for the modindex binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Binary invocation isolated from the user's config file and environment.
fn modindex(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("modindex").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("MODINDEX_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

async fn fakemod_server() -> Option<MockServer> {
    let server = start_mock_server_or_skip().await?;
    Mock::given(method("GET"))
        .and(path("/mods/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemaVersion": "5.0.0",
            "identifiers": ["bricks:fakemod:1c88ae7e3799f75"],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mods/bricks/fakemod.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemaVersion": "5.0.0",
            "genericIdentifier": "bricks:fakemod",
            "fancyName": "Fake Mod",
            "author": "ReviversMC",
            "files": [{
                "fileName": "fakemod-1.0.0.jar",
                "mcVersions": ["1.19"],
                "shortSha512Hash": "1c88ae7e3799f75"
            }]
        })))
        .mount(&server)
        .await;
    Some(server)
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn run(cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || {
        let mut cmd = cmd;
        cmd.assert()
    })
    .await
    .unwrap()
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    modindex(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("statically hosted mod index"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    modindex(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("modindex"));
}

#[test]
fn test_binary_without_subcommand_fails() {
    let home = TempDir::new().unwrap();
    modindex(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    modindex(&home)
        .args(["index", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_rejects_invalid_config_file() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("modindex");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "request_timeout_secs = 0\n").unwrap();

    modindex(&home)
        .arg("index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("request_timeout_secs"));
}

#[test]
fn test_binary_malformed_identifier_fails_without_network() {
    let home = TempDir::new().unwrap();
    modindex(&home)
        .args(["file", "bricks:fakemod", "--base-url", "http://127.0.0.1:9/mods"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed identifier"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_manifest_prints_json() {
    let Some(server) = fakemod_server().await else {
        return;
    };
    let home = TempDir::new().unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "manifest", "Bricks:FakeMod"])
        .args(["--base-url", &format!("{}/mods", server.uri())]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("\"genericIdentifier\": \"bricks:fakemod\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_file_lookup_prints_file_version() {
    let Some(server) = fakemod_server().await else {
        return;
    };
    let home = TempDir::new().unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "file", "bricks:fakemod:1c88ae7e3799f75"])
        .env("MODINDEX_BASE_URL", format!("{}/mods", server.uri()));

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("fakemod-1.0.0.jar"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_not_found_exits_with_code_two() {
    let Some(server) = fakemod_server().await else {
        return;
    };
    let home = TempDir::new().unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "manifest", "bricks:doesnotexist"])
        .args(["--base-url", &format!("{}/mods", server.uri())]);

    run(cmd)
        .await
        .code(2)
        .stderr(predicate::str::contains("Not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_index_summary_uses_config_file_base_url() {
    let Some(server) = fakemod_server().await else {
        return;
    };
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("modindex");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("base_url = \"{}/mods/\"\n", server.uri()),
    )
    .unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "index"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("\"identifiers\": 1"))
        .stdout(predicate::str::contains("\"mods\": 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_hash_lookup_reports_matches() {
    let Some(server) = fakemod_server().await else {
        return;
    };
    let home = TempDir::new().unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "hash", "1C88AE7E3799F75"])
        .args(["--base-url", &format!("{}/mods", server.uri())]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("\"shortHash\": \"1c88ae7e3799f75\""))
        .stdout(predicate::str::contains("fakemod-1.0.0.jar"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_unreachable_index_fails() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/mods/index.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "index", "--base-url", &format!("{}/mods", server.uri())]);

    run(cmd)
        .await
        .code(1)
        .stderr(predicate::str::contains("503"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_incomplete_hash_scan_exits_with_code_one() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/mods/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemaVersion": "5.0.0",
            "identifiers": ["fabric:alpha:abc123def456789aaa", "quilt:beta:abc123def456789bbb"],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mods/fabric/alpha.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemaVersion": "5.0.0",
            "genericIdentifier": "fabric:alpha",
            "fancyName": "Alpha",
            "author": "tester",
            "files": [{"fileName": "alpha-1.0.0.jar", "shortSha512Hash": "abc123def456789"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mods/quilt/beta.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "hash", "abc123def456789"])
        .args(["--base-url", &format!("{}/mods", server.uri())]);

    run(cmd)
        .await
        .code(1)
        .stdout(predicate::str::contains("alpha-1.0.0.jar"))
        .stdout(predicate::str::contains("\"failures\""))
        .stdout(predicate::str::contains("quilt:beta:abc123def456789bbb"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_hash_file_looks_up_content_hash() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let content = b"not really a jar";
    let hash = modindex_core::short_hash_for_content(content);
    Mock::given(method("GET"))
        .and(path("/mods/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemaVersion": "5.0.0",
            "identifiers": [format!("bricks:jarmod:{hash}")],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mods/bricks/jarmod.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schemaVersion": "5.0.0",
            "genericIdentifier": "bricks:jarmod",
            "fancyName": "Jar Mod",
            "author": "tester",
            "files": [{"fileName": "jarmod-1.0.0.jar", "shortSha512Hash": hash}]
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    let jar = home.path().join("jarmod-1.0.0.jar");
    std::fs::write(&jar, content).unwrap();
    let mut cmd = modindex(&home);
    cmd.args(["-q", "hash", "--file"])
        .arg(&jar)
        .args(["--base-url", &format!("{}/mods", server.uri())]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains(format!("\"shortHash\": \"{hash}\"")))
        .stdout(predicate::str::contains("jarmod-1.0.0.jar"));
}

#[test]
fn test_binary_hash_file_unreadable_path_fails() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("missing.jar");
    modindex(&home)
        .args(["-q", "hash", "--file"])
        .arg(&missing)
        .args(["--base-url", "http://127.0.0.1:9/mods"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}
