//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn voice_relay_bin() -> Command {
    let mut cmd = Command::cargo_bin("voice-relay").expect("binary should build");
    cmd.env_remove("VOICE_RELAY_HOST")
        .env_remove("VOICE_RELAY_PORT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_output() {
    voice_relay_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PIN"))
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--no-partial"))
        .stdout(predicate::str::contains("--notify"));
}

#[test]
fn version_output() {
    voice_relay_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-relay"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let home = tempfile::tempdir().unwrap();

    voice_relay_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-relay"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_help() {
    voice_relay_bin()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn invalid_timeout_is_usage_error() {
    let home = tempfile::tempdir().unwrap();

    voice_relay_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["--timeout", "whenever"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid timeout"));
}

#[test]
fn invalid_port_is_usage_error() {
    voice_relay_bin()
        .args(["--port", "70000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("port"));
}

#[test]
fn end_of_input_quits_cleanly() {
    let home = tempfile::tempdir().unwrap();

    voice_relay_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["--host", "127.0.0.1", "--port", "9"])
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("http://127.0.0.1:9/type"));
}

#[test]
fn quit_command_exits() {
    let home = tempfile::tempdir().unwrap();

    voice_relay_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .write_stdin("0482\n75\n/status\n/quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("PIN accepted"))
        .stdout(predicate::str::contains("last_text"));
}

#[test]
fn rejected_pin_input_warns() {
    let home = tempfile::tempdir().unwrap();

    voice_relay_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .write_stdin("12ab\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("PIN may only contain digits"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn piped_speech_after_start_is_posted_once() {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/type"))
        .and(body_json(serde_json::json!({
            "text": "turn on the light",
            "pin": "048275",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let port = server.address().port().to_string();
    let home = tempfile::tempdir().unwrap();
    let assert = tokio::task::spawn_blocking(move || {
        voice_relay_bin()
            .env("HOME", home.path())
            .env("XDG_CONFIG_HOME", home.path())
            .args(["--host", "127.0.0.1", "--port", &port])
            .write_stdin("048275\n/start\nturn on the light\n")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("turn on the light"))
        .stderr(predicate::str::contains("Not listening").not());
    server.verify().await;
}
