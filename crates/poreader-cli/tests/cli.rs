use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn poreader() -> Command {
    Command::cargo_bin("poreader").expect("binary should be built")
}

#[test]
fn config_init_then_get() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    poreader()
        .arg("-c")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(path.exists());

    poreader()
        .arg("-c")
        .arg(&path)
        .args(["config", "get", "server.port"])
        .assert()
        .success()
        .stdout("5000\n");

    poreader()
        .arg("-c")
        .arg(&path)
        .args(["config", "get", "llm.model"])
        .assert()
        .success()
        .stdout("\"gpt-3.5-turbo\"\n");
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();

    poreader()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    poreader()
        .args(["config", "init", "--force", "--output"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn config_show_reads_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "server": { "port": 8081 } }"#).unwrap();

    poreader()
        .arg("-c")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\": 8081"))
        .stdout(predicate::str::contains("\"max_tokens\": 200"));
}

#[test]
fn config_get_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();

    poreader()
        .arg("-c")
        .arg(&path)
        .args(["config", "get", "llm.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found: llm.nope"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();

    poreader()
        .arg("-c")
        .arg(dir.path().join("missing.json"))
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn process_rejects_unsupported_type() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "PO number: 1").unwrap();

    poreader()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported media type: text/plain"));
}

#[test]
fn process_missing_input() {
    poreader()
        .args(["process", "/nonexistent/po.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn serve_reports_bind_failure_without_announcing() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        format!(
            r#"{{ "models": {{ "model_dir": "{}" }} }}"#,
            dir.path().join("no-models").display()
        ),
    )
    .unwrap();

    poreader()
        .arg("-c")
        .arg(&path)
        .args(["serve", "--host", "127.0.0.1", "--port"])
        .arg(port.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("failed to bind 127.0.0.1:{port}")))
        .stderr(predicate::str::contains("istening").not());

    drop(taken);
}
