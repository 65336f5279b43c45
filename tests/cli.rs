use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Runs the binary with an isolated HOME and no inherited configuration.
fn pitstop(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pitstop").unwrap();
    cmd.env_clear()
        .env("HOME", home.path())
        .current_dir(home.path())
        .arg("--no-color");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn version_prints_package_version() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "pitstop {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn empty_question_is_rejected() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .args(["ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("The question is empty"));
}

#[test]
fn upstream_failure_is_printed_as_reply() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .env("OPENAI_API_KEY", "sk-test")
        .env("OPENAI_BASE_URL", "http://127.0.0.1:9/v1")
        .args(["ask", "brake pedal feels soft"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("⚠️"));
}

#[test]
fn missing_api_key_is_reported_inline() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .args(["ask", "engine warning light came on"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn prompt_includes_reference_file_from_working_directory() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("extra_context.txt"),
        "LF Sonata: front stabilizer link, parts 30-50, labour 40-60",
    )
    .unwrap();

    pitstop(&home)
        .arg("prompt")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "LF Sonata: front stabilizer link, parts 30-50, labour 40-60",
        ));
}

#[test]
fn prompt_without_reference_file_still_succeeds() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .arg("prompt")
        .assert()
        .success()
        .stdout(predicate::str::contains("REFERENCE NOTES START"));
}

#[test]
fn config_masks_api_key() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .env("OPENAI_API_KEY", "sk-secret-wxyz")
        .env("PORT", "8088")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("****wxyz"))
        .stdout(predicate::str::contains(":8088"))
        .stdout(predicate::str::contains("sk-secret").not());
}

#[test]
fn invalid_port_fails_at_startup() {
    let home = TempDir::new().unwrap();

    pitstop(&home)
        .env("PORT", "five-thousand")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PORT"));
}

#[test]
fn init_writes_default_config_once() {
    let home = TempDir::new().unwrap();
    let config = home.path().join(".pitstop").join("config.toml");

    pitstop(&home).arg("init").assert().success();
    assert!(config.exists());
    assert!(fs::read_to_string(&config).unwrap().contains("gpt-4o-mini"));

    pitstop(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn config_file_values_are_used() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".pitstop");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.toml"),
        "[upstream]\nmodel = \"gpt-4o\"\n\n[server]\nport = 7000\n",
    )
    .unwrap();

    pitstop(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o"))
        .stdout(predicate::str::contains(":7000"));
}
