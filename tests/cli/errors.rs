use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();
    let output = t.run(&["--help"]);

    assert_success(&output);
    for command in ["set", "encrypt", "decrypt", "recurse"] {
        assert_stdout_contains(&output, command);
    }
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();
    assert_failure(&t.run(&["rotate"]));
}

#[test]
fn test_invalid_config_file() {
    let t = Test::new();
    t.write(".secure-pillar.toml", "[gpg\nkey = ");
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.encrypt(&[], "app.sls");

    assert_failure(&output);
    assert_stderr_contains(&output, "invalid config file");
}

#[test]
fn test_missing_explicit_config_file() {
    let t = Test::new();
    let output = t.encrypt(&["--config", "nope.toml"], "app.sls");

    assert_failure(&output);
    assert_stderr_contains(&output, "failed to read config file");
}

#[test]
fn test_unknown_config_key() {
    let t = Test::new();
    t.write(".secure-pillar.toml", "[gpg]\nrecipient = \"salt\"\n");

    let output = t.encrypt(&[], "app.sls");
    assert_failure(&output);
}

#[test]
fn test_version() {
    let t = Test::new();
    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("secure-pillar"));
}

#[test]
fn test_missing_required_file_argument() {
    let t = Test::new();
    t.cmd()
        .arg("decrypt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_log_format_json_keeps_stdout_clean() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    t.cmd()
        .env("SECURE_PILLAR_LOG", "secure_pillar=debug")
        .env("SECURE_PILLAR_LOG_FORMAT", "json")
        .args(["decrypt", "--file", "app.sls", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{}\n"))
        .stderr(predicate::str::contains("\"level\":\"DEBUG\""));
}
