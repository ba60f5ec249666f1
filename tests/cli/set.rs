use crate::support::*;

#[test]
fn test_set_missing_pubring() {
    let t = Test::new();
    let output = t.set(&["--pgp-key", "Salt Master"], "db_password", "hunter2");

    assert_failure(&output);
    assert_stderr_contains(&output, "cannot read keyring");
    assert_stderr_contains(&output, "--pubring");
    assert_stdout_excludes(&output, "hunter2");
}

#[test]
fn test_set_without_key() {
    let t = Test::new();
    let output = t.set(&[], "db_password", "hunter2");

    assert_failure(&output);
    assert_stderr_contains(&output, "no pgp key given");
}

#[test]
fn test_set_empty_name() {
    let t = Test::new();
    let output = t.set(&["--pgp-key", "salt"], "", "hunter2");

    assert_failure(&output);
    assert_stderr_contains(&output, "secret name cannot be empty");
}

#[test]
fn test_set_empty_pubring_file() {
    let t = Test::new();
    t.write("pubring.gpg", "");

    let output = t.set(
        &["--pubring", "pubring.gpg", "--pgp-key", "salt"],
        "token",
        "abc",
    );

    assert_failure(&output);
    assert_stderr_contains(&output, "is empty");
}

#[test]
fn test_set_key_from_env() {
    let t = Test::new();
    let output = t
        .cmd()
        .env("SECURE_PILLAR_KEY", "salt")
        .args(["set", "--name", "token", "--secret", "abc"])
        .output()
        .expect("failed to run secure-pillar");

    // The key is taken from the environment; the missing keyring is next.
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot read keyring");
}
