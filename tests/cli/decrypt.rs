use crate::support::*;

#[test]
fn test_decrypt_requires_file() {
    let t = Test::new();
    let output = t.decrypt(&[], "-");

    assert_failure(&output);
    assert_stderr_contains(&output, "decrypt needs a pillar file");
}

#[test]
fn test_decrypt_plaintext_only() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.decrypt(&[], "app.sls");

    assert_success(&output);
    assert_stderr_contains(&output, "no encrypted values");
    assert_stdout_excludes(&output, "hunter2");
}

#[test]
fn test_decrypt_json_plaintext_only() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.run(&["decrypt", "--file", "app.sls", "--json"]);

    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "{}");
}

#[test]
fn test_decrypt_output_writes_pillar() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.run(&["decrypt", "--file", "app.sls", "--output", "plain.sls"]);

    assert_success(&output);
    assert_stdout_contains(&output, "plain.sls");
    assert_eq!(t.read("app.sls"), PLAIN_PILLAR);

    let plain = t.read("plain.sls");
    assert!(plain.starts_with("#!yaml|gpg\n\nsecure_vars:"));
    assert!(plain.contains("db_password: hunter2"));
}

#[test]
fn test_decrypt_output_to_stdout() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.run(&["decrypt", "--file", "app.sls", "--output", "-"]);

    assert_success(&output);
    assert!(stdout(&output).starts_with("#!yaml|gpg\n\nsecure_vars:"));
    assert_stdout_contains(&output, "db_user: app");
}

#[test]
fn test_decrypt_output_conflicts_with_json() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.run(&["decrypt", "--file", "app.sls", "--json", "--output", "-"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "--json");
}

#[test]
fn test_decrypt_missing_secring() {
    let t = Test::new();
    let pillar = format!("secure_vars:\n  token: |\n    {}\n", FAKE_ARMOR.trim_end().replace('\n', "\n    "));
    t.write("app.sls", &pillar);

    let output = t.decrypt(&["--secring", "nope.gpg"], "app.sls");

    assert_failure(&output);
    assert_stderr_contains(&output, "cannot read keyring");
}

#[test]
fn test_decrypt_empty_secring() {
    let t = Test::new();
    let pillar = format!("secure_vars:\n  token: |\n    {}\n", FAKE_ARMOR.trim_end().replace('\n', "\n    "));
    t.write("app.sls", &pillar);
    t.write("secring.gpg", "\n");

    let output = t.decrypt(&["--secring", "secring.gpg"], "app.sls");

    assert_failure(&output);
    assert_stderr_contains(&output, "is empty");
    assert_stderr_contains(&output, "export-secret-keys");
}
