use crate::support::*;

#[test]
fn test_encrypt_requires_file() {
    let t = Test::new();
    let output = t.encrypt(&["--pgp-key", "salt"], "-");

    assert_failure(&output);
    assert_stderr_contains(&output, "encrypt needs a pillar file");
}

#[test]
fn test_encrypt_plaintext_without_key() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.encrypt(&[], "app.sls");

    assert_failure(&output);
    assert_stderr_contains(&output, "no pgp key given");
    assert_stderr_contains(&output, "--pgp-key");
}

#[test]
fn test_encrypt_key_from_config_file() {
    let t = Test::new();
    t.write(".secure-pillar.toml", "[gpg]\nkey = \"salt\"\npubring = \"keys/pub.gpg\"\n");
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.encrypt(&[], "app.sls");

    // The key comes from the file, so the failure is the keyring path.
    assert_failure(&output);
    assert_stderr_contains(&output, "keys/pub.gpg");
}

#[test]
fn test_encrypt_already_encrypted_is_noop() {
    let t = Test::new();
    let pillar = format!("secure_vars:\n  token: |\n    {}\n", FAKE_ARMOR.trim_end().replace('\n', "\n    "));
    t.write("done.sls", &pillar);

    let output = t.run(&["encrypt", "--file", "done.sls", "--output", "out.sls"]);

    assert_success(&output);
    assert_stderr_contains(&output, "nothing to encrypt");
    assert!(!t.path("out.sls").exists());
    assert_eq!(t.read("done.sls"), pillar);
}

#[test]
fn test_encrypt_missing_file_is_noop() {
    let t = Test::new();
    let output = t.encrypt(&[], "missing.sls");

    assert_success(&output);
    assert_stderr_contains(&output, "nothing to encrypt");
}

#[test]
fn test_encrypt_malformed_file_is_noop() {
    let t = Test::new();
    t.write("broken.sls", MALFORMED_PILLAR);

    let output = t.encrypt(&["--pgp-key", "salt"], "broken.sls");

    assert_success(&output);
    assert_stderr_contains(&output, "nothing to encrypt");
    assert_eq!(t.read("broken.sls"), MALFORMED_PILLAR);
}
