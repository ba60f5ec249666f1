use crate::support::*;

#[test]
fn test_recurse_not_a_directory() {
    let t = Test::new();
    t.write("app.sls", PLAIN_PILLAR);

    let output = t.recurse(&["--pgp-key", "salt"], "app.sls");

    assert_failure(&output);
    assert_stderr_contains(&output, "is not a directory");
}

#[test]
fn test_recurse_missing_directory() {
    let t = Test::new();
    let output = t.recurse(&["--pgp-key", "salt"], "nope");

    assert_failure(&output);
    assert_stderr_contains(&output, "is not a directory");
}

#[test]
fn test_recurse_failures_do_not_fail_the_run() {
    let t = Test::new();
    t.write("pillar/a.sls", PLAIN_PILLAR);
    t.write("pillar/nested/b.sls", MIXED_PILLAR);

    // No pubring: every file needing a key fails, the run still succeeds.
    let output = t.recurse(&["--pgp-key", "salt"], "pillar");

    assert_success(&output);
    assert_stderr_contains(&output, "skipped");
    assert_stderr_contains(&output, "a.sls");
    assert_stdout_contains(&output, "failed  2");
    assert!(!t.path("pillar/a.sls.new").exists());
}

#[test]
fn test_recurse_reports_each_failure_once() {
    let t = Test::new();
    t.write("pillar/a.sls", PLAIN_PILLAR);

    let output = t.recurse(&["--pgp-key", "salt"], "pillar");

    assert_success(&output);
    let mentions = stderr(&output)
        .lines()
        .filter(|line| line.contains("a.sls"))
        .count();
    assert_eq!(mentions, 1, "stderr: {}", stderr(&output));
}

#[test]
fn test_recurse_nothing_to_encrypt() {
    let t = Test::new();
    t.write("pillar/top.sls", "# top file\n");
    t.write("pillar/broken.sls", MALFORMED_PILLAR);
    t.write("pillar/README.md", PLAIN_PILLAR);

    let output = t.recurse(&[], "pillar");

    assert_success(&output);
    assert_stdout_contains(&output, "unchanged  2");
    assert_stdout_contains(&output, "written  0");
}
