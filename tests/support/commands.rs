//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a secure-pillar command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test working directory
    /// - Settings environment variables cleared and colors off
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd =
            Command::cargo_bin("secure-pillar").expect("failed to find secure-pillar binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        for var in [
            "SECURE_PILLAR_PUBRING",
            "SECURE_PILLAR_SECRING",
            "SECURE_PILLAR_KEY",
            "SECURE_PILLAR_LOG",
            "SECURE_PILLAR_LOG_FORMAT",
        ] {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run the binary with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd().args(args).output().expect("failed to run secure-pillar")
    }

    /// Shortcut for `secure-pillar set`.
    pub fn set(&self, extra: &[&str], name: &str, secret: &str) -> Output {
        let mut args = extra.to_vec();
        args.extend(["set", "--name", name, "--secret", secret]);
        self.run(&args)
    }

    /// Shortcut for `secure-pillar encrypt`.
    pub fn encrypt(&self, extra: &[&str], file: &str) -> Output {
        let mut args = extra.to_vec();
        args.extend(["encrypt", "--file", file]);
        self.run(&args)
    }

    /// Shortcut for `secure-pillar decrypt`.
    pub fn decrypt(&self, extra: &[&str], file: &str) -> Output {
        let mut args = extra.to_vec();
        args.extend(["decrypt", "--file", file]);
        self.run(&args)
    }

    /// Shortcut for `secure-pillar recurse`.
    pub fn recurse(&self, extra: &[&str], dir: &str) -> Output {
        let mut args = extra.to_vec();
        args.extend(["recurse", dir]);
        self.run(&args)
    }
}
