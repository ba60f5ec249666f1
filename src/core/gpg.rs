//! Scoped GnuPG homes.
//!
//! Every keyring is imported into its own temporary `--homedir` so the
//! user's real keyring is never touched. The directory (and any gpg-agent
//! spawned for it) lives exactly as long as the [`GpgHome`] value.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;
use tracing::{debug, trace};

use crate::error::{KeyringError, Result};

/// A private, temporary GnuPG home directory.
#[derive(Debug)]
pub struct GpgHome {
    program: PathBuf,
    dir: TempDir,
}

impl GpgHome {
    /// Locate `gpg` and create an empty home for it.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::GpgNotFound` if gpg is not on `PATH`.
    pub fn new() -> Result<Self> {
        let program = which::which("gpg").map_err(|_| KeyringError::GpgNotFound)?;
        let dir = tempfile::Builder::new()
            .prefix("secure-pillar-")
            .tempdir()?;

        debug!(home = %dir.path().display(), gpg = %program.display(), "created gpg home");
        Ok(Self { program, dir })
    }

    /// Home directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run gpg against this home, feeding `input` on stdin.
    ///
    /// A non-zero exit status is not an error here; callers inspect
    /// `status` and translate failures into their own error kind.
    pub fn run(&self, args: &[&str], input: &[u8]) -> Result<Output> {
        trace!(?args, input_len = input.len(), "running gpg");

        let mut child = Command::new(&self.program)
            .arg("--homedir")
            .arg(self.dir.path())
            .args(["--batch", "--no-tty", "--no-permission-warning"])
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| KeyringError::Gpg(format!("failed to spawn gpg: {}", e)))?;

        // Feed stdin from a separate thread so a large stdout can't deadlock us.
        let output = std::thread::scope(|scope| {
            if let Some(mut stdin) = child.stdin.take() {
                scope.spawn(move || {
                    let _ = stdin.write_all(input);
                });
            }
            child.wait_with_output()
        })
        .map_err(|e| KeyringError::Gpg(format!("gpg command failed: {}", e)))?;

        trace!(status = ?output.status, stdout_len = output.stdout.len(), "gpg finished");
        Ok(output)
    }
}

impl Drop for GpgHome {
    fn drop(&mut self) {
        // Secret key operations start an agent bound to the home; stop it
        // before the directory goes away.
        let _ = Command::new("gpgconf")
            .arg("--homedir")
            .arg(self.dir.path())
            .args(["--kill", "gpg-agent"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
}

/// Trimmed stderr of a finished gpg process.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
