//! Command-line interface.

pub mod decrypt;
pub mod encrypt;
pub mod output;
pub mod recurse;
pub mod set;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::{Overrides, Settings};
use crate::core::engine::Engine;
use crate::error::Result;

/// secure-pillar - Encrypt values in Salt pillar files with GnuPG.
#[derive(Parser)]
#[command(
    name = "secure-pillar",
    about = "Encrypt individual values in Salt pillar files with GnuPG",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Public keyring used to find the encryption key
    #[arg(short, long, global = true, env = "SECURE_PILLAR_PUBRING")]
    pub pubring: Option<PathBuf>,

    /// Secret keyring used for decryption
    #[arg(short, long, global = true, env = "SECURE_PILLAR_SECRING")]
    pub secring: Option<PathBuf>,

    /// PGP key name, email, or ID to encrypt with
    #[arg(short = 'k', long, global = true, env = "SECURE_PILLAR_KEY")]
    pub pgp_key: Option<String>,

    /// Settings file (default: ./.secure-pillar.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt one named value into a pillar
    Set {
        /// Secret name under secure_vars
        #[arg(short, long)]
        name: String,
        /// Secret value (read from stdin when omitted)
        #[arg(long)]
        secret: Option<String>,
        /// Pillar to add the value to ("-" starts a new one)
        #[arg(short, long, default_value = "-")]
        file: String,
        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
    },

    /// Encrypt every plaintext value in a pillar file
    Encrypt {
        /// Pillar file
        #[arg(short, long)]
        file: String,
        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = "-")]
        output: String,
    },

    /// Show every encrypted value of a pillar file in plaintext
    Decrypt {
        /// Pillar file
        #[arg(short, long)]
        file: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Write the whole pillar, decrypted, to this file ("-" for stdout)
        #[arg(short, long, conflicts_with = "json")]
        output: Option<String>,
    },

    /// Encrypt every .sls file under a directory into <file>.new
    Recurse {
        /// Directory to walk
        dir: PathBuf,
    },
}

impl GlobalArgs {
    /// Resolve settings from defaults, the settings file and these flags.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file can't be read or parsed.
    pub fn settings(&self) -> Result<Settings> {
        Settings::resolve(
            self.config.as_deref(),
            Overrides {
                pubring: self.pubring.clone(),
                secring: self.secring.clone(),
                pgp_key: self.pgp_key.clone(),
            },
        )
    }
}

/// Execute a command.
pub fn execute(command: Command, global: &GlobalArgs) -> Result<()> {
    use Command::*;

    let engine = Engine::new(global.settings()?);

    match command {
        Set {
            name,
            secret,
            file,
            output,
        } => set::execute(&engine, &name, secret, &file, &output),
        Encrypt { file, output } => encrypt::execute(&engine, &file, &output),
        Decrypt { file, json, output } => {
            decrypt::execute(&engine, &file, json, output.as_deref())
        }
        Recurse { dir } => recurse::execute(&engine, &dir),
    }
}
