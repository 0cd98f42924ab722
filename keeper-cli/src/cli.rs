//! Command-line definitions.

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{ArgAction, Args, Parser, Subcommand};
use keeper_crypto::DEFAULT_KEY_BITS;
use keeper_sync::StrategyKind;
use keeper_types::SecretType;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "keeper")]
#[command(version, about = "Personal secret vault with end-to-end encrypted sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (JSON). A missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate an RSA key pair
    Keygen {
        /// Directory receiving keeper.pub.pem and keeper.key.pem
        #[arg(long)]
        out: PathBuf,

        /// Modulus size in bits
        #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,

        /// Overwrite existing key files
        #[arg(long)]
        force: bool,
    },

    /// Validate, encrypt and store a new secret
    #[command(subcommand)]
    Add(AddCommand),

    /// List stored secrets without decrypting them
    List {
        /// Only secrets of this owner
        #[arg(long)]
        owner: Option<String>,

        /// List the remote store instead of the local one
        #[arg(long, requires = "token")]
        remote: bool,

        /// Session token for the remote
        #[arg(long)]
        token: Option<String>,
    },

    /// Decrypt and print a secret
    Show {
        #[command(flatten)]
        secret: SecretRef,

        /// Write binary content to this file instead of summarising it
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete a secret from the local store
    Remove {
        #[command(flatten)]
        secret: SecretRef,
    },

    /// Reconcile local secrets with the remote store
    Sync {
        #[arg(long)]
        owner: String,

        /// Session token for the remote
        #[arg(long)]
        token: String,

        /// push, passive or interactive
        #[arg(long, default_value_t = StrategyKind::Push)]
        strategy: StrategyKind,
    },
}

/// Identity triple of an existing secret.
#[derive(Debug, Args)]
pub struct SecretRef {
    #[arg(long)]
    pub name: String,

    /// bankcard, user, text or binary
    #[arg(long = "type")]
    pub secret_type: SecretType,

    #[arg(long)]
    pub owner: String,
}

/// Options shared by every `add` subcommand.
#[derive(Debug, Args)]
pub struct AddTarget {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub owner: String,

    /// Free-form note stored inside the encrypted content
    #[arg(long)]
    pub metadata: Option<String>,

    /// Also save the encrypted secret to the remote
    #[arg(long, requires = "token")]
    pub push: bool,

    /// Session token for the remote
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AddCommand {
    /// Payment card
    Bankcard {
        #[command(flatten)]
        target: AddTarget,

        #[arg(long)]
        number: String,

        #[arg(long)]
        holder: String,

        /// MM/YY
        #[arg(long)]
        expiry: String,

        #[arg(long)]
        cvv: String,
    },

    /// Username and password
    User {
        #[command(flatten)]
        target: AddTarget,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Free text
    Text {
        #[command(flatten)]
        target: AddTarget,

        #[arg(long)]
        body: String,
    },

    /// Contents of a file
    Binary {
        #[command(flatten)]
        target: AddTarget,

        #[arg(long)]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_defaults_to_push() {
        let cli =
            Cli::try_parse_from(["keeper", "sync", "--owner", "alice", "--token", "t"]).unwrap();
        match cli.command {
            Commands::Sync { strategy, .. } => assert_eq!(strategy, StrategyKind::Push),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn sync_rejects_unknown_strategy() {
        let err = Cli::try_parse_from([
            "keeper", "sync", "--owner", "a", "--token", "t", "--strategy", "merge",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("unknown sync strategy"));
    }

    #[test]
    fn show_parses_secret_type() {
        let cli = Cli::try_parse_from([
            "keeper", "show", "--name", "visa", "--type", "bankcard", "--owner", "alice",
        ])
        .unwrap();
        match cli.command {
            Commands::Show { secret, out } => {
                assert_eq!(secret.secret_type, SecretType::BankCard);
                assert!(out.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn push_requires_token() {
        let result = Cli::try_parse_from([
            "keeper", "add", "text", "--name", "n", "--owner", "o", "--body", "b", "--push",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["keeper", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }
}
