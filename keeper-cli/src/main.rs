//! Keeper CLI
//!
//! Stores secrets encrypted on disk and synchronizes them with a remote
//! store that never sees plaintext.

mod cli;
mod commands;
mod config;
mod display;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::KeeperConfig;
use keeper_types::SecretIdentity;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = KeeperConfig::load(&cli.config)?;

    match cli.command {
        Commands::Keygen { out, bits, force } => {
            let (public, private) = commands::keygen::run(&out, bits, force)?;
            display::success(&format!(
                "wrote {} and {}",
                public.display(),
                private.display()
            ));
        }
        Commands::Add(cmd) => {
            let (target, content) = commands::add::into_content(cmd)?;
            commands::add::run(&config, &target, &content).await?;
        }
        Commands::List {
            owner,
            remote,
            token,
        } => {
            let token = if remote { token.as_deref() } else { None };
            commands::list::run(&config, owner.as_deref(), token).await?;
        }
        Commands::Show { secret, out } => {
            let identity = SecretIdentity::new(secret.name, secret.secret_type, secret.owner);
            commands::show::run(&config, &identity, out.as_deref())?;
        }
        Commands::Remove { secret } => {
            let identity = SecretIdentity::new(secret.name, secret.secret_type, secret.owner);
            commands::remove::run(&config, &identity)?;
        }
        Commands::Sync {
            owner,
            token,
            strategy,
        } => {
            let report = commands::sync::run(&config, &owner, &token, strategy).await?;
            display::success(&format!(
                "sync done: {} pushed, {} kept, {} conflicts",
                report.pushed, report.kept, report.conflicts
            ));
        }
    }

    Ok(())
}
