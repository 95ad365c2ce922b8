//! CLI entry point for myterm.
//!
//! This binary provides the `myterm` command: `run` (the default) logs in and
//! starts the interactive shell, `status` reports on the data directory.

mod cli;
mod config;
mod console;
mod helpers;
mod history;
mod onboarding;
mod repl;
mod theme;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use myterm_adapters::{Adapter, BrowserAdapter, ShellAdapter};
use myterm_kernel::{AppPaths, Dispatcher, Session, default_registry};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::console::ConsolePrompter;
use crate::helpers::{env_var, init_tracing};
use crate::history::History;
use crate::onboarding::AuthOutcome;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (config, paths) = config::resolve(cli.home, env_var)?;
    init_tracing(&config.log_level);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(config, paths).await,
        Commands::Status => cmd_status(config, paths).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: run
// ---------------------------------------------------------------------------

async fn cmd_run(config: AppConfig, paths: AppPaths) -> Result<ExitCode> {
    info!(root = %paths.root().display(), "starting myterm");

    // 1. Data directory and account store.
    paths
        .ensure_root()
        .with_context(|| format!("failed to create {}", paths.root().display()))?;
    let mut session = Session::open(paths.clone(), config.session_config())
        .context("failed to open account store")?;

    // 2. Ctrl+C ends the program from here on.
    repl::install_interrupt_handler();

    // 3. Log in or register.
    let outcome = {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        onboarding::authenticate(&mut session, &mut stdin.lock(), &mut stdout)?
    };
    match outcome {
        AuthOutcome::Authenticated => {}
        AuthOutcome::Cancelled => return Ok(ExitCode::SUCCESS),
        AuthOutcome::Exhausted => return Ok(ExitCode::FAILURE),
    }

    // 4. Adapters.
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let mut shell = ShellAdapter::new("shell", cwd).with_timeout(config.shell_timeout_secs);
    shell.connect().await.context("failed to connect shell adapter")?;
    let mut browser = BrowserAdapter::new("browser");
    browser
        .connect()
        .await
        .context("failed to connect browser adapter")?;

    // 5. Banner.
    if session.preferences().is_some_and(|p| p.banner) {
        println!("{}", theme::render_banner());
    }

    // 6. REPL.
    let mut dispatcher = Dispatcher::new(
        default_registry(),
        session,
        Box::new(shell),
        Box::new(browser),
        Box::new(ConsolePrompter),
    );
    let history = History::new(paths.history_file(), config.history);
    repl::run_stdio(&mut dispatcher, &history).await?;

    info!("myterm stopped");
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

async fn cmd_status(config: AppConfig, paths: AppPaths) -> Result<ExitCode> {
    println!();
    println!("  myterm Status");
    println!("  =============");
    println!();

    let root = paths.root();
    if root.is_dir() {
        println!("  Data directory:   OK ({})", root.display());
    } else {
        println!("  Data directory:   MISSING ({})", root.display());
    }

    let config_file = paths.config_file();
    if config_file.exists() {
        println!("  Config:           OK ({})", config_file.display());
    } else {
        println!("  Config:           DEFAULTS");
    }

    // Only read the account store if it exists; status never creates files.
    let accounts = if paths.users_file().exists() {
        Session::open(paths.clone(), config.session_config())
            .and_then(|s| Ok(s.accounts().list_accounts()?))
    } else {
        Ok(Vec::new())
    };
    match accounts {
        Ok(accounts) if accounts.is_empty() => println!("  Accounts:         NONE (run `myterm`)"),
        Ok(accounts) => println!("  Accounts:         {} ({})", accounts.len(), accounts.join(", ")),
        Err(e) => {
            warn!(error = %e, "failed to read accounts");
            println!("  Accounts:         UNREADABLE ({e})");
        }
    }

    println!(
        "  History:          {}",
        if config.history {
            paths.history_file().display().to_string()
        } else {
            "disabled".into()
        }
    );

    // Adapter health.
    let cwd = std::env::current_dir().unwrap_or_else(|_| root.to_path_buf());
    let mut shell = ShellAdapter::new("shell", cwd).with_timeout(config.shell_timeout_secs);
    let mut browser = BrowserAdapter::new("browser");
    let adapters: [&mut dyn Adapter; 2] = [&mut shell, &mut browser];
    for adapter in adapters {
        let health = match adapter.connect().await {
            Ok(()) => adapter
                .health_check()
                .await
                .map(|h| h.to_string())
                .unwrap_or_else(|e| format!("error: {e}")),
            Err(e) => format!("error: {e}"),
        };
        println!("  {:<17} {health}", format!("{} adapter:", adapter.adapter_type()));
    }

    println!();
    Ok(ExitCode::SUCCESS)
}
