mod cache;
mod classpath;
mod cli;
mod include;
mod launch;
mod logging;
mod options;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use include::IncludeResolver;
use options::{LaunchMode, LaunchOptions, UsageError};

fn main() {
    // Initialize structured logging
    logging::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    if let Err(err) = run(&cli.tokens) {
        report_and_exit(&err);
    }
}

/// Map errors onto the exit-code contract: 0 for help, 1 for everything
/// else, with the usage text attached to command-line faults.
fn report_and_exit(err: &anyhow::Error) -> ! {
    match err.downcast_ref::<UsageError>() {
        Some(UsageError::Help) => {
            cli::print_usage();
            std::process::exit(0);
        }
        Some(UsageError::NoArguments) => {
            cli::print_usage();
            std::process::exit(1);
        }
        Some(usage) => {
            eprintln!("{}: {}", cli::binary_name(), usage);
            cli::print_usage();
            std::process::exit(1);
        }
        None => {
            eprintln!("{}: {:#}", cli::binary_name(), err);
            std::process::exit(1);
        }
    }
}

/// Route the command line, refresh the cached expansion and hand the
/// process over to the toolchain.
fn run(tokens: &[String]) -> Result<()> {
    let options = LaunchOptions::from_tokens(tokens)?;

    // Resolve the toolchain before any artifact work; a missing install
    // must not leave partial state behind.
    let toolchain = launch::locate_toolchain()?;

    let working_dir = std::env::current_dir().context("Failed to resolve working directory")?;

    let args = match &options.mode {
        LaunchMode::Repl => {
            let classpath = classpath::build(&working_dir);
            launch::toolchain_args(&options, &classpath, &working_dir, None)
        }
        LaunchMode::Script { path } => {
            let mut resolver = IncludeResolver::new();
            let root = resolver.resolve(&working_dir, path)?;
            tracing::debug!(
                "expanded {} with {} direct includes",
                root.base_name,
                root.children.len()
            );

            let reconciled = cache::reconcile(&root)?;
            if !reconciled.rewritten {
                tracing::debug!("artifact up to date");
            }

            let classpath = classpath::build(&root.directory);
            launch::toolchain_args(
                &options,
                &classpath,
                &reconciled.artifact,
                Some(&reconciled.artifact),
            )
        }
    };

    match launch::transfer(&toolchain, &args)? {}
}
