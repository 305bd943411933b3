//! hivectl: Operator Console
//!
//! Runs the interactive menu console against the configured backend, or
//! dispatches a single command with `hivectl call`.

use anyhow::Result;
use clap::Parser;

use hivectl::cli::call::run_call;
use hivectl::cli::{
    Cli, Commands, ConsoleConfig, DialoguerPrompts, MenuController, Session, TerminalSurface,
};
use hivectl::utils::logging;
use hivectl::utils::{print_backend_card, print_banner, print_completion, print_info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        logging::init_stderr(cli.verbose);
        let config = ConsoleConfig::resolve(&cli)?;
        return match command {
            Commands::Call { command, args } => {
                let bridge = config.bridge().with_spinner(false);
                if !run_call(&bridge, command, args.as_deref())? {
                    std::process::exit(1);
                }
                Ok(())
            }
        };
    }

    let log_path = logging::init_file(cli.verbose);
    let config = ConsoleConfig::resolve(&cli)?;
    tracing::info!(
        program = %config.program.display(),
        timeout_secs = config.timeout.as_secs(),
        "console starting"
    );

    print_banner(env!("CARGO_PKG_VERSION"));
    print_backend_card(&config.program, &config.args, config.timeout);
    if let Some(path) = &log_path {
        print_info(&format!("Logging to {}", path.display()));
    }

    let bridge = config.bridge();
    let mut prompts = DialoguerPrompts::new();
    let mut surface = TerminalSurface::new();
    let mut session =
        Session::new(&bridge, &mut prompts, &mut surface).with_bar_width(config.bar_width);

    MenuController::new().run(&mut session)?;

    print_completion();
    Ok(())
}
