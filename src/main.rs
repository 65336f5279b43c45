use anyhow::Result;
use clap::Parser;
use log::error;

use pitstop::cli::version_info;
use pitstop::{Cli, CommandHandler, Commands, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command_or_default();

    // The server logs its lifecycle; one-shot commands stay quiet unless asked
    let default_filter = match (&command, cli.verbose) {
        (_, true) => "debug",
        (Commands::Serve { .. }, false) => "info",
        _ => "error",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // Handle version early
    if command == Commands::Version {
        println!("{}", version_info());
        return Ok(());
    }

    let use_colors = !cli.no_color && console::colors_enabled();

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load configuration: {e:#}");
            eprintln!("Error: Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    let mut handler = CommandHandler::new(settings, use_colors);

    match handler.handle_command(command).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("{}", handler.format_error(&format!("{e:#}")));
            std::process::exit(1);
        }
    }

    Ok(())
}
