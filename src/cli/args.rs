use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pitstop")]
#[command(about = "Car repair advice relay backed by a hosted completion model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve the chat page and the /ask endpoint (default)
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides the config file and PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ask a single question and print the advice
    Ask {
        /// Symptom description, e.g. "2015 Sonata, rattling noise from front wheel"
        message: String,
    },
    /// Print the composed system instruction
    Prompt,
    /// Show configuration
    Config,
    /// Write a default config file to ~/.pitstop/config.toml
    Init,
    /// Run diagnostics
    Doctor,
    /// Show version information
    Version,
}

impl Cli {
    /// `serve` is the default when no subcommand is given.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
        })
    }
}
