//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};

/// QLM control client
#[derive(Parser)]
#[command(name = "qlmctl")]
#[command(about = "Quack Language Model - control client", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Daemon base URL (overrides $QLMD_URL and the default)
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show daemon health
    Status {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// List the models the daemon serves
    Models,

    /// Send a prompt and print the duck's reply
    Chat {
        /// The message to send
        message: String,

        /// Stream the reply chunk by chunk
        #[arg(long)]
        stream: bool,

        /// API key sent as a bearer token (only needed when the daemon
        /// has auth enabled)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Ping daemon (hidden - for health checks only)
    #[command(hide = true)]
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        let cli = Cli::try_parse_from(["qlmctl", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { json: true }));
    }

    #[test]
    fn test_parse_chat_with_flags() {
        let cli = Cli::try_parse_from([
            "qlmctl",
            "--url",
            "http://localhost:9000",
            "chat",
            "hello duck",
            "--stream",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Commands::Chat {
                message, stream, ..
            } => {
                assert_eq!(message, "hello duck");
                assert!(stream);
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_chat_requires_message() {
        assert!(Cli::try_parse_from(["qlmctl", "chat"]).is_err());
    }
}
