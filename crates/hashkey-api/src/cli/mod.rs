//! CLI command definitions for the `hashkey` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod encode;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Hash passwords now, or hand out keys to collect the digest later.
#[derive(Parser)]
#[command(name = "hashkey", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "HASHKEY_CONFIG", default_value = "hashkey.toml")]
    pub config: PathBuf,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file).
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the digest of a password.
    Encode {
        /// Password to hash. Omit to hash the empty string.
        #[arg(default_value = "")]
        password: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn serve_flags_are_optional() {
        let cli = Cli::try_parse_from(["hashkey", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, None);
                assert_eq!(host, None);
            }
            _ => panic!("expected serve"),
        }
        assert_eq!(cli.config, PathBuf::from("hashkey.toml"));
    }

    #[test]
    fn encode_takes_positional_password() {
        let cli = Cli::try_parse_from(["hashkey", "--json", "encode", "angryMonkey"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Encode { password } => assert_eq!(password, "angryMonkey"),
            _ => panic!("expected encode"),
        }
    }
}
