//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod extract;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use docsight::config::Settings;

#[derive(Parser)]
#[command(name = "docsight")]
#[command(about = "Extract and analyze PDF documents with an LLM provider")]
#[command(version)]
pub struct Cli {
    /// Config file path (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized text of a PDF
    Extract {
        /// PDF file
        file: PathBuf,
    },

    /// Show page count and document metadata of a PDF
    Info {
        /// PDF file
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Summarize a PDF and list its topics
    Analyze {
        /// PDF file
        file: PathBuf,

        /// Provider API key (falls back to the configured key)
        #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Extra instructions appended to the prompt
        #[arg(short, long)]
        instructions: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server
    Serve {
        /// Address to bind: port, host, or host:port
        bind: Option<String>,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Extract { file } => extract::cmd_extract(&file).await,
        Commands::Info { file, json } => extract::cmd_info(&file, json).await,
        Commands::Analyze {
            file,
            api_key,
            instructions,
            json,
        } => {
            analyze::cmd_analyze(
                &settings,
                &file,
                api_key.as_deref(),
                instructions.as_deref(),
                json,
            )
            .await
        }
        Commands::Serve { bind } => serve::cmd_serve(settings, bind.as_deref()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "docsight",
            "-v",
            "analyze",
            "memo.pdf",
            "--api-key",
            "gsk_x",
            "-i",
            "Focus on dates",
            "--json",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                file,
                api_key,
                instructions,
                json,
            } => {
                assert_eq!(file, PathBuf::from("memo.pdf"));
                assert_eq!(api_key.as_deref(), Some("gsk_x"));
                assert_eq!(instructions.as_deref(), Some("Focus on dates"));
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["docsight", "serve", "8080", "--config", "d.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("d.toml")));
        assert!(matches!(cli.command, Commands::Serve { bind: Some(ref b) } if b == "8080"));
    }

    #[test]
    fn test_missing_file_argument() {
        assert!(Cli::try_parse_from(["docsight", "extract"]).is_err());
    }
}
