//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for linkfolio using clap's derive macros.

use clap::{Parser, Subcommand};

/// linkfolio - blog, portfolio and linktree site with QR tracking
#[derive(Parser)]
#[command(name = "linkfolio")]
#[command(version)]
#[command(about = "Personal site with linktree, QR tracking and admin back office", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (prints to stdout when omitted)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Reset the admin account password
    ResetAdminPassword {
        /// New password (if not provided, will prompt interactively)
        #[arg(long)]
        password: Option<String>,

        /// Admin username (default: the configured default admin)
        #[arg(long)]
        username: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_is_serve() {
        let cli = Cli::parse_from(["linkfolio"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["linkfolio", "serve"]);
        assert_eq!(cli.command, Some(Commands::Serve));
    }

    #[test]
    fn test_parse_generate_config() {
        let cli = Cli::parse_from(["linkfolio", "generate-config", "-o", "out.toml"]);
        assert_eq!(
            cli.command,
            Some(Commands::GenerateConfig {
                output: Some("out.toml".to_string()),
                force: false,
            })
        );
    }

    #[test]
    fn test_parse_reset_admin_password() {
        let cli = Cli::parse_from([
            "linkfolio",
            "--config",
            "site.toml",
            "reset-admin-password",
            "--password",
            "s3cret-pass",
        ]);
        assert_eq!(cli.config.as_deref(), Some("site.toml"));
        assert_eq!(
            cli.command,
            Some(Commands::ResetAdminPassword {
                password: Some("s3cret-pass".to_string()),
                username: None,
            })
        );
    }
}
