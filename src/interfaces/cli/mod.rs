//! Maintenance commands that run without the HTTP server

pub mod commands;

use crate::cli::Commands;
use crate::storage::StorageFactory;
use commands::{config_generate, run_reset_password};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    CommandError(String),
}

impl CliError {
    fn parts(&self) -> (&'static str, &str) {
        match self {
            CliError::StorageError(msg) => ("Storage error:", msg),
            CliError::CommandError(msg) => ("Command error:", msg),
        }
    }

    pub fn format_simple(&self) -> String {
        let (label, msg) = self.parts();
        format!("{} {}", label, msg)
    }

    /// 终端输出用
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        let (label, msg) = self.parts();
        format!("{} {}", label.red().bold(), msg.white())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::LinkfolioError> for CliError {
    fn from(err: crate::errors::LinkfolioError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        // 不需要数据库连接
        Commands::GenerateConfig { output, force } => config_generate(output, force).await,

        Commands::ResetAdminPassword { password, username } => {
            let storage = StorageFactory::create().await?;
            let username = username
                .unwrap_or_else(|| crate::config::get_config().admin.default_username.clone());
            run_reset_password(storage, username, password).await
        }

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by server mode".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_from_linkfolio_error() {
        let err: CliError = crate::errors::LinkfolioError::not_found("x").into();
        assert!(matches!(err, CliError::StorageError(_)));
        assert!(err.format_simple().starts_with("Storage error:"));
    }
}
