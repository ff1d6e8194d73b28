//! 重置管理员密码 CLI 命令

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::{AccountService, AdminUpdate};
use crate::storage::SeaOrmStorage;

const MIN_PASSWORD_LEN: usize = 8;

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::CommandError(
            "No password provided. Use --password or run interactively.".to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter new password: ")?;
    let confirm = read("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::CommandError("Passwords do not match".to_string()));
    }
    Ok(password)
}

pub fn validate_new_password(password: &str) -> Result<(), CliError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CliError::CommandError(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// 运行 reset-admin-password 命令
pub async fn run_reset_password(
    storage: Arc<SeaOrmStorage>,
    username: String,
    password: Option<String>,
) -> Result<(), CliError> {
    let new_password = match password {
        Some(p) => p,
        None => prompt_password_with_confirm()?,
    };
    validate_new_password(&new_password)?;

    let accounts = AccountService::new(storage);
    let admin = accounts
        .get_admin_by_username(&username)
        .await?
        .ok_or_else(|| CliError::CommandError(format!("Admin not found: {}", username)))?;

    accounts
        .update_admin(
            &admin.id,
            AdminUpdate {
                password: Some(new_password),
                ..Default::default()
            },
        )
        .await?;

    println!(
        "{} Password for admin '{}' reset successfully",
        "✓".green().bold(),
        username
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("short").is_err());
        assert!(validate_new_password("long-enough").is_ok());
    }
}
