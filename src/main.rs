use anyhow::{Context, Result};
use clap::Parser;

use linkfolio::cli::{Cli, Commands};
use linkfolio::config;
use linkfolio::runtime::modes;
use linkfolio::system::panic_handler::{RunMode, install_panic_hook};

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env 只补充未设置的环境变量
    dotenvy::dotenv().ok();

    match cli.config.as_deref() {
        Some(path) => config::init_config_from(path),
        None => config::init_config(),
    }

    match cli.command {
        None | Some(Commands::Serve) => {
            install_panic_hook(RunMode::Server);
            let config = config::get_config();
            let _guard = linkfolio::system::init_logging(&config.logging)
                .context("Failed to initialize logging")?;

            modes::run_server().await.context("Server exited with error")
        }
        Some(cmd) => {
            install_panic_hook(RunMode::Cli);
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
