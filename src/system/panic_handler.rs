//! Panic hook
//!
//! Every panic is appended to `crash.log`. Server mode also prints the
//! backtrace in color; CLI mode prints a single line.

use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::{self, PanicHookInfo};

use chrono::Utc;
use colored::Colorize;

const CRASH_LOG: &str = "crash.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Cli,
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |info| {
        let message = panic_message(info);
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |l| l.to_string());
        let backtrace = Backtrace::force_capture();

        if let Err(e) = append_crash_report(&message, &location, &backtrace) {
            eprintln!("Failed to write {}: {}", CRASH_LOG, e);
        }

        if mode == RunMode::Cli {
            eprintln!("Program panicked: {} (details in {})", message, CRASH_LOG);
            return;
        }

        eprintln!();
        eprintln!("{} {}", "PANIC".red().bold(), message);
        eprintln!("{} {}", "at".yellow().bold(), location);
        eprintln!("{}", format!("{:?}", backtrace).dimmed());
        eprintln!("{}", format!("Report appended to {}", CRASH_LOG).cyan());
    }));
}

fn append_crash_report(message: &str, location: &str, backtrace: &Backtrace) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(CRASH_LOG)?;
    writeln!(
        file,
        "--- {} ---\n{}\nat {}\n{:?}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        message,
        location,
        backtrace
    )
}
