//! linkfolio - personal blog, portfolio and linktree site
//!
//! The core is the QR business-card flow: a profile owns short QR records,
//! `/qr/{id}` records a scan and redirects to the profile, and the admin back
//! office reads lifetime / today / this-week scan stats.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Maintenance commands (default)
//!
//! # Architecture
//! - `storage`: SeaORM backend (SQLite, MySQL/MariaDB, PostgreSQL)
//! - `services`: Business rules (QR, profile, posts, accounts, ...)
//! - `api`: HTTP handlers, JWT auth and routing
//! - `interfaces`: Command-line interface
//! - `config`: Static configuration (TOML + `LF__*` environment)
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and panic reporting

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
