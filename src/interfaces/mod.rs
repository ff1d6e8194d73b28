//! User-facing interfaces outside HTTP

#[cfg(feature = "cli")]
pub mod cli;
