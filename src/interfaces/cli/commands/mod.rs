//! CLI command implementations

mod config_gen;
mod reset_password;

pub use config_gen::*;
pub use reset_password::*;
