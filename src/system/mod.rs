//! System-level utilities: logging and panic reporting

pub mod logging;
pub mod panic_handler;

pub use logging::init_logging;
