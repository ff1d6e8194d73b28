use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

fn install(load: impl FnOnce() -> StaticConfig) -> &'static ArcSwap<StaticConfig> {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(load()))
}

/// Current configuration snapshot
///
/// Loads `config.toml` on first use if nothing was initialized yet, so
/// library callers never observe a missing config.
pub fn get_config() -> Arc<StaticConfig> {
    install(StaticConfig::load).load_full()
}

/// 只读取，不触发加载
pub fn try_get_config() -> Option<Arc<StaticConfig>> {
    CONFIG.get().map(ArcSwap::load_full)
}

/// Load `config.toml` from the working directory (defaults if absent)
///
/// ```no_run
/// linkfolio::config::init_config();
/// ```
pub fn init_config() {
    install(StaticConfig::load);
}

/// `--config <path>`
pub fn init_config_from(path: &str) {
    install(|| StaticConfig::load_from(path));
}
