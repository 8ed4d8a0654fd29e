//! The plugin's own logging is silent unless the user switches debug
//! logging on. Hosts install whichever `log` backend they use; this only
//! gates what reaches it.

use log::LevelFilter;
use quote_callouts_config::PluginConfig;

pub fn level_for(config: &PluginConfig) -> LevelFilter {
    if config.debug_logging {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    }
}

pub fn apply(config: &PluginConfig) {
    let level = level_for(config);
    log::set_max_level(level);
    log::debug!("callout logging set to {level}");
}
