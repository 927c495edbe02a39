//! Configuration display command.

use crate::cli::icons::{dim_arrow, info};
use jobimport::config::{Config, Settings};

/// Print where configuration came from and the resolved settings.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => eprintln!("{} Config file: {}", info(), path.display()),
        None => eprintln!("{} No config file found, using defaults", info()),
    }
    eprintln!(
        "  {} Reader proxy: {}",
        dim_arrow(),
        settings.reader_proxy_url.as_deref().unwrap_or("disabled")
    );

    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}
