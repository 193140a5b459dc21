//! Config command handlers

use sharelinks_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the effective configuration
pub fn show(config: &Config, output: &Output) {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "links_path": config.links_path(),
                    "origin": config.origin,
                    "default_expiry_days": config.default_expiry_days,
                    "cleanup_on_open": config.cleanup_on_open,
                    "log_level": config.log_level,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.links_path().display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:            {}", config.data_dir.display());
            println!("  origin:              {}", config.origin);
            println!("  default_expiry_days: {}", config.default_expiry_days);
            println!("  cleanup_on_open:     {}", config.cleanup_on_open);
            println!("  log_level:           {}", config.log_level);
            println!(
                "  log_file:            {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(stderr)".to_string())
            );
            println!();
            println!("Link file:   {}", config.links_path().display());
            println!("Config file: {}", Config::config_file_path().display());
        }
    }
}
