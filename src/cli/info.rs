//! Info command - show system information

use anyhow::{Context, Result};

use crate::config::{self, Config};
use crate::project::ScanRules;

pub fn run(config: &Config) -> Result<()> {
    println!("codeask v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    println!();
    println!("Configuration:");
    println!("  Config dir: {}", config::config_dir_display());

    println!();
    println!("Dify:");
    println!("  Endpoint: {}", config.remote.api_url);
    check_api_key(&config.remote.api_key_env);

    let rules = ScanRules::from_config(&config.scan).context("Invalid scan configuration")?;
    println!();
    println!("Scanning:");
    println!("  Extensions: {}", rules.extensions().collect::<Vec<_>>().join(" "));
    println!("  Max depth: {}", rules.max_depth);
    println!("  Respect .gitignore: {}", rules.respect_gitignore);

    Ok(())
}

fn check_api_key(env_var: &str) {
    let status = match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => "configured",
        _ => "not configured",
    };
    println!("  {}: {}", env_var, status);
}
