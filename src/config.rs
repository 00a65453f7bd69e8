//! Configuration management for codeask

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub remote: RemoteConfig,
    pub scan: ScanConfig,
    pub summary: SummaryConfig,
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Prefix of the user id sent with every question
    pub user_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub api_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Lower-cased extensions including the leading dot
    pub extensions: Vec<String>,
    pub excluded_directories: Vec<String>,
    /// Gitignore-style globs, matched case-insensitively against file names
    pub excluded_file_patterns: Vec<String>,
    pub max_depth: usize,
    pub max_file_size_kb: u64,
    pub respect_gitignore: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Character cap for the project summary; 0 disables it
    pub max_chars: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user_prefix: "codeask".to_string(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.dify.ai/v1/chat-messages".to_string(),
            api_key_env: "DIFY_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: strings(&[
                ".js", ".ts", ".tsx", ".jsx",
                ".py", ".java", ".cpp", ".php",
                ".html", ".css", ".scss", ".xml",
                ".json", ".md",
            ]),
            excluded_directories: strings(&[
                "node_modules",
                ".git",
                ".github",
                "dist",
                "build",
                "out",
                ".next",
                "coverage",
                ".env",
            ]),
            excluded_file_patterns: strings(&[".env.*", ".DS_Store", "thumbs.db", "desktop.ini"]),
            max_depth: 32,
            max_file_size_kb: 1024,
            respect_gitignore: false,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { max_chars: 12_000 }
    }
}

/// Get the configuration file path
fn config_path() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("dev", "codeask", "codeask")
        .context("Failed to determine config directory")?
        .config_dir()
        .to_path_buf();

    Ok(config_dir.join("config.toml"))
}

/// Platform config directory, for display
pub fn config_dir_display() -> String {
    config_path()
        .ok()
        .and_then(|p| p.parent().map(|d| d.display().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Load configuration from file or use defaults
pub fn load_config(custom_path: Option<&str>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        PathBuf::from(p)
    } else {
        config_path()?
    };

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        parse_config(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    } else {
        tracing::debug!("No config at {:?}, using defaults", path);
        Ok(Config::default())
    }
}

fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content)?;
    if config.scan.max_depth == 0 {
        bail!("scan.max_depth must be at least 1");
    }
    for ext in &mut config.scan.extensions {
        *ext = normalize_extension(ext);
    }
    Ok(config)
}

/// `TS`, `ts` and `.ts` all become `.ts`
fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Initialize configuration file with defaults
pub fn init_config(custom_path: Option<&str>) -> Result<()> {
    let path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => config_path()?,
    };

    if path.exists() {
        println!("Configuration file already exists at {:?}", path);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let content = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize default config")?;

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    println!("Configuration initialized at {:?}", path);
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}
