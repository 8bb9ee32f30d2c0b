//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# Propedit configuration
# See: propedit --help for all options

# Editor manifests loaded on every run, in addition to --manifest
manifests = []

# Disable colored output
no_color = false
"#;

/// Environment variable holding extra manifest paths, separated like `PATH`.
pub const MANIFESTS_ENV: &str = "PROPEDIT_MANIFESTS";

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manifests: Option<Vec<PathBuf>>,
    pub no_color: Option<bool>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux: `~/.config/propedit/config.toml`
    /// - macOS: `~/Library/Application Support/propedit/config.toml`
    /// - Windows: `%APPDATA%\propedit\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("propedit").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Manifests to load, CLI paths last: env paths, then config file paths,
    /// then `cli`.
    /// A path named by more than one source is loaded once.
    pub fn manifests(&self, cli: &[PathBuf]) -> Vec<PathBuf> {
        let env: Vec<PathBuf> = std::env::var_os(MANIFESTS_ENV)
            .map(|v| std::env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();
        merge_manifests(&env, self.manifests.as_deref().unwrap_or_default(), cli)
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        // NO_COLOR is a standard - presence means disable color
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("PROPEDIT_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}

fn merge_manifests(env: &[PathBuf], file: &[PathBuf], cli: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for path in env.iter().chain(file).chain(cli) {
        if !paths.contains(path) {
            paths.push(path.clone());
        }
    }
    paths
}
