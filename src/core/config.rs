//! Interpreter configuration
//!
//! Everything host-specific lives here: where the home directory is, which
//! alias is the default area, how application names map to launch names,
//! and how the fallback intent service is reached. All fields have
//! defaults so an empty TOML file is a valid configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::{InterpreterError, Result};

/// Location aliases every host provides
pub const BUILTIN_ALIASES: [&str; 9] = [
    "home",
    "desktop",
    "downloads",
    "documents",
    "music",
    "pictures",
    "videos",
    "movies",
    "library",
];

/// Configuration for one interpreter instance
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Home directory override
    ///
    /// When unset the platform home directory is used. Tests point this at
    /// a temporary directory.
    pub home: Option<PathBuf>,

    /// Alias used when a location phrase is empty
    pub default_area: String,

    /// Extra location aliases (name -> absolute path)
    pub aliases: BTreeMap<String, PathBuf>,

    /// Spoken application names mapped to launch names
    ///
    /// Matched by substring against the requested app, first hit wins.
    pub app_aliases: BTreeMap<String, String>,

    pub fallback: FallbackConfig,
}

/// How the fallback intent service is reached
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,
    /// Chat-completion endpoint (OpenAI-compatible or Anthropic)
    pub api_url: String,
    pub model: String,
    /// Environment variable holding the API key, if the endpoint needs one
    pub api_key_env: String,
    /// Latency budget for a single classification
    pub timeout_secs: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "http://localhost:11434/v1/chat/completions".into(),
            model: "llama3".into(),
            api_key_env: "LLM_API_KEY".into(),
            timeout_secs: 10,
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            home: None,
            default_area: "desktop".into(),
            aliases: BTreeMap::new(),
            app_aliases: default_app_aliases(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl InterpreterConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InterpreterError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: InterpreterConfig = toml::from_str(content)
            .map_err(|e| InterpreterError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let known = BUILTIN_ALIASES.contains(&self.default_area.as_str())
            || self.aliases.contains_key(&self.default_area);
        if !known {
            return Err(InterpreterError::Config(format!(
                "default_area '{}' is not a known location alias",
                self.default_area
            )));
        }

        for (name, path) in &self.aliases {
            if !path.is_absolute() {
                return Err(InterpreterError::Config(format!(
                    "alias '{}' must map to an absolute path, got {}",
                    name,
                    path.display()
                )));
            }
        }

        if self.fallback.timeout_secs == 0 {
            return Err(InterpreterError::Config(
                "fallback.timeout_secs must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Home directory, honoring the override
    pub fn home_dir(&self) -> PathBuf {
        self.home
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"))
    }
}

/// Default spoken-name table; macOS launches by display name, others by binary
fn default_app_aliases() -> BTreeMap<String, String> {
    let table: [(&str, &str, &str); 10] = [
        ("calculator", "Calculator", "calc"),
        ("notepad", "TextEdit", "notepad"),
        ("terminal", "Terminal", "cmd"),
        ("browser", "Safari", "chrome"),
        ("finder", "Finder", "explorer"),
        ("vscode", "Visual Studio Code", "code"),
        ("vs code", "Visual Studio Code", "code"),
        ("notes", "Notes", "notepad"),
        ("spotify", "Spotify", "spotify"),
        ("music", "Music", "wmplayer"),
    ];

    table
        .iter()
        .map(|(spoken, mac, other)| {
            let launch = if cfg!(target_os = "macos") { mac } else { other };
            (spoken.to_string(), launch.to_string())
        })
        .collect()
}
