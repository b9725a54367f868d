use actions_embed_engine::{Grammar, GrammarError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid grammar '{name}': {source}")]
    InvalidGrammar { name: String, source: GrammarError },

    #[error("Unknown built-in grammar '{0}'")]
    UnknownBuiltin(String),
}

/// User profile: which presets to enable and any extra grammars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_builtins")]
    pub builtins: Vec<String>,
    #[serde(default)]
    pub grammars: Vec<Grammar>,
}

fn default_builtins() -> Vec<String> {
    Grammar::builtins().into_iter().map(|g| g.name).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            builtins: default_builtins(),
            grammars: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/actions-embed");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` and environment variables in a user-supplied path.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    /// Enabled presets followed by user grammars, all validated. A user
    /// grammar named like a preset replaces it in place.
    pub fn resolve_grammars(&self) -> Result<Vec<Grammar>, ConfigError> {
        let mut grammars = Vec::with_capacity(self.builtins.len() + self.grammars.len());
        for name in &self.builtins {
            let grammar =
                Grammar::builtin(name).ok_or_else(|| ConfigError::UnknownBuiltin(name.clone()))?;
            grammars.push(grammar);
        }

        for grammar in &self.grammars {
            grammar
                .validate()
                .map_err(|source| ConfigError::InvalidGrammar {
                    name: grammar.name.clone(),
                    source,
                })?;
            match grammars.iter_mut().find(|g| g.name == grammar.name) {
                Some(existing) => *existing = grammar.clone(),
                None => grammars.push(grammar.clone()),
            }
        }

        Ok(grammars)
    }
}
