//! # Grammars
//!
//! A [`Grammar`] is the configuration surface of the scanner: which action
//! makes a step qualify, which key introduces the embedded block, and how the
//! embedded language is chosen. Grammars are plain data so that user profiles
//! can be loaded from TOML; the built-in presets mirror the injection grammars
//! shipped with the editor extension.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scan::kinds::IndentDigits;

pub const GITHUB_SCRIPT: &str = "github-script";
pub const GITHUB_SCRIPT_PARAMS: &str = "github-script-params";
pub const RUN_SHELL: &str = "run-shell";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("grammar name must not be empty")]
    EmptyName,

    #[error("grammar '{grammar}': {field} must not be empty")]
    EmptyField {
        grammar: String,
        field: &'static str,
    },

    #[error("grammar '{grammar}': invalid scope name '{scope_name}'")]
    InvalidScopeName { grammar: String, scope_name: String },

    #[error("grammar '{grammar}': nested key '{key}' is the same as the embedded key")]
    NestedKeyClash { grammar: String, key: String },

    #[error("grammar '{grammar}': no shell languages configured")]
    NoLanguages { grammar: String },

    #[error("grammar '{grammar}': shell '{shell}' is claimed by both '{first}' and '{second}'")]
    DuplicateShell {
        grammar: String,
        shell: String,
        first: String,
        second: String,
    },
}

/// One candidate embedded language for a run block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellLanguage {
    /// Identifier of the resolver, e.g. `shell-bash`.
    pub name: String,
    /// Declaration values accepted verbatim (case-sensitive).
    pub shells: Vec<String>,
    /// Embedded-language tag given to claimed bodies.
    pub language: String,
}

impl ShellLanguage {
    pub fn new(name: &str, shells: &[&str], language: &str) -> Self {
        Self {
            name: name.to_string(),
            shells: shells.iter().map(|s| s.to_string()).collect(),
            language: language.to_string(),
        }
    }
}

/// How the embedded block and its language are found inside a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EmbedRule {
    /// The key name alone fixes the language (`script: |`).
    FixedKey {
        key: String,
        language: String,
        #[serde(default)]
        indent_digits: IndentDigits,
    },
    /// The language comes from an earlier sibling declaration (`shell: bash`
    /// followed by `run: |`).
    ShellDeclared {
        key: String,
        declaration_key: String,
        languages: Vec<ShellLanguage>,
        #[serde(default)]
        indent_digits: IndentDigits,
    },
}

impl EmbedRule {
    /// The key whose block-scalar value is embedded.
    pub fn key(&self) -> &str {
        match self {
            EmbedRule::FixedKey { key, .. } | EmbedRule::ShellDeclared { key, .. } => key,
        }
    }

    pub fn indent_digits(&self) -> IndentDigits {
        match self {
            EmbedRule::FixedKey { indent_digits, .. }
            | EmbedRule::ShellDeclared { indent_digits, .. } => *indent_digits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub name: String,
    /// TextMate scope name of the injection grammar.
    pub scope_name: String,
    /// Action identifier a step must `uses:` to qualify. `None` means every
    /// step qualifies.
    #[serde(default)]
    pub action: Option<String>,
    /// Second-level mapping key that must enclose the embedded key.
    #[serde(default)]
    pub nested_key: Option<String>,
    pub embed: EmbedRule,
}

impl Grammar {
    /// `actions/github-script` steps; `script` may sit anywhere in the step.
    pub fn github_script() -> Self {
        Self {
            name: GITHUB_SCRIPT.to_string(),
            scope_name: "source.github-actions.github-script.injection".to_string(),
            action: Some("actions/github-script".to_string()),
            nested_key: None,
            embed: EmbedRule::FixedKey {
                key: "script".to_string(),
                language: "javascript".to_string(),
                indent_digits: IndentDigits::Single,
            },
        }
    }

    /// `actions/github-script` steps; `script` must sit inside `with:`.
    pub fn github_script_params() -> Self {
        Self {
            name: GITHUB_SCRIPT_PARAMS.to_string(),
            nested_key: Some("with".to_string()),
            ..Self::github_script()
        }
    }

    /// `run:` blocks whose language is chosen by a preceding `shell:`.
    pub fn run_shell() -> Self {
        Self {
            name: RUN_SHELL.to_string(),
            scope_name: "source.github-actions.run-shell.injection".to_string(),
            action: None,
            nested_key: None,
            embed: EmbedRule::ShellDeclared {
                key: "run".to_string(),
                declaration_key: "shell".to_string(),
                languages: vec![
                    ShellLanguage::new("shell-bash", &["bash", "sh"], "shellscript"),
                    ShellLanguage::new("shell-powershell", &["pwsh", "powershell"], "powershell"),
                    ShellLanguage::new("shell-cmd", &["cmd"], "bat"),
                    ShellLanguage::new("shell-python", &["python"], "python"),
                    ShellLanguage::new("shell-node", &["node"], "javascript"),
                ],
                indent_digits: IndentDigits::Single,
            },
        }
    }

    /// All built-in grammars, in the order the CLI reports them.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::github_script(),
            Self::github_script_params(),
            Self::run_shell(),
        ]
    }

    pub fn builtin(name: &str) -> Option<Self> {
        Self::builtins().into_iter().find(|g| g.name == name)
    }

    /// Checks the grammar is usable before scanning with it.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self.name.trim().is_empty() {
            return Err(GrammarError::EmptyName);
        }
        let empty = |field: &'static str| GrammarError::EmptyField {
            grammar: self.name.clone(),
            field,
        };

        if !scope_name_regex().is_match(&self.scope_name) {
            return Err(GrammarError::InvalidScopeName {
                grammar: self.name.clone(),
                scope_name: self.scope_name.clone(),
            });
        }
        if self.action.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(empty("action"));
        }
        if self.embed.key().trim().is_empty() {
            return Err(empty("embed.key"));
        }
        if let Some(nested) = &self.nested_key {
            if nested.trim().is_empty() {
                return Err(empty("nested_key"));
            }
            if nested == self.embed.key() {
                return Err(GrammarError::NestedKeyClash {
                    grammar: self.name.clone(),
                    key: nested.clone(),
                });
            }
        }

        match &self.embed {
            EmbedRule::FixedKey { language, .. } => {
                if language.trim().is_empty() {
                    return Err(empty("embed.language"));
                }
            }
            EmbedRule::ShellDeclared {
                declaration_key,
                languages,
                ..
            } => {
                if declaration_key.trim().is_empty() {
                    return Err(empty("embed.declaration_key"));
                }
                if languages.is_empty() {
                    return Err(GrammarError::NoLanguages {
                        grammar: self.name.clone(),
                    });
                }
                self.check_disjoint_shells(languages)?;
            }
        }
        Ok(())
    }

    /// Only one resolver may claim a run block, so no declaration value may
    /// belong to two languages.
    fn check_disjoint_shells(&self, languages: &[ShellLanguage]) -> Result<(), GrammarError> {
        for (i, lang) in languages.iter().enumerate() {
            if lang.language.trim().is_empty() {
                return Err(GrammarError::EmptyField {
                    grammar: self.name.clone(),
                    field: "embed.languages.language",
                });
            }
            for shell in &lang.shells {
                if let Some(other) = languages[..i].iter().find(|o| o.shells.contains(shell)) {
                    return Err(GrammarError::DuplicateShell {
                        grammar: self.name.clone(),
                        shell: shell.clone(),
                        first: other.name.clone(),
                        second: lang.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn scope_name_regex() -> &'static Regex {
    static SCOPE_NAME: OnceLock<Regex> = OnceLock::new();
    SCOPE_NAME.get_or_init(|| {
        Regex::new(r"^(text|source)(\.[\w0-9-]+)+$").expect("Invalid scope name regex")
    })
}
