//! Configuration loaded from `config.toml`

use crate::error::ConfigError;
use crate::reconciler::DEFAULT_TIME_WINDOW_MINUTES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracekeep_store::{expand_tilde, Paths};

fn default_paths() -> Paths {
    Paths::new().unwrap_or_else(|_| Paths::with_home("."))
}

/// Claude Code session-log sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Root holding `projects/<encoded-path>/<session>.jsonl`
    pub claude_dir: PathBuf,
    pub state_file: PathBuf,
    /// Files modified more recently than this are still being written
    pub staleness_threshold_secs: u64,
}

impl SessionsConfig {
    pub fn with_paths(paths: &Paths) -> Self {
        Self {
            claude_dir: paths.claude_dir(),
            state_file: paths.session_state_file(),
            staleness_threshold_secs: 300,
        }
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.claude_dir.join("projects")
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self::with_paths(&default_paths())
    }
}

/// Gemini conversation sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub state_file: PathBuf,
    /// Crawled conversation index; optional at runtime
    pub crawl_cache: PathBuf,
    pub time_window_minutes: i64,
}

impl GeminiConfig {
    pub fn with_paths(paths: &Paths) -> Self {
        Self {
            state_file: paths.gemini_state_file(),
            crawl_cache: paths.crawl_cache_file(),
            time_window_minutes: DEFAULT_TIME_WINDOW_MINUTES,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::with_paths(&default_paths())
    }
}

/// Daily distillation via a local Ollama model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistillConfig {
    pub state_file: PathBuf,
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_timeout_secs: u64,
}

impl DistillConfig {
    pub fn with_paths(paths: &Paths) -> Self {
        Self {
            state_file: paths.distill_state_file(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "gemma3".to_string(),
            ollama_timeout_secs: 120,
        }
    }
}

impl Default for DistillConfig {
    fn default() -> Self {
        Self::with_paths(&default_paths())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory receiving rendered Markdown documents
    pub inbox: PathBuf,

    /// Debug-level logging
    pub verbose: bool,

    pub sessions: SessionsConfig,
    pub gemini: GeminiConfig,
    pub distill: DistillConfig,
}

impl Config {
    /// Defaults rooted at `paths`
    pub fn with_paths(paths: &Paths) -> Self {
        Self {
            inbox: paths.default_inbox(),
            verbose: false,
            sessions: SessionsConfig::with_paths(paths),
            gemini: GeminiConfig::with_paths(paths),
            distill: DistillConfig::with_paths(paths),
        }
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => {
                let paths = Paths::new().map_err(ConfigError::NoHome)?;
                let default_file = paths.config_file();
                if default_file.exists() {
                    Self::load_from(&default_file)?
                } else {
                    Self::with_paths(&paths)
                }
            }
        };
        Ok(config.expanded())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn expanded(mut self) -> Self {
        self.inbox = expand_tilde(&self.inbox);
        self.sessions.claude_dir = expand_tilde(&self.sessions.claude_dir);
        self.sessions.state_file = expand_tilde(&self.sessions.state_file);
        self.gemini.state_file = expand_tilde(&self.gemini.state_file);
        self.gemini.crawl_cache = expand_tilde(&self.gemini.crawl_cache);
        self.distill.state_file = expand_tilde(&self.distill.state_file);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_paths(&default_paths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let paths = Paths::with_home("/home/test");
        let config = Config::with_paths(&paths);
        assert_eq!(config.inbox, PathBuf::from("/home/test/tracekeep-inbox"));
        assert_eq!(config.sessions.staleness_threshold_secs, 300);
        assert_eq!(config.gemini.time_window_minutes, 30);
        assert_eq!(config.distill.ollama_url, "http://localhost:11434");
        assert_eq!(config.distill.ollama_timeout_secs, 120);
        assert_eq!(
            config.sessions.projects_dir(),
            PathBuf::from("/home/test/.claude/projects")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
inbox = "/notes/inbox"
verbose = true

[distill]
ollama_model = "llama3"

[gemini]
time_window_minutes = 45
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.inbox, PathBuf::from("/notes/inbox"));
        assert!(config.verbose);
        assert_eq!(config.distill.ollama_model, "llama3");
        assert_eq!(config.distill.ollama_timeout_secs, 120);
        assert_eq!(config.gemini.time_window_minutes, 45);
        assert_eq!(config.sessions.staleness_threshold_secs, 300);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = Config::load(Some(&temp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "verbose = \"maybe\"").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
