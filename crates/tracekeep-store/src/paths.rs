//! Default locations for config, state and output files

use std::path::{Path, PathBuf};

/// Resolves standard tracekeep paths relative to the user's home
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub config_dir: PathBuf,
}

impl Paths {
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));

        Ok(Self { home, config_dir })
    }

    /// Resolver rooted at an explicit directory (used by tests)
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let config_dir = home.join(".config");
        Self { home, config_dir }
    }

    /// `~/.tracekeep`, where state and caches live
    pub fn data_dir(&self) -> PathBuf {
        self.home.join(".tracekeep")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("tracekeep").join("config.toml")
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.home.join(".claude")
    }

    pub fn default_inbox(&self) -> PathBuf {
        self.home.join("tracekeep-inbox")
    }

    pub fn session_state_file(&self) -> PathBuf {
        self.data_dir().join("sessions-state.json")
    }

    pub fn gemini_state_file(&self) -> PathBuf {
        self.data_dir().join("gemini-state.json")
    }

    pub fn crawl_cache_file(&self) -> PathBuf {
        self.data_dir().join("gemini-crawl-cache.json")
    }

    pub fn distill_state_file(&self) -> PathBuf {
        self.data_dir().join("distill-state.json")
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_home_layout() {
        let paths = Paths::with_home("/tmp/fakehome");
        assert_eq!(paths.data_dir(), PathBuf::from("/tmp/fakehome/.tracekeep"));
        assert!(paths.config_file().ends_with("tracekeep/config.toml"));
        assert!(paths.distill_state_file().ends_with("distill-state.json"));
        assert!(paths.claude_dir().ends_with(".claude"));
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        let absolute = PathBuf::from("/var/inbox");
        assert_eq!(expand_tilde(&absolute), absolute);
    }

    #[test]
    fn test_expand_tilde_home_prefix() {
        let expanded = expand_tilde(Path::new("~/notes"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("notes"));
        }
    }
}
