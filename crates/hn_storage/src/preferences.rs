use hn_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tokio::sync::broadcast;

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::Storage(format!("Unknown theme: {}", other))),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: Option<Theme>,
}

/// Persists the light/dark choice and notifies in-process subscribers when it changes.
pub struct ThemeStore {
    path: PathBuf,
    sender: broadcast::Sender<Theme>,
    current: Mutex<Option<Theme>>,
}

impl ThemeStore {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            path: config_dir.as_ref().join(PREFERENCES_FILE),
            sender,
            current: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Theme> {
        self.sender.subscribe()
    }

    async fn read_preferences(&self) -> Result<Preferences> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => Ok(prefs),
                Err(e) => {
                    tracing::warn!("Ignoring malformed preferences at {}: {}", self.path.display(), e);
                    Ok(Preferences::default())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn remember(&self, theme: Theme) -> Option<Theme> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.replace(theme)
    }

    /// Read the stored theme, defaulting to dark when nothing is saved.
    pub async fn load(&self) -> Result<Theme> {
        let theme = self.read_preferences().await?.theme.unwrap_or_default();
        self.remember(theme);
        Ok(theme)
    }

    pub async fn set(&self, theme: Theme) -> Result<()> {
        let mut prefs = self.read_preferences().await?;
        prefs.theme = Some(theme);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(&prefs)?).await?;

        self.remember(theme);
        // No subscribers is fine
        let _ = self.sender.send(theme);
        tracing::debug!("Theme set to {}", theme);
        Ok(())
    }

    pub async fn toggle(&self) -> Result<Theme> {
        let next = self.load().await?.toggled();
        self.set(next).await?;
        Ok(next)
    }

    /// Re-read the file after an out-of-process change and notify subscribers
    /// if the value differs from the last one seen.
    pub async fn refresh(&self) -> Result<Theme> {
        let theme = self.read_preferences().await?.theme.unwrap_or_default();
        if self.remember(theme) != Some(theme) {
            let _ = self.sender.send(theme);
        }
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_defaults_to_dark() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        assert_eq!(store.load().await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_set_persists_and_notifies() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("nested"));
        let mut rx = store.subscribe();

        store.set(Theme::Light).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), Theme::Light);

        let reopened = ThemeStore::new(dir.path().join("nested"));
        assert_eq!(reopened.load().await.unwrap(), Theme::Light);
    }

    #[tokio::test]
    async fn test_toggle() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        assert_eq!(store.toggle().await.unwrap(), Theme::Light);
        assert_eq!(store.toggle().await.unwrap(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_external_change() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        let other = ThemeStore::new(dir.path());
        assert_eq!(store.load().await.unwrap(), Theme::Dark);

        let mut rx = store.subscribe();
        other.set(Theme::Light).await.unwrap();
        assert_eq!(store.refresh().await.unwrap(), Theme::Light);
        assert_eq!(rx.recv().await.unwrap(), Theme::Light);
    }

    #[tokio::test]
    async fn test_malformed_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        tokio::fs::write(store.path(), "{ not json").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Theme::Dark);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
