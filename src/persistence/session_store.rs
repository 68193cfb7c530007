use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::JoystickSession;

const CONFIG_DIR: &str = "virtual-joystick";
const SESSION_EXTENSION: &str = "toml";

/// Reads and writes session files below one base directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    base_path: PathBuf,
}

impl SessionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// `<config dir>/virtual-joystick`, or a relative directory when the
    /// platform has no config dir
    pub fn default_location() -> Self {
        let mut base_path = dirs::config_dir().unwrap_or_else(|| {
            warn!("Could not determine config directory, using current directory");
            PathBuf::from(".")
        });
        base_path.push(CONFIG_DIR);
        Self::new(base_path)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn session_path(&self, name: &str) -> PathBuf {
        let mut path = self.base_path.clone();
        path.push(format!("{}.{}", name, SESSION_EXTENSION));
        path
    }

    pub async fn save(&self, name: &str, session: &JoystickSession) -> Result<()> {
        validate_name(name)?;

        if !tokio::fs::try_exists(&self.base_path)
            .await
            .map_err(|e| eyre!("Failed to check if session directory exists: {}", e))?
        {
            tokio::fs::create_dir_all(&self.base_path)
                .await
                .map_err(|e| eyre!("Failed to create session directory: {}", e))?;
        }

        let content = toml::to_string_pretty(session)
            .map_err(|e| eyre!("Failed to serialize session {}: {}", name, e))?;

        tokio::fs::write(self.session_path(name), content)
            .await
            .map_err(|e| eyre!("Failed to write session file: {}", e))?;

        info!("Session {} saved successfully", name);
        Ok(())
    }

    /// Loads a session. A missing file yields the default session.
    pub async fn load(&self, name: &str) -> Result<JoystickSession> {
        validate_name(name)?;
        let path = self.session_path(name);

        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| eyre!("Failed to check if session file exists: {}", e))?
        {
            warn!("Session file for {} does not exist, using default", name);
            return Ok(JoystickSession::default());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| eyre!("Failed to read session file: {}", e))?;

        let session: JoystickSession = toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse session file {}: {}", path.display(), e))?;

        session
            .config
            .validate()
            .map_err(|e| eyre!("Session {} has an invalid configuration: {}", name, e))?;

        debug!("Loaded session {}: {:?}", name, session);
        Ok(session)
    }

    /// Names of all stored sessions, sorted
    pub async fn list(&self) -> Result<Vec<String>> {
        if !tokio::fs::try_exists(&self.base_path)
            .await
            .map_err(|e| eyre!("Failed to check if session directory exists: {}", e))?
        {
            debug!("Session directory does not exist, no sessions available");
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(|e| eyre!("Failed to read session directory: {}", e))?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| eyre!("Failed to read directory entry: {}", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SESSION_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                debug!("Found session: {}", name);
                sessions.push(name.to_string());
            }
        }

        sessions.sort();
        Ok(sessions)
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let path = self.session_path(name);

        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| eyre!("Failed to check if session file exists: {}", e))?
        {
            return Err(eyre!("Session does not exist: {}", name));
        }

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| eyre!("Failed to delete session file: {}", e))?;

        info!("Session {} deleted successfully", name);
        Ok(())
    }
}

// Session names become file names
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('.') || name.contains(|c: char| c == '/' || c == '\\') {
        return Err(eyre!("Invalid session name: {:?}", name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::control::DirectionType;
    use crate::state::SavedPosition;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    fn temp_store() -> SessionStore {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "virtual-joystick-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        SessionStore::new(path)
    }

    async fn cleanup(store: &SessionStore) {
        let _ = tokio::fs::remove_dir_all(store.base_path()).await;
    }

    #[tokio::test]
    async fn missing_session_loads_defaults() {
        let store = temp_store();
        let session = store.load("nothing-here").await.unwrap();
        assert_eq!(session, JoystickSession::default());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saved_session_comes_back() {
        let store = temp_store();
        let mut config = AppConfig::default();
        config.joystick.direction_type = DirectionType::Simple;
        config.joystick.threshold = Some(6.0);

        let session = JoystickSession {
            config,
            position: Some(SavedPosition { x: 42.0, y: 17.5 }),
            saved_at: None,
        };
        store.save("left-stick", &session).await.unwrap();
        store.save("right-stick", &JoystickSession::default()).await.unwrap();

        let loaded = store.load("left-stick").await.unwrap();
        assert_eq!(loaded, session);
        assert_eq!(
            store.list().await.unwrap(),
            vec!["left-stick".to_string(), "right-stick".to_string()]
        );

        cleanup(&store).await;
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let store = temp_store();
        store.save("gone", &JoystickSession::default()).await.unwrap();
        store.delete("gone").await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
        assert!(store.delete("gone").await.is_err());

        cleanup(&store).await;
    }

    #[tokio::test]
    async fn corrupt_files_are_reported() {
        let store = temp_store();
        tokio::fs::create_dir_all(store.base_path()).await.unwrap();
        tokio::fs::write(store.session_path("broken"), "config = 3")
            .await
            .unwrap();

        assert!(store.load("broken").await.is_err());

        cleanup(&store).await;
    }

    #[tokio::test]
    async fn path_like_names_are_rejected() {
        let store = temp_store();
        assert!(store.save("../escape", &JoystickSession::default()).await.is_err());
        assert!(store.load("").await.is_err());
        assert!(store.delete(".hidden").await.is_err());
    }
}
