//! Client-local key-value storage for session state
//!
//! Values are plain strings with no schema versioning. The same four keys are
//! used by every front end so a session written by one can be read by another.

use crate::credential::CredentialPair;
use crate::error::{CoreError, CoreResult, ErrorContext};
use crate::types::UserProfile;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

/// Keys persisted by the dashboard client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    AccessToken,
    RefreshToken,
    User,
    LastListingPage,
}

impl StoreKey {
    pub const ALL: [Self; 4] = [
        Self::AccessToken,
        Self::RefreshToken,
        Self::User,
        Self::LastListingPage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
            Self::LastListingPage => "lastListingPage",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted session state shared by every guard invocation
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: StoreKey) -> CoreResult<Option<String>>;
    async fn set(&self, key: StoreKey, value: &str) -> CoreResult<()>;
    async fn remove(&self, key: StoreKey) -> CoreResult<()>;
    /// Remove every key
    async fn clear(&self) -> CoreResult<()>;
}

/// Read the persisted credential pair, if an access token is stored
pub async fn load_credentials(store: &dyn SessionStore) -> CoreResult<Option<CredentialPair>> {
    let Some(access_token) = store.get(StoreKey::AccessToken).await? else {
        return Ok(None);
    };
    if access_token.is_empty() {
        return Ok(None);
    }
    let refresh_token = store.get(StoreKey::RefreshToken).await?;
    Ok(Some(CredentialPair::new(access_token, refresh_token)))
}

/// Persist a freshly issued credential pair together with its user
pub async fn save_login(
    store: &dyn SessionStore,
    access_token: &str,
    refresh_token: Option<&str>,
    user: &UserProfile,
) -> CoreResult<()> {
    store.set(StoreKey::AccessToken, access_token).await?;
    match refresh_token {
        Some(token) => store.set(StoreKey::RefreshToken, token).await?,
        None => store.remove(StoreKey::RefreshToken).await?,
    }
    store
        .set(StoreKey::User, &serde_json::to_string(user)?)
        .await
}

/// Read the stored user profile; a corrupt entry reads as absent
pub async fn load_user(store: &dyn SessionStore) -> CoreResult<Option<UserProfile>> {
    Ok(store
        .get(StoreKey::User)
        .await?
        .and_then(|raw| serde_json::from_str(&raw).ok()))
}

/// In-process store, used by tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, key: StoreKey) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key.as_str()).cloned())
    }

    async fn set(&self, key: StoreKey, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.as_str(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StoreKey) -> CoreResult<()> {
        self.entries.write().await.remove(key.as_str());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// JSON-object file store, the terminal equivalent of browser local storage
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "session.json";

    /// Store backed by `session.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> CoreResult<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CoreError::serialization_error(format!(
                    "corrupt session file {}: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e)
                .with_context(|| format!("reading {}", self.path.display()))
                .map_err(CoreError::storage),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))
                .map_err(CoreError::storage)?;
        }
        let content = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("writing {}", tmp.display()))
            .map_err(CoreError::storage)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))
            .map_err(CoreError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileStore {
    async fn get(&self, key: StoreKey) -> CoreResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key.as_str()))
    }

    async fn set(&self, key: StoreKey, value: &str) -> CoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn remove(&self, key: StoreKey) -> CoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key.as_str()).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("removing {}", self.path.display()))
                .map_err(CoreError::storage),
        }
    }
}

// Mock implementation for testing
#[cfg(any(test, feature = "tests"))]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub SessionStore {}

        #[async_trait]
        impl SessionStore for SessionStore {
            async fn get(&self, key: StoreKey) -> CoreResult<Option<String>>;
            async fn set(&self, key: StoreKey, value: &str) -> CoreResult<()>;
            async fn remove(&self, key: StoreKey) -> CoreResult<()>;
            async fn clear(&self) -> CoreResult<()>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user;

    #[tokio::test]
    async fn test_memory_store_roundtrip_and_clear() {
        let store = MemoryStore::new();
        save_login(&store, "a.b.c", Some("refresh"), &user())
            .await
            .unwrap();
        store
            .set(StoreKey::LastListingPage, "/dashboard/notifications")
            .await
            .unwrap();

        assert_eq!(store.len().await, 4);
        assert_eq!(load_user(&store).await.unwrap(), Some(user()));
        let creds = load_credentials(&store).await.unwrap().unwrap();
        assert_eq!(creds.access_token, "a.b.c");
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh"));

        store.clear().await.unwrap();
        assert!(store.is_empty().await);
        assert!(load_credentials(&store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_access_token_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(StoreKey::AccessToken, "").await.unwrap();
        assert!(load_credentials(&store).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_persists_plain_string_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path().join("nested"));
        save_login(&store, "tok", None, &user()).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get("accessToken").map(String::as_str), Some("tok"));
        assert!(!parsed.contains_key("refreshToken"));
        assert!(parsed.contains_key("user"));

        // A second handle over the same file sees the same state
        let reopened = FileStore::in_dir(dir.path().join("nested"));
        assert_eq!(
            reopened.get(StoreKey::AccessToken).await.unwrap().as_deref(),
            Some("tok")
        );

        reopened.clear().await.unwrap();
        assert!(!store.path().exists());
        assert!(store.get(StoreKey::User).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(
            store.get(StoreKey::AccessToken).await,
            Err(CoreError::Serialization { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_store_io_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let store = FileStore::in_dir(&blocker);

        let err = store.set(StoreKey::AccessToken, "tok").await.unwrap_err();
        assert!(matches!(err, CoreError::Storage { .. }));
        assert!(err.to_string().contains(&blocker.display().to_string()));
    }

    #[tokio::test]
    async fn test_mock_store_propagates_failures() {
        let mut store = mock::MockSessionStore::new();
        store
            .expect_get()
            .returning(|_| Err(CoreError::storage("unavailable")));
        assert!(load_credentials(&store).await.is_err());
    }
}
