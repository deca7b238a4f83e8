use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{ObjectStore, StoreConfig, StoreError};

/// One file per key under a base directory.
pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            base_dir: config.resolved_data_dir(),
        }
    }

    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(StoreError::Internal(format!("invalid key: {key:?}")));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

/// `$XDG_DATA_HOME/tasklists`, falling back to `~/.local/share/tasklists`.
pub fn default_data_dir() -> PathBuf {
    data_dir_from(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME"))
}

/// Empty variables count as unset.
fn data_dir_from(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let base = match (
        xdg_data_home.filter(|d| !d.is_empty()),
        home.filter(|h| !h.is_empty()),
    ) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => PathBuf::from(home).join(".local/share"),
        (None, None) => PathBuf::from("."),
    };
    base.join("tasklists")
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Internal(format!("mkdir: {e}")))?;
        }
        // Write a sibling temp file and rename so a crash never leaves half a blob.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data)
            .await
            .map_err(|e| StoreError::Internal(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Internal(format!("rename {}: {e}", path.display())))?;
        tracing::trace!(key, bytes = data.len(), "put");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Internal(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Internal(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::try_exists(&path).await {
            Ok(exists) => Ok(exists),
            Err(e) => Err(StoreError::Internal(format!(
                "exists {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LISTS_KEY;

    #[tokio::test]
    async fn put_then_get_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::at(tmp.path());

        store.put(LISTS_KEY, Bytes::from("[]")).await.unwrap();
        let data = store.get(LISTS_KEY).await.unwrap();
        assert_eq!(data.as_ref(), b"[]");
        assert!(tmp.path().join("lists.json").exists());
        assert!(!tmp.path().join("lists.json.tmp").exists());
    }

    #[tokio::test]
    async fn get_missing_returns_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::at(tmp.path());

        let err = store.get(LISTS_KEY).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.get_opt(LISTS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_creates_missing_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::at(tmp.path().join("nested/data"));

        store.put(LISTS_KEY, Bytes::from("[]")).await.unwrap();
        assert!(store.exists(LISTS_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn put_overwrites_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::at(tmp.path());

        store.put("key", Bytes::from("first")).await.unwrap();
        store.put("key", Bytes::from("second")).await.unwrap();

        let data = store.get("key").await.unwrap();
        assert_eq!(data.as_ref(), b"second");
    }

    #[tokio::test]
    async fn delete_removes_object_and_tolerates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::at(tmp.path());

        store.put("key", Bytes::from("data")).await.unwrap();
        assert!(store.exists("key").await.unwrap());
        store.delete("key").await.unwrap();
        assert!(!store.exists("key").await.unwrap());
        store.delete("key").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_escaping_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::at(tmp.path());

        for key in ["", "../outside", "a//b", "a/../b"] {
            let err = store.put(key, Bytes::from("x")).await.unwrap_err();
            assert!(matches!(err, StoreError::Internal(_)), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn unicode_content_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::at(tmp.path());

        let content = r#"[{"id":1,"name":"Estudos 🚀","tasks":[]}]"#;
        store.put(LISTS_KEY, Bytes::from(content)).await.unwrap();
        let data = store.get(LISTS_KEY).await.unwrap();
        assert_eq!(std::str::from_utf8(&data).unwrap(), content);
    }

    #[test]
    fn data_dir_ignores_empty_variables() {
        let var = |s: &str| Some(OsString::from(s));
        assert_eq!(
            data_dir_from(var("/data"), var("/home/me")),
            PathBuf::from("/data/tasklists")
        );
        assert_eq!(
            data_dir_from(var(""), var("/home/me")),
            PathBuf::from("/home/me/.local/share/tasklists")
        );
        assert_eq!(
            data_dir_from(None, var("")),
            PathBuf::from("./tasklists")
        );
        assert!(data_dir_from(var(""), var("/home/me")).is_absolute());
    }
}
