use crate::arguments::Arguments;
use crate::error::BackendError;
use crate::traits::ToolBackend;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const LIST: &str = "filesystem_list";

const MAX_ENTRIES: usize = 1000;

/// Lists real directories on the relay host.
///
/// With a root configured, a path (absolute, or relative to the root) must
/// canonicalize to somewhere inside it. Without one, any readable directory
/// may be listed; the privileged tier is the only gate.
#[derive(Debug, Clone, Default)]
pub struct FilesystemBackend {
    root: Option<PathBuf>,
}

impl FilesystemBackend {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root(root: impl AsRef<Path>) -> Result<Self, BackendError> {
        let root = std::fs::canonicalize(root.as_ref())
            .map_err(|e| BackendError::InvalidArguments(format!("Invalid root: {}", e)))?;
        Ok(Self { root: Some(root) })
    }

    async fn resolve(&self, requested: &str) -> Result<PathBuf, BackendError> {
        let candidate = match &self.root {
            Some(root) if Path::new(requested).is_relative() => root.join(requested),
            _ => PathBuf::from(requested),
        };

        let canonical = fs::canonicalize(&candidate).await.map_err(|_| {
            BackendError::InvalidArguments(format!(
                "Path does not exist or is inaccessible: {}",
                requested
            ))
        })?;

        if let Some(root) = &self.root {
            if !canonical.starts_with(root) {
                return Err(BackendError::AccessDenied(format!(
                    "{} is outside the permitted root",
                    requested
                )));
            }
        }

        Ok(canonical)
    }

    async fn list(&self, arguments: &Value) -> Result<Value, BackendError> {
        let args = Arguments::new(arguments);
        let requested = args
            .str("path")
            .ok_or_else(|| BackendError::InvalidArguments("path is required".into()))?;

        let path = self.resolve(requested).await?;
        let mut dir = fs::read_dir(&path)
            .await
            .map_err(|e| BackendError::Failed(e.to_string()))?;

        let mut entries: Vec<(String, bool)> = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| BackendError::Failed(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            // Symlinks are followed so a link to a directory is listed as one.
            let is_dir = fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push((name, is_dir));
        }

        // The cap keeps the first names in sorted order.
        entries.sort();
        let truncated = entries.len() > MAX_ENTRIES;
        entries.truncate(MAX_ENTRIES);

        let (directories, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|(_, is_dir)| *is_dir);
        let directories: Vec<String> = directories.into_iter().map(|(name, _)| name).collect();
        let files: Vec<String> = files.into_iter().map(|(name, _)| name).collect();
        debug!(
            "Listed {}: {} files, {} directories",
            path.display(),
            files.len(),
            directories.len()
        );

        let mut listing = json!({
            "path": path.to_string_lossy(),
            "files": files,
            "directories": directories,
        });
        if truncated {
            listing["truncated"] = json!(true);
        }
        Ok(listing)
    }
}

#[async_trait]
impl ToolBackend for FilesystemBackend {
    async fn call(&self, operation: &str, arguments: &Value) -> Result<Value, BackendError> {
        match operation {
            LIST => self.list(arguments).await,
            other => Err(BackendError::UnsupportedOperation(other.to_string())),
        }
    }

    fn name(&self) -> &str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn populated() -> TempDir {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("b.txt"), "b").unwrap();
        stdfs::write(dir.path().join("a.txt"), "a").unwrap();
        stdfs::write(dir.path().join(".hidden"), "h").unwrap();
        stdfs::create_dir(dir.path().join("src")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_lists_files_and_directories() {
        let dir = populated();
        let backend = FilesystemBackend::new();
        let path = dir.path().to_string_lossy().to_string();

        let listing = backend.call(LIST, &json!({"path": path})).await.unwrap();
        assert_eq!(listing["files"], json!(["a.txt", "b.txt"]));
        assert_eq!(listing["directories"], json!(["src"]));
        assert!(listing.get("truncated").is_none());
    }

    #[tokio::test]
    async fn test_relative_path_under_root() {
        let dir = populated();
        let backend = FilesystemBackend::with_root(dir.path()).unwrap();

        let listing = backend.call(LIST, &json!({"path": "src"})).await.unwrap();
        assert_eq!(listing["files"], json!([]));
        assert_eq!(listing["directories"], json!([]));
    }

    #[tokio::test]
    async fn test_escape_from_root_denied() {
        let dir = populated();
        let backend = FilesystemBackend::with_root(dir.path().join("src")).unwrap();

        let err = backend.call(LIST, &json!({"path": ".."})).await.unwrap_err();
        assert!(matches!(err, BackendError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_missing_path_argument() {
        let backend = FilesystemBackend::new();
        let err = backend.call(LIST, &json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments: path is required");
    }

    #[tokio::test]
    async fn test_nonexistent_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope").to_string_lossy().to_string();
        let err = FilesystemBackend::new()
            .call(LIST, &json!({"path": missing}))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_entry_cap() {
        let dir = TempDir::new().unwrap();
        for i in 0..(MAX_ENTRIES + 5) {
            stdfs::write(dir.path().join(format!("f{i:04}")), "").unwrap();
        }
        let path = dir.path().to_string_lossy().to_string();

        let listing = FilesystemBackend::new()
            .call(LIST, &json!({"path": path}))
            .await
            .unwrap();
        let files = listing["files"].as_array().unwrap();
        assert_eq!(files.len(), MAX_ENTRIES);
        assert_eq!(files[0], "f0000");
        assert_eq!(files[MAX_ENTRIES - 1], format!("f{:04}", MAX_ENTRIES - 1));
        assert_eq!(listing["truncated"], true);
    }

    #[tokio::test]
    async fn test_hidden_entries_do_not_count_toward_cap() {
        let dir = TempDir::new().unwrap();
        for i in 0..MAX_ENTRIES {
            stdfs::write(dir.path().join(format!("f{i:04}")), "").unwrap();
        }
        for i in 0..10 {
            stdfs::write(dir.path().join(format!(".h{i}")), "").unwrap();
        }
        let path = dir.path().to_string_lossy().to_string();

        let listing = FilesystemBackend::new()
            .call(LIST, &json!({"path": path}))
            .await
            .unwrap();
        assert_eq!(listing["files"].as_array().map(Vec::len), Some(MAX_ENTRIES));
        assert!(listing.get("truncated").is_none());
    }

    #[tokio::test]
    async fn test_cap_applies_across_files_and_directories() {
        let dir = TempDir::new().unwrap();
        for i in 0..MAX_ENTRIES {
            stdfs::write(dir.path().join(format!("b{i:04}")), "").unwrap();
        }
        stdfs::create_dir(dir.path().join("a_dir")).unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let listing = FilesystemBackend::new()
            .call(LIST, &json!({"path": path}))
            .await
            .unwrap();
        assert_eq!(listing["directories"], json!(["a_dir"]));
        assert_eq!(
            listing["files"].as_array().map(Vec::len),
            Some(MAX_ENTRIES - 1)
        );
        assert_eq!(listing["truncated"], true);
    }
}
