use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::warn;
use crate::core::FileTask;
use crate::utils::SetupError;

/// Lists the regular files directly inside `dir`, sorted by file name.
///
/// Symlinks are followed. Subdirectories, dangling links and other non-file
/// entries are ignored. Sorting keeps group membership stable between runs on
/// the same directory.
pub async fn list_files(dir: impl AsRef<Path>) -> Result<Vec<FileTask>, SetupError> {
    let dir = dir.as_ref();
    let unreadable = |source: std::io::Error| SetupError::SourceUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SetupError::SourceNotFound(dir.to_path_buf()));
        }
        Err(e) => return Err(unreadable(e)),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        // Follows symlinks so linked images are listed like regular files
        let path = entry.path();
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Ignoring dangling link {}", path.display());
                continue;
            }
            Err(e) => return Err(unreadable(e)),
        };
        if !metadata.is_file() {
            continue;
        }
        files.push(FileTask::new(
            path,
            entry.file_name().to_string_lossy().to_string(),
            metadata.len(),
        ));
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

/// Creates `dir` and any missing parents.
pub async fn ensure_dir(dir: impl AsRef<Path>) -> Result<(), SetupError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .await
        .map_err(|source| SetupError::OutputDirectory {
            path: dir.to_path_buf(),
            source,
        })
}

/// Get file size in bytes
pub async fn file_size(path: impl AsRef<Path>) -> std::io::Result<u64> {
    fs::metadata(path.as_ref()).await.map(|m| m.len())
}

/// Byte count as megabytes, for log lines
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_only_regular_files_sorted() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("b.jpg"), b"bb").unwrap();
        std::fs::write(tmp.path().join("a.png"), b"a").unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("nested/c.jpg"), b"ccc").unwrap();

        let files = list_files(tmp.path()).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
        assert_eq!(files[1].size_bytes, 2);
        assert_eq!(files[0].source_path, tmp.path().join("a.png"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn follows_symlinks_to_files() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("real.jpg");
        std::fs::write(&target, b"12345").unwrap();
        std::os::unix::fs::symlink(&target, tmp.path().join("linked.jpg")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path().join("gone.jpg"), tmp.path().join("dangling.jpg")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), tmp.path().join("dir-link")).unwrap();

        let files = list_files(tmp.path()).await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "linked.jpg");
        assert_eq!(files[0].size_bytes, 5);
        assert_eq!(files[0].source_path, tmp.path().join("linked.jpg"));
    }

    #[tokio::test]
    async fn missing_directory_is_source_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = list_files(tmp.path().join("nope")).await;
        assert!(matches!(result, Err(SetupError::SourceNotFound(_))));
    }

    #[tokio::test]
    async fn ensure_dir_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("out/deeper");
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op
        ensure_dir(&nested).await.unwrap();
    }

    #[test]
    fn converts_bytes_to_megabytes() {
        assert_eq!(bytes_to_mb(5 * 1024 * 1024), 5.0);
        assert_eq!(bytes_to_mb(0), 0.0);
    }
}
