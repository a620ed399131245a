use crate::core::Storage;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Writes report files under one output directory, created on first write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    output_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, file_name: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(file_name);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("reports");
        let storage = LocalStorage::new(&base);

        storage.write_file("vitamin_c_result.csv", b"SNP\n").await.unwrap();

        assert_eq!(storage.resolve("vitamin_c_result.csv"), base.join("vitamin_c_result.csv"));
        assert_eq!(std::fs::read(base.join("vitamin_c_result.csv")).unwrap(), b"SNP\n");
    }

    #[tokio::test]
    async fn test_write_replaces_previous_report() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("vitamin_c_result.json", b"{\"v\":1}").await.unwrap();
        storage.write_file("vitamin_c_result.json", b"{\"v\":2}").await.unwrap();

        let text = std::fs::read_to_string(storage.resolve("vitamin_c_result.json")).unwrap();
        assert_eq!(text, "{\"v\":2}");
    }

    #[tokio::test]
    async fn test_write_into_file_path_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let storage = LocalStorage::new(&blocker);

        assert!(matches!(
            storage.write_file("vitamin_c_result.csv", b"SNP\n").await,
            Err(crate::utils::error::DosageError::IoError(_))
        ));
    }
}
