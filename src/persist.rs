//! JSON collection files shared by the stores
//!
//! Each store keeps one file per collection under the data directory, written
//! wholesale after mutations. Loading tolerates a missing file (first run)
//! and logs rather than fails on a corrupt one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read a collection file. Missing file means an empty collection; a corrupt
/// file is logged and treated the same so startup never wedges on bad data.
pub(crate) fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str(&data) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Write a collection file.
pub(crate) async fn write_collection<T: Serialize>(
    path: &Path,
    rows: &[T],
) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    tokio::fs::write(path, json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let rows: Vec<u32> = load_collection(&dir.path().join("nope.json"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let rows: Vec<u32> = load_collection(&path);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_write_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.json");
        write_collection(&path, &[1u32, 2, 3]).await.unwrap();
        let rows: Vec<u32> = load_collection(&path);
        assert_eq!(rows, vec![1, 2, 3]);
    }
}
