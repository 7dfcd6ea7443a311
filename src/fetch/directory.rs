//! Retrieval from a directory of `{key}.json` files

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::sources::SourceKind;

use super::{FetchError, SourceFetcher};

pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: SourceKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.key()))
    }
}

#[async_trait]
impl SourceFetcher for DirectoryFetcher {
    async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError> {
        let path = self.path_for(kind);
        tracing::debug!(source = kind.key(), path = %path.display(), "Reading source file");

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                kind,
                path: path.clone(),
                source,
            })?;

        serde_json::from_str(&text).map_err(|source| FetchError::Decode { kind, source })
    }

    fn describe(&self) -> String {
        format!("directory: {}", self.dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_source_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"[{"entryId": "x"}]"#).unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        let value = fetcher.fetch(SourceKind::A).await.unwrap();
        assert_eq!(value[0]["entryId"], "x");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirectoryFetcher::new(dir.path());
        let err = fetcher.fetch(SourceKind::D).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { kind: SourceKind::D, .. }));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "not json").unwrap();

        let fetcher = DirectoryFetcher::new(dir.path());
        let err = fetcher.fetch(SourceKind::B).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { kind: SourceKind::B, .. }));
    }
}
