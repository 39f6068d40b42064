use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::UploadError;

const UTF8_BOM: char = '\u{feff}';

/// Writes uploads to a scratch directory under generated names.
///
/// The client-supplied file name is never used on disk.
#[derive(Debug, Clone)]
pub struct UploadStager {
    dir: PathBuf,
}

impl UploadStager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stages `bytes`, reads them back as text and removes the staged file.
    pub async fn stage_text(&self, bytes: &[u8]) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{}.txt", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;

        let read = tokio::fs::read(&path).await;
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove staged upload");
        }

        let text = String::from_utf8(read?).map_err(|_| UploadError::InvalidTranscript)?;
        Ok(match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> PathBuf {
        std::env::temp_dir().join(format!("handscope_staging_{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn round_trips_text_and_leaves_no_file() {
        let dir = scratch();
        let stager = UploadStager::new(&dir);

        let text = stager.stage_text(b"Game 1\n").await.expect("stage");
        assert_eq!(text, "Game 1\n");

        let mut entries = tokio::fs::read_dir(&dir).await.expect("read dir");
        assert!(entries.next_entry().await.expect("entry").is_none());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn strips_byte_order_mark() {
        let stager = UploadStager::new(scratch());
        let text = stager
            .stage_text("\u{feff}Game 2\n".as_bytes())
            .await
            .expect("stage");
        assert_eq!(text, "Game 2\n");
        let _ = tokio::fs::remove_dir_all(stager.dir()).await;
    }

    #[tokio::test]
    async fn rejects_non_utf8_upload() {
        let stager = UploadStager::new(scratch());
        let err = stager
            .stage_text(&[0xff, 0xfe, 0x00])
            .await
            .expect_err("invalid utf-8");
        assert!(matches!(err, UploadError::InvalidTranscript));
        let _ = tokio::fs::remove_dir_all(stager.dir()).await;
    }
}
