//! Artifact storage for generated content.
//!
//! Generated files live under a per-session scope directory and are served
//! back at stable paths, so a fresh generation of the same kind replaces
//! the previous file for that session and nothing leaks across sessions.

use std::path::{Path, PathBuf};
use studio_core::error::AppError;
use tempfile::NamedTempFile;

/// The kinds of artifact a generation can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Essay,
    Image,
    Transcript,
}

impl ArtifactKind {
    /// Fixed file name for this kind within a session scope.
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Essay => "essay.txt",
            ArtifactKind::Image => "image.png",
            ArtifactKind::Transcript => "transcription.txt",
        }
    }
}

/// A stored artifact: where it sits on disk and the href templates use.
#[derive(Debug, Clone)]
pub struct ArtifactRef {
    pub href: String,
    pub path: PathBuf,
}

#[derive(Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Route prefix under which the artifact root is served.
    pub const PUBLIC_PREFIX: &'static str = "/generated";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store an artifact, replacing any previous artifact of the same kind
    /// in this scope.
    pub async fn write(
        &self,
        scope: &str,
        kind: ArtifactKind,
        bytes: &[u8],
    ) -> Result<ArtifactRef, AppError> {
        let dir = self.root.join(scope);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(kind.file_name());
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            scope = %scope,
            file = kind.file_name(),
            bytes = bytes.len(),
            "artifact written"
        );

        Ok(ArtifactRef {
            href: format!("{}/{}/{}", Self::PUBLIC_PREFIX, scope, kind.file_name()),
            path,
        })
    }

    /// Spool an uploaded file to disk for the duration of a request. The
    /// backing file is deleted when the returned guard drops, on every
    /// exit path.
    pub async fn spool_upload(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<SpooledUpload, AppError> {
        let dir = self.root.join("tmp");
        tokio::fs::create_dir_all(&dir).await?;

        let file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&upload_suffix(original_name))
            .tempfile_in(&dir)?;
        tokio::fs::write(file.path(), bytes).await?;

        Ok(SpooledUpload {
            file,
            original_name: original_name.to_string(),
        })
    }
}

/// Guard around an uploaded file spooled to disk.
pub struct SpooledUpload {
    file: NamedTempFile,
    original_name: String,
}

impl SpooledUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}

/// Keep the upload's extension on the spooled file, dropping anything that
/// is not a plain alphanumeric extension.
fn upload_suffix(original_name: &str) -> String {
    match Path::new(original_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => ".bin".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_replaces_previous_artifact_of_same_kind() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let first = store
            .write("scope-a", ArtifactKind::Essay, b"first draft")
            .await
            .unwrap();
        let second = store
            .write("scope-a", ArtifactKind::Essay, b"second draft")
            .await
            .unwrap();

        assert_eq!(first.path, second.path);
        let content = std::fs::read_to_string(&second.path).unwrap();
        assert_eq!(content, "second draft");

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("scope-a"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn scopes_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        store
            .write("scope-a", ArtifactKind::Essay, b"for a")
            .await
            .unwrap();
        store
            .write("scope-b", ArtifactKind::Essay, b"for b")
            .await
            .unwrap();

        let a = std::fs::read_to_string(dir.path().join("scope-a").join("essay.txt")).unwrap();
        let b = std::fs::read_to_string(dir.path().join("scope-b").join("essay.txt")).unwrap();
        assert_eq!(a, "for a");
        assert_eq!(b, "for b");
    }

    #[tokio::test]
    async fn write_reports_public_href() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let artifact = store
            .write("scope-a", ArtifactKind::Image, b"png bytes")
            .await
            .unwrap();
        assert_eq!(artifact.href, "/generated/scope-a/image.png");
    }

    #[tokio::test]
    async fn spooled_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let spooled = store.spool_upload("clip.wav", b"RIFF").await.unwrap();
        let path = spooled.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF");

        drop(spooled);
        assert!(!path.exists());
    }

    #[test]
    fn upload_suffix_keeps_safe_extensions_only() {
        assert_eq!(upload_suffix("clip.wav"), ".wav");
        assert_eq!(upload_suffix("clip.WAV"), ".wav");
        assert_eq!(upload_suffix("archive.tar.gz"), ".gz");
        assert_eq!(upload_suffix("no-extension"), ".bin");
        assert_eq!(upload_suffix("weird.w!v"), ".bin");
    }
}
