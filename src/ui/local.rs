use crate::domain::model::{media_type_for_path, ImageUpload};
use crate::domain::ports::{BatchSubmitter, Storage};
use crate::ui::session::{Phase, ReviewSession, SelectionSource};
use crate::utils::error::{Result, ScribeError};
use std::path::Path;

/// Loads `paths` through `storage`, guessing each media type from its extension.
pub async fn read_local_images<S: Storage>(storage: &S, paths: &[String]) -> Result<Vec<ImageUpload>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = storage.read_file(path).await?;
        let file_name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        files.push(ImageUpload::new(file_name, media_type_for_path(path), bytes));
    }
    Ok(files)
}

/// Runs local files through a review session and returns it in `Reviewing`.
pub async fn transcribe_local_files<S, B>(
    storage: &S,
    paths: &[String],
    submitter: &B,
) -> Result<ReviewSession>
where
    S: Storage,
    B: BatchSubmitter + ?Sized,
{
    let files = read_local_images(storage, paths).await?;

    let mut session = ReviewSession::new();
    let added = session.add_images(files, SelectionSource::Picker);
    if added == 0 {
        return Err(ScribeError::ValidationError {
            message: format!("none of the {} file(s) is an image", paths.len()),
        });
    }
    if added < paths.len() {
        tracing::warn!("⚠️ Skipped {} file(s) that are not images", paths.len() - added);
    }

    if session.submit(submitter).await != Phase::Reviewing {
        return Err(ScribeError::InvalidResponse {
            message: session.error().unwrap_or("no notes returned").to_string(),
        });
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use crate::domain::model::Note;
    use crate::utils::error::ErrorCategory;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Answers with one note per image named after the file, or fails.
    #[derive(Default)]
    struct CountingSubmitter {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BatchSubmitter for CountingSubmitter {
        async fn submit_batch(&self, images: &[ImageUpload]) -> Result<Vec<Note>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ScribeError::InvalidResponse {
                    message: "server answered 500".into(),
                });
            }
            Ok(images
                .iter()
                .map(|image| Note::new(image.label(0), image.media_type.clone()))
                .collect())
        }
    }

    async fn storage_with(files: &[&str]) -> (TempDir, LocalStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
        for name in files {
            storage.write_file(name, b"bytes").await.unwrap();
        }
        (temp_dir, storage)
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn test_only_non_images_is_input_error_without_request() {
        let (_dir, storage) = storage_with(&["todo.txt", "scan.pdf"]).await;
        let submitter = CountingSubmitter::default();

        let err = transcribe_local_files(&storage, &paths(&["todo.txt", "scan.pdf"]), &submitter)
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::ValidationError { .. }));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_images_are_skipped() {
        let (_dir, storage) = storage_with(&["page.png", "todo.txt"]).await;
        let submitter = CountingSubmitter::default();

        let session = transcribe_local_files(&storage, &paths(&["page.png", "todo.txt"]), &submitter)
            .await
            .unwrap();

        assert_eq!(session.phase(), Phase::Reviewing);
        assert_eq!(session.notes(), &[Note::new("page.png", "image/png")]);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_is_network_error() {
        let (_dir, storage) = storage_with(&["page.jpg"]).await;
        let submitter = CountingSubmitter {
            fail: true,
            ..Default::default()
        };

        let err = transcribe_local_files(&storage, &paths(&["page.jpg"]), &submitter)
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let (_dir, storage) = storage_with(&[]).await;

        let err = read_local_images(&storage, &paths(&["gone.png"])).await.unwrap_err();

        assert!(matches!(err, ScribeError::IoError(_)));
    }
}
