use crate::core::{ImageUpload, Note, Result, Transcriber, TranscriptionOrigin};
use crate::utils::error::ScribeError;
use std::sync::Arc;

/// Runs a batch through a [`Transcriber`], one image at a time.
#[derive(Clone)]
pub struct BatchTranscriber {
    transcriber: Arc<dyn Transcriber>,
}

impl BatchTranscriber {
    pub fn new<T: Transcriber + 'static>(transcriber: T) -> Self {
        Self {
            transcriber: Arc::new(transcriber),
        }
    }

    /// Returns one note per image, index-aligned with `images`.
    ///
    /// Images are sent strictly in order so the model never sees two pages
    /// at once. A failing image is replaced by a fallback note and the loop
    /// carries on.
    pub async fn run(&self, images: &[ImageUpload]) -> Result<Vec<Note>> {
        if images.is_empty() {
            return Err(ScribeError::NoImages);
        }

        tracing::info!("📝 Transcribing {} image(s)", images.len());
        let mut notes = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let label = image.label(index);

            match self.transcriber.transcribe(image).await {
                Ok(transcription) => {
                    if transcription.origin == TranscriptionOrigin::RawText {
                        tracing::warn!("{} was transcribed from unstructured model output", label);
                    } else {
                        tracing::debug!("Transcribed {}: {}", label, transcription.note.title);
                    }
                    notes.push(transcription.note);
                }
                Err(e) => {
                    // 單張失敗不影響其他圖片
                    tracing::error!("❌ Failed to process {}: {}", label, e);
                    notes.push(Note::fallback(&label));
                }
            }
        }

        tracing::info!("✅ Batch finished with {} note(s)", notes.len());
        Ok(notes)
    }
}
