use crate::domain::model::{ImageUpload, Note};
use crate::domain::ports::BatchSubmitter;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};

/// Separator placed between notes by "copy all".
pub const COPY_SEPARATOR: &str = "\n\n---\n\n";
/// How long a "copied" confirmation stays visible.
pub const COPY_FEEDBACK_SECONDS: i64 = 2;

pub const NO_IMAGES_SELECTED: &str = "Please select image files";
pub const NO_IMAGES_DROPPED: &str = "Please drop image files";
pub const NOTHING_TO_SUBMIT: &str = "Please select at least one image file";
pub const SUBMISSION_FAILED: &str = "Failed to transcribe images. Please try again.";
pub const UNKNOWN_SOURCE: &str = "Unknown file";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Collecting,
    Processing,
    Reviewing,
}

/// Where a batch of candidate files came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Picker,
    Drop,
}

/// State behind the upload/review screen.
///
/// Everything lives for one session only; [`ReviewSession::reset`] discards it.
#[derive(Debug, Default)]
pub struct ReviewSession {
    phase: Phase,
    images: Vec<ImageUpload>,
    notes: Vec<Note>,
    error: Option<String>,
    copied_all_until: Option<DateTime<Utc>>,
    copied_note: Option<(usize, DateTime<Utc>)>,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn images(&self) -> &[ImageUpload] {
        &self.images
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Appends the image files among `files`; returns how many were kept.
    pub fn add_images(&mut self, files: Vec<ImageUpload>, source: SelectionSource) -> usize {
        if self.phase != Phase::Collecting {
            return 0;
        }

        let before = self.images.len();
        self.images.extend(files.into_iter().filter(ImageUpload::is_image));
        let added = self.images.len() - before;

        if added > 0 {
            self.error = None;
        } else {
            let message = match source {
                SelectionSource::Picker => NO_IMAGES_SELECTED,
                SelectionSource::Drop => NO_IMAGES_DROPPED,
            };
            self.error = Some(message.to_string());
        }
        added
    }

    pub fn remove_image(&mut self, index: usize) -> Option<ImageUpload> {
        if self.phase != Phase::Collecting || index >= self.images.len() {
            return None;
        }
        Some(self.images.remove(index))
    }

    /// Moves to `Processing` and hands out the batch to send.
    pub fn begin_submission(&mut self) -> Option<Vec<ImageUpload>> {
        if self.phase != Phase::Collecting {
            return None;
        }
        if self.images.is_empty() {
            self.error = Some(NOTHING_TO_SUBMIT.to_string());
            return None;
        }

        self.phase = Phase::Processing;
        self.error = None;
        self.notes.clear();
        Some(self.images.clone())
    }

    /// Applies the batch answer. Ignored unless a submission is in flight.
    pub fn finish_submission(&mut self, result: Result<Vec<Note>>) {
        if self.phase != Phase::Processing {
            tracing::warn!("Ignoring batch result outside of processing");
            return;
        }

        match result {
            Ok(notes) => {
                tracing::info!("Received {} note(s)", notes.len());
                self.notes = notes;
                self.phase = Phase::Reviewing;
            }
            Err(e) => {
                tracing::error!("❌ Batch request failed: {}", e);
                self.error = Some(SUBMISSION_FAILED.to_string());
                self.phase = Phase::Collecting;
            }
        }
    }

    /// Sends the pending images as one batch and waits for the answer.
    pub async fn submit<S: BatchSubmitter + ?Sized>(&mut self, submitter: &S) -> Phase {
        let Some(batch) = self.begin_submission() else {
            return self.phase;
        };

        let result = submitter.submit_batch(&batch).await;
        self.finish_submission(result);
        self.phase
    }

    /// Replaces the content of one note. Titles are not editable.
    pub fn edit_content(&mut self, index: usize, content: impl Into<String>) -> bool {
        match self.notes.get_mut(index) {
            Some(note) => {
                note.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Text for "copy all": every note, in display order.
    pub fn copy_all(&mut self, now: DateTime<Utc>) -> String {
        self.copied_all_until = Some(now + Duration::seconds(COPY_FEEDBACK_SECONDS));
        self.notes
            .iter()
            .map(Note::to_clipboard_text)
            .collect::<Vec<_>>()
            .join(COPY_SEPARATOR)
    }

    pub fn copy_note(&mut self, index: usize, now: DateTime<Utc>) -> Option<String> {
        let text = self.notes.get(index)?.to_clipboard_text();
        self.copied_note = Some((index, now + Duration::seconds(COPY_FEEDBACK_SECONDS)));
        Some(text)
    }

    pub fn copied_all_visible(&self, now: DateTime<Utc>) -> bool {
        self.copied_all_until.is_some_and(|until| now < until)
    }

    pub fn copied_note_visible(&self, index: usize, now: DateTime<Utc>) -> bool {
        self.copied_note
            .is_some_and(|(copied, until)| copied == index && now < until)
    }

    /// Name of the file a note came from, paired by position.
    pub fn source_label(&self, index: usize) -> &str {
        self.images
            .get(index)
            .and_then(|image| image.file_name.as_deref())
            .unwrap_or(UNKNOWN_SOURCE)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
