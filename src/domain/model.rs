use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTE_TITLE: &str = "Transcribed Note";
pub const EMPTY_TRANSCRIPTION_MARKER: &str = "Failed to transcribe";
pub const FALLBACK_NOTE_CONTENT: &str = "Error processing this image";

/// One transcribed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Placeholder substituted when transcription of a single image fails.
    pub fn fallback(image_label: &str) -> Self {
        Self::new(
            format!("Failed to transcribe {}", image_label),
            FALLBACK_NOTE_CONTENT,
        )
    }

    /// Clipboard form of a single note.
    pub fn to_clipboard_text(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// One image of a submission batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// Human-readable label used in logs and fallback titles. `index` is zero-based.
    pub fn label(&self, index: usize) -> String {
        match self.file_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("image {}", index + 1),
        }
    }
}

/// Media type implied by a file extension, `application/octet-stream` when unknown.
pub fn media_type_for_path(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// How the model's answer was turned into a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionOrigin {
    /// The answer matched the requested JSON schema.
    Structured,
    /// The answer could not be parsed; its raw text became the content.
    RawText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub note: Note,
    pub origin: TranscriptionOrigin,
}

/// Wire shape of a successful batch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub notes: Vec<Note>,
}
