pub mod batch;
pub mod gemini;
pub mod prompt;

pub use crate::domain::model::{ImageUpload, Note, Transcription, TranscriptionOrigin};
pub use crate::domain::ports::{BatchSubmitter, ConfigProvider, Storage, Transcriber};
pub use crate::utils::error::Result;
