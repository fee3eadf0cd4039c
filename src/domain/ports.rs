use crate::domain::model::{ImageUpload, Note, Transcription};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model_base_url(&self) -> &str;
    fn model_name(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout_seconds(&self) -> Option<u64>;
}

/// Turns exactly one image into exactly one note.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, image: &ImageUpload) -> Result<Transcription>;
}

/// Submits a whole batch to a transcription endpoint.
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    async fn submit_batch(&self, images: &[ImageUpload]) -> Result<Vec<Note>>;
}
