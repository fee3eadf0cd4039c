use crate::domain::model::{BatchResponse, ImageUpload, Note};
use crate::domain::ports::BatchSubmitter;
use crate::server::handlers::IMAGE_FIELD;
use crate::server::TRANSCRIBE_ROUTE;
use crate::utils::error::{Result, ScribeError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Posts batches to a running note-scribe server.
pub struct NotesClient {
    client: Client,
    endpoint: String,
}

impl NotesClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", server_url.trim_end_matches('/'), TRANSCRIBE_ROUTE),
        }
    }

    fn build_form(images: &[ImageUpload]) -> Result<Form> {
        let mut form = Form::new();
        for image in images {
            let mut part = Part::bytes(image.bytes.clone()).mime_str(&image.media_type)?;
            if let Some(name) = &image.file_name {
                part = part.file_name(name.clone());
            }
            form = form.part(IMAGE_FIELD, part);
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl BatchSubmitter for NotesClient {
    async fn submit_batch(&self, images: &[ImageUpload]) -> Result<Vec<Note>> {
        tracing::debug!("Posting {} image(s) to {}", images.len(), self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::build_form(images)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScribeError::InvalidResponse {
                message: format!("server answered {}", status),
            });
        }

        let body: serde_json::Value = response.json().await?;
        if !body.get("notes").is_some_and(serde_json::Value::is_array) {
            return Err(ScribeError::InvalidResponse {
                message: "response has no notes array".to_string(),
            });
        }

        let batch: BatchResponse = serde_json::from_value(body)?;
        Ok(batch.notes)
    }
}
