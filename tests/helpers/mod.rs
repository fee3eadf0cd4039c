#![allow(dead_code)]

use async_trait::async_trait;
use note_scribe::core::batch::BatchTranscriber;
use note_scribe::core::{Transcriber, Transcription, TranscriptionOrigin};
use note_scribe::server::{router, AppState};
use note_scribe::utils::error::{Result, ScribeError};
use note_scribe::{ImageUpload, Note};
use reqwest::multipart::{Form, Part};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Titles each note with the uploaded file name; fails for names in `failing`.
#[derive(Clone, Default)]
pub struct EchoTranscriber {
    pub failing: Vec<String>,
    pub calls: Arc<AtomicUsize>,
}

impl EchoTranscriber {
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for EchoTranscriber {
    async fn transcribe(&self, image: &ImageUpload) -> Result<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = image.file_name.clone().unwrap_or_default();
        if self.failing.contains(&name) {
            return Err(ScribeError::MissingCredential);
        }
        Ok(Transcription {
            note: Note::new(name, format!("{} {}", image.media_type, image.bytes.len())),
            origin: TranscriptionOrigin::Structured,
        })
    }
}

/// Starts the endpoint on an ephemeral port and returns its base URL.
pub async fn spawn_app<T: Transcriber + 'static>(transcriber: T) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(BatchTranscriber::new(transcriber)), 1024 * 1024);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn image_form(names: &[&str]) -> Form {
    names.iter().fold(Form::new(), |form, name| {
        let part = Part::bytes(name.as_bytes().to_vec())
            .file_name(name.to_string())
            .mime_str("image/png")
            .unwrap();
        form.part("images", part)
    })
}
