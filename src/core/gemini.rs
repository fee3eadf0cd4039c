use crate::core::prompt::{response_schema, TRANSCRIPTION_PROMPT};
use crate::core::{ConfigProvider, ImageUpload, Note, Result, Transcriber, Transcription, TranscriptionOrigin};
use crate::domain::model::{DEFAULT_NOTE_TITLE, EMPTY_TRANSCRIPTION_MARKER};
use crate::utils::error::ScribeError;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` adapter for the [`Transcriber`] port.
pub struct GeminiTranscriber {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiTranscriber {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.model_base_url().trim_end_matches('/').to_string(),
            model: config.model_name().to_string(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(image: &ImageUpload) -> Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.media_type,
                            "data": STANDARD.encode(&image.bytes)
                        }
                    },
                    { "text": TRANSCRIPTION_PROMPT }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(&self, image: &ImageUpload) -> Result<Transcription> {
        let api_key = self.api_key.as_deref().ok_or(ScribeError::MissingCredential)?;

        tracing::debug!(
            "Sending {} byte {} image to {}",
            image.bytes.len(),
            image.media_type,
            self.model
        );
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&Self::request_body(image))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Model response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScribeError::ModelError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let transcription = parse_note(&payload.text());
        if transcription.origin == TranscriptionOrigin::RawText {
            tracing::warn!("⚠️ Model answer did not match the note schema, keeping raw text");
        }
        Ok(transcription)
    }
}

/// Interprets the model's answer. Never fails: unparseable output becomes a
/// default-titled note carrying the raw text.
pub fn parse_note(text: &str) -> Transcription {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(text) {
        let title = fields.get("title").and_then(Value::as_str);
        let content = fields.get("content").and_then(Value::as_str);

        if title.is_some() || content.is_some() {
            let title = title
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_NOTE_TITLE);
            return Transcription {
                note: Note::new(title, content.unwrap_or_default()),
                origin: TranscriptionOrigin::Structured,
            };
        }
    }

    let content = if text.trim().is_empty() {
        EMPTY_TRANSCRIPTION_MARKER
    } else {
        text
    };
    Transcription {
        note: Note::new(DEFAULT_NOTE_TITLE, content),
        origin: TranscriptionOrigin::RawText,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScribeConfig;
    use httpmock::prelude::*;

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn config_for(server: &MockServer, api_key: Option<&str>) -> ScribeConfig {
        let mut config = ScribeConfig::default();
        config.model.base_url = server.base_url();
        config.model.api_key = api_key.map(str::to_string);
        config
    }

    fn model_answer(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    fn sample_image() -> ImageUpload {
        ImageUpload::new(Some("notes.png".into()), "image/png", b"hello".to_vec())
    }

    #[test]
    fn test_parse_structured_answer() {
        let t = parse_note(r#"{"title": "Groceries", "content": "- milk\n- eggs"}"#);
        assert_eq!(t.origin, TranscriptionOrigin::Structured);
        assert_eq!(t.note, Note::new("Groceries", "- milk\n- eggs"));
    }

    #[test]
    fn test_parse_missing_title_uses_default() {
        let t = parse_note(r#"{"content": "-> next step"}"#);
        assert_eq!(t.origin, TranscriptionOrigin::Structured);
        assert_eq!(t.note.title, DEFAULT_NOTE_TITLE);
        assert_eq!(t.note.content, "-> next step");
    }

    #[test]
    fn test_parse_keeps_whitespace_title_but_replaces_empty_one() {
        let blank = parse_note(r#"{"title": "  ", "content": "x"}"#);
        assert_eq!(blank.note.title, "  ");

        let empty = parse_note(r#"{"title": "", "content": "x"}"#);
        assert_eq!(empty.note.title, DEFAULT_NOTE_TITLE);
    }

    #[test]
    fn test_parse_plain_text_falls_back_to_raw() {
        let t = parse_note("Meeting notes\n- call Sam");
        assert_eq!(t.origin, TranscriptionOrigin::RawText);
        assert_eq!(t.note.title, DEFAULT_NOTE_TITLE);
        assert_eq!(t.note.content, "Meeting notes\n- call Sam");
    }

    #[test]
    fn test_parse_object_without_note_fields_is_raw() {
        let raw = r#"{"notes": []}"#;
        let t = parse_note(raw);
        assert_eq!(t.origin, TranscriptionOrigin::RawText);
        assert_eq!(t.note.content, raw);
    }

    #[test]
    fn test_parse_empty_answer_uses_failure_marker() {
        let t = parse_note("");
        assert_eq!(t.note.title, DEFAULT_NOTE_TITLE);
        assert_eq!(t.note.content, EMPTY_TRANSCRIPTION_MARKER);
    }

    #[tokio::test]
    async fn test_transcribe_sends_image_and_schema() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path(MODEL_PATH)
                .header("x-goog-api-key", "test-key")
                .body_contains("aGVsbG8=")
                .body_contains("image/png")
                .json_body_partial(
                    r#"{"generationConfig": {"responseMimeType": "application/json"}}"#,
                );
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(model_answer(r#"{"title":"Groceries","content":"- milk"}"#));
        });

        let transcriber = GeminiTranscriber::new(&config_for(&server, Some("test-key"))).unwrap();
        let result = transcriber.transcribe(&sample_image()).await.unwrap();

        api_mock.assert();
        assert_eq!(result.origin, TranscriptionOrigin::Structured);
        assert_eq!(result.note, Note::new("Groceries", "- milk"));
    }

    #[tokio::test]
    async fn test_transcribe_concatenates_text_parts() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "{\"title\":\"Split\"," },
                        { "text": "\"content\":\"answer\"}" }
                    ]}
                }]
            }));
        });

        let transcriber = GeminiTranscriber::new(&config_for(&server, Some("k"))).unwrap();
        let result = transcriber.transcribe(&sample_image()).await.unwrap();

        assert_eq!(result.note, Note::new("Split", "answer"));
    }

    #[tokio::test]
    async fn test_transcribe_without_candidates_uses_marker() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(serde_json::json!({}));
        });

        let transcriber = GeminiTranscriber::new(&config_for(&server, Some("k"))).unwrap();
        let result = transcriber.transcribe(&sample_image()).await.unwrap();

        assert_eq!(result.origin, TranscriptionOrigin::RawText);
        assert_eq!(result.note.content, EMPTY_TRANSCRIPTION_MARKER);
    }

    #[tokio::test]
    async fn test_transcribe_model_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(429).body("quota exceeded");
        });

        let transcriber = GeminiTranscriber::new(&config_for(&server, Some("k"))).unwrap();
        let err = transcriber.transcribe(&sample_image()).await.unwrap_err();

        api_mock.assert();
        match err {
            ScribeError::ModelError { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transcribe_without_api_key_makes_no_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(200).json_body(model_answer("{}"));
        });

        let transcriber = GeminiTranscriber::new(&config_for(&server, None)).unwrap();
        let err = transcriber.transcribe(&sample_image()).await.unwrap_err();

        assert!(matches!(err, ScribeError::MissingCredential));
        api_mock.assert_hits(0);
    }
}
