use crate::domain::model::{BatchResponse, ImageUpload};
use crate::server::AppState;
use crate::utils::error::{Result, ScribeError};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Multipart field carrying the images.
pub const IMAGE_FIELD: &str = "images";
const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `POST /api/img-to-text`
pub async fn img_to_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<BatchResponse>> {
    let mut multipart = multipart.map_err(|rejection| ScribeError::MultipartError {
        message: rejection.body_text(),
    })?;

    let images = read_images(&mut multipart).await?;
    if images.is_empty() {
        tracing::warn!("Rejected batch without images");
    }

    let notes = state.batch.run(&images).await?;
    Ok(Json(BatchResponse { notes }))
}

async fn read_images(multipart: &mut Multipart) -> Result<Vec<ImageUpload>> {
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            tracing::debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let media_type = field
            .content_type()
            .unwrap_or(DEFAULT_MEDIA_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        tracing::debug!(
            "Received {:?} ({}, {} bytes)",
            file_name,
            media_type,
            bytes.len()
        );
        images.push(ImageUpload::new(file_name, media_type, bytes.to_vec()));
    }

    Ok(images)
}

fn multipart_error(e: MultipartError) -> ScribeError {
    ScribeError::MultipartError {
        message: e.body_text(),
    }
}

impl IntoResponse for ScribeError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ScribeError::NoImages => (StatusCode::BAD_REQUEST, "No files provided"),
            other => {
                tracing::error!("❌ Error processing images: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to process images")
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
