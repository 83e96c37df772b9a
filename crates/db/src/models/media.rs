//! Media entity models and DTOs.

use serde::{Deserialize, Serialize};
use shopkit_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// Kind of a media asset, stored as the `media_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "media_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
    Other,
}

impl MediaType {
    /// Detect the media kind from a file URL's extension.
    pub fn from_url(file_url: &str) -> Self {
        let extension = file_url
            .split('?')
            .next()
            .unwrap_or(file_url)
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        match extension.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" | "bmp" | "ico" => Self::Image,
            "mp4" | "webm" | "mov" | "avi" | "wmv" | "flv" | "mkv" => Self::Video,
            "mp3" | "wav" | "ogg" | "m4a" | "flac" | "aac" => Self::Audio,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "txt" => Self::Document,
            _ => Self::Other,
        }
    }
}

/// Extract the trailing file name from a URL, used when the caller does not
/// name the asset explicitly.
pub fn file_name_from_url(file_url: &str) -> String {
    file_url
        .split('?')
        .next()
        .unwrap_or(file_url)
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// A row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub file_name: String,
    pub file_url: String,
    pub media_type: MediaType,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub alt_text: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    pub product_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a media record from an already-uploaded object URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMedia {
    #[validate(length(min = 1, max = 500))]
    pub file_url: String,
    #[validate(length(min = 1, max = 255))]
    pub file_name: Option<String>,
    pub media_type: Option<MediaType>,
    pub mime_type: Option<String>,
    pub file_size: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub alt_text: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub product_id: Option<DbId>,
}

/// DTO for updating an existing media record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMedia {
    #[validate(length(min = 1, max = 255))]
    pub file_name: Option<String>,
    pub alt_text: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub product_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Query parameters for media listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaFilterParams {
    pub media_type: Option<MediaType>,
    pub product_id: Option<DbId>,
    pub search: Option<String>,
}
