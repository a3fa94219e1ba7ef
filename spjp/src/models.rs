//! Wire types for the badge server's JSON API.
//!
//! `/api/badges` and `/api/emotes` both answer `{ "data": [...] }` on success. When the server
//! cannot reach Twitch it may still answer with `{ "error": "..." }`, sometimes with a 200 status,
//! which is why [`ApiEnvelope`] accepts either shape. Fields we do not use are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope shared by both listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One global badge set as listed by `/api/badges`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeSet {
    pub set_id: String,
    #[serde(default)]
    pub versions: Vec<BadgeVersion>,
    /// When the badge was added to Twitch, if the server knows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Whether `created_at` is an exact date rather than a guess
    #[serde(default)]
    pub has_real_timestamp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeVersion {
    pub id: String,
    pub image_url_1x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_2x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_4x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_url: Option<String>,
}

/// One global emote as listed by `/api/emotes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emote {
    pub id: String,
    pub name: String,
    pub images: EmoteImages,
    #[serde(default)]
    pub format: Vec<String>,
    #[serde(default)]
    pub scale: Vec<String>,
    #[serde(default)]
    pub theme_mode: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub prefer_animated: bool,
}

impl Emote {
    /// Whether Twitch publishes an animated rendition of this emote.
    pub fn is_animated(&self) -> bool {
        self.format.iter().any(|f| f == "animated")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmoteImages {
    pub url_1x: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_2x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_4x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated_url_1x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated_url_2x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated_url_4x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_url_1x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_url_2x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_url_4x: Option<String>,
}
