use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use super::{Resolution, SortOrder, pick_url};
use crate::models::{Emote, EmoteImages};

/// An emote with its listing position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmoteEntry {
    #[serde(flatten)]
    pub emote: Emote,
    pub original_index: usize,
    #[serde(skip)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "has_real_created_date")]
    pub has_real_timestamp: bool,
}

impl EmoteEntry {
    pub fn from_listing(emotes: Vec<Emote>) -> Vec<Self> {
        emotes
            .into_iter()
            .enumerate()
            .map(|(index, emote)| Self {
                original_index: index,
                created_date: emote.created_at,
                has_real_timestamp: emote.created_at.is_some(),
                emote,
            })
            .collect()
    }
}

/// Emotes whose name contains `query`, ignoring case. A blank query matches everything.
pub fn search_emotes(entries: &[EmoteEntry], query: &str) -> Vec<EmoteEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return entries.to_vec();
    }

    entries
        .iter()
        .filter(|entry| entry.emote.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Dated emotes first, ordered by date; the rest keep listing order whichever way we sort.
pub fn sort_emotes(entries: &mut [EmoteEntry], order: SortOrder) {
    entries.sort_by(|a, b| match (a.has_real_timestamp, b.has_real_timestamp) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => {
            let by_date = match order {
                SortOrder::Newest => b.created_date.cmp(&a.created_date),
                SortOrder::Oldest => a.created_date.cmp(&b.created_date),
            };
            by_date.then(a.original_index.cmp(&b.original_index))
        }
        (false, false) => a.original_index.cmp(&b.original_index),
    });
}

/// Search, then sort.
pub fn browse_emotes(entries: &[EmoteEntry], query: Option<&str>, order: SortOrder) -> Vec<EmoteEntry> {
    let mut found = search_emotes(entries, query.unwrap_or_default());
    sort_emotes(&mut found, order);
    found
}

impl EmoteImages {
    /// Static image url at `resolution`, falling back to smaller sizes.
    pub fn url(&self, resolution: Resolution) -> &str {
        pick_url(resolution, &self.url_1x, self.url_2x.as_deref(), self.url_4x.as_deref())
    }
}

impl Emote {
    /// The image shown on a listing card.
    pub fn card_image_url(&self) -> &str {
        self.images.url(Resolution::X2)
    }
}
