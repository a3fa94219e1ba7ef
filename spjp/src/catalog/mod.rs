//! Display-side logic over the fetched listings: enrichment, ordering, search, titles and
//! image selection.
//!
//! Everything here is pure. Listings come in as owned `Vec`s from a
//! [`FetchCatalog`](crate::client::FetchCatalog) and the caller decides how to render the result.

pub mod badges;
pub mod emotes;
pub mod obtain;

pub use badges::{
    AvailableBadge, BadgeDetail, BadgeEntry, available_now, estimate_created_date, extract_badge_number,
    find_badge_detail, format_badge_title, period_label, sort_badges,
};
pub use emotes::{EmoteEntry, browse_emotes, search_emotes, sort_emotes};
pub use obtain::{ObtainGuide, ObtainMethod};

use serde::{Deserialize, Serialize};

/// Listing order by added date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    /// i18n key for the order's label.
    pub fn label_key(self) -> &'static str {
        match self {
            SortOrder::Newest => "sort.newest",
            SortOrder::Oldest => "sort.oldest",
        }
    }
}

/// Image size as Twitch publishes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Resolution {
    #[value(name = "1x")]
    #[serde(rename = "1x")]
    X1,
    #[value(name = "2x")]
    #[serde(rename = "2x")]
    X2,
    #[default]
    #[value(name = "4x")]
    #[serde(rename = "4x")]
    X4,
}

/// Pick the url for `resolution`, falling back to the next smaller size that exists.
/// The 1x url is always present.
pub(crate) fn pick_url<'a>(
    resolution: Resolution,
    url_1x: &'a str,
    url_2x: Option<&'a str>,
    url_4x: Option<&'a str>,
) -> &'a str {
    match resolution {
        Resolution::X1 => url_1x,
        Resolution::X2 => url_2x.unwrap_or(url_1x),
        Resolution::X4 => url_4x.or(url_2x).unwrap_or(url_1x),
    }
}
