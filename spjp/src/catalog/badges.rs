use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use super::{Resolution, SortOrder, pick_url};
use crate::availability::{AvailabilityResult, AvailabilityStatus, Schedule};
use crate::errors::{Error, Result};
use crate::i18n::{self, Language};
use crate::models::{BadgeSet, BadgeVersion};

/// Rough launch dates of long-standing badges, for sets the server has no timestamp for.
/// Searched in order, so partial matches resolve to the first key that fits.
const KNOWN_BADGE_DATES: &[(&str, &str)] = &[
    ("broadcaster", "2011-06-01"),
    ("moderator", "2011-06-01"),
    ("staff", "2011-06-01"),
    ("admin", "2011-06-01"),
    ("global-mod", "2011-06-01"),
    ("partner", "2011-06-01"),
    ("turbo", "2013-08-01"),
    ("subscriber", "2011-06-01"),
    ("premium", "2019-05-01"),
    ("bits", "2016-06-01"),
    ("bits-leader", "2017-03-01"),
    ("sub-gifter", "2017-07-01"),
    ("sub-gift-leader", "2018-02-01"),
    ("founder", "2018-08-01"),
    ("vip", "2018-07-01"),
    ("artist-badge", "2019-04-01"),
    ("hype-train", "2019-11-01"),
    ("predictions", "2021-03-01"),
    ("moments", "2017-12-01"),
    ("clip", "2016-05-01"),
    ("prime", "2016-09-01"),
    ("glhf-pledge", "2020-10-01"),
    ("glitchcon2020", "2020-11-01"),
    ("twitchcon", "2015-09-01"),
    ("drops-enabled", "2017-11-01"),
    ("game-awards", "2019-12-01"),
    ("charity", "2019-06-01"),
    ("no_audio", "2014-08-01"),
    ("no_video", "2014-08-01"),
    ("anonymous-cheerer", "2018-06-01"),
    ("verified", "2021-07-01"),
    ("twitchbot", "2019-10-01"),
    ("game-developer", "2020-05-01"),
    ("1979-revolution", "2016-04-01"),
    ("60-seconds", "2015-05-01"),
    ("a-hat-in-time", "2017-10-01"),
    ("among-us", "2018-11-01"),
    ("apex-legends", "2019-02-01"),
    ("battlefield", "2016-10-01"),
    ("call-of-duty", "2019-10-01"),
    ("cyberpunk-2077", "2020-12-01"),
    ("dota", "2013-07-01"),
    ("fallout-76", "2018-11-01"),
    ("fortnite", "2017-07-01"),
    ("gta-v", "2013-09-01"),
    ("league-of-legends", "2012-10-01"),
    ("minecraft", "2011-11-01"),
    ("overwatch", "2016-05-01"),
    ("pubg", "2017-03-01"),
    ("rocket-league", "2015-07-01"),
    ("subnautica", "2018-01-01"),
    ("the-witcher", "2019-12-01"),
    ("valorant", "2020-06-01"),
    ("warcraft", "2004-11-01"),
    ("world-of-warcraft", "2004-11-01"),
];

/// Japanese display names. Anything not listed is shown with the English rendering.
const JA_TITLES: &[(&str, &str)] = &[
    ("broadcaster", "配信者"),
    ("moderator", "モデレーター"),
    ("vip", "VIP"),
    ("subscriber", "サブスクライバー"),
    ("sub-gifter", "サブギフター"),
    ("sub-gift-leader", "サブギフトリーダー"),
    ("founder", "ファウンダー"),
    ("artist-badge", "アーティスト"),
    ("bits", "ビッツ"),
    ("bits-leader", "ビッツリーダー"),
    ("bits-charity", "チャリティビッツ"),
    ("anonymous-cheerer", "匿名チアー"),
    ("turbo", "Turbo"),
    ("prime", "Prime Gaming"),
    ("premium", "プレミアム"),
    ("moments", "モーメント"),
    ("clip", "クリップ"),
    ("predictions", "予想"),
    ("hype-train", "ハイプトレイン"),
    ("staff", "スタッフ"),
    ("admin", "管理者"),
    ("global-mod", "グローバルモデレーター"),
    ("partner", "パートナー"),
    ("verified", "認証済み"),
    ("twitchbot", "Twitchボット"),
    ("game-developer", "ゲーム開発者"),
    ("no_audio", "音声なし"),
    ("no_video", "映像なし"),
    ("glhf-pledge", "GLHF誓約"),
    ("glitchcon2020", "GlitchCon 2020"),
    ("twitchcon", "TwitchCon"),
    ("drops-enabled", "ドロップ有効"),
    ("game-awards", "ゲームアワード"),
    ("charity", "チャリティ"),
    ("60-seconds", "60秒"),
];

/// Display title for a badge set id.
///
/// English capitalizes each `_`-separated word (`no_audio` → `No Audio`). Japanese uses the
/// translation table and falls back to the English rendering.
pub fn format_badge_title(set_id: &str, lang: Language) -> String {
    if lang == Language::Ja
        && let Some((_, title)) = JA_TITLES.iter().find(|(key, _)| *key == set_id)
    {
        return (*title).to_string();
    }

    set_id.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The number after a trailing `_`, e.g. `60-seconds_1` → 1. Zero when there is none.
pub fn extract_badge_number(set_id: &str) -> u64 {
    set_id
        .rsplit_once('_')
        .map(|(_, tail)| tail)
        .filter(|tail| !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|tail| tail.parse().ok())
        .unwrap_or(0)
}

/// Best guess at when a badge without a real timestamp was added.
///
/// Tries, in order: an exact entry in the known-dates table; a partial match against it; a
/// four-digit year between 2011 and 2025 anywhere in the id (January 1st of that year); and
/// finally a date derived from the listing position, one week after 2011-06-01 per ten badges.
pub fn estimate_created_date(set_id: &str, index: usize) -> Option<NaiveDate> {
    let prefix = set_id.split('_').next().unwrap_or(set_id);

    KNOWN_BADGE_DATES
        .iter()
        .find(|(key, _)| *key == set_id)
        .or_else(|| {
            KNOWN_BADGE_DATES
                .iter()
                .find(|(key, _)| set_id.contains(key) || key.contains(prefix))
        })
        .and_then(|(_, date)| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .or_else(|| {
            first_four_digits(set_id)
                .filter(|year| (2011..=2025).contains(year))
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        })
        .or_else(|| {
            let weeks = (index / 10) as u64;
            NaiveDate::from_ymd_opt(2011, 6, 1)?.checked_add_days(Days::new(weeks * 7))
        })
}

/// The leftmost run of four ascii digits in `s`, as a number.
fn first_four_digits(s: &str) -> Option<i32> {
    s.as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(w).ok())
        .and_then(|digits| digits.parse().ok())
}

/// A badge set with the bookkeeping the listing needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeEntry {
    #[serde(flatten)]
    pub badge: BadgeSet,
    /// Position in the server's listing
    pub original_index: usize,
    pub badge_number: u64,
    /// Real added instant, or midnight UTC of the estimated date
    pub created_date: Option<DateTime<Utc>>,
    #[serde(rename = "has_real_created_date")]
    pub has_real_timestamp: bool,
}

impl BadgeEntry {
    /// Enrich a listing, in the server's order.
    pub fn from_listing(badges: Vec<BadgeSet>) -> Vec<Self> {
        badges
            .into_iter()
            .enumerate()
            .map(|(index, badge)| {
                let real = badge.created_at.filter(|_| badge.has_real_timestamp);

                let (created_date, has_real_timestamp) = match real {
                    Some(created_at) => (Some(created_at), true),
                    None => (
                        estimate_created_date(&badge.set_id, index).map(|date| date.and_time(NaiveTime::MIN).and_utc()),
                        false,
                    ),
                };

                Self {
                    badge_number: extract_badge_number(&badge.set_id),
                    original_index: index,
                    created_date,
                    has_real_timestamp,
                    badge,
                }
            })
            .collect()
    }

    pub fn title(&self, lang: Language) -> String {
        format_badge_title(&self.badge.set_id, lang)
    }

    /// The added date, only when it is known rather than estimated.
    pub fn added_date(&self) -> Option<NaiveDate> {
        self.created_date
            .filter(|_| self.has_real_timestamp)
            .map(|created| created.date_naive())
    }
}

/// Sort by added instant. Undated entries go last; among themselves they keep listing order for
/// [`SortOrder::Newest`] and reverse it for [`SortOrder::Oldest`].
pub fn sort_badges(entries: &mut [BadgeEntry], order: SortOrder) {
    entries.sort_by(|a, b| match (a.created_date, b.created_date) {
        (Some(x), Some(y)) => {
            let by_date = match order {
                SortOrder::Newest => y.cmp(&x),
                SortOrder::Oldest => x.cmp(&y),
            };
            by_date.then(a.original_index.cmp(&b.original_index))
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match order {
            SortOrder::Newest => a.original_index.cmp(&b.original_index),
            SortOrder::Oldest => b.original_index.cmp(&a.original_index),
        },
    });
}

impl BadgeVersion {
    /// Image url at `resolution`, falling back to smaller sizes.
    pub fn image_url(&self, resolution: Resolution) -> &str {
        pick_url(
            resolution,
            &self.image_url_1x,
            self.image_url_2x.as_deref(),
            self.image_url_4x.as_deref(),
        )
    }

    /// Largest published image.
    pub fn best_image_url(&self) -> &str {
        self.image_url(Resolution::X4)
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// One badge set focused on a single version.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeDetail<'a> {
    pub set: &'a BadgeSet,
    pub version: &'a BadgeVersion,
    /// All versions, when there is more than one to choose from
    pub variations: Vec<&'a BadgeVersion>,
}

/// Find `set_id` in the listing and pick `version`, or the first version when that id is
/// absent or not given.
pub fn find_badge_detail<'a>(badges: &'a [BadgeSet], set_id: &str, version: Option<&str>) -> Result<BadgeDetail<'a>> {
    let set = badges
        .iter()
        .find(|badge| badge.set_id == set_id)
        .ok_or_else(|| Error::NotFound {
            resource: "Badge".to_string(),
            id: set_id.to_string(),
        })?;

    let selected = version
        .and_then(|id| set.versions.iter().find(|v| v.id == id))
        .or_else(|| set.versions.first())
        .ok_or_else(|| Error::NotFound {
            resource: "Badge version".to_string(),
            id: format!("{set_id}/{}", version.unwrap_or("*")),
        })?;

    let variations = if set.versions.len() > 1 {
        set.versions.iter().collect()
    } else {
        Vec::new()
    };

    Ok(BadgeDetail {
        set,
        version: selected,
        variations,
    })
}

/// A badge that can be obtained right now.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableBadge<'a> {
    pub badge: &'a BadgeSet,
    pub availability: AvailabilityResult,
}

/// Badges obtainable at `now`: time-limited ones first, soonest to end, then ongoing ones in
/// listing order.
pub fn available_now<'a>(badges: &'a [BadgeSet], schedule: &Schedule, now: DateTime<Utc>) -> Vec<AvailableBadge<'a>> {
    let mut available: Vec<_> = badges
        .iter()
        .map(|badge| AvailableBadge {
            badge,
            availability: schedule.classify(&badge.set_id, now),
        })
        .filter(|entry| entry.availability.is_available)
        .collect();

    // Stable, so ties keep listing order
    available.sort_by_key(|entry| match entry.availability.status {
        AvailabilityStatus::Limited => (0, entry.availability.end_date),
        _ => (1, None),
    });

    available
}

/// `start ~ end` for windows with both dates.
pub fn period_label(result: &AvailabilityResult, lang: Language) -> Option<String> {
    let (start, end) = result.period()?;
    Some(format!(
        "{} ~ {}",
        i18n::format_date(start.date_naive(), lang),
        i18n::format_date(end.date_naive(), lang)
    ))
}
