//! Display language and localized strings.
//!
//! The display layer never holds a "current language" global; every rendering function takes a
//! [`Language`] argument instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::availability::Countdown;

/// Languages the catalog can be displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    /// BCP 47 tag, used for logging and JSON output
    pub fn tag(self) -> &'static str {
        match self {
            Language::Ja => "ja-JP",
            Language::En => "en-US",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Ja => write!(f, "ja"),
            Language::En => write!(f, "en"),
        }
    }
}

const JA: &[(&str, &str)] = &[
    ("app.title", "StreamPartnerJP"),
    ("app.subtitle", "Twitchグローバルバッジ一覧"),
    ("error.loading", "バッジの読み込みに失敗しました"),
    ("error.loading.emotes", "エモートの読み込みに失敗しました"),
    ("error.notfound", "バッジが見つかりませんでした。"),
    ("error.notfound.emotes", "エモートが見つかりませんでした。"),
    ("badge.version", "バージョン"),
    ("badge.setId", "セットID"),
    ("badge.addedDate", "追加日"),
    ("badge.title", "タイトル"),
    ("badge.variations", "バリエーション"),
    ("badge.period", "期間"),
    ("badge.howToObtain", "入手方法"),
    ("badge.requirements", "必要条件"),
    ("badge.moreInfo", "詳細情報"),
    ("sort.newest", "新しい順"),
    ("sort.oldest", "古い順"),
    ("dashboard.available", "現在入手可能なバッジ"),
    ("dashboard.available.none", "現在入手可能なバッジはありません"),
    ("dashboard.badges", "最新バッジ"),
    ("dashboard.emotes", "最新エモート"),
];

const EN: &[(&str, &str)] = &[
    ("app.title", "StreamPartnerJP"),
    ("app.subtitle", "Twitch Global Badges"),
    ("error.loading", "Failed to load badges"),
    ("error.loading.emotes", "Failed to load emotes"),
    ("error.notfound", "No badges found."),
    ("error.notfound.emotes", "No emotes found."),
    ("badge.version", "Version"),
    ("badge.setId", "Set ID"),
    ("badge.addedDate", "Added"),
    ("badge.title", "Title"),
    ("badge.variations", "Variations"),
    ("badge.period", "Period"),
    ("badge.howToObtain", "How to Obtain"),
    ("badge.requirements", "Requirements"),
    ("badge.moreInfo", "More Info"),
    ("sort.newest", "Newest first"),
    ("sort.oldest", "Oldest first"),
    ("dashboard.available", "Badges available now"),
    ("dashboard.available.none", "No badges are currently available"),
    ("dashboard.badges", "Latest badges"),
    ("dashboard.emotes", "Latest emotes"),
];

/// Look up a UI string. Unknown keys come back unchanged.
pub fn t(lang: Language, key: &str) -> &str {
    let table = match lang {
        Language::Ja => JA,
        Language::En => EN,
    };
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Render an availability countdown as a human-readable message.
pub fn countdown_message(countdown: Countdown, lang: Language) -> String {
    match lang {
        Language::Ja => match countdown {
            Countdown::AvailableNow => "現在入手可能".to_string(),
            Countdown::StartsInDays(days) => format!("{days}日後に入手可能"),
            Countdown::EndsInHours(hours) => format!("あと{hours}時間で終了"),
            Countdown::EndsToday => "本日終了".to_string(),
            Countdown::EndsTomorrow => "あと1日で終了".to_string(),
            Countdown::EndsInDays(days) => format!("あと{days}日で終了"),
            Countdown::Ended => "入手期間終了".to_string(),
            Countdown::Scheduled => "配布予定".to_string(),
            Countdown::NoInformation => "入手可能期間の情報がありません".to_string(),
        },
        Language::En => match countdown {
            Countdown::AvailableNow => "Available now".to_string(),
            Countdown::StartsInDays(1) => "Available in 1 day".to_string(),
            Countdown::StartsInDays(days) => format!("Available in {days} days"),
            Countdown::EndsInHours(1) => "Ends in 1 hour".to_string(),
            Countdown::EndsInHours(hours) => format!("Ends in {hours} hours"),
            Countdown::EndsToday => "Ends today".to_string(),
            Countdown::EndsTomorrow => "Ends in 1 day".to_string(),
            Countdown::EndsInDays(days) => format!("Ends in {days} days"),
            Countdown::Ended => "Distribution ended".to_string(),
            Countdown::Scheduled => "Distribution planned".to_string(),
            Countdown::NoInformation => "No availability information".to_string(),
        },
    }
}

/// Format a calendar date the way each locale writes it (`2025/6/28`, `6/28/2025`).
pub fn format_date(date: chrono::NaiveDate, lang: Language) -> String {
    use chrono::Datelike;
    match lang {
        Language::Ja => format!("{}/{}/{}", date.year(), date.month(), date.day()),
        Language::En => format!("{}/{}/{}", date.month(), date.day(), date.year()),
    }
}
