//! Command execution: fetch, shape with [`catalog`](crate::catalog), render as text or JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::availability::{AvailabilityResult, AvailabilityStatus, Schedule};
use crate::catalog::{
    self, BadgeEntry, EmoteEntry, ObtainGuide, ObtainMethod, Resolution, SortOrder, available_now, browse_emotes,
    find_badge_detail, sort_badges,
};
use crate::client::{CatalogClient, FetchCatalog};
use crate::config::{Command, Config};
use crate::errors::{Error, Result};
use crate::i18n::{Language, format_date, t};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

pub struct Application {
    config: Config,
    schedule: Schedule,
    guide: ObtainGuide,
    catalog: Arc<dyn FetchCatalog>,
}

impl Application {
    /// Load the schedule table and obtain guide, and build an http catalog client from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let schedule = Schedule::load(config.schedule_file.as_deref())?;
        let guide = ObtainGuide::builtin()?;
        let catalog = CatalogClient::from_config(&config)?;
        info!("Using badge server at {}", catalog.base_url());
        Ok(Self::with_catalog(config, schedule, guide, Arc::new(catalog)))
    }

    pub fn with_catalog(
        config: Config,
        schedule: Schedule,
        guide: ObtainGuide,
        catalog: Arc<dyn FetchCatalog>,
    ) -> Self {
        Self {
            config,
            schedule,
            guide,
            catalog,
        }
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    /// Run `command` as of `now` and return what should be printed.
    #[instrument(skip(self, now), fields(lang = %self.config.language))]
    pub async fn run(&self, command: &Command, output: Output, now: DateTime<Utc>) -> Result<String> {
        match command {
            Command::Badges { sort } => self.badges(*sort, output, now).await,
            Command::Badge { set_id, version } => self.badge(set_id, version.as_deref(), output, now).await,
            Command::Emotes { search, sort } => self.emotes(search.as_deref(), *sort, output).await,
            Command::Availability { set_id, at } => self.availability(set_id, at.unwrap_or(now), output),
            Command::Dashboard => self.dashboard(output, now).await,
        }
    }

    fn badge_row(&self, entry: &BadgeEntry, now: DateTime<Utc>) -> BadgeRow {
        let lang = self.config.language;
        let availability = self.schedule.classify(&entry.badge.set_id, now);
        BadgeRow {
            set_id: entry.badge.set_id.clone(),
            title: entry.title(lang),
            badge_number: entry.badge_number,
            added_date: entry.added_date(),
            image_url: entry.badge.versions.first().map(|v| v.best_image_url().to_string()),
            versions: entry.badge.versions.len(),
            message: (availability.status != AvailabilityStatus::Unknown).then(|| availability.message(lang)),
            style: availability.status.css_class(),
            availability,
        }
    }

    fn render_badge_rows(&self, rows: &[BadgeRow], lines: &mut Vec<String>) {
        let lang = self.config.language;
        for row in rows {
            let mut line = format!("{}  [{}]", row.title, row.set_id);
            if let Some(date) = row.added_date {
                line.push_str(&format!("  {}: {}", t(lang, "badge.addedDate"), format_date(date, lang)));
            }
            if let Some(message) = &row.message {
                line.push_str(&format!("  ({message})"));
            }
            lines.push(line);
        }
    }

    async fn badges(&self, sort: SortOrder, output: Output, now: DateTime<Utc>) -> Result<String> {
        let mut entries = BadgeEntry::from_listing(self.catalog.fetch_badges().await?);
        sort_badges(&mut entries, sort);
        debug!("Listing {} badges, {:?}", entries.len(), sort);

        let rows: Vec<_> = entries.iter().map(|entry| self.badge_row(entry, now)).collect();
        if output == Output::Json {
            return to_json(&rows);
        }

        let lang = self.config.language;
        if rows.is_empty() {
            return Ok(t(lang, "error.notfound").to_string());
        }

        let mut lines = vec![format!("{} ({})", t(lang, "app.subtitle"), t(lang, sort.label_key()))];
        self.render_badge_rows(&rows, &mut lines);
        Ok(lines.join("\n"))
    }

    async fn badge(&self, set_id: &str, version: Option<&str>, output: Output, now: DateTime<Utc>) -> Result<String> {
        let lang = self.config.language;
        let badges = self.catalog.fetch_badges().await?;
        let entries = BadgeEntry::from_listing(badges.clone());
        let detail = find_badge_detail(&badges, set_id, version)?;
        let added_date = entries
            .iter()
            .find(|entry| entry.badge.set_id == set_id)
            .and_then(BadgeEntry::added_date);

        let availability = self.schedule.classify(set_id, now);
        let period = catalog::period_label(&availability, lang);

        let view = BadgeDetailView {
            set_id: detail.set.set_id.clone(),
            title: catalog::format_badge_title(set_id, lang),
            version: detail.version.id.clone(),
            version_title: detail.version.title.clone(),
            description: detail.version.description.clone(),
            images: [Resolution::X1, Resolution::X2, Resolution::X4]
                .into_iter()
                .map(|res| detail.version.image_url(res).to_string())
                .collect(),
            added_date,
            variations: detail.variations.iter().map(|v| v.id.clone()).collect(),
            message: availability.message(lang),
            period,
            availability,
            how_to_obtain: self.guide.method(set_id, lang).clone(),
        };

        if output == Output::Json {
            return to_json(&view);
        }

        let mut lines = vec![
            view.title.clone(),
            format!("{}: {}", t(lang, "badge.setId"), view.set_id),
            format!("{}: {}", t(lang, "badge.version"), view.version),
        ];
        if let Some(title) = &view.version_title {
            lines.push(format!("{}: {}", t(lang, "badge.title"), title));
        }
        if let Some(description) = &view.description {
            lines.push(description.clone());
        }
        if let Some(date) = view.added_date {
            lines.push(format!("{}: {}", t(lang, "badge.addedDate"), format_date(date, lang)));
        }
        lines.push(view.message.clone());
        if let Some(description) = &view.availability.description {
            lines.push(format!("  {description}"));
        }
        if let Some(period) = &view.period {
            lines.push(format!("{}: {}", t(lang, "badge.period"), period));
        }
        if !view.variations.is_empty() {
            lines.push(format!("{}: {}", t(lang, "badge.variations"), view.variations.join(", ")));
        }

        let obtain = &view.how_to_obtain;
        lines.push(format!("{}: {}", t(lang, "badge.howToObtain"), obtain.title));
        lines.push(format!("  {}", obtain.description));
        if !obtain.requirements.is_empty() {
            lines.push(format!("  {}:", t(lang, "badge.requirements")));
            lines.extend(obtain.requirements.iter().map(|req| format!("  - {req}")));
        }
        if let Some(url) = &obtain.url {
            lines.push(format!("  {}: {}", t(lang, "badge.moreInfo"), url));
        }

        lines.extend(view.images.iter().cloned());
        Ok(lines.join("\n"))
    }

    async fn emotes(&self, search: Option<&str>, sort: SortOrder, output: Output) -> Result<String> {
        let entries = EmoteEntry::from_listing(self.catalog.fetch_emotes().await?);
        let found = browse_emotes(&entries, search, sort);
        debug!("{} of {} emotes match", found.len(), entries.len());

        if output == Output::Json {
            return to_json(&found);
        }

        let lang = self.config.language;
        if found.is_empty() {
            return Ok(t(lang, "error.notfound.emotes").to_string());
        }

        let lines: Vec<_> = found.iter().map(|entry| emote_line(entry, lang)).collect();
        Ok(lines.join("\n"))
    }

    fn availability(&self, set_id: &str, at: DateTime<Utc>, output: Output) -> Result<String> {
        let lang = self.config.language;
        let availability = self.schedule.classify(set_id, at);

        if output == Output::Json {
            return to_json(&AvailabilityView {
                set_id: set_id.to_string(),
                at,
                message: availability.message(lang),
                period: catalog::period_label(&availability, lang),
                availability,
            });
        }

        let mut lines = vec![format!("{}: {}", set_id, availability.message(lang))];
        if let Some(description) = &availability.description {
            lines.push(format!("  {description}"));
        }
        if let Some(period) = catalog::period_label(&availability, lang) {
            lines.push(format!("  {}: {}", t(lang, "badge.period"), period));
        }
        Ok(lines.join("\n"))
    }

    async fn dashboard(&self, output: Output, now: DateTime<Utc>) -> Result<String> {
        let lang = self.config.language;
        let (badges, emotes) = match self.catalog.fetch_all().await {
            (Err(badges), Err(emotes)) => {
                emotes.log();
                return Err(badges);
            }
            fetched => fetched,
        };

        let (available, latest_badges) = match badges {
            Ok(badges) => {
                let available: Vec<_> = available_now(&badges, &self.schedule, now)
                    .into_iter()
                    .map(|entry| AvailableView {
                        set_id: entry.badge.set_id.clone(),
                        title: catalog::format_badge_title(&entry.badge.set_id, lang),
                        message: entry.availability.message(lang),
                        availability: entry.availability,
                    })
                    .collect();

                let mut entries = BadgeEntry::from_listing(badges);
                sort_badges(&mut entries, SortOrder::Newest);
                let latest: Vec<_> = entries
                    .iter()
                    .take(self.config.dashboard.latest_badges)
                    .map(|entry| self.badge_row(entry, now))
                    .collect();
                (Section::Loaded(available), Section::Loaded(latest))
            }
            Err(e) => {
                let error = load_failure(&e, lang, "error.loading");
                (Section::failed(error.clone()), Section::failed(error))
            }
        };

        let latest_emotes = match emotes {
            Ok(emotes) => Section::Loaded(
                browse_emotes(&EmoteEntry::from_listing(emotes), None, SortOrder::Newest)
                    .into_iter()
                    .take(self.config.dashboard.latest_emotes)
                    .collect(),
            ),
            Err(e) => Section::failed(load_failure(&e, lang, "error.loading.emotes")),
        };

        if output == Output::Json {
            return to_json(&DashboardView {
                available,
                latest_badges,
                latest_emotes,
            });
        }

        let mut lines = vec![format!("== {} ==", t(lang, "dashboard.available"))];
        match &available {
            Section::Loaded(available) if available.is_empty() => {
                lines.push(t(lang, "dashboard.available.none").to_string());
            }
            Section::Loaded(available) => {
                for entry in available {
                    lines.push(format!("{}  [{}]  ({})", entry.title, entry.set_id, entry.message));
                }
            }
            Section::Failed { error } => lines.push(error.clone()),
        }

        lines.push(String::new());
        lines.push(format!("== {} ==", t(lang, "dashboard.badges")));
        match &latest_badges {
            Section::Loaded(rows) => self.render_badge_rows(rows, &mut lines),
            Section::Failed { error } => lines.push(error.clone()),
        }

        lines.push(String::new());
        lines.push(format!("== {} ==", t(lang, "dashboard.emotes")));
        match &latest_emotes {
            Section::Loaded(found) => lines.extend(found.iter().map(|entry| emote_line(entry, lang))),
            Section::Failed { error } => lines.push(error.clone()),
        }

        Ok(lines.join("\n"))
    }
}

/// Log a failed listing and phrase it for the section that could not be shown.
fn load_failure(error: &Error, lang: Language, key: &str) -> String {
    error.log();
    format!("{}: {}", t(lang, key), error.user_message())
}

fn emote_line(entry: &EmoteEntry, lang: Language) -> String {
    let mut line = format!("{}  {}", entry.emote.name, entry.emote.card_image_url());
    if let Some(created) = entry.created_date {
        line.push_str(&format!(
            "  {}: {}",
            t(lang, "badge.addedDate"),
            format_date(created.date_naive(), lang)
        ));
    }
    line
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Other(e.into()))
}

#[derive(Debug, Serialize)]
struct BadgeRow {
    set_id: String,
    title: String,
    badge_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    added_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    versions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'static str>,
    availability: AvailabilityResult,
}

#[derive(Debug, Serialize)]
struct BadgeDetailView {
    set_id: String,
    title: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    added_date: Option<NaiveDate>,
    variations: Vec<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<String>,
    availability: AvailabilityResult,
    how_to_obtain: ObtainMethod,
}

#[derive(Debug, Serialize)]
struct AvailabilityView {
    set_id: String,
    at: DateTime<Utc>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<String>,
    availability: AvailabilityResult,
}

#[derive(Debug, Serialize)]
struct AvailableView {
    set_id: String,
    title: String,
    message: String,
    availability: AvailabilityResult,
}

/// One dashboard section: its rows, or why they could not be loaded.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Section<T> {
    Loaded(T),
    Failed { error: String },
}

impl<T> Section<T> {
    fn failed(error: String) -> Self {
        Section::Failed { error }
    }
}

#[derive(Debug, Serialize)]
struct DashboardView {
    available: Section<Vec<AvailableView>>,
    latest_badges: Section<Vec<BadgeRow>>,
    latest_emotes: Section<Vec<EmoteEntry>>,
}
