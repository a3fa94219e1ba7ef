//! # spjp: Twitch global badge and emote browser
//!
//! `spjp` lists Twitch's global chat badges and emotes as served by a StreamPartnerJP badge
//! server, and tells you which badges can be obtained right now. Its core is a small, pure
//! classifier that turns a badge's configured availability window into a status and a
//! human-readable countdown ("ends in 12 hours", "available in 3 days") in Japanese or English.
//!
//! ## Overview
//!
//! Badge availability is not part of Twitch's API. It lives in a schedule table keyed by badge
//! `set_id`: a badge is either distributed on an ongoing basis, inside a fixed time-limited window,
//! or announced for the future. A default table is compiled in and can be extended or corrected
//! from a YAML file without rebuilding.
//!
//! Listings are fetched from the badge server's `/api/badges` and `/api/emotes` endpoints. Everything
//! after the fetch (date estimation for badges without timestamps, ordering, search, titles) is
//! pure and lives in [`catalog`], together with a built-in guide to how each badge is obtained.
//!
//! ## Core Components
//!
//! The **classifier** ([`availability`]) is synchronous and stateless: give it a window and an
//! instant and it returns an [`AvailabilityResult`]. The [`Schedule`] table owns the windows and
//! rejects invalid timestamps when it is loaded, so classification itself never fails.
//!
//! The **client** ([`client`]) fetches listings through the [`FetchCatalog`] trait, with an http
//! implementation on `reqwest` and a static one for tests and offline use.
//!
//! The **application** ([`app`]) ties configuration, schedule and client together and renders each
//! command's result as text or JSON. Strings are localized through [`i18n`]; the display language
//! is always passed explicitly.
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use spjp::{Language, Schedule};
//!
//! let schedule = Schedule::builtin().unwrap();
//! let now = Utc.with_ymd_and_hms(2025, 6, 29, 20, 0, 0).unwrap();
//! let result = schedule.classify("legendus", now);
//!
//! assert!(result.is_available);
//! assert_eq!(result.message(Language::En), "Ends in 4 hours");
//! ```

pub mod app;
pub mod availability;
pub mod catalog;
pub mod client;
pub mod config;
pub mod errors;
pub mod i18n;
pub mod models;
pub mod telemetry;

pub use app::{Application, Output};
pub use availability::{AvailabilityResult, AvailabilityStatus, AvailabilityWindow, Countdown, Schedule, classify};
pub use client::{CatalogClient, FetchCatalog, StaticCatalog};
pub use config::Config;
pub use errors::{Error, Result};
pub use i18n::Language;
