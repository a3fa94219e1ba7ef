//! How each badge is obtained.
//!
//! The guide ships built in (`obtain.yaml` next to this file), keyed by badge `set_id`, with one
//! text per display language. Badges without an entry get the `default` text.

use figment::{
    Figment,
    providers::{Format, Yaml},
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::i18n::Language;

const BUILTIN_GUIDE: &str = include_str!("obtain.yaml");

static BUILTIN: Lazy<std::result::Result<ObtainGuide, String>> =
    Lazy::new(|| ObtainGuide::parse(BUILTIN_GUIDE).map_err(|e| e.to_string()));

/// Obtain instructions in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObtainMethod {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Where to read more
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocalizedMethod {
    ja: ObtainMethod,
    en: ObtainMethod,
}

impl LocalizedMethod {
    fn get(&self, lang: Language) -> &ObtainMethod {
        match lang {
            Language::Ja => &self.ja,
            Language::En => &self.en,
        }
    }
}

/// Lookup table from badge id to obtain instructions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObtainGuide {
    default: LocalizedMethod,
    #[serde(default)]
    badges: BTreeMap<String, LocalizedMethod>,
}

impl ObtainGuide {
    /// The guide compiled into the binary.
    pub fn builtin() -> Result<Self> {
        BUILTIN.clone().map_err(|message| Error::Config { message })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml).map_err(|e| Error::Config {
            message: format!("Failed to parse obtain guide: {e}"),
        })
    }

    fn parse(yaml: &str) -> std::result::Result<Self, figment::Error> {
        Figment::from(Yaml::string(yaml)).extract()
    }

    /// Instructions for `set_id`, or the default text when the badge has no entry.
    pub fn method(&self, set_id: &str, lang: Language) -> &ObtainMethod {
        self.badges.get(set_id).unwrap_or(&self.default).get(lang)
    }

    /// Whether `set_id` has its own entry.
    pub fn contains(&self, set_id: &str) -> bool {
        self.badges.contains_key(set_id)
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}
