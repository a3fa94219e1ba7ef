//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `spjp.yaml` but can be specified via `-f` flag or `SPJP_CONFIG`
//! environment variable. A missing file is not an error; every field has a default.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **Defaults** - see the `Default` implementations below
//! 2. **YAML config file** - Base configuration (default: `spjp.yaml`)
//! 3. **Environment variables** - Variables prefixed with `SPJP_` override YAML values
//! 4. **Command line** - `--lang` overrides `language`
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `SPJP_DASHBOARD__LATEST_EMOTES=48` sets the `dashboard.latest_emotes` field.
//!
//! ## Example
//!
//! ```yaml
//! api_base_url: https://streampartner.example.com/
//! language: en
//! request_timeout: 10s
//! schedule_file: ./extra-schedule.yaml
//! dashboard:
//!   latest_badges: 12
//!   latest_emotes: 24
//! ```

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use url::Url;

use crate::catalog::SortOrder;
use crate::errors::Error;
use crate::i18n::Language;

/// Browse Twitch global badges and emotes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "SPJP_CONFIG", default_value = "spjp.yaml", global = true)]
    pub config: String,

    /// Display language (overrides the configured language)
    #[arg(long, value_enum, global = true)]
    pub lang: Option<Language>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Validate configuration and the schedule table, then exit.
    #[arg(long)]
    pub validate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List global badges with their availability
    Badges {
        #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },
    /// Show one badge set, its variations and availability window
    Badge {
        /// Badge set id, e.g. `legendus`
        set_id: String,
        /// Version to show; defaults to the first version
        #[arg(long)]
        version: Option<String>,
    },
    /// List global emotes
    Emotes {
        /// Only emotes whose name contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },
    /// Classify a badge from the schedule table alone, without contacting the server
    Availability {
        set_id: String,
        /// Reference instant (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Badges available right now, plus the latest badges and emotes
    Dashboard,
}

/// Main application configuration.
///
/// All fields have defaults, so an empty or absent config file is valid.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the badge server is served from; `api/badges` and `api/emotes` are resolved
    /// relative to it
    pub api_base_url: Url,
    /// Display language for titles and availability messages
    pub language: Language,
    /// Timeout for each request to the badge server
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Extra schedule entries, merged over the built-in table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_file: Option<PathBuf>,
    /// Dashboard listing sizes
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// How many of the newest badges to show
    pub latest_badges: usize,
    /// How many of the newest emotes to show
    pub latest_emotes: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            latest_badges: 12,
            latest_emotes: 24,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Local development server
            api_base_url: Url::parse("http://localhost:5000/").expect("default URL is valid"),
            language: Language::default(),
            request_timeout: Duration::from_secs(30),
            schedule_file: None,
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        if let Some(lang) = args.lang {
            config.language = lang;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can override specific values
            .merge(Env::prefixed("SPJP_").ignore(&["CONFIG"]).split("__"))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!(
                    "api_base_url must be an http(s) URL, got scheme '{}'",
                    self.api_base_url.scheme()
                ),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request_timeout must be greater than zero".to_string(),
            });
        }

        if self.request_timeout > Duration::from_secs(600) {
            return Err(Error::Config {
                message: format!(
                    "request_timeout is too long ({}), maximum is 10m",
                    humantime::format_duration(self.request_timeout)
                ),
            });
        }

        if self.dashboard.latest_badges == 0 || self.dashboard.latest_emotes == 0 {
            return Err(Error::Config {
                message: "dashboard.latest_badges and dashboard.latest_emotes must be at least 1".to_string(),
            });
        }

        if let Some(path) = &self.schedule_file
            && !path.is_file()
        {
            return Err(Error::Config {
                message: format!("schedule_file {} does not exist", path.display()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(config: &str) -> Args {
        Args {
            config: config.to_string(),
            lang: None,
            json: false,
            validate: false,
            command: None,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load(&args("missing.yaml"))?;

            assert_eq!(config.api_base_url.as_str(), "http://localhost:5000/");
            assert_eq!(config.language, Language::Ja);
            assert_eq!(config.request_timeout, Duration::from_secs(30));
            assert_eq!(config.schedule_file, None);
            assert_eq!(config.dashboard.latest_badges, 12);

            Ok(())
        });
    }

    #[test]
    fn test_yaml_config() {
        Jail::expect_with(|jail| {
            jail.create_file("extra.yaml", "badges: {}\n")?;
            jail.create_file(
                "test.yaml",
                r#"
api_base_url: https://streampartner.example.com/
language: en
request_timeout: 10s
schedule_file: extra.yaml
dashboard:
  latest_emotes: 48
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.api_base_url.as_str(), "https://streampartner.example.com/");
            assert_eq!(config.language, Language::En);
            assert_eq!(config.request_timeout, Duration::from_secs(10));
            assert_eq!(config.schedule_file, Some(PathBuf::from("extra.yaml")));
            assert_eq!(config.dashboard.latest_emotes, 48);
            // default preserved for unspecified nested field
            assert_eq!(config.dashboard.latest_badges, 12);

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "language: en\nrequest_timeout: 10s\n")?;

            jail.set_env("SPJP_REQUEST_TIMEOUT", "2m");
            jail.set_env("SPJP_API_BASE_URL", "http://127.0.0.1:8080/");
            jail.set_env("SPJP_DASHBOARD__LATEST_BADGES", "5");

            let config = Config::load(&args("test.yaml"))?;

            // Env vars should override
            assert_eq!(config.request_timeout, Duration::from_secs(120));
            assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:8080/");
            assert_eq!(config.dashboard.latest_badges, 5);

            // YAML values should be preserved
            assert_eq!(config.language, Language::En);

            Ok(())
        });
    }

    #[test]
    fn test_cli_language_wins() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "language: en\n")?;
            jail.set_env("SPJP_LANGUAGE", "en");

            let mut args = args("test.yaml");
            args.lang = Some(Language::Ja);
            let config = Config::load(&args)?;
            assert_eq!(config.language, Language::Ja);

            Ok(())
        });
    }

    #[test]
    fn test_unknown_field_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "api_base: http://localhost:5000/\n")?;
            assert!(Config::load(&args("test.yaml")).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.request_timeout = Duration::from_secs(3600);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("too long"));

        config.request_timeout = Duration::from_secs(5);
        config.api_base_url = Url::parse("ftp://example.com/").unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("ftp"));

        config.api_base_url = Url::parse("https://example.com/").unwrap();
        config.dashboard.latest_emotes = 0;
        assert!(config.validate().is_err());

        config.dashboard.latest_emotes = 1;
        config.schedule_file = Some(PathBuf::from("/nonexistent/schedule.yaml"));
        assert!(config.validate().unwrap_err().to_string().contains("does not exist"));

        config.schedule_file = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_args_parse_subcommands() {
        let args = Args::try_parse_from(["spjp", "--lang", "en", "emotes", "--search", "kappa", "--sort", "oldest"]).unwrap();
        assert_eq!(args.lang, Some(Language::En));
        assert_eq!(
            args.command,
            Some(Command::Emotes {
                search: Some("kappa".to_string()),
                sort: SortOrder::Oldest,
            })
        );

        let args = Args::try_parse_from(["spjp", "availability", "legendus", "--at", "2025-06-29T20:00:00Z"]).unwrap();
        match args.command {
            Some(Command::Availability { set_id, at }) => {
                assert_eq!(set_id, "legendus");
                assert_eq!(at.unwrap().to_rfc3339(), "2025-06-29T20:00:00+00:00");
            }
            other => panic!("unexpected command {other:?}"),
        }

        // Invalid instants are rejected at the boundary
        assert!(Args::try_parse_from(["spjp", "availability", "legendus", "--at", "yesterday"]).is_err());
    }
}
